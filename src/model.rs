use indexmap::IndexMap;
use serde::Serialize;

/// A video as seen in a playlist: its id and display title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoItem {
    pub id: String,
    pub title: String,
}

impl VideoItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Videos of one playlist keyed by id, in the order the platform listed them.
///
/// A video listed twice keeps its first position; the later title wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VideoCollection {
    videos: IndexMap<String, String>,
}

impl VideoCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the id was not present yet
    pub fn insert(&mut self, id: impl Into<String>, title: impl Into<String>) -> bool {
        self.videos.insert(id.into(), title.into()).is_none()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.videos.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// `(id, title)` pairs in insertion order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &str)> {
        self.videos
            .iter()
            .map(|(id, title)| (id.as_str(), title.as_str()))
    }
}

impl FromIterator<VideoItem> for VideoCollection {
    fn from_iter<I: IntoIterator<Item = VideoItem>>(iter: I) -> Self {
        let mut collection = Self::new();
        for item in iter {
            collection.insert(item.id, item.title);
        }
        collection
    }
}

/// A playlist resolved at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRef {
    pub id: String,
    pub title: String,
}

impl PlaylistRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: String,
    pub title: String,
    pub liked_playlist_id: Option<String>,
}

/// Where the platform puts an inserted item in the target playlist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertPosition {
    /// Position zero; each insert lands above the previous one
    #[default]
    Head,
    /// End of the playlist
    Tail,
}

impl InsertPosition {
    pub fn api_position(self) -> Option<u32> {
        match self {
            InsertPosition::Head => Some(0),
            InsertPosition::Tail => None,
        }
    }
}

/// Videos to copy in this run, in the order they will be inserted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingAdds {
    items: Vec<VideoItem>,
}

impl PendingAdds {
    pub fn new(items: Vec<VideoItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VideoItem> {
        self.items.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|v| v.id.as_str()).collect()
    }
}

impl Serialize for PendingAdds {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.items.iter().map(|v| (&v.id, &v.title));
        serializer.collect_map(entries)
    }
}
