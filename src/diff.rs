use crate::model::{InsertPosition, PendingAdds, VideoCollection, VideoItem};

/// Videos of `source` whose id is not a key of `target`, ordered for insertion.
///
/// Titles are never compared. The order depends on where the platform puts an
/// inserted item:
///
/// * [`InsertPosition::Head`]: every insert lands at position zero, so the
///   missing videos are inserted oldest first (reverse of `source` order). After
///   all inserts they read in `source` order at the top of the target.
/// * [`InsertPosition::Tail`]: appends keep `source` order as is.
///
/// If YouTube ever changes where `position: 0` puts an item, the `Head` ordering
/// is what breaks.
pub fn pending_adds(
    source: &VideoCollection,
    target: &VideoCollection,
    position: InsertPosition,
) -> PendingAdds {
    let mut items: Vec<VideoItem> = source
        .iter()
        .filter(|(id, _)| !target.contains(id))
        .map(|(id, title)| VideoItem::new(id, title))
        .collect();

    if position == InsertPosition::Head {
        items.reverse();
    }

    PendingAdds::new(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(ids: &[&str]) -> VideoCollection {
        ids.iter()
            .map(|id| VideoItem::new(*id, format!("Title {id}")))
            .collect()
    }

    #[test]
    fn head_insertion_reverses_source_order() {
        let source = collection(&["v1", "v2", "v3"]);
        let target = VideoCollection::new();

        let pending = pending_adds(&source, &target, InsertPosition::Head);
        assert_eq!(pending.ids(), ["v3", "v2", "v1"]);
    }

    #[test]
    fn tail_insertion_keeps_source_order() {
        let source = collection(&["v1", "v2", "v3"]);
        let target = collection(&["v2"]);

        let pending = pending_adds(&source, &target, InsertPosition::Tail);
        assert_eq!(pending.ids(), ["v1", "v3"]);
    }

    #[test]
    fn skips_videos_already_in_target() {
        let source = collection(&["new2", "old1", "new1", "old2"]);
        let target = collection(&["old2", "unrelated", "old1"]);

        let pending = pending_adds(&source, &target, InsertPosition::Head);

        assert_eq!(pending.ids(), ["new1", "new2"]);
        assert_eq!(pending.len(), source.len() - 2);
        assert!(pending.iter().all(|v| !target.contains(&v.id)));
    }

    #[test]
    fn presence_ignores_titles() {
        let mut source = VideoCollection::new();
        source.insert("v1", "Original title");
        let mut target = VideoCollection::new();
        target.insert("v1", "Renamed by uploader");

        assert!(pending_adds(&source, &target, InsertPosition::Head).is_empty());
    }

    #[test]
    fn keeps_source_titles() {
        let source = collection(&["v1"]);
        let pending = pending_adds(&source, &VideoCollection::new(), InsertPosition::Head);
        assert_eq!(pending.iter().next().unwrap().title, "Title v1");
    }

    #[test]
    fn empty_source_gives_nothing() {
        let target = collection(&["v1"]);
        assert!(pending_adds(&VideoCollection::new(), &target, InsertPosition::Head).is_empty());
    }

    #[test]
    fn fully_synced_gives_nothing() {
        let source = collection(&["v1", "v2"]);
        let target = collection(&["v2", "v1", "v0"]);
        assert!(pending_adds(&source, &target, InsertPosition::Head).is_empty());
    }
}
