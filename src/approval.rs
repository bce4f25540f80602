use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::error::Result;
use crate::shutdown::shutdown_signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approval {
    Approved,
    Declined,
}

/// Asks the operator before anything is written to YouTube
#[async_trait::async_trait]
pub trait Approver: Send + Sync {
    async fn approve(&self, prompt: &str) -> Result<Approval>;
}

/// Always gives the same answer (`--yes`, tests)
#[derive(Debug, Clone, Copy)]
pub struct AutoApprover(pub Approval);

#[async_trait::async_trait]
impl Approver for AutoApprover {
    async fn approve(&self, _prompt: &str) -> Result<Approval> {
        Ok(self.0)
    }
}

/// Waits for Enter on stdin. Ctrl+C, SIGTERM or end of input decline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleApprover;

#[async_trait::async_trait]
impl Approver for ConsoleApprover {
    async fn approve(&self, prompt: &str) -> Result<Approval> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(format!("\n{} ", prompt).as_bytes()).await?;
        stdout.flush().await?;

        let mut line = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());

        tokio::select! {
            read = stdin.read_line(&mut line) => Ok(answer(read?)),
            signal = shutdown_signal() => {
                tracing::info!("Received {}, nothing was changed", signal);
                Ok(Approval::Declined)
            }
        }
    }
}

/// Any line approves; end of input does not
fn answer(bytes_read: usize) -> Approval {
    if bytes_read == 0 {
        Approval::Declined
    } else {
        Approval::Approved
    }
}
