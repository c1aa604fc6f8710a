//! Opening a selected result
//!
//! The executor hands the chosen link to an [`Opener`]. The default
//! [`CommandOpener`] runs an external program (`open` unless configured).

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Command used when none is configured
pub const DEFAULT_GOTO_COMMAND: &str = "open";

/// Action that opens a link outside the process
#[async_trait]
pub trait Opener: Send + Sync {
    async fn open(&self, link: &str) -> anyhow::Result<()>;
}

/// Runs `<program> <link>` and waits for it to exit
#[derive(Debug, Clone)]
pub struct CommandOpener {
    program: String,
}

impl CommandOpener {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandOpener {
    fn default() -> Self {
        Self::new(DEFAULT_GOTO_COMMAND)
    }
}

#[async_trait]
impl Opener for CommandOpener {
    async fn open(&self, link: &str) -> anyhow::Result<()> {
        debug!("Opening {} with {}", link, self.program);

        let output = Command::new(&self.program).arg(link).output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            if stderr.is_empty() {
                anyhow::bail!("{}", output.status);
            }
            anyhow::bail!("{}: {}", output.status, stderr);
        }
        Ok(())
    }
}
