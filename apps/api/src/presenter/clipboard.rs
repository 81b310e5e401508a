use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("No clipboard command configured")]
    NotConfigured,

    #[error("Clipboard command '{command}' could not run: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Clipboard command '{command}' exited with {status}")]
    Failed { command: String, status: String },
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn copy(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Pipes text into an OS clipboard tool (`wl-copy`, `xclip`, `pbcopy`, `clip`).
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Parses a whitespace-separated command line such as `xclip -selection clipboard`.
    pub fn from_command_line(command_line: &str) -> Result<Self, ClipboardError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(ClipboardError::NotConfigured)?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// The usual clipboard tool for the target platform.
    pub fn platform_default() -> &'static str {
        if cfg!(target_os = "macos") {
            "pbcopy"
        } else if cfg!(target_os = "windows") {
            "clip"
        } else {
            "xclip -selection clipboard"
        }
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let spawn_error = |source: std::io::Error| ClipboardError::Spawn {
            command: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            // A tool that exits early closes the pipe; its exit status decides.
            match stdin.write_all(text.as_bytes()).await {
                Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                    return Err(spawn_error(e))
                }
                _ => {}
            }
            // Dropping stdin closes the pipe so the tool sees EOF.
        }

        let status = child.wait().await.map_err(spawn_error)?;
        if !status.success() {
            return Err(ClipboardError::Failed {
                command: self.program.clone(),
                status: status.to_string(),
            });
        }

        debug!("Copied {} bytes with {}", text.len(), self.program);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_is_split_into_program_and_args() {
        let clipboard = CommandClipboard::from_command_line("xclip -selection clipboard").unwrap();
        assert_eq!(clipboard.program, "xclip");
        assert_eq!(clipboard.args, vec!["-selection", "clipboard"]);
    }

    #[test]
    fn test_empty_command_line_is_not_configured() {
        assert!(matches!(
            CommandClipboard::from_command_line("  "),
            Err(ClipboardError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let clipboard =
            CommandClipboard::from_command_line("definitely-not-a-clipboard-tool-4821").unwrap();
        let err = clipboard.copy("text").await.unwrap_err();
        assert!(matches!(err, ClipboardError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_copy_pipes_text_to_command() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("clip.txt");
        let clipboard = CommandClipboard {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                format!("cat > '{}'", target.display()),
            ],
        };
        clipboard.copy("# Ana Silva").await.unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "# Ana Silva");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let clipboard = CommandClipboard::from_command_line("false").unwrap();
        let err = clipboard.copy("x").await.unwrap_err();
        assert!(matches!(err, ClipboardError::Failed { .. }));
    }
}
