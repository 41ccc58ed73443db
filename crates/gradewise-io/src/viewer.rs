//! Opening saved datasets in the platform's default viewer.

use std::path::Path;
use std::process::{Command, Stdio};

use gradewise_core::error::ViewerError;
use gradewise_core::traits::FileViewer;

/// How to hand a file to the desktop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenStrategy {
    /// `xdg-open <path>` (Linux and BSDs).
    XdgOpen,
    /// `open <path>` (macOS).
    MacOpen,
    /// `cmd /C start "" <path>` (Windows).
    WindowsStart,
    /// A user-chosen program; the path is appended as the last argument.
    Custom(Vec<String>),
}

impl OpenStrategy {
    /// The strategy for the platform this binary was built for.
    pub fn for_current_platform() -> Self {
        if cfg!(target_os = "windows") {
            OpenStrategy::WindowsStart
        } else if cfg!(target_os = "macos") {
            OpenStrategy::MacOpen
        } else {
            OpenStrategy::XdgOpen
        }
    }

    fn command(&self, path: &Path) -> Option<Command> {
        let mut cmd = match self {
            OpenStrategy::XdgOpen => Command::new("xdg-open"),
            OpenStrategy::MacOpen => Command::new("open"),
            OpenStrategy::WindowsStart => {
                let mut cmd = Command::new("cmd");
                cmd.args(["/C", "start", ""]);
                cmd
            }
            OpenStrategy::Custom(argv) => {
                let (program, args) = argv.split_first()?;
                let mut cmd = Command::new(program);
                cmd.args(args);
                cmd
            }
        };
        cmd.arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        Some(cmd)
    }
}

/// [`FileViewer`] backed by a platform opener.
#[derive(Debug, Clone)]
pub struct SystemViewer {
    strategy: OpenStrategy,
}

impl SystemViewer {
    pub fn new(strategy: OpenStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &OpenStrategy {
        &self.strategy
    }
}

impl Default for SystemViewer {
    fn default() -> Self {
        Self::new(OpenStrategy::for_current_platform())
    }
}

impl FileViewer for SystemViewer {
    fn open_in_default_viewer(&self, path: &Path) -> Result<(), ViewerError> {
        let fail = |message: String| ViewerError {
            path: path.to_path_buf(),
            message,
        };

        let mut cmd = self
            .strategy
            .command(path)
            .ok_or_else(|| fail("viewer command is empty".into()))?;

        tracing::debug!("opening {} with {:?}", path.display(), self.strategy);
        let output = cmd.output().map_err(|e| fail(e.to_string()))?;
        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            Err(fail(if detail.is_empty() {
                format!("opener exited with {}", output.status)
            } else {
                format!("opener exited with {}: {detail}", output.status)
            }))
        }
    }
}
