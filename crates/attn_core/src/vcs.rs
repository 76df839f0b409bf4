//! Version-control integration.
//!
//! Only two questions are ever asked of version control: "is this tree
//! managed" and "what is the blob hash of this file". Both go through the
//! [`VcsBackend`] trait so tests can substitute a fake.

use crate::content_id::ContentId;
use crate::error::{AttnError, Result};
use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Content-hash service offered by a version-control system.
pub trait VcsBackend {
    /// Returns true if the tracked root is inside a repository.
    fn is_repository(&self) -> bool;

    /// Returns the blob hash of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `VcsUnavailable` for any failure; callers fall back to
    /// [`ContentId::hash_blob`].
    fn hash_object(&self, path: &Path) -> Result<ContentId>;
}

/// Check if git is available on PATH.
pub fn is_available() -> bool {
    Command::new("git")
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// [`VcsBackend`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
    timeout: Duration,
}

impl GitCli {
    /// Creates a git backend for the tree at `root`.
    ///
    /// Every invocation is killed once `timeout` elapses.
    pub fn new(root: impl AsRef<Path>, timeout: Duration) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            timeout,
        }
    }

    /// Runs git in `dir` and returns its stdout.
    fn run<I, S>(&self, dir: &Path, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut child = Command::new("git")
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AttnError::VcsUnavailable(format!("failed to start git: {}", e)))?;

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(AttnError::VcsUnavailable(format!(
                        "git timed out after {}ms",
                        self.timeout.as_millis()
                    )));
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        };

        let mut stdout = String::new();
        if let Some(mut pipe) = child.stdout.take() {
            pipe.read_to_string(&mut stdout)
                .map_err(|e| AttnError::VcsUnavailable(format!("invalid git output: {}", e)))?;
        }

        if !status.success() {
            let mut stderr = String::new();
            if let Some(mut pipe) = child.stderr.take() {
                let _ = pipe.read_to_string(&mut stderr);
            }
            return Err(AttnError::VcsUnavailable(stderr.trim().to_string()));
        }

        Ok(stdout)
    }
}

impl VcsBackend for GitCli {
    fn is_repository(&self) -> bool {
        self.run(&self.root, ["rev-parse", "--git-dir"]).is_ok()
    }

    fn hash_object(&self, path: &Path) -> Result<ContentId> {
        // Run from the file's own directory so git resolves the bare name
        // against the right worktree location.
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(&self.root);
        let name = path
            .file_name()
            .ok_or_else(|| AttnError::VcsUnavailable(format!("not a file: {}", path.display())))?;

        // --no-filters: hash the raw bytes, never the autocrlf/clean-filtered form.
        let args: [&OsStr; 4] = [
            OsStr::new("hash-object"),
            OsStr::new("--no-filters"),
            OsStr::new("--"),
            name,
        ];
        let stdout = self.run(dir, args)?;
        ContentId::from_hex(&stdout)
            .map_err(|e| AttnError::VcsUnavailable(format!("unexpected hash-object output: {}", e)))
    }
}
