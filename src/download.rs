use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use thiserror::Error;

use crate::command::CommandPlan;

/// yt-dlp's wording when it refuses a URL. Only a heuristic: the text may change
/// between yt-dlp releases.
const INVALID_URL_MARKER: &str = "' is not a valid URL.";
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("yt-dlp rejected the URL")]
    InvalidUrl,
    #[error("yt-dlp failed (exit_code={exit_code:?}): {stderr}")]
    ToolFailed {
        exit_code: Option<i32>,
        stderr: String,
    },
    #[error("{0}")]
    Environment(String),
}

#[derive(Debug)]
pub enum DownloadOutcome {
    Completed,
    Cancelled,
    Failed(DownloadError),
}

pub fn ensure_directory(path: &Path) -> Result<(), DownloadError> {
    fs::create_dir_all(path).map_err(|e| {
        DownloadError::Environment(format!("failed to create {}: {e}", path.display()))
    })
}

/// Explicit override first, then a PATH lookup.
pub fn resolve_executable(
    plan: &CommandPlan,
    override_path: Option<&Path>,
) -> Result<PathBuf, DownloadError> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }
    which::which(plan.executable)
        .map_err(|e| DownloadError::Environment(format!("{} not found: {e}", plan.executable)))
}

pub fn classify_failure(exit_code: Option<i32>, stderr: &str) -> DownloadError {
    if stderr.contains(INVALID_URL_MARKER) {
        DownloadError::InvalidUrl
    } else {
        DownloadError::ToolFailed {
            exit_code,
            stderr: stderr.trim().to_string(),
        }
    }
}

/// A running external process. Dropping the task kills the process.
pub struct DownloadTask {
    cancel_tx: Sender<()>,
    outcome_rx: Receiver<DownloadOutcome>,
}

impl DownloadTask {
    pub fn start(program: &Path, plan: &CommandPlan) -> Result<Self, DownloadError> {
        Self::spawn(program, &plan.arguments)
    }

    pub fn spawn(program: &Path, args: &[String]) -> Result<Self, DownloadError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                DownloadError::Environment(format!("failed to start {}: {e}", program.display()))
            })?;

        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let (outcome_tx, outcome_rx) = mpsc::channel::<DownloadOutcome>();

        let stdout_handle = child.stdout.take().map(|stdout| {
            thread::spawn(move || {
                for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                    log::debug!("yt-dlp: {line}");
                }
            })
        });
        let stderr_handle = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = stderr.read_to_end(&mut buf);
                String::from_utf8_lossy(&buf).into_owned()
            })
        });

        thread::spawn(move || {
            let outcome = match wait_or_cancel(&mut child, &cancel_rx) {
                // Grandchildren (ffmpeg) may still hold the pipes, so the
                // readers are not joined after a kill.
                Ok(None) => DownloadOutcome::Cancelled,
                Ok(Some(status)) => {
                    if let Some(handle) = stdout_handle {
                        let _ = handle.join();
                    }
                    let stderr = stderr_handle
                        .and_then(|handle| handle.join().ok())
                        .unwrap_or_default();

                    if status.success() {
                        DownloadOutcome::Completed
                    } else {
                        log::warn!("yt-dlp exited with {status}: {}", stderr.trim());
                        DownloadOutcome::Failed(classify_failure(status.code(), &stderr))
                    }
                }
                Err(err) => DownloadOutcome::Failed(err),
            };
            let _ = outcome_tx.send(outcome);
        });

        Ok(Self {
            cancel_tx,
            outcome_rx,
        })
    }

    /// Asks the worker to kill the process. The outcome arrives as `Cancelled`.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(());
    }

    /// Non-blocking; `Some` exactly once, when the process has finished.
    pub fn poll(&self) -> Option<DownloadOutcome> {
        self.outcome_rx.try_recv().ok()
    }
}

/// `Ok(None)` means the process was killed on request.
fn wait_or_cancel(
    child: &mut Child,
    cancel_rx: &Receiver<()>,
) -> Result<Option<ExitStatus>, DownloadError> {
    loop {
        match cancel_rx.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => {
                log::info!("cancelling download (pid {})", child.id());
                let _ = child.kill();
                let _ = child.wait();
                return Ok(None);
            }
            Err(TryRecvError::Empty) => {}
        }

        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                return Err(DownloadError::Environment(format!("failed to wait for yt-dlp: {e}")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_is_recognised() {
        let stderr = "ERROR: [generic] 'not-a-url' is not a valid URL. Set --default-search \"ytsearch\"";
        assert!(matches!(classify_failure(Some(1), stderr), DownloadError::InvalidUrl));
    }

    #[test]
    fn other_failures_keep_their_diagnostics() {
        let err = classify_failure(Some(1), "ERROR: Unable to download webpage\n");
        match err {
            DownloadError::ToolFailed { exit_code, stderr } => {
                assert_eq!(exit_code, Some(1));
                assert_eq!(stderr, "ERROR: Unable to download webpage");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn creates_nested_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a").join("b");
        ensure_directory(&target).unwrap();
        assert!(target.is_dir());
        ensure_directory(&target).unwrap();
    }

    #[test]
    fn directory_over_a_file_is_an_environment_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("taken");
        fs::write(&file, b"").unwrap();
        assert!(matches!(
            ensure_directory(&file.join("sub")),
            Err(DownloadError::Environment(_))
        ));
    }

    #[test]
    fn override_path_skips_lookup() {
        let plan = crate::command::build(&crate::models::FormState {
            url: "https://x/y".to_string(),
            ..Default::default()
        })
        .unwrap();
        let path = resolve_executable(&plan, Some(Path::new("/opt/yt-dlp"))).unwrap();
        assert_eq!(path, PathBuf::from("/opt/yt-dlp"));
    }

    #[test]
    fn missing_program_fails_to_start() {
        let result = DownloadTask::spawn(Path::new("/definitely/not/yt-dlp"), &[]);
        assert!(matches!(result, Err(DownloadError::Environment(_))));
    }

    impl DownloadTask {
        fn wait(self) -> DownloadOutcome {
            self.outcome_rx.recv().unwrap()
        }
    }

    #[cfg(unix)]
    fn sh(script: &str) -> DownloadTask {
        DownloadTask::spawn(Path::new("sh"), &["-c".to_string(), script.to_string()]).unwrap()
    }

    #[cfg(unix)]
    #[test]
    fn successful_exit_completes() {
        assert!(matches!(sh("echo done").wait(), DownloadOutcome::Completed));
    }

    #[cfg(unix)]
    #[test]
    fn failing_exit_is_classified_from_stderr() {
        let task = sh("echo \"ERROR: 'abc' is not a valid URL.\" >&2; exit 1");
        assert!(matches!(
            task.wait(),
            DownloadOutcome::Failed(DownloadError::InvalidUrl)
        ));

        let task = sh("echo boom >&2; exit 3");
        match task.wait() {
            DownloadOutcome::Failed(DownloadError::ToolFailed { exit_code, stderr }) => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn cancel_kills_the_process() {
        let task = sh("exec sleep 30");
        assert!(task.poll().is_none());
        task.cancel();
        assert!(matches!(task.wait(), DownloadOutcome::Cancelled));
    }
}
