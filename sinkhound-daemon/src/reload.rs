//! Resolver reload port.
//!
//! Publishing a new zone file only takes effect once the resolver reloads
//! it. The reload is a privileged external command, so it lives behind a
//! trait: the daemon loop holds a `Reloader`, production wires in
//! `CommandReloader`, and tests script a `MockReloader`. The command runs
//! with an explicit timeout; an unbounded reload would stall every future
//! cycle.

use std::process::{Command, Stdio};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Errors from a reload attempt.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("failed to spawn reload command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("reload command `{command}` exited with status {code}")]
    ExitStatus { command: String, code: i32 },

    #[error("reload command `{command}` timed out after {timeout_sec}s")]
    Timeout { command: String, timeout_sec: u64 },
}

/// Trait for triggering a resolver reload after a successful publish.
pub trait Reloader: Send + Sync {
    fn reload(&self) -> Result<(), ReloadError>;
}

/// Reloader that runs an external service-control command.
#[derive(Debug, Clone)]
pub struct CommandReloader {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandReloader {
    /// Build from a whitespace-separated command line, e.g.
    /// `"systemctl reload unbound"`. Returns `None` for a blank command.
    pub fn from_command_line(command: &str, timeout: Duration) -> Option<Self> {
        let mut parts = command.split_whitespace();
        let program = parts.next()?.to_string();
        let args = parts.map(str::to_string).collect();
        Some(Self {
            program,
            args,
            timeout,
        })
    }

    fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

impl Reloader for CommandReloader {
    fn reload(&self) -> Result<(), ReloadError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ReloadError::Spawn {
                command: self.command_line(),
                source,
            })?;

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    if status.success() {
                        return Ok(());
                    }
                    return Err(ReloadError::ExitStatus {
                        command: self.command_line(),
                        // A signal-terminated child has no exit code
                        code: status.code().unwrap_or(-1),
                    });
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(ReloadError::Timeout {
                            command: self.command_line(),
                            timeout_sec: self.timeout.as_secs(),
                        });
                    }
                    std::thread::sleep(Duration::from_millis(50));
                }
                Err(source) => {
                    return Err(ReloadError::Spawn {
                        command: self.command_line(),
                        source,
                    });
                }
            }
        }
    }
}

/// Mock reloader for testing: counts invocations, optionally fails.
#[derive(Debug, Clone, Default)]
pub struct MockReloader {
    invocations: Arc<RwLock<u64>>,
    fail: bool,
}

impl MockReloader {
    /// A reloader whose every invocation succeeds.
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// A reloader whose every invocation reports a non-zero exit.
    pub fn failing() -> Self {
        Self {
            invocations: Arc::new(RwLock::new(0)),
            fail: true,
        }
    }

    /// Number of reload invocations so far.
    pub fn invocations(&self) -> u64 {
        *self.invocations.read().unwrap()
    }
}

impl Reloader for MockReloader {
    fn reload(&self) -> Result<(), ReloadError> {
        *self.invocations.write().unwrap() += 1;
        if self.fail {
            Err(ReloadError::ExitStatus {
                command: "mock-reload".to_string(),
                code: 1,
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_command_line_splits_words() {
        let r = CommandReloader::from_command_line(
            "systemctl reload unbound",
            Duration::from_secs(30),
        )
        .expect("non-empty");
        assert_eq!(r.command_line(), "systemctl reload unbound");
    }

    #[test]
    fn test_from_command_line_single_word() {
        let r = CommandReloader::from_command_line("true", Duration::from_secs(5))
            .expect("non-empty");
        assert_eq!(r.command_line(), "true");
    }

    #[test]
    fn test_from_command_line_blank_is_none() {
        assert!(CommandReloader::from_command_line("   ", Duration::from_secs(5)).is_none());
    }

    #[test]
    fn test_command_reloader_success() {
        let r = CommandReloader::from_command_line("true", Duration::from_secs(5)).unwrap();
        assert!(r.reload().is_ok());
    }

    #[test]
    fn test_command_reloader_nonzero_exit() {
        let r = CommandReloader::from_command_line("false", Duration::from_secs(5)).unwrap();
        let err = r.reload().unwrap_err();
        assert!(matches!(err, ReloadError::ExitStatus { code: 1, .. }));
    }

    #[test]
    fn test_command_reloader_spawn_failure() {
        let r = CommandReloader::from_command_line(
            "/nonexistent/sinkhound-reload-helper",
            Duration::from_secs(5),
        )
        .unwrap();
        let err = r.reload().unwrap_err();
        assert!(matches!(err, ReloadError::Spawn { .. }));
    }

    #[test]
    fn test_command_reloader_timeout_kills_child() {
        let r = CommandReloader::from_command_line("sleep 30", Duration::from_millis(200))
            .unwrap();
        let start = Instant::now();
        let err = r.reload().unwrap_err();

        assert!(matches!(err, ReloadError::Timeout { .. }));
        // The child was killed, not waited out
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_mock_reloader_counts() {
        let r = MockReloader::succeeding();
        assert_eq!(r.invocations(), 0);
        r.reload().expect("ok");
        r.reload().expect("ok");
        assert_eq!(r.invocations(), 2);
    }

    #[test]
    fn test_mock_reloader_failing_still_counts() {
        let r = MockReloader::failing();
        assert!(r.reload().is_err());
        assert_eq!(r.invocations(), 1);
    }

    #[test]
    fn test_mock_reloader_clone_shares_counter() {
        let a = MockReloader::succeeding();
        let b = a.clone();
        a.reload().expect("ok");
        assert_eq!(b.invocations(), 1);
    }

    #[test]
    fn test_reloader_trait_object() {
        let r: Box<dyn Reloader> = Box::new(MockReloader::succeeding());
        assert!(r.reload().is_ok());
    }
}
