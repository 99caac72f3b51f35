//! Execution of external commands with a bounded deadline.
//!
//! The `CommandRunner` trait lets the collector talk to the real `gluster`
//! binary in production and to [`MockCli`](super::MockCli) in tests.

use std::borrow::Cow;
use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

/// Deadline applied to every command unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Error type for command execution failures.
#[derive(Debug)]
pub enum CommandError {
    /// The program could not be started.
    Spawn { program: String, source: io::Error },
    /// The program did not exit before the deadline and was killed.
    Timeout { program: String, timeout: Duration },
    /// Waiting on the child failed.
    Io(io::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Spawn { program, source } => {
                write!(f, "failed to execute {}: {}", program, source)
            }
            CommandError::Timeout { program, timeout } => {
                write!(f, "{} did not finish within {:?}", program, timeout)
            }
            CommandError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Spawn { source, .. } => Some(source),
            CommandError::Io(e) => Some(e),
            CommandError::Timeout { .. } => None,
        }
    }
}

impl From<io::Error> for CommandError {
    fn from(e: io::Error) -> Self {
        CommandError::Io(e)
    }
}

/// Captured result of one command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output followed by standard error.
    pub output: Vec<u8>,
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Output of a command that exited with code 0.
    pub fn success(output: impl Into<Vec<u8>>) -> Self {
        Self {
            output: output.into(),
            code: Some(0),
        }
    }

    /// Output of a command that exited with the given code.
    pub fn failure(code: i32, output: impl Into<Vec<u8>>) -> Self {
        Self {
            output: output.into(),
            code: Some(code),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Output decoded as UTF-8, lossy.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }
}

/// Abstraction over process execution.
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` and captures its combined output.
    ///
    /// A nonzero exit is not an error at this level; callers inspect
    /// [`CommandOutput::code`].
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError>;
}

/// Runs real processes, killing any that outlive the deadline.
#[derive(Debug, Clone, Copy)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        debug!(program, ?args, "executing command");
        let deadline = Instant::now() + self.timeout;
        let timed_out = || CommandError::Timeout {
            program: program.to_string(),
            timeout: self.timeout,
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        // Pipes are drained on separate threads so a chatty child cannot
        // block on a full pipe while we wait for it.
        let (tx, rx) = mpsc::channel();
        let mut readers = 0;
        if let Some(pipe) = child.stdout.take() {
            spawn_reader(STDOUT, pipe, tx.clone());
            readers += 1;
        }
        if let Some(pipe) = child.stderr.take() {
            spawn_reader(STDERR, pipe, tx);
            readers += 1;
        }

        let status = match wait_until(&mut child, deadline) {
            Ok(Some(status)) => status,
            Ok(None) => {
                kill(&mut child);
                return Err(timed_out());
            }
            Err(e) => {
                kill(&mut child);
                return Err(e.into());
            }
        };

        // A background process started by the child may keep the pipes
        // open after the child exits; draining is bound by the same deadline.
        let Some(output) = drain_until(&rx, readers, deadline) else {
            return Err(timed_out());
        };

        Ok(CommandOutput {
            output,
            code: status.code(),
        })
    }
}

const STDOUT: usize = 0;
const STDERR: usize = 1;

fn spawn_reader<R>(stream: usize, mut pipe: R, tx: Sender<(usize, Vec<u8>)>)
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send((stream, buf));
    });
}

/// Collects the output of `readers` pipes, stdout first. Returns `None` if
/// they are not all closed by `deadline`.
fn drain_until(
    rx: &Receiver<(usize, Vec<u8>)>,
    readers: usize,
    deadline: Instant,
) -> Option<Vec<u8>> {
    let mut streams = [Vec::new(), Vec::new()];
    for _ in 0..readers {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok((stream, buf)) => streams[stream] = buf,
            Err(RecvTimeoutError::Timeout) => return None,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    let [mut output, stderr] = streams;
    output.extend(stderr);
    Some(output)
}

/// Polls the child until it exits. Returns `None` once `deadline` passes.
fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
