//! Running external tools with a deadline.

use std::{
    io::Read,
    process::{Child, Command, ExitStatus, Stdio},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use log::{debug, trace, warn};

use super::RenderError;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// A shared flag that stops a running render.
///
/// Clones share the flag. Once cancelled, the running tool is killed and
/// every later tool invocation fails immediately.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Exit status and combined stdout/stderr of a finished tool.
#[derive(Debug)]
pub(super) struct ToolOutput {
    pub status: ExitStatus,
    pub output: String,
}

/// Returns the command line as a single string for messages.
pub(super) fn describe(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs `command` to completion, killing it after `timeout` or on cancellation.
pub(super) fn run(
    command: &mut Command,
    timeout: Duration,
    cancel: &CancelHandle,
) -> Result<ToolOutput, RenderError> {
    let line = describe(command);
    if cancel.is_cancelled() {
        return Err(RenderError::Cancelled { command: line });
    }

    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        command.creation_flags(CREATE_NO_WINDOW);
    }

    debug!(command = line.as_str(); "Running external tool");
    let mut child = command.spawn().map_err(|source| RenderError::Spawn {
        program: command.get_program().to_string_lossy().into_owned(),
        source,
    })?;

    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(err) => {
                stop(&mut child, &line);
                return Err(err.into());
            }
        }
        if cancel.is_cancelled() {
            stop(&mut child, &line);
            return Err(RenderError::Cancelled { command: line });
        }
        if Instant::now() >= deadline {
            stop(&mut child, &line);
            return Err(RenderError::Timeout {
                command: line,
                timeout,
            });
        }
        thread::sleep(POLL_INTERVAL);
    };

    let mut output = collect(stdout);
    output.push_str(&collect(stderr));
    trace!(command = line.as_str(), status:? = status; "External tool finished");

    Ok(ToolOutput { status, output })
}

fn drain(mut pipe: impl Read + Send + 'static) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        // A read error only truncates the captured log.
        let _ = pipe.read_to_end(&mut buffer);
        buffer
    })
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

fn stop(child: &mut Child, line: &str) {
    warn!(command = line; "Killing external tool");
    if let Err(err) = child.kill() {
        debug!(err:%; "Kill failed, the tool may have exited");
    }
    match child.wait() {
        Ok(status) => debug!(command = line, status:? = status; "External tool stopped"),
        Err(err) => warn!(command = line, err:%; "Could not reap external tool"),
    }
}
