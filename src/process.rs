//! Spawning and controlling a single child process
//!
//! [`Process`] owns one OS child at a time: configure it once, then
//! `start`, `signal`, `wait`, and optionally `start` again after it
//! exits. Capture buffers survive restarts and append, so the output of
//! several runs of the same `Process` concatenates.
//!
//! `Process` is not thread-safe; it is meant to have a single owner.

use crate::descriptors::{CaptureBuffer, DescriptorOpts, StdinSource, StreamMode};
use crate::errors::{Result, SubprocError};
use nix::sys::signal::{kill, Signal as NixSignal};
use nix::unistd::Pid;
use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus};
use std::thread::JoinHandle;
use tracing::debug;

/// Signals the crate can deliver to a child (Unix)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// SIGINT
    Interrupt,
    /// SIGTERM
    Terminate,
    /// SIGQUIT
    Quit,
    /// SIGKILL
    Kill,
    /// SIGHUP
    Hangup,
    /// SIGUSR1
    User1,
    /// SIGUSR2
    User2,
}

impl Signal {
    pub(crate) fn to_nix(self) -> NixSignal {
        match self {
            Signal::Interrupt => NixSignal::SIGINT,
            Signal::Terminate => NixSignal::SIGTERM,
            Signal::Quit => NixSignal::SIGQUIT,
            Signal::Kill => NixSignal::SIGKILL,
            Signal::Hangup => NixSignal::SIGHUP,
            Signal::User1 => NixSignal::SIGUSR1,
            Signal::User2 => NixSignal::SIGUSR2,
        }
    }
}

/// Argument and environment options for starting a process
#[derive(Debug, Clone, Default)]
pub struct ProcessOpts {
    /// Program arguments
    pub args: Vec<String>,
    /// Environment variables layered on top of the parent's environment
    pub additional_env: Vec<(String, String)>,
}

impl ProcessOpts {
    pub fn with_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            additional_env: Vec::new(),
        }
    }
}

/// A configured, restartable child process
pub struct Process {
    program: String,
    opts: ProcessOpts,
    descriptors: DescriptorOpts,

    child: Option<Child>,
    stdout_buf: Option<CaptureBuffer>,
    stderr_buf: Option<CaptureBuffer>,
    drains: Vec<JoinHandle<()>>,
    stopped: bool,
}

impl Process {
    /// Configure a process running `program`; nothing is spawned until
    /// [`Process::start`].
    pub fn new(
        program: impl Into<String>,
        opts: ProcessOpts,
        descriptors: DescriptorOpts,
    ) -> Self {
        let stdout_buf = (descriptors.stdout == StreamMode::Capture).then(CaptureBuffer::new);
        let stderr_buf = (descriptors.stderr == StreamMode::Capture).then(CaptureBuffer::new);

        Self {
            program: program.into(),
            opts,
            descriptors,
            child: None,
            stdout_buf,
            stderr_buf,
            drains: Vec::new(),
            stopped: false,
        }
    }

    /// Spawn the child with the configured argv, environment, and
    /// descriptors.
    ///
    /// Calling `start` again after the previous child exited restarts the
    /// program; capture buffers are kept and new output appends, and a
    /// [`Process::stop`] from an earlier run no longer counts as stopped.
    /// Starting while a child is still running is an error.
    pub fn start(&mut self) -> Result<()> {
        if let Some(child) = &mut self.child {
            match child.try_wait()? {
                Some(_) => self.reap(),
                None => return Err(SubprocError::AlreadyRunning),
            }
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.opts.args);
        cmd.envs(self.opts.additional_env.iter().map(|(k, v)| (k, v)));
        cmd.stdin(self.descriptors.stdin.to_stdio());
        cmd.stdout(self.descriptors.stdout.to_stdio());
        cmd.stderr(self.descriptors.stderr.to_stdio());

        let mut child = cmd.spawn().map_err(|source| SubprocError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        debug!(program = %self.program, pid = child.id(), "spawned child");

        if let Some(buf) = &self.stdout_buf {
            if let Some(pipe) = child.stdout.take() {
                self.drains.push(spawn_drain(pipe, buf.clone()));
            }
        }
        if let Some(buf) = &self.stderr_buf {
            if let Some(pipe) = child.stderr.take() {
                self.drains.push(spawn_drain(pipe, buf.clone()));
            }
        }
        if let StdinSource::Bytes(bytes) = &self.descriptors.stdin {
            if let Some(mut pipe) = child.stdin.take() {
                let bytes = bytes.clone();
                // The pipe is dropped when the thread ends, giving the child EOF
                self.drains.push(std::thread::spawn(move || {
                    let _ = pipe.write_all(&bytes);
                }));
            }
        }

        self.child = Some(child);
        // A stop only covers the run it interrupted
        self.stopped = false;
        Ok(())
    }

    /// OS pid of the running child
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(|c| c.id())
    }

    /// Deliver `signal` to the running child
    pub fn signal(&self, signal: Signal) -> Result<()> {
        let pid = self.id().ok_or(SubprocError::NotRunning)?;
        kill(Pid::from_raw(pid as i32), signal.to_nix())
            .map_err(|errno| SubprocError::Signal(format!("kill({}): {}", pid, errno)))
    }

    /// SIGKILL the child and mark it stopped
    ///
    /// A stopped process is not restarted by [`crate::restart::RestartingProcess`].
    /// Idempotent once the child has exited.
    pub fn stop(&mut self) -> Result<()> {
        self.stopped = true;
        if let Some(child) = &mut self.child {
            match child.kill() {
                Ok(()) => {}
                // Already exited
                Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Block until the child exits
    ///
    /// Joins the capture drain threads before returning, so captured
    /// output is complete when `wait` comes back.
    pub fn wait(&mut self) -> Result<ExitStatus> {
        let child = self.child.as_mut().ok_or(SubprocError::NotRunning)?;
        let status = child.wait()?;
        self.reap();
        debug!(program = %self.program, code = ?status.code(), "child exited");
        Ok(status)
    }

    /// Non-blocking exit probe; `None` while the child is still running
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>> {
        let child = self.child.as_mut().ok_or(SubprocError::NotRunning)?;
        match child.try_wait()? {
            Some(status) => {
                self.reap();
                Ok(Some(status))
            }
            None => Ok(None),
        }
    }

    /// Whether [`Process::stop`] has been called
    pub fn was_stopped(&self) -> bool {
        self.stopped
    }

    /// Bytes captured from the child's stdout so far
    ///
    /// `None` when stdout is not in [`StreamMode::Capture`].
    pub fn stdout(&self) -> Option<Vec<u8>> {
        self.stdout_buf.as_ref().map(|b| b.contents())
    }

    /// Bytes captured from the child's stderr so far
    pub fn stderr(&self) -> Option<Vec<u8>> {
        self.stderr_buf.as_ref().map(|b| b.contents())
    }

    /// Lossy UTF-8 view of captured stdout
    pub fn stdout_utf8(&self) -> Option<String> {
        self.stdout_buf.as_ref().map(|b| b.utf8_lossy())
    }

    /// Lossy UTF-8 view of captured stderr
    pub fn stderr_utf8(&self) -> Option<String> {
        self.stderr_buf.as_ref().map(|b| b.utf8_lossy())
    }

    /// Drop the exited child and let the drain threads finish
    fn reap(&mut self) {
        self.child = None;
        for handle in self.drains.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for Process {
    fn drop(&mut self) {
        // Kill a still-running child when the handle goes away
        if let Some(child) = &mut self.child {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

fn spawn_drain(
    mut pipe: impl Read + Send + 'static,
    buf: CaptureBuffer,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut chunk = [0u8; 4096];
        loop {
            match pipe.read(&mut chunk) {
                Ok(0) | Err(_) => break,
                Ok(n) => buf.append(&chunk[..n]),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_mapping() {
        assert_eq!(Signal::Interrupt.to_nix(), NixSignal::SIGINT);
        assert_eq!(Signal::Terminate.to_nix(), NixSignal::SIGTERM);
        assert_eq!(Signal::Kill.to_nix(), NixSignal::SIGKILL);
    }

    #[test]
    fn test_signal_before_start_is_not_running() {
        let proc = Process::new("true", ProcessOpts::default(), DescriptorOpts::default());
        assert!(matches!(
            proc.signal(Signal::Interrupt),
            Err(SubprocError::NotRunning)
        ));
    }

    #[test]
    fn test_capture_accessors_absent_without_capture() {
        let proc = Process::new("true", ProcessOpts::default(), DescriptorOpts::default());
        assert!(proc.stdout().is_none());
        assert!(proc.stderr().is_none());
    }

    #[test]
    fn test_with_args() {
        let opts = ProcessOpts::with_args(["-c", "exit 0"]);
        assert_eq!(opts.args, vec!["-c".to_string(), "exit 0".to_string()]);
        assert!(opts.additional_env.is_empty());
    }
}
