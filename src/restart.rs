//! Restart-on-failure supervision
//!
//! [`RestartingProcess`] wraps anything implementing [`ChildControl`] and
//! re-runs it until it exits zero, it is stopped, or the restart budget
//! runs out.

use crate::errors::{Result, SubprocError};
use crate::process::{Process, Signal};
use std::process::ExitStatus;
use std::time::Duration;
use tracing::{info, warn};

/// Control surface shared by [`Process`] and its wrappers
pub trait ChildControl {
    fn start(&mut self) -> Result<()>;
    fn wait(&mut self) -> Result<ExitStatus>;
    fn try_wait(&mut self) -> Result<Option<ExitStatus>>;
    fn stop(&mut self) -> Result<()>;
    fn signal(&self, signal: Signal) -> Result<()>;
    fn id(&self) -> Option<u32>;
    fn was_stopped(&self) -> bool;
}

impl ChildControl for Process {
    fn start(&mut self) -> Result<()> {
        Process::start(self)
    }

    fn wait(&mut self) -> Result<ExitStatus> {
        Process::wait(self)
    }

    fn try_wait(&mut self) -> Result<Option<ExitStatus>> {
        Process::try_wait(self)
    }

    fn stop(&mut self) -> Result<()> {
        Process::stop(self)
    }

    fn signal(&self, signal: Signal) -> Result<()> {
        Process::signal(self, signal)
    }

    fn id(&self) -> Option<u32> {
        Process::id(self)
    }

    fn was_stopped(&self) -> bool {
        Process::was_stopped(self)
    }
}

/// How failed exits are retried
#[derive(Debug, Clone, Default)]
pub struct RestartPolicy {
    /// Cap on restarts; `None` restarts forever
    pub max_restarts: Option<u32>,
    /// Pause between a failed exit and the respawn
    pub delay: Duration,
}

impl RestartPolicy {
    pub fn limited(max_restarts: u32) -> Self {
        Self {
            max_restarts: Some(max_restarts),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Wraps a process so that non-zero exits restart it
pub struct RestartingProcess<P: ChildControl> {
    proc: P,
    policy: RestartPolicy,
    restarts: u32,
}

impl<P: ChildControl> RestartingProcess<P> {
    /// Restart forever with no delay
    pub fn new(proc: P) -> Self {
        Self::with_policy(proc, RestartPolicy::default())
    }

    pub fn with_policy(proc: P, policy: RestartPolicy) -> Self {
        Self {
            proc,
            policy,
            restarts: 0,
        }
    }

    /// Run the process to a successful exit
    ///
    /// Starts the process and waits. A zero exit, any exit after
    /// [`ChildControl::stop`] was called, or death by signal ends the
    /// loop with that status; a child killed from outside stays down.
    /// Any other non-zero exit restarts the process after the policy's
    /// delay, until `max_restarts` is exhausted.
    pub fn run(&mut self) -> Result<ExitStatus> {
        self.run_with(|_| {})
    }

    /// Like [`RestartingProcess::run`], calling `on_spawn` after each
    /// start so the caller can observe the current child (pid changes on
    /// every restart).
    pub fn run_with(&mut self, mut on_spawn: impl FnMut(&P)) -> Result<ExitStatus> {
        self.proc.start()?;
        on_spawn(&self.proc);
        loop {
            let status = self.proc.wait()?;
            if status.success() || self.proc.was_stopped() || status.code().is_none() {
                return Ok(status);
            }

            if let Some(max) = self.policy.max_restarts {
                if self.restarts >= max {
                    warn!(restarts = self.restarts, "restart budget exhausted");
                    return Err(SubprocError::RestartBudgetExhausted {
                        restarts: self.restarts,
                    });
                }
            }
            self.restarts += 1;
            info!(
                restarts = self.restarts,
                code = ?status.code(),
                "restarting after non-zero exit"
            );
            if !self.policy.delay.is_zero() {
                std::thread::sleep(self.policy.delay);
            }
            self.proc.start()?;
            on_spawn(&self.proc);
        }
    }

    /// Restarts performed so far
    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    pub fn stop(&mut self) -> Result<()> {
        self.proc.stop()
    }

    pub fn signal(&self, signal: Signal) -> Result<()> {
        self.proc.signal(signal)
    }

    /// Borrow the wrapped process
    pub fn get_ref(&self) -> &P {
        &self.proc
    }

    pub fn into_inner(self) -> P {
        self.proc
    }
}
