//! Interrupt handling for the supervisor
//!
//! Provides the process-wide interrupted flag and the Ctrl+C relay that
//! forwards SIGINT to the supervised child instead of letting the
//! supervisor die first.

use crate::errors::{Result, SubprocError};
use crate::status::ExitStatus;
use nix::sys::signal::{kill, Signal as NixSignal};
use nix::unistd::Pid;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use tracing::debug;

/// Global flag for Ctrl+C interrupt handling
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Pid the relay forwards SIGINT to; 0 means nobody
static RELAY_PID: AtomicI32 = AtomicI32::new(0);

/// Check if the supervisor was interrupted (Ctrl+C pressed)
#[inline]
pub fn was_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Set the interrupted flag (called from the signal handler)
#[inline]
pub fn set_interrupted() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Reset the interrupted flag
#[inline]
pub fn reset_interrupted() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}

/// Point the relay at the current child
pub fn set_relay_target(pid: u32) {
    RELAY_PID.store(pid as i32, Ordering::SeqCst);
}

/// Stop forwarding (no child running)
pub fn clear_relay_target() {
    RELAY_PID.store(0, Ordering::SeqCst);
}

/// Install the Ctrl+C handler
///
/// On the first interrupt the handler sets the interrupted flag and
/// forwards SIGINT to the relay target so the child decides how to shut
/// down. A second interrupt force-exits the supervisor.
pub fn install_relay() -> Result<()> {
    ctrlc::set_handler(move || {
        set_interrupted();

        let pid = RELAY_PID.load(Ordering::SeqCst);
        if pid > 0 {
            let _ = kill(Pid::from_raw(pid), NixSignal::SIGINT);
        }

        static SECOND_CTRL_C: AtomicBool = AtomicBool::new(false);
        if SECOND_CTRL_C.swap(true, Ordering::SeqCst) {
            // Second interrupt: the user really wants out
            std::process::exit(ExitStatus::INTERRUPTED_CODE as i32);
        }
    })
    .map_err(|e| SubprocError::Signal(format!("install Ctrl+C handler: {}", e)))?;

    debug!("interrupt relay installed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_flag() {
        reset_interrupted();
        assert!(!was_interrupted());

        set_interrupted();
        assert!(was_interrupted());

        reset_interrupted();
        assert!(!was_interrupted());
    }

    #[test]
    fn test_relay_target_roundtrip() {
        set_relay_target(4242);
        assert_eq!(RELAY_PID.load(Ordering::SeqCst), 4242);

        clear_relay_target();
        assert_eq!(RELAY_PID.load(Ordering::SeqCst), 0);
    }
}
