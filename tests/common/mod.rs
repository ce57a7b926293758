//! Common test utilities for subproc integration tests

#![allow(dead_code)]

use std::time::{Duration, Instant};
use subproc::{DescriptorOpts, Process, ProcessOpts};

/// Path to the compiled signal-wait fixture binary
pub const PRINT_SIGNAL_BIN: &str = env!("CARGO_BIN_EXE_print-signal");

/// A shell one-liner with both output streams captured
pub fn sh(script: &str) -> Process {
    Process::new(
        "sh",
        ProcessOpts::with_args(["-c", script]),
        DescriptorOpts::captured(),
    )
}

/// Poll `cond` every 10ms until it holds or `timeout` passes
pub fn wait_for(mut cond: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    cond()
}
