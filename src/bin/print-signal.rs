//! Signal-wait fixture for the end-to-end tests
//!
//! Registers a SIGINT handler that writes `SIGINT called` (no trailing
//! newline) to stdout each time the signal arrives, then blocks forever.
//! The handler stays registered for the life of the process and the
//! process never exits on its own; the test suite kills it when done.
//! Takes no arguments and reads no environment.

use std::io::Write;

fn main() {
    // Registration failure is fatal: without the handler the fixture is useless
    ctrlc::set_handler(|| {
        let mut stdout = std::io::stdout();
        // Explicit flush: stdout is line-buffered and the string has no newline
        let _ = stdout.write_all(b"SIGINT called");
        let _ = stdout.flush();
    })
    .expect("failed to register SIGINT handler");

    loop {
        std::thread::park();
    }
}
