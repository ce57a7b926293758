//! subproc library interface
//!
//! Spawn, signal, and supervise child processes.
//!
//! # Module Organization
//!
//! - [`process`] - Spawning and controlling one child (Process, ProcessOpts, Signal)
//! - [`descriptors`] - Stdio substitution and live output capture
//! - [`restart`] - Restart-on-failure supervision (RestartingProcess)
//! - [`signals`] - Supervisor-side Ctrl+C relay
//! - [`errors`] - Error types (SubprocError, Result)
//! - [`status`] - Exit status codes for the CLI (ExitStatus)
//! - [`cli`] - Supervisor argument definitions (Args)
//! - [`config`] - Config-file defaults for the supervisor
//! - [`core`] - Supervisor execution logic

pub mod cli;
pub mod config;
pub mod core;
pub mod descriptors;
pub mod errors;
pub mod process;
pub mod restart;
pub mod signals;
pub mod status;

pub use descriptors::{CaptureBuffer, DescriptorOpts, StdinSource, StreamMode};
pub use errors::{Result, SubprocError};
pub use process::{Process, ProcessOpts, Signal};
pub use restart::{ChildControl, RestartPolicy, RestartingProcess};
