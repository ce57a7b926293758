//! Exit status codes for the supervisor CLI
//!
//! subproc follows standard Unix exit code conventions:
//! - 0: the child exited successfully
//! - 1-255: the child's own exit code, passed through
//! - 130: user interrupted (Ctrl+C, standard SIGINT exit code)

use std::process::{ExitCode, Termination};

/// Exit status of a supervisor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Child exited zero
    Success,
    /// Supervisor-level failure (spawn error, bad arguments)
    Error,
    /// User interrupted (Ctrl+C)
    Interrupted,
    /// Child exited non-zero; code passed through
    Child(u8),
}

impl ExitStatus {
    pub const SUCCESS_CODE: u8 = 0;
    pub const ERROR_CODE: u8 = 1;
    pub const INTERRUPTED_CODE: u8 = 130;

    /// Map a child's exit status onto the supervisor's
    ///
    /// Exact codes are preserved where they fit in a u8; death by signal
    /// (no code at all) maps to `Error`.
    pub fn from_child(status: std::process::ExitStatus) -> Self {
        match status.code() {
            Some(0) => ExitStatus::Success,
            Some(code) => match u8::try_from(code) {
                Ok(code) => ExitStatus::Child(code),
                Err(_) => ExitStatus::Error,
            },
            None => ExitStatus::Error,
        }
    }

    pub fn as_code(self) -> u8 {
        match self {
            ExitStatus::Success => Self::SUCCESS_CODE,
            ExitStatus::Error => Self::ERROR_CODE,
            ExitStatus::Interrupted => Self::INTERRUPTED_CODE,
            ExitStatus::Child(code) => code,
        }
    }
}

impl From<ExitStatus> for i32 {
    fn from(status: ExitStatus) -> Self {
        status.as_code() as i32
    }
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self.as_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    fn raw(code: i32) -> std::process::ExitStatus {
        std::process::ExitStatus::from_raw(code << 8)
    }

    #[test]
    fn test_zero_maps_to_success() {
        assert_eq!(ExitStatus::from_child(raw(0)), ExitStatus::Success);
    }

    #[test]
    fn test_nonzero_code_passes_through() {
        assert_eq!(ExitStatus::from_child(raw(7)), ExitStatus::Child(7));
        assert_eq!(ExitStatus::from_child(raw(7)).as_code(), 7);
    }

    #[test]
    fn test_signal_death_maps_to_error() {
        // Raw wait status 9 = killed by SIGKILL, no exit code
        let status = std::process::ExitStatus::from_raw(9);
        assert_eq!(ExitStatus::from_child(status), ExitStatus::Error);
    }

    #[test]
    fn test_interrupted_code() {
        assert_eq!(ExitStatus::Interrupted.as_code(), 130);
    }
}
