//! Descriptor substitution for a child's standard streams
//!
//! The child's stdin/stdout/stderr each get a mode: inherit the parent's
//! descriptor, discard, or capture into an in-memory buffer that can be
//! inspected while the child is still running. Capture buffers persist
//! across restarts of the same process and append.

use std::process::Stdio;
use std::sync::{Arc, Mutex};

/// What to do with one of the child's output streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamMode {
    /// Share the parent's descriptor
    #[default]
    Inherit,
    /// Discard everything the child writes
    Null,
    /// Pipe into an in-memory buffer readable from the parent
    Capture,
}

/// What the child reads on stdin
#[derive(Debug, Clone, Default)]
pub enum StdinSource {
    /// Share the parent's stdin
    #[default]
    Inherit,
    /// The child sees EOF immediately
    Null,
    /// Fixed bytes written to the child, then EOF
    Bytes(Vec<u8>),
}

/// Shared accumulation buffer for one captured stream
///
/// Cloning is cheap; all clones view the same bytes. A background drain
/// thread appends as the child writes, so `contents` reflects output
/// produced so far, not just output at exit.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the bytes captured so far
    pub fn contents(&self) -> Vec<u8> {
        self.inner.lock().map(|b| b.clone()).unwrap_or_default()
    }

    /// Lossy UTF-8 view of the bytes captured so far
    pub fn utf8_lossy(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().map(|b| b.is_empty()).unwrap_or(true)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|b| b.len()).unwrap_or(0)
    }

    pub(crate) fn append(&self, bytes: &[u8]) {
        if let Ok(mut buf) = self.inner.lock() {
            buf.extend_from_slice(bytes);
        }
    }
}

/// Stream configuration for a spawned child
#[derive(Debug, Clone, Default)]
pub struct DescriptorOpts {
    pub stdin: StdinSource,
    pub stdout: StreamMode,
    pub stderr: StreamMode,
}

impl DescriptorOpts {
    /// Capture both stdout and stderr, inherit stdin
    pub fn captured() -> Self {
        Self {
            stdin: StdinSource::Inherit,
            stdout: StreamMode::Capture,
            stderr: StreamMode::Capture,
        }
    }

    /// Discard both output streams, inherit stdin
    pub fn silent() -> Self {
        Self {
            stdin: StdinSource::Inherit,
            stdout: StreamMode::Null,
            stderr: StreamMode::Null,
        }
    }
}

impl StreamMode {
    pub(crate) fn to_stdio(self) -> Stdio {
        match self {
            StreamMode::Inherit => Stdio::inherit(),
            StreamMode::Null => Stdio::null(),
            StreamMode::Capture => Stdio::piped(),
        }
    }
}

impl StdinSource {
    pub(crate) fn to_stdio(&self) -> Stdio {
        match self {
            StdinSource::Inherit => Stdio::inherit(),
            StdinSource::Null => Stdio::null(),
            StdinSource::Bytes(_) => Stdio::piped(),
        }
    }
}
