//! Opaque handles issued by a clock
//!
//! Both wrap the integer id the platform hands back. The binding passes them
//! through untouched; they exist only so a request can be cancelled later.

/// Identifies a pending animation-frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(i32);

impl FrameHandle {
    pub fn from_raw(id: i32) -> Self {
        Self(id)
    }

    /// Platform id, for crossing the JS boundary
    pub fn raw(self) -> i32 {
        self.0
    }
}

/// Identifies a pending timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(i32);

impl TimerHandle {
    pub fn from_raw(id: i32) -> Self {
        Self(id)
    }

    /// Platform id, for crossing the JS boundary
    pub fn raw(self) -> i32 {
        self.0
    }
}
