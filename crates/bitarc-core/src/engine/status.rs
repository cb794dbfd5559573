//! Status codes exchanged across the engine boundary.

use std::fmt;

/// Result of a call that crosses the engine boundary.
///
/// `Ok` corresponds to the engine's success code; every failure is one of
/// the [`Status`] codes. Nothing that returns a `StatusResult` may panic.
pub type StatusResult<T = ()> = std::result::Result<T, Status>;

/// Failure codes understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Non-fatal negative answer (the engine's `S_FALSE`).
    False,
    /// Generic failure.
    Fail,
    /// The current operation must stop.
    Abort,
    /// The requested interface is not exposed by the object.
    NoInterface,
    /// The method is not implemented.
    NotImplemented,
    /// An argument was rejected.
    InvalidArgument,
}

impl Status {
    /// Returns the raw 32-bit code used by the engine ABI.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn code(self) -> i32 {
        match self {
            Self::False => 1,
            Self::Fail => 0x8000_4005_u32 as i32,
            Self::Abort => 0x8000_4004_u32 as i32,
            Self::NoInterface => 0x8000_4002_u32 as i32,
            Self::NotImplemented => 0x8000_4001_u32 as i32,
            Self::InvalidArgument => 0x8007_0057_u32 as i32,
        }
    }

    /// Maps a raw engine code back to a status.
    ///
    /// `0` is success and yields `Ok(())`; unknown failure codes collapse to
    /// [`Status::Fail`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bitarc_core::engine::Status;
    ///
    /// assert_eq!(Status::from_code(0), Ok(()));
    /// assert_eq!(Status::from_code(Status::Abort.code()), Err(Status::Abort));
    /// ```
    pub fn from_code(code: i32) -> StatusResult {
        if code == 0 {
            return Ok(());
        }
        let status = [
            Self::False,
            Self::Fail,
            Self::Abort,
            Self::NoInterface,
            Self::NotImplemented,
            Self::InvalidArgument,
        ]
        .into_iter()
        .find(|s| s.code() == code)
        .unwrap_or(Self::Fail);
        Err(status)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::False => "S_FALSE",
            Self::Fail => "E_FAIL",
            Self::Abort => "E_ABORT",
            Self::NoInterface => "E_NOINTERFACE",
            Self::NotImplemented => "E_NOTIMPL",
            Self::InvalidArgument => "E_INVALIDARG",
        };
        write!(f, "{name} ({:#010x})", self.code())
    }
}
