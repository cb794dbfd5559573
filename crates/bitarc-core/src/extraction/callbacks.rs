//! Caller-registered notifications invoked during a run.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;

use tracing::warn;

use crate::engine::PasswordCallback;
use crate::engine::Status;
use crate::engine::StatusResult;

type TotalFn = Box<dyn FnMut(u64)>;
type ProgressFn = Box<dyn FnMut(u64)>;
type RatioFn = Box<dyn FnMut(u64, u64)>;
type PasswordFn = Box<dyn FnMut() -> String>;
type FileFn = Box<dyn FnMut(&str)>;

/// Optional caller notifications plus the pre-supplied password.
///
/// Every notification is optional; an unregistered one is a silent no-op.
/// Closures run synchronously on the thread driving the engine.
///
/// # Examples
///
/// ```
/// use bitarc_core::extraction::Callbacks;
///
/// let callbacks = Callbacks::new()
///     .on_total(|total| println!("total: {total}"))
///     .on_progress(|done| println!("done: {done}"))
///     .on_file(|name| println!("writing {name}"));
/// assert!(!callbacks.is_password_defined());
/// ```
#[derive(Default)]
pub struct Callbacks {
    password: String,
    total: Option<TotalFn>,
    progress: Option<ProgressFn>,
    ratio: Option<RatioFn>,
    password_provider: Option<PasswordFn>,
    file: Option<FileFn>,
    last_failure: Option<String>,
    password_missing: bool,
}

impl Callbacks {
    /// Creates an empty set of callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-supplies the archive password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Registers the total-size notification.
    #[must_use]
    pub fn on_total(mut self, f: impl FnMut(u64) + 'static) -> Self {
        self.total = Some(Box::new(f));
        self
    }

    /// Registers the completed-size notification.
    #[must_use]
    pub fn on_progress(mut self, f: impl FnMut(u64) + 'static) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// Registers the packed/unpacked ratio notification.
    #[must_use]
    pub fn on_ratio(mut self, f: impl FnMut(u64, u64) + 'static) -> Self {
        self.ratio = Some(Box::new(f));
        self
    }

    /// Registers the password provider, asked only when no password was
    /// pre-supplied.
    #[must_use]
    pub fn on_password(mut self, f: impl FnMut() -> String + 'static) -> Self {
        self.password_provider = Some(Box::new(f));
        self
    }

    /// Registers the notification sent with each file name about to be
    /// written.
    #[must_use]
    pub fn on_file(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.file = Some(Box::new(f));
        self
    }

    /// Sets the pre-supplied password.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    /// Returns `true` if a non-empty password was pre-supplied.
    #[must_use]
    pub fn is_password_defined(&self) -> bool {
        !self.password.is_empty()
    }

    /// Message of the last notification that failed, if any.
    #[must_use]
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Returns `true` if the engine asked for a password and none was
    /// available.
    #[must_use]
    pub fn password_missing(&self) -> bool {
        self.password_missing
    }

    pub(crate) fn clear_failure(&mut self) {
        self.last_failure = None;
        self.password_missing = false;
    }

    pub(crate) fn notify_total(&mut self, total: u64) -> Result<(), String> {
        match self.total.as_mut() {
            Some(f) => guarded("total", || f(total)),
            None => Ok(()),
        }
    }

    pub(crate) fn notify_progress(&mut self, completed: u64) -> Result<(), String> {
        match self.progress.as_mut() {
            Some(f) => guarded("progress", || f(completed)),
            None => Ok(()),
        }
    }

    pub(crate) fn notify_ratio(&mut self, in_size: u64, out_size: u64) -> Result<(), String> {
        match self.ratio.as_mut() {
            Some(f) => guarded("ratio", || f(in_size, out_size)),
            None => Ok(()),
        }
    }

    pub(crate) fn notify_file(&mut self, file_name: &str) -> Result<(), String> {
        match self.file.as_mut() {
            Some(f) => guarded("file", || f(file_name)),
            None => Ok(()),
        }
    }

    /// Resolves the password: the pre-supplied one, else the provider's
    /// answer. `Ok("")` means no password is available.
    pub(crate) fn resolve_password(&mut self) -> Result<String, String> {
        if self.is_password_defined() {
            return Ok(self.password.clone());
        }
        match self.password_provider.as_mut() {
            Some(f) => guarded("password", f),
            None => Ok(String::new()),
        }
    }
}

impl PasswordCallback for Callbacks {
    fn crypto_get_text_password(&mut self) -> StatusResult<String> {
        match self.resolve_password() {
            Ok(password) if !password.is_empty() => Ok(password),
            Ok(_) => {
                self.password_missing = true;
                self.last_failure = Some("Password is not defined".to_string());
                Err(Status::Fail)
            }
            Err(message) => {
                self.last_failure = Some(message);
                Err(Status::Fail)
            }
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("password_defined", &self.is_password_defined())
            .field("total", &self.total.is_some())
            .field("progress", &self.progress.is_some())
            .field("ratio", &self.ratio.is_some())
            .field("password_provider", &self.password_provider.is_some())
            .field("file", &self.file.is_some())
            .finish()
    }
}

/// Runs a caller closure, turning a panic into an error message.
fn guarded<R>(name: &str, f: impl FnOnce() -> R) -> Result<R, String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = format!("{name} callback panicked: {}", panic_message(&*payload));
        warn!(callback = name, "{message}");
        message
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
