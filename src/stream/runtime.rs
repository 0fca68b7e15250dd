//! Where pipeline stages run, and how synchronous code waits on them.
//!
//! A stream built inside a tokio runtime spawns its stages on that runtime.
//! A stream built anywhere else spawns them on a shared multi-thread
//! runtime that starts on first use and lives for the rest of the process.
//!
//! Draining a stream from synchronous code depends on the caller:
//!
//! | caller                     | strategy                                      |
//! |----------------------------|-----------------------------------------------|
//! | plain thread               | `block_on` the shared runtime                 |
//! | multi-thread runtime       | `block_in_place` around the current handle    |
//! | current-thread runtime     | [`BlockingError::CurrentThreadRuntime`]       |
//!
//! The current-thread case is refused because parking its only worker would
//! also park the stages that feed the stream.

use std::error::Error;
use std::fmt;
use std::future::Future;
use std::sync::LazyLock;

use tokio::runtime::{Builder, Handle, Runtime, RuntimeFlavor};

static SHARED: LazyLock<Runtime> = LazyLock::new(|| {
    Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .thread_name("fpkit-stream")
        .enable_all()
        .build()
        .unwrap_or_else(|error| panic!("fpkit could not start its stream runtime: {error}"))
});

/// The runtime used by streams created outside any tokio context.
#[inline]
#[must_use]
pub fn global() -> &'static Runtime {
    &SHARED
}

/// The handle new stages are spawned on.
#[inline]
#[must_use]
pub fn handle() -> Handle {
    Handle::try_current().unwrap_or_else(|_| global().handle().clone())
}

/// Why a stream could not be drained from synchronous code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingError {
    /// The caller is a task of a current-thread runtime.
    CurrentThreadRuntime,

    /// The caller is a task of a runtime flavor newer than this crate.
    UnknownRuntimeFlavor,
}

impl fmt::Display for BlockingError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::CurrentThreadRuntime => {
                "stream stages would stall on a current-thread runtime; \
                 await the stream instead"
            }
            Self::UnknownRuntimeFlavor => "stream stages run on an unknown tokio runtime flavor",
        };
        write!(formatter, "blocking drain refused: {reason}")
    }
}

impl Error for BlockingError {}

/// Waits for `future` on the calling thread.
///
/// # Errors
///
/// Fails with [`BlockingError::CurrentThreadRuntime`] inside a current-thread
/// runtime and with [`BlockingError::UnknownRuntimeFlavor`] inside a runtime
/// whose flavor is not recognised.
///
/// # Examples
///
/// ```rust
/// use fpkit::stream::runtime::try_run_blocking;
///
/// assert_eq!(try_run_blocking(async { 6 * 7 }), Ok(42));
/// ```
#[inline]
pub fn try_run_blocking<F, T>(future: F) -> Result<T, BlockingError>
where
    F: Future<Output = T>,
{
    let Ok(current) = Handle::try_current() else {
        return Ok(global().block_on(future));
    };
    match current.runtime_flavor() {
        RuntimeFlavor::MultiThread => Ok(tokio::task::block_in_place(move || current.block_on(future))),
        RuntimeFlavor::CurrentThread => Err(BlockingError::CurrentThreadRuntime),
        _ => Err(BlockingError::UnknownRuntimeFlavor),
    }
}

/// Panicking form of [`try_run_blocking`].
///
/// # Panics
///
/// Panics with the [`BlockingError`] message when blocking is refused, and
/// re-raises any panic of `future`.
#[inline]
pub fn run_blocking<F, T>(future: F) -> T
where
    F: Future<Output = T>,
{
    match try_run_blocking(future) {
        Ok(value) => value,
        Err(error) => panic!("{error}"),
    }
}
