//! Progress and failure reporting.
//!
//! Resolution never fails a whole batch because of one artifact or one
//! repository. Instead, every fallback attempt, success and terminal failure
//! is handed to a [`MessageReporter`], which is the single side channel for
//! non-fatal diagnostics.

use std::error::Error;

/// Sink for resolution progress and non-fatal errors.
///
/// Implementations must not panic and must return quickly; the resolver
/// calls them inline between fetches.
pub trait MessageReporter: Send + Sync {
    fn report(&self, message: &str, cause: Option<&(dyn Error + 'static)>);
}

/// Forwards messages to `tracing`.
///
/// Messages with a cause are logged at `warn`, plain progress at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl MessageReporter for TracingReporter {
    fn report(&self, message: &str, cause: Option<&(dyn Error + 'static)>) {
        match cause {
            Some(err) => tracing::warn!("{}: {}", message, err),
            None => tracing::info!("{}", message),
        }
    }
}

impl<F> MessageReporter for F
where
    F: Fn(&str, Option<&(dyn Error + 'static)>) + Send + Sync,
{
    fn report(&self, message: &str, cause: Option<&(dyn Error + 'static)>) {
        self(message, cause);
    }
}
