//! Failure reporting for the fatal request API
//!
//! The `send_*` methods of [`crate::Session`] never hand errors back. They pass
//! them to the session's [`FailureReporter`], which must abort the current unit
//! of work: a panic inside a test, a process exit elsewhere.

use crate::error::ReqHelperError;
use crate::exit_code::exit_code_for_error;

/// Aborts the current unit of work with a diagnostic.
pub trait FailureReporter: Send + Sync {
    fn fail(&self, err: &ReqHelperError) -> !;
}

/// Logs the error and panics, failing the enclosing test.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicReporter;

impl FailureReporter for PanicReporter {
    fn fail(&self, err: &ReqHelperError) -> ! {
        log::error!("request failed: {}", err);
        panic!("reqhelper: {}", err);
    }
}

/// Logs the error and exits the process with a curl-style exit code.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExitReporter;

impl FailureReporter for ExitReporter {
    fn fail(&self, err: &ReqHelperError) -> ! {
        log::error!("request failed: {}", err);
        eprintln!("reqhelper: error: {}", err);
        std::process::exit(exit_code_for_error(err));
    }
}

#[cfg(test)]
mod tests {
    use super::{FailureReporter, PanicReporter};
    use crate::error::ReqHelperError;

    #[test]
    #[should_panic(expected = "reqhelper: Invalid request: no scheme")]
    fn panic_reporter_panics_with_error_text() {
        PanicReporter.fail(&ReqHelperError::RequestConstruction("no scheme".to_string()));
    }
}
