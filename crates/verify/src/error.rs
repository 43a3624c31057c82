//! Error types for UI verification

use std::time::Duration;

use thiserror::Error;

/// Result type alias for verification operations
pub type VerifyResult<T> = Result<T, VerifyError>;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("navigation to {url} did not complete within {timeout:?}")]
    NavigationTimeout { url: String, timeout: Duration },

    #[error("element not found: {locator}")]
    LocatorNotFound { locator: String },

    #[error("{target} did not appear within {timeout:?}")]
    ConditionTimeout { target: String, timeout: Duration },

    #[error("screenshot capture failed: {0}")]
    ScreenshotCapture(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("Playwright not found. Install with: npx playwright install")]
    DriverNotFound,

    #[error("browser driver error: {0}")]
    Driver(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VerifyError {
    /// True when a verification step itself failed, as opposed to an
    /// environment fault such as a missing driver. The process exit code
    /// distinguishes the two.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            VerifyError::NavigationTimeout { .. }
                | VerifyError::LocatorNotFound { .. }
                | VerifyError::ConditionTimeout { .. }
        )
    }
}
