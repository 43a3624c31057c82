//! Browser engine capability seam
//!
//! The runner only needs a small capability set from the browser; which
//! concrete engine provides it is irrelevant. Tests substitute a scripted
//! fake here instead of driving a real page.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::VerifyResult;
use crate::locator::Locator;

/// A console message captured from the page
#[derive(Debug, Clone)]
pub struct ConsoleMessage {
    /// Level as reported by the page (log, info, warn, error, debug)
    pub level: String,
    pub text: String,
}

/// Capability set the verification runner requires from a browser session.
///
/// One implementor owns one browser session and one page for the duration
/// of a run; page state carries across calls.
#[async_trait]
pub trait BrowserEngine: Send {
    /// Load a page; resolves once the browser reports the page ready.
    async fn goto(&mut self, url: &str, timeout: Duration) -> VerifyResult<()>;

    /// Set text into a located input, within a short implicit wait.
    async fn fill(&mut self, locator: &Locator, value: &str) -> VerifyResult<()>;

    /// Click a located element, within a short implicit wait.
    async fn click(&mut self, locator: &Locator) -> VerifyResult<()>;

    /// Poll until the target is visible or the timeout elapses.
    async fn wait_for_visible(&mut self, target: &Locator, timeout: Duration) -> VerifyResult<()>;

    /// Non-blocking visibility probe.
    async fn is_visible(&mut self, locator: &Locator) -> VerifyResult<bool>;

    /// Unconditional pause; never fails on timeout.
    async fn pause(&mut self, duration: Duration) -> VerifyResult<()>;

    /// Capture the page to `path`, overwriting any existing file.
    async fn screenshot(&mut self, path: &Path, full_page: bool) -> VerifyResult<()>;

    /// Tear down the session. Called exactly once per run.
    async fn close(&mut self) -> VerifyResult<()>;

    /// Console output captured so far, oldest first.
    fn console_messages(&self) -> &[ConsoleMessage];
}
