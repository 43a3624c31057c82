//! Playwright browser engine, driven through a Node subprocess
//!
//! The driver script (embedded at build time) keeps one browser and one
//! page alive for the whole run and speaks a line-delimited JSON protocol
//! over stdin/stdout. Requests carry a `cmd` plus arguments; replies are
//! `{"ok":true,...}` or `{"ok":false,"kind":...,"message":...}`. Page
//! console output arrives as interleaved `{"event":"console",...}` lines
//! and is accumulated, never treated as a reply. Lines the page logged
//! between commands are drained before each request, so a chatty page
//! cannot fill the stdout pipe and stall the driver while no reply is
//! being awaited.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::debug;

use crate::engine::{BrowserEngine, ConsoleMessage};
use crate::error::{VerifyError, VerifyResult};
use crate::locator::Locator;

const DRIVER_SCRIPT: &str = include_str!("driver.js");

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

/// Configuration for the Playwright engine
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub browser: Browser,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Implicit wait applied to element resolution in fill/click
    pub action_timeout: Duration,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            browser: Browser::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            action_timeout: Duration::from_secs(5),
        }
    }
}

/// Failure kind reported by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriverErrorKind {
    NavigationTimeout,
    LocatorNotFound,
    ConditionTimeout,
    Screenshot,
    Other,
}

impl DriverErrorKind {
    fn parse(kind: &str) -> Self {
        match kind {
            "navigation_timeout" => DriverErrorKind::NavigationTimeout,
            "locator_not_found" => DriverErrorKind::LocatorNotFound,
            "condition_timeout" => DriverErrorKind::ConditionTimeout,
            "screenshot" => DriverErrorKind::Screenshot,
            _ => DriverErrorKind::Other,
        }
    }
}

/// A parsed reply from the driver
#[derive(Debug)]
enum DriverReply {
    Ok(Value),
    Failed { kind: DriverErrorKind, message: String },
}

impl DriverReply {
    fn parse(value: Value) -> Self {
        if value.get("ok").and_then(Value::as_bool) == Some(true) {
            DriverReply::Ok(value)
        } else {
            let kind = value
                .get("kind")
                .and_then(Value::as_str)
                .map(DriverErrorKind::parse)
                .unwrap_or(DriverErrorKind::Other);
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unspecified driver failure")
                .to_string();
            DriverReply::Failed { kind, message }
        }
    }
}

/// Concrete engine backed by Playwright through a Node driver subprocess
pub struct PlaywrightEngine {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    console: Vec<ConsoleMessage>,
    action_timeout: Duration,
    // Keeps the staged driver script alive while the subprocess runs
    _driver_dir: tempfile::TempDir,
}

impl PlaywrightEngine {
    /// Launch the driver subprocess and wait until the browser is ready.
    pub async fn launch(config: PlaywrightConfig) -> VerifyResult<Self> {
        Self::check_playwright_installed()?;

        let driver_dir = tempfile::tempdir()?;
        let script_path = driver_dir.path().join("driver.js");
        std::fs::write(&script_path, DRIVER_SCRIPT)?;

        let launch_options = json!({
            "browser": config.browser.as_str(),
            "headless": config.headless,
            "viewportWidth": config.viewport_width,
            "viewportHeight": config.viewport_height,
        });

        let mut child = Command::new("node")
            .arg(&script_path)
            .arg(launch_options.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| VerifyError::Driver(format!("failed to spawn node: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| VerifyError::Driver("driver stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| VerifyError::Driver("driver stdout unavailable".to_string()))?;

        let mut engine = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            console: Vec::new(),
            action_timeout: config.action_timeout,
            _driver_dir: driver_dir,
        };

        let greeting = engine.next_reply().await?;
        match greeting.get("event").and_then(Value::as_str) {
            Some("ready") => Ok(engine),
            _ => Err(VerifyError::Driver(format!(
                "unexpected driver greeting: {greeting}"
            ))),
        }
    }

    fn check_playwright_installed() -> VerifyResult<()> {
        let status = std::process::Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(s) if s.success() => Ok(()),
            _ => Err(VerifyError::DriverNotFound),
        }
    }

    /// Read the next non-console line from the driver, stashing any console
    /// events encountered on the way.
    async fn next_reply(&mut self) -> VerifyResult<Value> {
        loop {
            let line = self
                .stdout
                .next_line()
                .await?
                .ok_or_else(|| VerifyError::Driver("driver exited unexpectedly".to_string()))?;
            if let Some(value) = absorb_line(&mut self.console, &line)? {
                return Ok(value);
            }
        }
    }

    /// Drain lines the driver has already written between commands.
    async fn drain_pending(&mut self) -> VerifyResult<()> {
        loop {
            match tokio::time::timeout(Duration::ZERO, self.stdout.next_line()).await {
                Ok(Ok(Some(line))) => {
                    if let Some(value) = absorb_line(&mut self.console, &line)? {
                        return Err(VerifyError::Driver(format!(
                            "unexpected driver message: {value}"
                        )));
                    }
                }
                // A closed stdout surfaces as an error on the next request.
                Ok(Ok(None)) => return Ok(()),
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Ok(()),
            }
        }
    }

    async fn request(&mut self, cmd: Value) -> VerifyResult<DriverReply> {
        self.drain_pending().await?;

        let mut line = cmd.to_string();
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;

        Ok(DriverReply::parse(self.next_reply().await?))
    }
}

/// Classify one line from the driver: console events are stashed, fatal
/// events become errors, anything else is handed back to the caller.
fn absorb_line(console: &mut Vec<ConsoleMessage>, line: &str) -> VerifyResult<Option<Value>> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(line)?;
    match value.get("event").and_then(Value::as_str) {
        Some("console") => {
            let msg = ConsoleMessage {
                level: value
                    .get("level")
                    .and_then(Value::as_str)
                    .unwrap_or("log")
                    .to_string(),
                text: value
                    .get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            };
            debug!("browser console [{}] {}", msg.level, msg.text);
            console.push(msg);
            Ok(None)
        }
        Some("fatal") => Err(VerifyError::Driver(
            value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("driver crashed")
                .to_string(),
        )),
        _ => Ok(Some(value)),
    }
}

#[async_trait]
impl BrowserEngine for PlaywrightEngine {
    async fn goto(&mut self, url: &str, timeout: Duration) -> VerifyResult<()> {
        let cmd = json!({
            "cmd": "goto",
            "url": url,
            "timeoutMs": timeout.as_millis() as u64,
        });
        match self.request(cmd).await? {
            DriverReply::Ok(_) => Ok(()),
            DriverReply::Failed {
                kind: DriverErrorKind::NavigationTimeout,
                ..
            } => Err(VerifyError::NavigationTimeout {
                url: url.to_string(),
                timeout,
            }),
            DriverReply::Failed { message, .. } => Err(VerifyError::Driver(message)),
        }
    }

    async fn fill(&mut self, locator: &Locator, value: &str) -> VerifyResult<()> {
        let cmd = json!({
            "cmd": "fill",
            "selector": locator.to_selector(),
            "value": value,
            "timeoutMs": self.action_timeout.as_millis() as u64,
        });
        match self.request(cmd).await? {
            DriverReply::Ok(_) => Ok(()),
            DriverReply::Failed {
                kind: DriverErrorKind::LocatorNotFound,
                ..
            } => Err(VerifyError::LocatorNotFound {
                locator: locator.to_string(),
            }),
            DriverReply::Failed { message, .. } => Err(VerifyError::Driver(message)),
        }
    }

    async fn click(&mut self, locator: &Locator) -> VerifyResult<()> {
        let cmd = json!({
            "cmd": "click",
            "selector": locator.to_selector(),
            "timeoutMs": self.action_timeout.as_millis() as u64,
        });
        match self.request(cmd).await? {
            DriverReply::Ok(_) => Ok(()),
            DriverReply::Failed {
                kind: DriverErrorKind::LocatorNotFound,
                ..
            } => Err(VerifyError::LocatorNotFound {
                locator: locator.to_string(),
            }),
            DriverReply::Failed { message, .. } => Err(VerifyError::Driver(message)),
        }
    }

    async fn wait_for_visible(&mut self, target: &Locator, timeout: Duration) -> VerifyResult<()> {
        let cmd = json!({
            "cmd": "waitForSelector",
            "selector": target.to_selector(),
            "timeoutMs": timeout.as_millis() as u64,
        });
        match self.request(cmd).await? {
            DriverReply::Ok(_) => Ok(()),
            DriverReply::Failed {
                kind: DriverErrorKind::ConditionTimeout,
                ..
            } => Err(VerifyError::ConditionTimeout {
                target: target.to_string(),
                timeout,
            }),
            DriverReply::Failed { message, .. } => Err(VerifyError::Driver(message)),
        }
    }

    async fn is_visible(&mut self, locator: &Locator) -> VerifyResult<bool> {
        let cmd = json!({
            "cmd": "isVisible",
            "selector": locator.to_selector(),
        });
        match self.request(cmd).await? {
            DriverReply::Ok(reply) => {
                Ok(reply.get("value").and_then(Value::as_bool).unwrap_or(false))
            }
            DriverReply::Failed { message, .. } => Err(VerifyError::Driver(message)),
        }
    }

    async fn pause(&mut self, duration: Duration) -> VerifyResult<()> {
        let cmd = json!({
            "cmd": "waitForTimeout",
            "ms": duration.as_millis() as u64,
        });
        match self.request(cmd).await? {
            DriverReply::Ok(_) => Ok(()),
            DriverReply::Failed { message, .. } => Err(VerifyError::Driver(message)),
        }
    }

    async fn screenshot(&mut self, path: &Path, full_page: bool) -> VerifyResult<()> {
        let cmd = json!({
            "cmd": "screenshot",
            "path": path.to_string_lossy(),
            "fullPage": full_page,
        });
        match self.request(cmd).await? {
            DriverReply::Ok(_) => Ok(()),
            DriverReply::Failed { message, .. } => Err(VerifyError::ScreenshotCapture(message)),
        }
    }

    async fn close(&mut self) -> VerifyResult<()> {
        let shutdown = self.request(json!({ "cmd": "close" })).await;

        // Reap the child regardless of how the close command fared; the
        // kill_on_drop fallback covers a driver that never exits.
        match tokio::time::timeout(Duration::from_secs(5), self.child.wait()).await {
            Ok(_) => {}
            Err(_) => {
                let _ = self.child.kill().await;
            }
        }

        match shutdown? {
            DriverReply::Ok(_) => Ok(()),
            DriverReply::Failed { message, .. } => Err(VerifyError::Driver(message)),
        }
    }

    fn console_messages(&self) -> &[ConsoleMessage] {
        &self.console
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("navigation_timeout", DriverErrorKind::NavigationTimeout; "navigation")]
    #[test_case("locator_not_found", DriverErrorKind::LocatorNotFound; "locator")]
    #[test_case("condition_timeout", DriverErrorKind::ConditionTimeout; "condition")]
    #[test_case("screenshot", DriverErrorKind::Screenshot; "screenshot")]
    #[test_case("something_else", DriverErrorKind::Other; "unknown")]
    fn error_kinds_parse(kind: &str, expected: DriverErrorKind) {
        assert_eq!(DriverErrorKind::parse(kind), expected);
    }

    #[test]
    fn ok_reply_is_ok() {
        let reply = DriverReply::parse(json!({ "ok": true, "value": true }));
        assert!(matches!(reply, DriverReply::Ok(_)));
    }

    #[test]
    fn failed_reply_carries_kind_and_message() {
        let reply = DriverReply::parse(json!({
            "ok": false,
            "kind": "condition_timeout",
            "message": "Timeout 5000ms exceeded",
        }));
        match reply {
            DriverReply::Failed { kind, message } => {
                assert_eq!(kind, DriverErrorKind::ConditionTimeout);
                assert_eq!(message, "Timeout 5000ms exceeded");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn browser_names_parse_strictly() {
        use clap::ValueEnum;

        assert!(Browser::from_str("chromium", true).is_ok());
        assert!(Browser::from_str("webkit", true).is_ok());
        assert!(Browser::from_str("firfox", true).is_err());
    }

    #[test]
    fn console_events_are_stashed_not_returned() {
        let mut console = Vec::new();
        let out = absorb_line(
            &mut console,
            r#"{"event":"console","level":"warn","text":"slow fetch"}"#,
        )
        .unwrap();

        assert!(out.is_none());
        assert_eq!(console.len(), 1);
        assert_eq!(console[0].level, "warn");
        assert_eq!(console[0].text, "slow fetch");
    }

    #[test]
    fn replies_pass_through_absorb() {
        let mut console = Vec::new();
        let out = absorb_line(&mut console, r#"{"ok":true}"#).unwrap();

        assert_eq!(
            out.and_then(|v| v.get("ok").and_then(Value::as_bool)),
            Some(true)
        );
        assert!(console.is_empty());
    }

    #[test]
    fn fatal_event_is_a_driver_error() {
        let mut console = Vec::new();
        let err =
            absorb_line(&mut console, r#"{"event":"fatal","message":"browser crashed"}"#)
                .unwrap_err();
        assert!(matches!(err, VerifyError::Driver(m) if m == "browser crashed"));
    }

    #[test]
    fn blank_lines_are_ignored() {
        let mut console = Vec::new();
        assert!(absorb_line(&mut console, "  ").unwrap().is_none());
        assert!(console.is_empty());
    }

    #[test]
    fn reply_without_kind_is_other() {
        let reply = DriverReply::parse(json!({ "ok": false }));
        assert!(matches!(
            reply,
            DriverReply::Failed {
                kind: DriverErrorKind::Other,
                ..
            }
        ));
    }
}
