//! Verification runner: sequential scenario execution with fail-fast
//! diagnostics

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::engine::BrowserEngine;
use crate::error::VerifyResult;
use crate::locator::Locator;
use crate::scenario::{Scenario, Step};

/// Configuration for a verification run
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Base URL of the application under test; it must already be running
    pub base_url: String,

    /// Directory screenshot artifacts are written to
    pub artifact_dir: PathBuf,

    /// Timeout applied to navigation steps
    pub navigation_timeout: Duration,

    /// Element probed after a failure to surface an application-level
    /// error message in the log
    pub error_banner: Option<Locator>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5173".to_string(),
            artifact_dir: PathBuf::from("verification"),
            navigation_timeout: Duration::from_secs(30),
            error_banner: Some(Locator::css(".bg-red-100")),
        }
    }
}

/// Drives one browser page through a fixed sequence of scenarios and fails
/// loudly, with a saved diagnostic screenshot, the first time an expected
/// condition does not materialize in time.
pub struct VerifyRunner {
    config: RunnerConfig,
}

impl VerifyRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Execute `scenarios` in order against `engine`.
    ///
    /// Strictly sequential and fail-fast: the first failing step terminates
    /// the entire run. The engine is closed on every exit path; a close
    /// failure is logged and never masks the run outcome.
    pub async fn run(
        &self,
        engine: &mut dyn BrowserEngine,
        scenarios: &[Scenario],
    ) -> VerifyResult<()> {
        let result = self.run_scenarios(engine, scenarios).await;

        if let Err(e) = engine.close().await {
            warn!("failed to close browser session: {e}");
        }

        result
    }

    async fn run_scenarios(
        &self,
        engine: &mut dyn BrowserEngine,
        scenarios: &[Scenario],
    ) -> VerifyResult<()> {
        std::fs::create_dir_all(&self.config.artifact_dir)?;

        for scenario in scenarios {
            info!("Verifying {}: {}", scenario.name, scenario.description);

            if let Err(e) = self.run_steps(engine, scenario).await {
                warn!("{} failed: {e}", scenario.name);
                self.diagnose_failure(engine, scenario).await;
                return Err(e);
            }

            if let Some(shot) = &scenario.success_screenshot {
                let path = self.config.artifact_dir.join(format!("success_{shot}.png"));
                engine.screenshot(&path, true).await?;
                info!("{} verified, screenshot at {}", scenario.name, path.display());
            } else {
                info!("{} verified", scenario.name);
            }
        }

        Ok(())
    }

    async fn run_steps(
        &self,
        engine: &mut dyn BrowserEngine,
        scenario: &Scenario,
    ) -> VerifyResult<()> {
        for step in &scenario.steps {
            info!("  {}", step.name());
            match step {
                Step::Navigate { url } => {
                    let url = join_url(&self.config.base_url, url);
                    engine.goto(&url, self.config.navigation_timeout).await?;
                }
                Step::Fill { locator, value } => engine.fill(locator, value).await?,
                Step::Click { locator } => engine.click(locator).await?,
                Step::ExpectVisible { target, timeout } => {
                    engine.wait_for_visible(target, *timeout).await?
                }
                Step::Wait { duration } => engine.pause(*duration).await?,
            }
        }
        Ok(())
    }

    /// Best-effort diagnostics after a step failure: probe the application
    /// error banner, capture a screenshot, replay captured console output.
    /// Nothing here may replace the original failure.
    async fn diagnose_failure(&self, engine: &mut dyn BrowserEngine, scenario: &Scenario) {
        if let Some(banner) = &self.config.error_banner {
            if let Ok(true) = engine.is_visible(banner).await {
                warn!("application error banner ({banner}) is showing");
            }
        }

        let path = self
            .config
            .artifact_dir
            .join(format!("fail_{}.png", scenario.name));
        match engine.screenshot(&path, true).await {
            Ok(()) => warn!("failure screenshot saved to {}", path.display()),
            Err(e) => warn!("could not capture failure screenshot: {e}"),
        }

        for msg in engine.console_messages() {
            warn!("browser console [{}] {}", msg.level, msg.text);
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
