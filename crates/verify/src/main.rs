//! Lotostats UI verification entry point
//!
//! Expects the web app to be running already; drives a headless browser
//! through the built-in flows and exits 0 on success, 1 on a verification
//! failure, 2 on an environment fault (missing driver, IO, ...).

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use lotostats_verify::flows::{self, Fixtures};
use lotostats_verify::playwright::{Browser, PlaywrightConfig, PlaywrightEngine};
use lotostats_verify::runner::{RunnerConfig, VerifyRunner};
use lotostats_verify::{VerifyError, VerifyResult};

#[derive(Parser, Debug)]
#[command(name = "lotostats-verify")]
#[command(about = "UI verification for the Lotostats web app")]
struct Args {
    /// Base URL of the running application
    #[arg(long, default_value = "http://127.0.0.1:5173")]
    base_url: String,

    /// Directory for screenshot artifacts
    #[arg(long, default_value = "verification")]
    artifact_dir: PathBuf,

    /// Browser to use
    #[arg(long, default_value = "chromium")]
    browser: Browser,

    /// Run with a visible browser window
    #[arg(long)]
    headed: bool,

    /// Viewport width
    #[arg(long, default_value = "1280")]
    viewport_width: u32,

    /// Viewport height
    #[arg(long, default_value = "720")]
    viewport_height: u32,

    /// Timeout for page navigation, in seconds
    #[arg(long, default_value = "30")]
    navigation_timeout_secs: u64,

    /// Past game number the search flow looks up
    #[arg(long, default_value = "3000")]
    game_number: String,

    /// Backtest tier expected to appear after generating a game
    #[arg(long, default_value = "11 Pontos")]
    backtest_tier: String,

    /// Stop after the named flow; earlier flows still run, since later
    /// flows depend on the page state they leave behind
    #[arg(long, value_parser = flows::FLOW_NAMES)]
    only: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let args = Args::parse();

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
    match rt.block_on(verify(args)) {
        Ok(()) => std::process::exit(0),
        Err(e) if e.is_verification_failure() => {
            error!("verification failed: {e}");
            std::process::exit(1);
        }
        Err(e) => {
            error!("{e}");
            std::process::exit(2);
        }
    }
}

async fn verify(args: Args) -> VerifyResult<()> {
    let fixtures = Fixtures {
        game_number: args.game_number,
        backtest_tier: args.backtest_tier,
    };

    let scenarios = match args.only.as_deref() {
        Some(name) => flows::up_to(&fixtures, name)
            .ok_or_else(|| VerifyError::Config(format!("unknown flow: {name}")))?,
        None => flows::all(&fixtures),
    };

    let mut engine = PlaywrightEngine::launch(PlaywrightConfig {
        browser: args.browser,
        headless: !args.headed,
        viewport_width: args.viewport_width,
        viewport_height: args.viewport_height,
        ..Default::default()
    })
    .await?;

    let runner = VerifyRunner::new(RunnerConfig {
        base_url: args.base_url,
        artifact_dir: args.artifact_dir,
        navigation_timeout: Duration::from_secs(args.navigation_timeout_secs),
        ..Default::default()
    });

    runner.run(&mut engine, &scenarios).await
}
