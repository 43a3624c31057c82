//! UI verification for the Lotostats web app
//!
//! Drives a headless browser through a fixed sequence of flows against a
//! locally running instance and asserts that key UI elements appear after
//! specific interactions. Screenshots are captured at designated success
//! checkpoints and, diagnostically, on every failure.
//!
//! ```text
//! VerifyRunner
//!   ├── run(engine, scenarios)     strictly sequential, fail-fast
//!   ├── fail_<scenario>.png        diagnostic capture before propagating
//!   └── success_<name>.png         designated checkpoints
//! BrowserEngine (trait)
//!   └── PlaywrightEngine           Node driver subprocess, JSON lines
//! Scenario
//!   └── steps: navigate / fill / click / expect_visible / wait
//! ```
//!
//! The application under test is never started or stopped here; it must be
//! reachable at the base URL before the run begins.

pub mod engine;
pub mod error;
pub mod flows;
pub mod locator;
pub mod playwright;
pub mod runner;
pub mod scenario;

pub use engine::{BrowserEngine, ConsoleMessage};
pub use error::{VerifyError, VerifyResult};
pub use locator::Locator;
pub use runner::{RunnerConfig, VerifyRunner};
pub use scenario::{Scenario, Step};
