//! Scenario and step descriptors
//!
//! A scenario is one user-facing verification flow: an ordered list of
//! steps, optionally ending in a designated success screenshot. Scenarios
//! are in-memory descriptors only; they exist for the duration of a run.

use std::time::Duration;

use crate::locator::Locator;

/// The smallest scripted action or expectation within a scenario
#[derive(Debug, Clone)]
pub enum Step {
    /// Load a page, relative to the base URL unless absolute
    Navigate { url: String },

    /// Set text into a located input
    Fill { locator: Locator, value: String },

    /// Click a located element
    Click { locator: Locator },

    /// Poll until the target is visible or the timeout elapses
    ExpectVisible { target: Locator, timeout: Duration },

    /// Unconditional pause, for asynchronous UI settling only
    Wait { duration: Duration },
}

impl Step {
    /// Short name used in breadcrumbs
    pub fn name(&self) -> String {
        match self {
            Step::Navigate { url } => format!("navigate:{url}"),
            Step::Fill { locator, .. } => format!("fill:{locator}"),
            Step::Click { locator } => format!("click:{locator}"),
            Step::ExpectVisible { target, .. } => format!("expect:{target}"),
            Step::Wait { duration } => format!("wait:{}ms", duration.as_millis()),
        }
    }
}

/// An ordered verification flow
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Short identifier, used in artifact file names
    pub name: String,

    /// Human-readable description, used in breadcrumbs
    pub description: String,

    /// Steps to execute in order
    pub steps: Vec<Step>,

    /// Name of the screenshot to capture on full success, if any
    pub success_screenshot: Option<String>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            steps: Vec::new(),
            success_screenshot: None,
        }
    }

    pub fn navigate(mut self, url: impl Into<String>) -> Self {
        self.steps.push(Step::Navigate { url: url.into() });
        self
    }

    pub fn fill(mut self, locator: Locator, value: impl Into<String>) -> Self {
        self.steps.push(Step::Fill {
            locator,
            value: value.into(),
        });
        self
    }

    pub fn click(mut self, locator: Locator) -> Self {
        self.steps.push(Step::Click { locator });
        self
    }

    pub fn expect_visible(mut self, target: Locator, timeout: Duration) -> Self {
        self.steps.push(Step::ExpectVisible { target, timeout });
        self
    }

    pub fn wait(mut self, duration: Duration) -> Self {
        self.steps.push(Step::Wait { duration });
        self
    }

    /// Designate a screenshot to capture once every step has succeeded.
    pub fn with_success_screenshot(mut self, name: impl Into<String>) -> Self {
        self.success_screenshot = Some(name.into());
        self
    }
}
