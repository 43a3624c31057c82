//! Page element references

use std::fmt;

/// A reference to a page element: a structural CSS selector, a text-content
/// predicate, or an accessibility role plus accessible name.
///
/// Keeping the variants explicit (instead of interpolating selector strings
/// at the call site) lets tests match on locator values without a rendered
/// page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Raw CSS selector
    Css(String),
    /// Substring of rendered text content
    Text(String),
    /// Accessibility role with accessible name
    Role { role: String, name: String },
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn text(content: impl Into<String>) -> Self {
        Locator::Text(content.into())
    }

    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Locator::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    /// Shorthand for the most common role locator.
    pub fn button(name: impl Into<String>) -> Self {
        Self::role("button", name)
    }

    /// Render to a Playwright selector string.
    pub fn to_selector(&self) -> String {
        match self {
            Locator::Css(selector) => selector.clone(),
            Locator::Text(content) => format!("text={content}"),
            Locator::Role { role, name } => format!("role={role}[name=\"{name}\"]"),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "css {selector}"),
            Locator::Text(content) => write!(f, "text '{content}'"),
            Locator::Role { role, name } => write!(f, "{role} '{name}'"),
        }
    }
}
