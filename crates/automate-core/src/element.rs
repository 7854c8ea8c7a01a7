//! Element handles passed to the automation driver.
//!
//! An [`ElementQuery`] does not hold any state from the UI; it only names an
//! element. Every driver call resolves it again, so frames and values are
//! always read fresh from the accessibility hierarchy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies an element in the accessibility hierarchy.
///
/// Selectors support glob wildcards (`*` any run of characters, `?` one
/// character). A selector without wildcards must match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum ElementQuery {
    /// Match by accessibility identifier.
    Identifier { selector: String },
    /// Match by accessibility label.
    Label { selector: String },
    /// Match by identifier or label, restricted to one element type.
    Typed {
        selector: String,
        by_label: bool,
        element_type: String,
    },
}

impl ElementQuery {
    pub fn id(selector: impl Into<String>) -> Self {
        Self::Identifier {
            selector: selector.into(),
        }
    }

    pub fn label(selector: impl Into<String>) -> Self {
        Self::Label {
            selector: selector.into(),
        }
    }

    pub fn typed(selector: impl Into<String>, by_label: bool, element_type: impl Into<String>) -> Self {
        Self::Typed {
            selector: selector.into(),
            by_label,
            element_type: element_type.into(),
        }
    }

    /// The selector text, without the match mode.
    pub fn selector(&self) -> &str {
        match self {
            Self::Identifier { selector } | Self::Label { selector } | Self::Typed { selector, .. } => {
                selector
            }
        }
    }

    /// Returns true if an element with the given attributes satisfies this query.
    pub fn matches(
        &self,
        identifier: Option<&str>,
        label: Option<&str>,
        element_type: Option<&str>,
    ) -> bool {
        match self {
            Self::Identifier { selector } => identifier.is_some_and(|id| glob_match(selector, id)),
            Self::Label { selector } => label.is_some_and(|l| glob_match(selector, l)),
            Self::Typed {
                selector,
                by_label,
                element_type: wanted,
            } => {
                let candidate = if *by_label { label } else { identifier };
                candidate.is_some_and(|c| glob_match(selector, c))
                    && element_type == Some(wanted.as_str())
            }
        }
    }
}

impl fmt::Display for ElementQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier { selector } => write!(f, "#{selector}"),
            Self::Label { selector } => write!(f, "\"{selector}\""),
            Self::Typed {
                selector,
                by_label: true,
                element_type,
            } => write!(f, "{element_type}[\"{selector}\"]"),
            Self::Typed {
                selector,
                by_label: false,
                element_type,
            } => write!(f, "{element_type}[#{selector}]"),
        }
    }
}

/// The accessibility value of an element.
///
/// Text fields report text, switches report booleans, sliders report numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl ElementValue {
    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for ElementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Matches a string against a glob pattern with `*` (any chars) and `?` (single char).
///
/// When the pattern has no wildcards, falls back to exact equality.
fn glob_match(pattern: &str, text: &str) -> bool {
    if !pattern.contains(['*', '?']) {
        return pattern == text;
    }

    let pat: Vec<char> = pattern.chars().collect();
    let txt: Vec<char> = text.chars().collect();

    // row[j] = pattern[..i] matches text[..j], for the current i
    let mut row = vec![false; txt.len() + 1];
    row[0] = true;

    for p in &pat {
        let mut next = vec![false; txt.len() + 1];
        if *p == '*' {
            next[0] = row[0];
        }
        for j in 1..=txt.len() {
            next[j] = match p {
                '*' => row[j] || next[j - 1],
                '?' => row[j - 1],
                c => row[j - 1] && *c == txt[j - 1],
            };
        }
        row = next;
    }

    row[txt.len()]
}
