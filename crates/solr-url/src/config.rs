//! Configuration structures for the query builder.
//!
//! This module controls the update policy for filters, whether the `indent` parameter is
//! emitted, and which literal tokens are used when rendering fragments.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Token set used to join keys, values and entries inside fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStyle {
    /// Plain `:` for assignments and `,` between entries
    #[default]
    Literal,
    /// Percent-encoded `%3A` for assignments and `%2C` between entries
    Encoded,
}

/// Value list separator inside `(..)` and between a sort field and its direction.
pub const LIST_SEPARATOR: &str = "+";
/// Opens a value list.
pub const LIST_OPEN: &str = "(";
/// Closes a value list.
pub const LIST_CLOSE: &str = ")";

impl TokenStyle {
    /// Separator between a filter key and its value.
    #[must_use]
    pub const fn assign(&self) -> &'static str {
        match self {
            Self::Literal => ":",
            Self::Encoded => "%3A",
        }
    }

    /// Separator between fields, sort pairs and group sort pairs.
    #[must_use]
    pub const fn entry_separator(&self) -> &'static str {
        match self {
            Self::Literal => ",",
            Self::Encoded => "%2C",
        }
    }
}

/// Configuration for a [`crate::QueryBuilder`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Union incoming filters into the existing ones instead of replacing them
    #[serde(default = "default_merge_filters")]
    pub merge_filters: bool,

    /// Include the `indent` fragment in the assembled URL
    #[serde(default)]
    pub emit_indent: bool,

    /// Tokens used when rendering fragments
    #[serde(default)]
    pub token_style: TokenStyle,
}

const fn default_merge_filters() -> bool {
    true
}

impl BuilderConfig {
    /// Create a configuration with defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            merge_filters: default_merge_filters(),
            emit_indent: false,
            token_style: TokenStyle::Literal,
        }
    }

    /// Parse a configuration from JSON, filling missing keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a valid configuration object.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input)
            .map_err(|e| Error::ConfigError(format!("Invalid builder configuration: {e}")))
    }

    /// Set the filter update policy.
    #[must_use]
    pub const fn with_merge_filters(mut self, merge: bool) -> Self {
        self.merge_filters = merge;
        self
    }

    /// Set whether the `indent` fragment is emitted.
    #[must_use]
    pub const fn with_emit_indent(mut self, emit: bool) -> Self {
        self.emit_indent = emit;
        self
    }

    /// Set the token style.
    #[must_use]
    pub const fn with_token_style(mut self, style: TokenStyle) -> Self {
        self.token_style = style;
        self
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::new()
    }
}
