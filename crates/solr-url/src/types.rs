//! Core request types.
//!
//! This module provides the value types a search request is described with: result formats,
//! sort directions, filter and sort maps, grouping specifications, and the fixed set of
//! parameter kinds a URL is assembled from.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Query used when none (or an empty one) is supplied.
pub const MATCH_ALL_QUERY: &str = "*:*";

/// Insertion-ordered filter map: filter field to value(s).
pub type FilterMap = IndexMap<String, FilterValue>;

/// Insertion-ordered sort map: field to direction.
pub type SortMap = IndexMap<String, SortDirection>;

/// Response writer (`wt`) formats accepted by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultFormat {
    /// JSON response writer
    #[default]
    Json,
    /// XML response writer
    Xml,
    /// Python response writer
    Python,
    /// Ruby response writer
    Ruby,
    /// PHP response writer
    Php,
    /// CSV response writer
    Csv,
}

impl ResultFormat {
    /// Returns the format name as it appears in the URL.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Python => "python",
            Self::Ruby => "ruby",
            Self::Php => "php",
            Self::Csv => "csv",
        }
    }

    /// Returns all valid formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Json,
            Self::Xml,
            Self::Python,
            Self::Ruby,
            Self::Php,
            Self::Csv,
        ]
    }
}

impl FromStr for ResultFormat {
    type Err = Error;

    /// Exact, case-sensitive match against the format names.
    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|format| format.name() == s)
            .ok_or_else(|| Error::UnknownResultFormat(s.to_string()))
    }
}

impl fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Sort direction for `sort` and `group.sort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl SortDirection {
    /// Returns the direction as it appears in the URL.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(Error::UnknownSortDirection(s.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Value of a single filter entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Rendered as `key:value`.
    Single(String),
    /// Rendered as `key:(v1+v2+...)`.
    Many(Vec<String>),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl<S: Into<String>> From<Vec<S>> for FilterValue {
    fn from(values: Vec<S>) -> Self {
        Self::Many(values.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for FilterValue {
    fn from(values: [S; N]) -> Self {
        Self::Many(values.into_iter().map(Into::into).collect())
    }
}

/// Result grouping (field collapsing) request.
///
/// Nothing is rendered unless `field` is set; `limit` and `sort` are optional add-ons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    /// Field to group on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Maximum documents per group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,

    /// Ordering of documents inside each group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortMap>,
}

impl GroupSpec {
    /// Create a group specification on the given field.
    #[must_use]
    pub fn on(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::default()
        }
    }

    /// Set the per-group document limit.
    #[must_use]
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Append a sort entry for documents inside each group.
    #[must_use]
    pub fn with_sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort
            .get_or_insert_with(SortMap::new)
            .insert(field.into(), direction);
        self
    }

    /// Returns true if limit or sort is set.
    #[must_use]
    pub fn has_options(&self) -> bool {
        self.limit.is_some() || self.sort.is_some()
    }
}

/// Parameters a URL is assembled from, in assembly order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// `q`
    Query,
    /// `wt`
    ResultFormat,
    /// `indent`
    Indent,
    /// `fl`
    Fields,
    /// `fq`
    Filters,
    /// `sort`
    Sorts,
    /// `group.*`
    Group,
    /// `start`
    Start,
    /// `rows`
    Rows,
}

impl ParamKind {
    /// Returns the parameter name used in updates and state dumps.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::ResultFormat => "result_format",
            Self::Indent => "indent",
            Self::Fields => "fields",
            Self::Filters => "filters",
            Self::Sorts => "sorts",
            Self::Group => "group",
            Self::Start => "start",
            Self::Rows => "rows",
        }
    }

    /// Returns all parameter kinds in assembly order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Query,
            Self::ResultFormat,
            Self::Indent,
            Self::Fields,
            Self::Filters,
            Self::Sorts,
            Self::Group,
            Self::Start,
            Self::Rows,
        ]
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_format_from_str() {
        for format in ResultFormat::all() {
            assert_eq!(format.name().parse::<ResultFormat>().unwrap(), *format);
        }
        assert!(matches!(
            "yaml".parse::<ResultFormat>(),
            Err(Error::UnknownResultFormat(_))
        ));
        assert!("JSON".parse::<ResultFormat>().is_err());
    }

    #[test]
    fn test_result_format_default() {
        assert_eq!(ResultFormat::default(), ResultFormat::Json);
        assert_eq!(ResultFormat::all().len(), 6);
    }

    #[test]
    fn test_sort_direction_from_str() {
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_filter_value_untagged_deserialize() {
        let single: FilterValue = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(single, FilterValue::Single("x".into()));

        let many: FilterValue = serde_json::from_str("[\"1\", \"2\"]").unwrap();
        assert_eq!(many, FilterValue::from(["1", "2"]));
    }

    #[test]
    fn test_group_spec_builder() {
        let group = GroupSpec::on("author")
            .with_limit(3)
            .with_sort("date", SortDirection::Desc);

        assert_eq!(group.field.as_deref(), Some("author"));
        assert_eq!(group.limit, Some(3));
        assert_eq!(
            group.sort.unwrap().get("date"),
            Some(&SortDirection::Desc)
        );
        assert!(!GroupSpec::default().has_options());
    }

    #[test]
    fn test_param_kind_order() {
        let mut kinds = ParamKind::all().to_vec();
        kinds.sort();
        assert_eq!(kinds, ParamKind::all());
        assert_eq!(ParamKind::ResultFormat.to_string(), "result_format");
    }
}
