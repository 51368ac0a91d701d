//! Stateful, incrementally updated search URL builder.
//!
//! [`QueryBuilder`] keeps one rendered fragment per parameter and reassembles the URL from
//! them in a fixed order whenever an update touches at least one parameter. Updates never
//! fail: invalid values are normalized to defaults or render nothing. The strict entry points
//! ([`QueryBuilder::try_apply`], [`QueryBuilder::try_with_config`]) validate first and leave
//! the builder untouched on error.
//!
//! The builder is plain owned data. Share it between threads behind a lock such as
//! `Mutex<QueryBuilder>`; `apply` reads and writes several fragments in one call.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use crate::config::BuilderConfig;
use crate::error::{Error, Result};
use crate::render;
use crate::types::{FilterMap, GroupSpec, ParamKind, ResultFormat, SortMap, MATCH_ALL_QUERY};
use crate::update::{Param, QueryUpdate};

/// Last value applied to each parameter, after normalization.
///
/// `None` means the parameter was never set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParamValues {
    /// Query text
    pub query: Option<String>,
    /// Result format
    pub result_format: Option<ResultFormat>,
    /// Indentation flag
    pub indent: Option<bool>,
    /// Returned fields
    pub fields: Option<Vec<String>>,
    /// Accumulated filters
    pub filters: Option<FilterMap>,
    /// Sort order
    pub sorts: Option<SortMap>,
    /// Grouping specification
    pub group: Option<GroupSpec>,
    /// Result offset
    pub start: Option<u64>,
    /// Page size
    pub rows: Option<u64>,
}

/// Incremental builder for Solr select URLs.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    root: String,
    url: String,
    config: BuilderConfig,
    values: ParamValues,
    fragments: BTreeMap<ParamKind, String>,
}

impl QueryBuilder {
    /// Create a builder with default parameters: match-all query, JSON format, indent on.
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self::with_params(root, QueryUpdate::new())
    }

    /// Create a builder with an initial parameter set on top of the defaults.
    #[must_use]
    pub fn with_params(root: impl Into<String>, initial: QueryUpdate) -> Self {
        Self::with_config(root, BuilderConfig::default(), initial)
    }

    /// Create a builder with a custom configuration and an initial parameter set.
    #[must_use]
    pub fn with_config(root: impl Into<String>, config: BuilderConfig, initial: QueryUpdate) -> Self {
        let mut builder = Self {
            root: root.into(),
            url: String::new(),
            config,
            values: ParamValues::default(),
            fragments: BTreeMap::new(),
        };

        let defaults = QueryUpdate::new()
            .query(MATCH_ALL_QUERY)
            .format(ResultFormat::default())
            .indent(true);
        let update: QueryUpdate = defaults.into_iter().chain(initial).collect();

        builder.apply_with(update, true);
        builder
    }

    /// Strict variant of [`QueryBuilder::with_config`].
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not an absolute URL or the initial update fails
    /// validation (see [`QueryBuilder::try_apply`]).
    pub fn try_with_config(
        root: impl Into<String>,
        config: BuilderConfig,
        initial: QueryUpdate,
    ) -> Result<Self> {
        let root = root.into();
        validate_root(&root)?;
        validate_update(&initial)?;
        Ok(Self::with_config(root, config, initial))
    }

    /// Apply a partial update and return the URL.
    ///
    /// The URL is reassembled only if the update carries at least one parameter.
    pub fn apply(&mut self, update: QueryUpdate) -> &str {
        self.apply_with(update, false)
    }

    /// Apply a partial update, optionally forcing reassembly, and return the URL.
    pub fn apply_with(&mut self, update: QueryUpdate, force_reassemble: bool) -> &str {
        let mut changed = Vec::with_capacity(update.len());
        for param in update {
            changed.push(param.name());
            self.set_param(param);
        }

        let reassemble = force_reassemble || !changed.is_empty();
        if reassemble {
            self.reassemble();
        }
        debug!(?changed, reassemble, "applied query update");

        &self.url
    }

    /// Validate an update, then apply it.
    ///
    /// # Errors
    ///
    /// Returns an error, without touching the builder, if the update carries an unknown
    /// result format, a group specification with options but no field, or a root that is not
    /// an absolute URL.
    pub fn try_apply(&mut self, update: QueryUpdate) -> Result<&str> {
        validate_update(&update)?;
        Ok(self.apply(update))
    }

    /// Flip the filter merge policy and return the new value.
    ///
    /// Only affects later filter updates; current filters are kept as they are.
    pub fn toggle_filter_merge_mode(&mut self) -> bool {
        self.config.merge_filters = !self.config.merge_filters;
        debug!(merge_filters = self.config.merge_filters, "toggled filter merge mode");
        self.config.merge_filters
    }

    /// Root endpoint.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Last assembled URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Length of the last assembled URL in characters.
    #[must_use]
    pub fn url_len(&self) -> usize {
        self.url.chars().count()
    }

    /// Whether filter updates are merged into the existing filters.
    #[must_use]
    pub const fn merge_filters(&self) -> bool {
        self.config.merge_filters
    }

    /// Result formats accepted by [`QueryUpdate::result_format`].
    #[must_use]
    pub const fn valid_result_formats(&self) -> &'static [ResultFormat] {
        ResultFormat::all()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Last applied parameter values.
    #[must_use]
    pub const fn values(&self) -> &ParamValues {
        &self.values
    }

    /// Rendered fragment of a parameter, if it was ever set.
    #[must_use]
    pub fn fragment(&self, kind: ParamKind) -> Option<&str> {
        self.fragments.get(&kind).map(String::as_str)
    }

    /// Parse the assembled URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an absolute URL.
    pub fn parsed_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.url)?)
    }

    /// Snapshot of the root, values and fragments for diagnostics.
    #[must_use]
    pub fn dump_state(&self) -> StateDump {
        let values = serde_json::to_value(&self.values).unwrap_or_default();
        let entries = self
            .fragments
            .iter()
            .map(|(kind, fragment)| StateEntry {
                param: *kind,
                value: values.get(kind.name()).cloned().unwrap_or_default(),
                fragment: fragment.clone(),
            })
            .collect();

        StateDump {
            root: self.root.clone(),
            url: self.url.clone(),
            merge_filters: self.config.merge_filters,
            entries,
        }
    }

    fn set_param(&mut self, param: Param) {
        let style = self.config.token_style;
        let (kind, fragment) = match param {
            Param::Root(root) => {
                self.root = root;
                return;
            }
            Param::Query(query) => {
                let query = render::normalize_query(query);
                let fragment = render::query(&query);
                self.values.query = Some(query);
                (ParamKind::Query, fragment)
            }
            Param::ResultFormat(format) => {
                let format = render::normalize_result_format(format.as_deref());
                self.values.result_format = Some(format);
                (ParamKind::ResultFormat, render::result_format(format))
            }
            Param::Indent(indent) => {
                self.values.indent = indent;
                (ParamKind::Indent, render::scalar("indent", indent))
            }
            Param::Fields(fields) => {
                let fields = fields.unwrap_or_default();
                let fragment = render::fields(&fields, style);
                self.values.fields = Some(fields);
                (ParamKind::Fields, fragment)
            }
            Param::Filters(filters) => {
                let filters = self.update_filters(filters.unwrap_or_default());
                (ParamKind::Filters, render::filters(filters, style))
            }
            Param::Sorts(sorts) => {
                let sorts = sorts.unwrap_or_default();
                let fragment = render::sorts(&sorts, style);
                self.values.sorts = Some(sorts);
                (ParamKind::Sorts, fragment)
            }
            Param::Group(group) => {
                let group = group.unwrap_or_default();
                let fragment = render::group(&group, style);
                self.values.group = Some(group);
                (ParamKind::Group, fragment)
            }
            Param::Start(start) => {
                self.values.start = start;
                (ParamKind::Start, render::scalar("start", start))
            }
            Param::Rows(rows) => {
                self.values.rows = rows;
                (ParamKind::Rows, render::scalar("rows", rows))
            }
        };

        self.fragments.insert(kind, fragment);
    }

    /// Merge into the stored filters when merging is on, a prior map exists and the incoming
    /// map is non-empty; replace them otherwise.
    fn update_filters(&mut self, incoming: FilterMap) -> &FilterMap {
        let merge = self.config.merge_filters && !incoming.is_empty();
        match self.values.filters.as_mut() {
            Some(prior) if merge => {
                debug!(keys = incoming.len(), "merging filters");
                prior.extend(incoming);
            }
            _ => {
                debug!(keys = incoming.len(), "replacing filters");
                self.values.filters = Some(incoming);
            }
        }

        self.values.filters.get_or_insert_with(FilterMap::new)
    }

    fn reassemble(&mut self) {
        let mut url = self.root.clone();
        for (kind, fragment) in &self.fragments {
            if *kind == ParamKind::Indent && !self.config.emit_indent {
                continue;
            }
            url.push_str(fragment);
        }

        trace!(len = url.len(), "reassembled url");
        self.url = url;
    }
}

impl fmt::Display for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

fn validate_root(root: &str) -> Result<()> {
    Url::parse(root)?;
    Ok(())
}

fn validate_update(update: &QueryUpdate) -> Result<()> {
    for param in update.iter() {
        match param {
            Param::Root(root) => validate_root(root)?,
            Param::ResultFormat(Some(format)) => {
                format.parse::<ResultFormat>()?;
            }
            Param::Group(Some(group)) if group.field.is_none() && group.has_options() => {
                return Err(Error::MissingGroupField);
            }
            _ => {}
        }
    }
    Ok(())
}

/// Diagnostic snapshot returned by [`QueryBuilder::dump_state`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateDump {
    /// Root endpoint
    pub root: String,
    /// Last assembled URL
    pub url: String,
    /// Filter merge policy
    pub merge_filters: bool,
    /// Every parameter set so far, in assembly order
    pub entries: Vec<StateEntry>,
}

/// Stored value and rendered fragment of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateEntry {
    /// Parameter
    pub param: ParamKind,
    /// Last applied value
    pub value: serde_json::Value,
    /// Rendered fragment, empty when omitted from the URL
    pub fragment: String,
}

impl fmt::Display for StateDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "root: {}", self.root)?;
        for entry in &self.entries {
            writeln!(f, "{}: {}", entry.param, entry.value)?;
            writeln!(f, "{}_str: {}", entry.param, entry.fragment)?;
        }
        write!(f, "url: {}", self.url)
    }
}
