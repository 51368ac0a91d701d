//! Partial updates applied to a [`crate::QueryBuilder`].
//!
//! A [`QueryUpdate`] holds at most one [`Param`] per parameter. Parameters that are not in the
//! update are left untouched by the builder; a parameter carried with `None` is explicitly
//! cleared (or reset to its default for `query` and `result_format`).

use serde::{Deserialize, Deserializer};

use crate::error::Result;
use crate::types::{
    FilterMap, FilterValue, GroupSpec, ParamKind, ResultFormat, SortDirection, SortMap,
};

/// A single parameter assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Replace the root endpoint
    Root(String),
    /// Free-text query; `None` or empty means match-all
    Query(Option<String>),
    /// Raw result format name; unknown or `None` means JSON
    ResultFormat(Option<String>),
    /// Indentation flag
    Indent(Option<bool>),
    /// Returned field list
    Fields(Option<Vec<String>>),
    /// Filter queries, merged or replaced according to the builder policy
    Filters(Option<FilterMap>),
    /// Sort order
    Sorts(Option<SortMap>),
    /// Result grouping
    Group(Option<GroupSpec>),
    /// Offset of the first returned document
    Start(Option<u64>),
    /// Number of returned documents
    Rows(Option<u64>),
}

impl Param {
    /// Returns the fragment this parameter renders into, or `None` for the root.
    #[must_use]
    pub const fn kind(&self) -> Option<ParamKind> {
        match self {
            Self::Root(_) => None,
            Self::Query(_) => Some(ParamKind::Query),
            Self::ResultFormat(_) => Some(ParamKind::ResultFormat),
            Self::Indent(_) => Some(ParamKind::Indent),
            Self::Fields(_) => Some(ParamKind::Fields),
            Self::Filters(_) => Some(ParamKind::Filters),
            Self::Sorts(_) => Some(ParamKind::Sorts),
            Self::Group(_) => Some(ParamKind::Group),
            Self::Start(_) => Some(ParamKind::Start),
            Self::Rows(_) => Some(ParamKind::Rows),
        }
    }

    /// Returns the parameter name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self.kind() {
            Some(kind) => kind.name(),
            None => "root",
        }
    }

    /// The `None` assignment for a parameter kind.
    #[must_use]
    pub const fn cleared(kind: ParamKind) -> Self {
        match kind {
            ParamKind::Query => Self::Query(None),
            ParamKind::ResultFormat => Self::ResultFormat(None),
            ParamKind::Indent => Self::Indent(None),
            ParamKind::Fields => Self::Fields(None),
            ParamKind::Filters => Self::Filters(None),
            ParamKind::Sorts => Self::Sorts(None),
            ParamKind::Group => Self::Group(None),
            ParamKind::Start => Self::Start(None),
            ParamKind::Rows => Self::Rows(None),
        }
    }
}

/// Set of parameter assignments applied in one step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "UpdateRepr")]
pub struct QueryUpdate {
    params: Vec<Param>,
}

impl QueryUpdate {
    /// Create an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Parse an update from a JSON object.
    ///
    /// Absent keys are left untouched, keys set to `null` are cleared, unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a JSON object of the expected shape.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Add an assignment, replacing any earlier one for the same parameter.
    #[must_use]
    pub fn with(mut self, param: Param) -> Self {
        self.set(param);
        self
    }

    /// Add an assignment in place, replacing any earlier one for the same parameter.
    pub fn set(&mut self, param: Param) {
        let discriminant = std::mem::discriminant(&param);
        match self
            .params
            .iter_mut()
            .find(|existing| std::mem::discriminant(&**existing) == discriminant)
        {
            Some(existing) => *existing = param,
            None => self.params.push(param),
        }
    }

    /// Replace the root endpoint.
    #[must_use]
    pub fn root(self, root: impl Into<String>) -> Self {
        self.with(Param::Root(root.into()))
    }

    /// Set the free-text query.
    #[must_use]
    pub fn query(self, query: impl Into<String>) -> Self {
        self.with(Param::Query(Some(query.into())))
    }

    /// Set the result format by name; unknown names fall back to JSON.
    #[must_use]
    pub fn result_format(self, format: impl Into<String>) -> Self {
        self.with(Param::ResultFormat(Some(format.into())))
    }

    /// Set the result format.
    #[must_use]
    pub fn format(self, format: ResultFormat) -> Self {
        self.result_format(format.name())
    }

    /// Set the indentation flag.
    #[must_use]
    pub fn indent(self, indent: bool) -> Self {
        self.with(Param::Indent(Some(indent)))
    }

    /// Set the returned field list.
    #[must_use]
    pub fn fields<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(Param::Fields(Some(fields.into_iter().map(Into::into).collect())))
    }

    /// Add one filter entry to the filters carried by this update.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        let (key, value) = (key.into(), value.into());
        let pending = self.params.iter_mut().find_map(|param| match param {
            Param::Filters(Some(map)) => Some(map),
            _ => None,
        });
        if let Some(map) = pending {
            map.insert(key, value);
            return self;
        }

        let mut map = FilterMap::new();
        map.insert(key, value);
        self.with(Param::Filters(Some(map)))
    }

    /// Set the filter map.
    #[must_use]
    pub fn filters(self, filters: FilterMap) -> Self {
        self.with(Param::Filters(Some(filters)))
    }

    /// Add one sort entry to the sort order carried by this update.
    #[must_use]
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        let field = field.into();
        let pending = self.params.iter_mut().find_map(|param| match param {
            Param::Sorts(Some(map)) => Some(map),
            _ => None,
        });
        if let Some(map) = pending {
            map.insert(field, direction);
            return self;
        }

        let mut map = SortMap::new();
        map.insert(field, direction);
        self.with(Param::Sorts(Some(map)))
    }

    /// Set the sort map.
    #[must_use]
    pub fn sorts(self, sorts: SortMap) -> Self {
        self.with(Param::Sorts(Some(sorts)))
    }

    /// Set the grouping specification.
    #[must_use]
    pub fn group(self, group: GroupSpec) -> Self {
        self.with(Param::Group(Some(group)))
    }

    /// Set the result offset.
    #[must_use]
    pub fn start(self, start: u64) -> Self {
        self.with(Param::Start(Some(start)))
    }

    /// Set the page size.
    #[must_use]
    pub fn rows(self, rows: u64) -> Self {
        self.with(Param::Rows(Some(rows)))
    }

    /// Clear a parameter (or reset it to its default for `query` and `result_format`).
    #[must_use]
    pub fn clear(self, kind: ParamKind) -> Self {
        self.with(Param::cleared(kind))
    }

    /// Returns true if the update carries no assignments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Number of assignments carried.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Iterate over the assignments.
    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.params.iter()
    }
}

impl IntoIterator for QueryUpdate {
    type Item = Param;
    type IntoIter = std::vec::IntoIter<Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.into_iter()
    }
}

impl FromIterator<Param> for QueryUpdate {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        let mut update = Self::new();
        for param in iter {
            update.set(param);
        }
        update
    }
}

/// Wire shape of an update: the outer `Option` records presence, the inner one `null`.
#[derive(Deserialize)]
struct UpdateRepr {
    #[serde(default)]
    root: Option<String>,
    #[serde(default, deserialize_with = "present")]
    query: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    result_format: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    indent: Option<Option<bool>>,
    #[serde(default, deserialize_with = "present")]
    fields: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "present")]
    filters: Option<Option<FilterMap>>,
    #[serde(default, deserialize_with = "present")]
    sorts: Option<Option<SortMap>>,
    #[serde(default, deserialize_with = "present")]
    group: Option<Option<GroupSpec>>,
    #[serde(default, deserialize_with = "present")]
    start: Option<Option<u64>>,
    #[serde(default, deserialize_with = "present")]
    rows: Option<Option<u64>>,
}

fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<UpdateRepr> for QueryUpdate {
    fn from(repr: UpdateRepr) -> Self {
        let params = [
            repr.root.map(Param::Root),
            repr.query.map(Param::Query),
            repr.result_format.map(Param::ResultFormat),
            repr.indent.map(Param::Indent),
            repr.fields.map(Param::Fields),
            repr.filters.map(Param::Filters),
            repr.sorts.map(Param::Sorts),
            repr.group.map(Param::Group),
            repr.start.map(Param::Start),
            repr.rows.map(Param::Rows),
        ];

        params.into_iter().flatten().collect()
    }
}
