//! Per-parameter normalization and fragment rendering.
//!
//! Every function here is pure: the same value and token style always render the same
//! fragment. An empty string means the parameter contributes nothing to the URL.

use std::fmt::Display;

use tracing::debug;

use crate::config::{TokenStyle, LIST_CLOSE, LIST_OPEN, LIST_SEPARATOR};
use crate::fragment::FragmentWriter;
use crate::types::{FilterMap, FilterValue, GroupSpec, ResultFormat, SortMap, MATCH_ALL_QUERY};

/// Empty or missing queries become the match-all query.
pub(crate) fn normalize_query(value: Option<String>) -> String {
    match value {
        Some(query) if !query.is_empty() => query,
        _ => MATCH_ALL_QUERY.to_string(),
    }
}

/// Unknown or missing formats fall back to JSON.
pub(crate) fn normalize_result_format(value: Option<&str>) -> ResultFormat {
    let Some(raw) = value else {
        return ResultFormat::default();
    };

    raw.parse::<ResultFormat>().unwrap_or_else(|_| {
        debug!(format = raw, "unknown result format, falling back to json");
        ResultFormat::default()
    })
}

pub(crate) fn query(query: &str) -> String {
    format!("?q={query}")
}

pub(crate) fn result_format(format: ResultFormat) -> String {
    let mut writer = FragmentWriter::new();
    writer.push("wt", format);
    writer.finish()
}

/// Generic `&name=value` rule used for `indent`, `start` and `rows`.
pub(crate) fn scalar<T: Display>(name: &str, value: Option<T>) -> String {
    let mut writer = FragmentWriter::new();
    writer.push_opt(name, value);
    writer.finish()
}

pub(crate) fn fields(fields: &[String], style: TokenStyle) -> String {
    if fields.is_empty() {
        return String::new();
    }

    let mut writer = FragmentWriter::new();
    writer.push("fl", fields.join(style.entry_separator()));
    writer.finish()
}

pub(crate) fn filters(filters: &FilterMap, style: TokenStyle) -> String {
    let mut writer = FragmentWriter::new();
    for (key, value) in filters {
        let rendered = match value {
            FilterValue::Single(value) => format!("{key}{}{value}", style.assign()),
            FilterValue::Many(values) => format!(
                "{key}{}{LIST_OPEN}{}{LIST_CLOSE}",
                style.assign(),
                values.join(LIST_SEPARATOR)
            ),
        };
        writer.push("fq", rendered);
    }
    writer.finish()
}

/// `field+dir` pairs joined by the entry separator.
fn sort_pairs(sorts: &SortMap, style: TokenStyle) -> String {
    sorts
        .iter()
        .map(|(field, direction)| format!("{field}{LIST_SEPARATOR}{direction}"))
        .collect::<Vec<_>>()
        .join(style.entry_separator())
}

pub(crate) fn sorts(sorts: &SortMap, style: TokenStyle) -> String {
    if sorts.is_empty() {
        return String::new();
    }

    let mut writer = FragmentWriter::new();
    writer.push("sort", sort_pairs(sorts, style));
    writer.finish()
}

pub(crate) fn group(group: &GroupSpec, style: TokenStyle) -> String {
    let Some(field) = group.field.as_deref() else {
        return String::new();
    };

    let mut writer = FragmentWriter::new();
    writer.push("group", true);
    writer.push("group.ngroups", true);
    writer.push("group.field", field);
    writer.push_opt("group.limit", group.limit);
    writer.push_opt_with(
        "group.sort",
        group.sort.as_ref().filter(|sort| !sort.is_empty()),
        |sort| sort_pairs(sort, style),
    );
    writer.finish()
}
