//! # solr-url
//!
//! Incremental builder for Solr select query URLs.
//!
//! A [`QueryBuilder`] is created once from a root endpoint and refined through partial
//! [`QueryUpdate`]s. Only the parameters an update carries are re-rendered; the URL is then
//! reassembled from the cached fragments in a fixed order: query, result format, indent (when
//! enabled), fields, filters, sorts, grouping, start, rows.
//!
//! ```
//! use solr_url::{GroupSpec, QueryBuilder, QueryUpdate};
//!
//! let mut builder = QueryBuilder::with_params(
//!     "http://localhost:8983/solr/books/select",
//!     QueryUpdate::new()
//!         .fields(["title", "year"])
//!         .filter("lang", "en")
//!         .group(GroupSpec::on("author").with_limit(3))
//!         .rows(10),
//! );
//!
//! let url = builder.apply(QueryUpdate::new().filter("genre", vec!["sf", "fantasy"]));
//! assert_eq!(
//!     url,
//!     "http://localhost:8983/solr/books/select?q=*:*&wt=json&fl=title,year\
//!      &fq=lang:en&fq=genre:(sf+fantasy)\
//!      &group=true&group.ngroups=true&group.field=author&group.limit=3&rows=10"
//! );
//! ```
//!
//! ## Modules
//!
//! - [`builder`] - The stateful builder and its diagnostic dump
//! - [`update`] - Partial updates and single parameter assignments
//! - [`types`] - Request value types (formats, filters, sorts, grouping)
//! - [`config`] - Builder configuration and rendering tokens
//! - [`error`] - Error types for the strict entry points

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod config;
pub mod error;
mod fragment;
mod render;
pub mod types;
pub mod update;

pub use builder::{ParamValues, QueryBuilder, StateDump, StateEntry};
pub use config::{BuilderConfig, TokenStyle};
pub use error::{Error, Result};
pub use types::{
    FilterMap, FilterValue, GroupSpec, ParamKind, ResultFormat, SortDirection, SortMap,
    MATCH_ALL_QUERY,
};
pub use update::{Param, QueryUpdate};
