//! Writer for `&key=value` URL fragments.
//!
//! Rendering rules push key/value segments into a [`FragmentWriter`] and take the
//! concatenated string, so optional segments never need manual separator handling.

use std::fmt::Display;

/// Builder for a run of `&key=value` segments.
#[derive(Debug, Default, Clone)]
pub(crate) struct FragmentWriter {
    buf: String,
}

impl FragmentWriter {
    /// Create a new, empty writer.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Append a required segment.
    pub(crate) fn push<T>(&mut self, key: &str, value: T)
    where
        T: Display,
    {
        self.buf.push('&');
        self.buf.push_str(key);
        self.buf.push('=');
        self.buf.push_str(&value.to_string());
    }

    /// Append a segment when the value is present.
    pub(crate) fn push_opt<T>(&mut self, key: &str, value: Option<T>)
    where
        T: Display,
    {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Append using a mapping function when the value is present.
    pub(crate) fn push_opt_with<T, F>(&mut self, key: &str, value: Option<T>, map: F)
    where
        F: FnOnce(T) -> String,
    {
        if let Some(value) = value {
            self.push(key, map(value));
        }
    }

    /// Return the rendered fragment.
    #[must_use]
    pub(crate) fn finish(self) -> String {
        self.buf
    }
}
