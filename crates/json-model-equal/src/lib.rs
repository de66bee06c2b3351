//! json-model-equal - structural comparison of serialized model values.
//!
//! Serialized models are plain [`serde_json::Value`] trees. Change tracking
//! compares the stored tree against a freshly serialized one, so equality
//! here is structural: object key order is irrelevant and numbers compare by
//! numeric value.
//!
//! - [`deep_equal`] / [`deep_equal_map`] answer "are these the same?"
//! - [`diff_paths`] answers "where do they differ?" as RFC 6901 pointers.

mod deep_equal;
mod diff;

pub use deep_equal::{deep_equal, deep_equal_map};
pub use diff::{diff_paths, escape_component};
