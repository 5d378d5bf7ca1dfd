//! Common utilities shared across domain modules.

mod string;

pub use string::{capitalize, contains_word, locale_cmp, normalize_key};
