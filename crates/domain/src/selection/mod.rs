//! Interactive feat selection: filter state, ordering and picker sessions.

mod engine;
mod filter;

pub use engine::{FeatSelected, SelectionSession};
pub use filter::{sort_feats, SelectionFilterState, SortMethod, SortOrder, SortPreset};
