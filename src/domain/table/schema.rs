use std::fmt;

use super::predicate::Predicate;

/// One filter key of an entity and how to turn a request value into a
/// predicate for it.
pub struct FilterDef<F> {
    /// Lower-case key as sent by clients
    pub key: &'static str,
    pub build: fn(&str) -> Predicate<F>,
}

impl<F> FilterDef<F> {
    pub fn new(key: &'static str, build: fn(&str) -> Predicate<F>) -> Self {
        Self { key, build }
    }
}

/// Two-level ordering: primary field, then tie-break field, one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec<F> {
    pub primary: F,
    pub secondary: F,
    pub ascending: bool,
}

/// Static description of an entity that can be listed as a table.
///
/// Implementations are explicit per entity; nothing is discovered at
/// runtime.
pub trait TableSchema: Send + Sync + 'static {
    /// Materialized record type
    type Row: Send + Sync;
    /// Field selector
    type Field: Copy + Eq + fmt::Debug + Send + Sync + 'static;

    /// Entity name used in logs and errors
    const NAME: &'static str;

    fn filters() -> Vec<FilterDef<Self::Field>>;

    /// Fields matched by the free-text search term
    fn search_fields() -> Vec<Self::Field>;

    /// Normalized sort key (lower-case, no separators) to field
    fn sort_keys() -> Vec<(&'static str, Self::Field)>;

    /// Secondary ordering applied after an explicitly requested sort key
    fn tie_break() -> Self::Field;

    /// Ordering used when the sort key is absent or unknown
    fn default_sort() -> SortSpec<Self::Field>;

    /// Navigation properties materialized with every row
    fn includes() -> Vec<&'static str> {
        Vec::new()
    }
}
