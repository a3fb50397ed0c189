use std::collections::HashMap;

/// Largest page a single table request may ask for
pub const MAX_PAGE_SIZE: i64 = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn is_ascending(self) -> bool {
        matches!(self, SortDirection::Ascending)
    }
}

/// Loosely-typed table request as it arrives from a client.
///
/// Nothing here is trusted: unknown filter keys and sort keys are
/// ignored by the builder, only the pager is validated.
#[derive(Debug, Clone)]
pub struct TablePageParameter {
    /// Zero-based page index
    pub page_index: i64,
    pub page_size: i64,
    /// Case-insensitive column name
    pub sort_by: Option<String>,
    pub sort_direction: SortDirection,
    pub search: Option<String>,
    /// Column name to accepted values
    pub filters: HashMap<String, Vec<String>>,
}

impl Default for TablePageParameter {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: 20,
            sort_by: None,
            sort_direction: SortDirection::Ascending,
            search: None,
            filters: HashMap::new(),
        }
    }
}

impl TablePageParameter {
    pub fn with_filter(mut self, key: &str, values: &[&str]) -> Self {
        self.filters.insert(
            key.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    pub fn with_sort(mut self, key: &str, direction: SortDirection) -> Self {
        self.sort_by = Some(key.to_string());
        self.sort_direction = direction;
        self
    }

    pub fn with_page(mut self, index: i64, size: i64) -> Self {
        self.page_index = index;
        self.page_size = size;
        self
    }

    pub fn with_search(mut self, term: &str) -> Self {
        self.search = Some(term.to_string());
        self
    }
}
