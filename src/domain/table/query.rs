use super::predicate::Predicate;
use super::schema::SortSpec;

/// Validated page position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    /// Zero-based
    pub index: u64,
    /// Always > 0
    pub size: u64,
}

impl Pager {
    /// Rows skipped before this page. Saturates instead of wrapping, so
    /// an out-of-range position reads as past the end.
    pub fn offset(&self) -> u64 {
        self.index.saturating_mul(self.size)
    }
}


/// Strongly-typed table query, built once per request.
#[derive(Debug, Clone)]
pub struct TableQueryParameter<F> {
    pub pager: Pager,
    pub predicate: Predicate<F>,
    pub includes: Vec<&'static str>,
    pub sort: SortSpec<F>,
}

impl<F> TableQueryParameter<F> {
    pub fn includes(&self, navigation: &str) -> bool {
        self.includes.iter().any(|n| *n == navigation)
    }
}
