/// One page of a table together with its aggregate counts.
#[derive(Debug, Clone)]
pub struct TableInfo<T> {
    pub items: Vec<T>,
    pub page_count: u64,
    pub total_items_count: u64,
}

impl<T> TableInfo<T> {
    /// `page_count` is `ceil(total / page_size)`; a zero page size yields
    /// zero pages.
    pub fn new(items: Vec<T>, total_items_count: u64, page_size: u64) -> Self {
        let page_count = if page_size == 0 {
            0
        } else {
            total_items_count.div_ceil(page_size)
        };
        Self {
            items,
            page_count,
            total_items_count,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> TableInfo<U> {
        TableInfo {
            items: self.items.into_iter().map(f).collect(),
            page_count: self.page_count,
            total_items_count: self.total_items_count,
        }
    }
}
