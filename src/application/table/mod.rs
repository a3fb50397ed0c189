//! Table listing use-case
//!
//! `TableQueryBuilder` turns a [`TablePageParameter`] into a typed query
//! for one entity; [`load_table`] builds and executes it in one step for
//! the per-entity listing services.

pub mod builder;

pub use builder::{normalize_sort_key, TableQueryBuilder};

use tracing::debug;

use crate::domain::table::{TableInfo, TablePageParameter, TableRepository, TableSchema};
use crate::domain::DomainResult;

/// Build the query for `S` from a page request and fetch that page.
pub async fn load_table<S, R>(
    repo: &R,
    param: &TablePageParameter,
) -> DomainResult<TableInfo<S::Row>>
where
    S: TableSchema,
    R: TableRepository<S> + ?Sized,
{
    let query = TableQueryBuilder::build::<S>(param)?;
    let page = repo.fetch_page(&query).await?;
    debug!(
        entity = S::NAME,
        total = page.total_items_count,
        pages = page.page_count,
        "Table page loaded"
    );
    Ok(page)
}
