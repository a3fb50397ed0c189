//! Table query vocabulary
//!
//! A "table" request (paging, sort key, free-text search and per-column
//! filters) is turned into a typed [`TableQueryParameter`] over one entity,
//! described by its [`TableSchema`], and executed by a [`TableRepository`]
//! which answers with a [`TableInfo`] page.

pub mod info;
pub mod page;
pub mod predicate;
pub mod query;
pub mod repository;
pub mod schema;

pub use info::TableInfo;
pub use page::{SortDirection, TablePageParameter, MAX_PAGE_SIZE};
pub use predicate::Predicate;
pub use query::{Pager, TableQueryParameter};
pub use repository::TableRepository;
pub use schema::{FilterDef, SortSpec, TableSchema};
