//! Builds typed table queries from loosely-typed page requests.
//!
//! Filtering, search and sorting never fail: unknown keys and blank values
//! are dropped. Only the pager is validated.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::table::{
    Pager, Predicate, SortDirection, SortSpec, TablePageParameter, TableQueryParameter,
    TableSchema, MAX_PAGE_SIZE,
};
use crate::domain::{DomainError, DomainResult};

pub struct TableQueryBuilder;

impl TableQueryBuilder {
    /// Build query parameters for entity `S` from a page request.
    pub fn build<S: TableSchema>(
        param: &TablePageParameter,
    ) -> DomainResult<TableQueryParameter<S::Field>> {
        let pager = Self::pager(param)?;

        let predicate = Self::filter_predicate::<S>(&param.filters)
            .and(Self::search_predicate::<S>(param.search.as_deref()));
        let sort = Self::sort_spec::<S>(param.sort_by.as_deref(), param.sort_direction);

        debug!(
            entity = S::NAME,
            page_index = pager.index,
            page_size = pager.size,
            ?predicate,
            ?sort,
            "Table query built"
        );

        Ok(TableQueryParameter {
            pager,
            predicate,
            includes: S::includes(),
            sort,
        })
    }

    /// Page index must be >= 0, page size within `1..=MAX_PAGE_SIZE`, and
    /// the resulting row offset must fit in an `i64`.
    pub fn pager(param: &TablePageParameter) -> DomainResult<Pager> {
        if param.page_index < 0 {
            return Err(DomainError::Validation(format!(
                "page_index must be >= 0, got {}",
                param.page_index
            )));
        }
        if param.page_size <= 0 || param.page_size > MAX_PAGE_SIZE {
            return Err(DomainError::Validation(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, param.page_size
            )));
        }
        if param.page_index.checked_mul(param.page_size).is_none() {
            return Err(DomainError::Validation(format!(
                "page_index {} is out of range for page_size {}",
                param.page_index, param.page_size
            )));
        }
        Ok(Pager {
            index: param.page_index as u64,
            size: param.page_size as u64,
        })
    }

    /// AND across filter keys, OR across the values of one key.
    ///
    /// Keys are matched lower-cased and trimmed; blank values are ignored;
    /// a key with no usable value adds no restriction.
    pub fn filter_predicate<S: TableSchema>(
        filters: &HashMap<String, Vec<String>>,
    ) -> Predicate<S::Field> {
        let mut values_by_key: HashMap<String, Vec<&str>> = HashMap::new();
        for (key, values) in filters {
            values_by_key
                .entry(key.trim().to_lowercase())
                .or_default()
                .extend(values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()));
        }

        Predicate::all_of(S::filters().into_iter().filter_map(|def| {
            let values = values_by_key.get(def.key)?;
            Some(Predicate::any_of(values.iter().map(|v| (def.build)(v))))
        }))
    }

    /// OR of "contains" over the schema's search fields.
    pub fn search_predicate<S: TableSchema>(search: Option<&str>) -> Predicate<S::Field> {
        match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => Predicate::any_of(
                S::search_fields()
                    .into_iter()
                    .map(|field| Predicate::contains(field, term)),
            ),
            None => Predicate::Always,
        }
    }

    /// Known key: that field, then the schema's tie-break, in the requested
    /// direction. Unknown or empty key: the schema's default ordering as is.
    pub fn sort_spec<S: TableSchema>(
        sort_by: Option<&str>,
        direction: SortDirection,
    ) -> SortSpec<S::Field> {
        let Some(key) = sort_by.map(normalize_sort_key).filter(|k| !k.is_empty()) else {
            return S::default_sort();
        };

        match S::sort_keys().into_iter().find(|(k, _)| *k == key) {
            Some((_, field)) => SortSpec {
                primary: field,
                secondary: S::tie_break(),
                ascending: direction.is_ascending(),
            },
            None => S::default_sort(),
        }
    }
}

/// Lower-case and drop separators so `ModifiedTime`, `modified_time` and
/// `modified-time` are the same key.
pub fn normalize_sort_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '_' | '-' | '.' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
