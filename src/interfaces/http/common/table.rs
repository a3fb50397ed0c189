//! Table request/response DTOs shared by the `POST /<resource>/table`
//! endpoints.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::table::{SortDirection, TableInfo, TablePageParameter};

/// Table query as sent by the admin UI
///
/// Every field is optional. Unknown filter keys and sort keys are ignored;
/// only the pager is validated.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(default)]
#[schema(example = json!({
    "page_index": 0,
    "page_size": 20,
    "sort_by": "modifiedTime",
    "sort_direction": "desc",
    "search": "rock",
    "filters": { "status": ["sold", "reserved"], "fullname": ["hanoi"] }
}))]
pub struct TablePageRequest {
    /// Zero-based
    pub page_index: i64,
    /// 1..=500
    pub page_size: i64,
    /// Case-insensitive column name
    pub sort_by: Option<String>,
    /// `asc` or `desc`
    pub sort_direction: Option<String>,
    pub search: Option<String>,
    /// Column name to accepted values (OR within a column, AND across columns)
    pub filters: HashMap<String, Vec<String>>,
}

impl Default for TablePageRequest {
    fn default() -> Self {
        let defaults = TablePageParameter::default();
        Self {
            page_index: defaults.page_index,
            page_size: defaults.page_size,
            sort_by: None,
            sort_direction: None,
            search: None,
            filters: HashMap::new(),
        }
    }
}

fn parse_direction(raw: Option<&str>) -> SortDirection {
    match raw.map(|d| d.trim().to_lowercase()).as_deref() {
        Some("desc") | Some("descending") => SortDirection::Descending,
        _ => SortDirection::Ascending,
    }
}

impl From<TablePageRequest> for TablePageParameter {
    fn from(req: TablePageRequest) -> Self {
        Self {
            page_index: req.page_index,
            page_size: req.page_size,
            sort_direction: parse_direction(req.sort_direction.as_deref()),
            sort_by: req.sort_by,
            search: req.search,
            filters: req.filters,
        }
    }
}

/// One page of rows plus its aggregate counts
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TableResponse<T> {
    pub items: Vec<T>,
    pub page_count: u64,
    pub total_items_count: u64,
}

impl<T, D: From<T>> From<TableInfo<T>> for TableResponse<D> {
    fn from(info: TableInfo<T>) -> Self {
        Self {
            items: info.items.into_iter().map(D::from).collect(),
            page_count: info.page_count,
            total_items_count: info.total_items_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_uses_first_page_defaults() {
        let req: TablePageRequest = serde_json::from_str("{}").unwrap();
        let param = TablePageParameter::from(req);
        assert_eq!(param.page_index, 0);
        assert_eq!(param.page_size, 20);
        assert_eq!(param.sort_direction, SortDirection::Ascending);
        assert!(param.filters.is_empty());
    }

    #[test]
    fn direction_is_case_insensitive() {
        assert_eq!(parse_direction(Some("DESC")), SortDirection::Descending);
        assert_eq!(parse_direction(Some(" descending ")), SortDirection::Descending);
        assert_eq!(parse_direction(Some("asc")), SortDirection::Ascending);
        assert_eq!(parse_direction(Some("sideways")), SortDirection::Ascending);
        assert_eq!(parse_direction(None), SortDirection::Ascending);
    }

    #[test]
    fn filters_pass_through_untouched() {
        let req: TablePageRequest = serde_json::from_value(serde_json::json!({
            "page_size": 5,
            "filters": { "Status": ["sold", ""] }
        }))
        .unwrap();
        let param = TablePageParameter::from(req);
        assert_eq!(param.page_size, 5);
        assert_eq!(param.filters["Status"], vec!["sold".to_string(), String::new()]);
    }

    #[test]
    fn response_maps_rows_and_keeps_counts() {
        let info = TableInfo::new(vec![1u8, 2], 12, 2);
        let resp: TableResponse<u32> = info.into();
        assert_eq!(resp.items, vec![1u32, 2]);
        assert_eq!(resp.page_count, 6);
        assert_eq!(resp.total_items_count, 12);
    }
}
