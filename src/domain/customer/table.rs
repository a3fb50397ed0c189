use super::model::Customer;
use crate::domain::table::{FilterDef, Predicate, SortSpec, TableSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    Id,
    FullName,
    Phone,
    Email,
    Address,
    CreatedTime,
    ModifiedTime,
}

pub struct CustomerTable;

impl TableSchema for CustomerTable {
    type Row = Customer;
    type Field = CustomerField;

    const NAME: &'static str = "Customer";

    fn filters() -> Vec<FilterDef<CustomerField>> {
        vec![
            FilterDef::new("fullname", |v| Predicate::contains(CustomerField::FullName, v)),
            FilterDef::new("phone", |v| Predicate::contains(CustomerField::Phone, v)),
            FilterDef::new("email", |v| Predicate::contains(CustomerField::Email, v)),
            FilterDef::new("address", |v| Predicate::contains(CustomerField::Address, v)),
        ]
    }

    fn search_fields() -> Vec<CustomerField> {
        vec![
            CustomerField::FullName,
            CustomerField::Phone,
            CustomerField::Email,
        ]
    }

    fn sort_keys() -> Vec<(&'static str, CustomerField)> {
        vec![
            ("fullname", CustomerField::FullName),
            ("phone", CustomerField::Phone),
            ("email", CustomerField::Email),
            ("createdtime", CustomerField::CreatedTime),
            ("modifiedtime", CustomerField::ModifiedTime),
        ]
    }

    fn tie_break() -> CustomerField {
        CustomerField::CreatedTime
    }

    fn default_sort() -> SortSpec<CustomerField> {
        SortSpec {
            primary: CustomerField::ModifiedTime,
            secondary: CustomerField::CreatedTime,
            ascending: false,
        }
    }
}
