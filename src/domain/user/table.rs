use super::model::User;
use crate::domain::table::{FilterDef, Predicate, SortSpec, TableSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Id,
    Username,
    Email,
    FullName,
    RoleId,
    /// `role.name`
    RoleName,
    CreatedTime,
    ModifiedTime,
}

pub struct UserTable;

impl TableSchema for UserTable {
    type Row = User;
    type Field = UserField;

    const NAME: &'static str = "User";

    fn filters() -> Vec<FilterDef<UserField>> {
        vec![
            FilterDef::new("username", |v| Predicate::contains(UserField::Username, v)),
            FilterDef::new("email", |v| Predicate::contains(UserField::Email, v)),
            FilterDef::new("fullname", |v| Predicate::contains(UserField::FullName, v)),
            FilterDef::new("rolename", |v| Predicate::contains(UserField::RoleName, v)),
        ]
    }

    fn search_fields() -> Vec<UserField> {
        vec![UserField::Username, UserField::Email, UserField::FullName]
    }

    fn sort_keys() -> Vec<(&'static str, UserField)> {
        vec![
            ("username", UserField::Username),
            ("email", UserField::Email),
            ("fullname", UserField::FullName),
            ("createdtime", UserField::CreatedTime),
            ("modifiedtime", UserField::ModifiedTime),
        ]
    }

    fn tie_break() -> UserField {
        UserField::CreatedTime
    }

    fn default_sort() -> SortSpec<UserField> {
        SortSpec {
            primary: UserField::ModifiedTime,
            secondary: UserField::CreatedTime,
            ascending: false,
        }
    }

    fn includes() -> Vec<&'static str> {
        vec!["role"]
    }
}
