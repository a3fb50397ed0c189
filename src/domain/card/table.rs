use super::model::Card;
use crate::domain::table::{FilterDef, Predicate, SortSpec, TableSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Id,
    CardNumber,
    CardType,
    CustomerId,
    /// `customer.full_name`
    CustomerFullName,
    /// `customer.phone`
    CustomerPhone,
    ExpiresTime,
    CreatedTime,
    ModifiedTime,
}

pub struct CardTable;

impl TableSchema for CardTable {
    type Row = Card;
    type Field = CardField;

    const NAME: &'static str = "Card";

    fn filters() -> Vec<FilterDef<CardField>> {
        vec![
            FilterDef::new("cardnumber", |v| Predicate::contains(CardField::CardNumber, v)),
            FilterDef::new("cardtype", |v| Predicate::contains(CardField::CardType, v)),
            FilterDef::new("fullname", |v| {
                Predicate::contains(CardField::CustomerFullName, v)
            }),
            FilterDef::new("phone", |v| Predicate::contains(CardField::CustomerPhone, v)),
        ]
    }

    fn search_fields() -> Vec<CardField> {
        vec![CardField::CardNumber, CardField::CustomerFullName]
    }

    fn sort_keys() -> Vec<(&'static str, CardField)> {
        vec![
            ("cardnumber", CardField::CardNumber),
            ("cardtype", CardField::CardType),
            ("expirestime", CardField::ExpiresTime),
            ("createdtime", CardField::CreatedTime),
            ("modifiedtime", CardField::ModifiedTime),
        ]
    }

    fn tie_break() -> CardField {
        CardField::CreatedTime
    }

    fn default_sort() -> SortSpec<CardField> {
        SortSpec {
            primary: CardField::ModifiedTime,
            secondary: CardField::CreatedTime,
            ascending: false,
        }
    }

    fn includes() -> Vec<&'static str> {
        vec!["customer"]
    }
}
