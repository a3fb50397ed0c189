use super::model::Ticket;
use crate::domain::table::{FilterDef, Predicate, SortSpec, TableSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketField {
    Id,
    Code,
    EventName,
    Venue,
    Seat,
    Price,
    Status,
    CustomerId,
    CardId,
    /// `customer.full_name`
    CustomerFullName,
    /// `customer.phone`
    CustomerPhone,
    /// `card.card_number`
    CardNumber,
    CreatedTime,
    ModifiedTime,
}

pub struct TicketTable;

impl TableSchema for TicketTable {
    type Row = Ticket;
    type Field = TicketField;

    const NAME: &'static str = "Ticket";

    fn filters() -> Vec<FilterDef<TicketField>> {
        vec![
            FilterDef::new("code", |v| Predicate::contains(TicketField::Code, v)),
            FilterDef::new("eventname", |v| Predicate::contains(TicketField::EventName, v)),
            FilterDef::new("venue", |v| Predicate::contains(TicketField::Venue, v)),
            FilterDef::new("seat", |v| Predicate::contains(TicketField::Seat, v)),
            FilterDef::new("status", |v| Predicate::contains(TicketField::Status, v)),
            FilterDef::new("fullname", |v| {
                Predicate::contains(TicketField::CustomerFullName, v)
            }),
            FilterDef::new("phone", |v| Predicate::contains(TicketField::CustomerPhone, v)),
            FilterDef::new("cardnumber", |v| {
                Predicate::contains(TicketField::CardNumber, v)
            }),
        ]
    }

    fn search_fields() -> Vec<TicketField> {
        vec![TicketField::Code, TicketField::EventName, TicketField::Venue]
    }

    fn sort_keys() -> Vec<(&'static str, TicketField)> {
        vec![
            ("code", TicketField::Code),
            ("eventname", TicketField::EventName),
            ("venue", TicketField::Venue),
            ("price", TicketField::Price),
            ("status", TicketField::Status),
            ("createdtime", TicketField::CreatedTime),
            ("modifiedtime", TicketField::ModifiedTime),
        ]
    }

    fn tie_break() -> TicketField {
        TicketField::CreatedTime
    }

    fn default_sort() -> SortSpec<TicketField> {
        SortSpec {
            primary: TicketField::ModifiedTime,
            secondary: TicketField::CreatedTime,
            ascending: false,
        }
    }

    fn includes() -> Vec<&'static str> {
        vec!["customer", "card"]
    }
}
