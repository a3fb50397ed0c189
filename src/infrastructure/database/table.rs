//! Generic paged fetch over SeaORM.
//!
//! A [`SeaOrmTable`] maps an entity's field enum onto SQL expressions; the
//! functions here compile a [`Predicate`] into a `Condition` and run the
//! count, order, skip and take sequence against it.

use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, Order, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};
use tracing::debug;

use crate::domain::table::{Predicate, TableQueryParameter, TableSchema};

pub type ModelOf<T> = <<T as SeaOrmTable>::Entity as EntityTrait>::Model;

/// Storage mapping of a [`TableSchema`].
pub trait SeaOrmTable: TableSchema {
    type Entity: EntityTrait;

    /// Base select, joined to every related table a field refers to
    fn select() -> Select<Self::Entity>;

    fn column(field: Self::Field) -> SimpleExpr;

    /// Stored lower-cased copy of a text field, written with [`fold`] on
    /// every insert and update. `Contains` matches against it.
    fn folded(field: Self::Field) -> Option<SimpleExpr>;

    /// Primary key, the last ordering key so pages never overlap
    fn key() -> SimpleExpr;
}

/// Case folding shared by stored copies and request values.
///
/// SQLite's `LOWER()` only folds ASCII, so text is folded here with full
/// Unicode rules and both sides of a comparison go through this function.
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}

pub fn fold_opt(text: &Option<String>) -> Option<String> {
    text.as_deref().map(fold)
}

/// Table-qualified column reference, safe to use across joins
pub fn qualified<C: ColumnTrait>(column: C) -> SimpleExpr {
    SimpleExpr::Column(column.as_column_ref().into_column_ref())
}

/// Compile a predicate into a SeaORM condition.
///
/// `Contains` is a `LIKE '%value%'` on the folded copy of the field, with
/// the value folded the same way and its wildcards escaped.
pub fn condition<T: SeaOrmTable>(predicate: &Predicate<T::Field>) -> Condition {
    match predicate {
        Predicate::Always => Condition::all(),
        Predicate::Contains { field, value } => {
            Condition::all().add(contains::<T>(*field, value))
        }
        Predicate::Equals { field, value } => {
            Condition::all().add(Expr::expr(T::column(*field)).eq(value.as_str()))
        }
        Predicate::And(items) => items
            .iter()
            .fold(Condition::all(), |acc, p| acc.add(condition::<T>(p))),
        Predicate::Or(items) => items
            .iter()
            .fold(Condition::any(), |acc, p| acc.add(condition::<T>(p))),
    }
}

fn contains<T: SeaOrmTable>(field: T::Field, value: &str) -> SimpleExpr {
    // Fields without a stored copy hold ASCII-only values (enum tags).
    let target = T::folded(field).unwrap_or_else(|| Func::lower(T::column(field)).into());
    let pattern = format!("%{}%", like_escape(&fold(value)));
    Expr::expr(target).like(LikeExpr::new(pattern).escape('\\'))
}

fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Count every match, then fetch the requested page.
///
/// Returns the page's models and the total match count. A page past the
/// end is empty, not an error.
pub async fn fetch_models<T>(
    db: &DatabaseConnection,
    query: &TableQueryParameter<T::Field>,
) -> Result<(Vec<ModelOf<T>>, u64), DbErr>
where
    T: SeaOrmTable,
    ModelOf<T>: Sync,
{
    let select = T::select().filter(condition::<T>(&query.predicate));

    let total = select.clone().count(db).await?;
    if total == 0 || query.pager.offset() >= total {
        debug!(entity = T::NAME, total, offset = query.pager.offset(), "Empty page");
        return Ok((Vec::new(), total));
    }

    let order = if query.sort.ascending {
        Order::Asc
    } else {
        Order::Desc
    };
    let models = select
        .order_by(T::column(query.sort.primary), order.clone())
        .order_by(T::column(query.sort.secondary), order)
        .order_by(T::key(), Order::Asc)
        .offset(query.pager.offset())
        .limit(query.pager.size)
        .all(db)
        .await?;

    Ok((models, total))
}

/// First match in key order
pub async fn find_first<T>(
    db: &DatabaseConnection,
    predicate: &Predicate<T::Field>,
) -> Result<Option<ModelOf<T>>, DbErr>
where
    T: SeaOrmTable,
    ModelOf<T>: Sync,
{
    T::select()
        .filter(condition::<T>(predicate))
        .order_by(T::key(), Order::Asc)
        .one(db)
        .await
}

pub async fn any_match<T>(
    db: &DatabaseConnection,
    predicate: &Predicate<T::Field>,
) -> Result<bool, DbErr>
where
    T: SeaOrmTable,
    ModelOf<T>: Sync,
{
    Ok(T::select()
        .filter(condition::<T>(predicate))
        .count(db)
        .await?
        > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sea_orm::{ActiveModelTrait, Set};

    use crate::domain::customer::{CustomerField, CustomerTable};
    use crate::domain::table::{Pager, SortSpec};
    use crate::infrastructure::database::entities::customer;
    use crate::infrastructure::database::testing::memory_db;

    async fn insert(db: &DatabaseConnection, id: &str, name: &str, address: Option<&str>, minute: u32) {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap();
        customer::ActiveModel {
            id: Set(id.to_string()),
            full_name: Set(name.to_string()),
            phone: Set(None),
            email: Set(None),
            address: Set(address.map(String::from)),
            full_name_folded: Set(fold(name)),
            phone_folded: Set(None),
            email_folded: Set(None),
            address_folded: Set(address.map(fold)),
            created_time: Set(t),
            modified_time: Set(t),
        }
        .insert(db)
        .await
        .unwrap();
    }

    fn query(
        predicate: Predicate<CustomerField>,
        index: u64,
        size: u64,
    ) -> TableQueryParameter<CustomerField> {
        TableQueryParameter {
            pager: Pager { index, size },
            predicate,
            includes: Vec::new(),
            sort: SortSpec {
                primary: CustomerField::FullName,
                secondary: CustomerField::CreatedTime,
                ascending: true,
            },
        }
    }

    fn ids(models: &[customer::Model]) -> Vec<&str> {
        models.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(like_escape("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[tokio::test]
    async fn contains_ignores_case() {
        let db = memory_db().await;
        insert(&db, "c1", "A", Some("Hanoi"), 0).await;
        insert(&db, "c2", "B", Some("HANOI"), 1).await;
        insert(&db, "c3", "C", Some("Saigon"), 2).await;
        insert(&db, "c4", "D", None, 3).await;

        let q = query(Predicate::contains(CustomerField::Address, "hanoi"), 0, 10);
        let (models, total) = fetch_models::<CustomerTable>(&db, &q).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(ids(&models), vec!["c1", "c2"]);
    }

    #[tokio::test]
    async fn contains_folds_non_ascii_text() {
        let db = memory_db().await;
        insert(&db, "c1", "Nguyễn Văn A", Some("HÀ NỘI"), 0).await;
        insert(&db, "c2", "Trần Thị B", Some("Hà Nội"), 1).await;
        insert(&db, "c3", "Lê C", Some("Đà Nẵng"), 2).await;

        let q = query(Predicate::contains(CustomerField::Address, "hà nội"), 0, 10);
        let (models, total) = fetch_models::<CustomerTable>(&db, &q).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(ids(&models), vec!["c1", "c2"]);

        let q = query(Predicate::contains(CustomerField::FullName, "NGUYỄN"), 0, 10);
        let (models, _) = fetch_models::<CustomerTable>(&db, &q).await.unwrap();
        assert_eq!(ids(&models), vec!["c1"]);

        let q = query(Predicate::contains(CustomerField::Address, "đà"), 0, 10);
        let (models, _) = fetch_models::<CustomerTable>(&db, &q).await.unwrap();
        assert_eq!(ids(&models), vec!["c3"]);
    }

    #[test]
    fn fold_handles_unicode_case() {
        assert_eq!(fold("HÀ NỘI"), "hà nội");
        assert_eq!(fold_opt(&Some("ĐÀ NẴNG".into())), Some("đà nẵng".into()));
        assert_eq!(fold_opt(&None), None);
    }

    #[tokio::test]
    async fn percent_in_value_is_literal() {
        let db = memory_db().await;
        insert(&db, "c1", "100% Fan", None, 0).await;
        insert(&db, "c2", "1000 Fans", None, 1).await;

        let q = query(Predicate::contains(CustomerField::FullName, "100%"), 0, 10);
        let (models, _) = fetch_models::<CustomerTable>(&db, &q).await.unwrap();
        assert_eq!(ids(&models), vec!["c1"]);
    }

    #[tokio::test]
    async fn total_counts_every_match_not_just_the_page() {
        let db = memory_db().await;
        for i in 0..25 {
            insert(&db, &format!("c{:02}", i), &format!("Name {:02}", i), None, i).await;
        }

        let (models, total) = fetch_models::<CustomerTable>(&db, &query(Predicate::Always, 2, 10))
            .await
            .unwrap();
        assert_eq!(total, 25);
        assert_eq!(models.len(), 5);
        assert_eq!(models[0].full_name, "Name 20");
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let db = memory_db().await;
        insert(&db, "c1", "A", None, 0).await;

        let (models, total) = fetch_models::<CustomerTable>(&db, &query(Predicate::Always, 5, 10))
            .await
            .unwrap();
        assert!(models.is_empty());
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn huge_page_index_reads_as_past_the_end() {
        let db = memory_db().await;
        insert(&db, "c1", "A", None, 0).await;

        let (models, total) =
            fetch_models::<CustomerTable>(&db, &query(Predicate::Always, u64::MAX, 500))
                .await
                .unwrap();
        assert!(models.is_empty());
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn ties_are_broken_by_key_so_pages_never_overlap() {
        let db = memory_db().await;
        // Same name and timestamp everywhere: only the key distinguishes rows.
        for id in ["k3", "k1", "k5", "k2", "k4"] {
            insert(&db, id, "Same", None, 0).await;
        }

        let mut seen = Vec::new();
        for index in 0..3 {
            let (models, _) =
                fetch_models::<CustomerTable>(&db, &query(Predicate::Always, index, 2))
                    .await
                    .unwrap();
            seen.extend(models.into_iter().map(|m| m.id));
        }
        assert_eq!(seen, vec!["k1", "k2", "k3", "k4", "k5"]);
    }

    #[tokio::test]
    async fn or_and_equals_compile() {
        let db = memory_db().await;
        insert(&db, "c1", "Alpha", Some("Hue"), 0).await;
        insert(&db, "c2", "Beta", Some("Hanoi"), 1).await;
        insert(&db, "c3", "Gamma", Some("Hue"), 2).await;

        let predicate = Predicate::any_of(vec![
            Predicate::equals(CustomerField::Id, "c1"),
            Predicate::contains(CustomerField::Address, "noi"),
        ]);
        let (models, _) = fetch_models::<CustomerTable>(&db, &query(predicate, 0, 10))
            .await
            .unwrap();
        assert_eq!(ids(&models), vec!["c1", "c2"]);

        assert!(any_match::<CustomerTable>(&db, &Predicate::equals(CustomerField::Id, "c3"))
            .await
            .unwrap());
        assert!(find_first::<CustomerTable>(&db, &Predicate::equals(CustomerField::Id, "zz"))
            .await
            .unwrap()
            .is_none());
    }
}
