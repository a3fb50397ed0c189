//! Composable predicates over an entity's fields.
//!
//! `F` is the entity's field enum. Predicates are data, not closures, so
//! the storage layer can compile them into its own query language.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate<F> {
    /// Matches every record
    Always,
    /// Case-insensitive substring match on a text field
    Contains { field: F, value: String },
    /// Exact match
    Equals { field: F, value: String },
    And(Vec<Predicate<F>>),
    Or(Vec<Predicate<F>>),
}

impl<F> Predicate<F> {
    pub fn always() -> Self {
        Predicate::Always
    }

    pub fn contains(field: F, value: impl Into<String>) -> Self {
        Predicate::Contains {
            field,
            value: value.into(),
        }
    }

    pub fn equals(field: F, value: impl Into<String>) -> Self {
        Predicate::Equals {
            field,
            value: value.into(),
        }
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Predicate::Always)
    }

    /// Logical AND. `Always` is the identity and nested ANDs are flattened.
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Predicate::Always, p) | (p, Predicate::Always) => p,
            (Predicate::And(mut left), Predicate::And(right)) => {
                left.extend(right);
                Predicate::And(left)
            }
            (Predicate::And(mut left), p) => {
                left.push(p);
                Predicate::And(left)
            }
            (p, Predicate::And(mut right)) => {
                right.insert(0, p);
                Predicate::And(right)
            }
            (left, right) => Predicate::And(vec![left, right]),
        }
    }

    /// AND over all items; an empty set is `Always`.
    pub fn all_of(items: impl IntoIterator<Item = Self>) -> Self {
        items
            .into_iter()
            .fold(Predicate::Always, |acc, p| acc.and(p))
    }

    /// OR over all items.
    ///
    /// An empty set imposes no restriction and yields `Always`, as does
    /// any set containing `Always`.
    pub fn any_of(items: impl IntoIterator<Item = Self>) -> Self {
        let mut items: Vec<Self> = items.into_iter().collect();
        if items.is_empty() || items.iter().any(Predicate::is_always) {
            return Predicate::Always;
        }
        if items.len() == 1 {
            return items.remove(0);
        }
        Predicate::Or(items)
    }
}

impl<F> Default for Predicate<F> {
    fn default() -> Self {
        Predicate::Always
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Field {
        Name,
        City,
    }

    #[test]
    fn always_is_identity_for_and() {
        let p = Predicate::contains(Field::Name, "an");
        assert_eq!(Predicate::always().and(p.clone()), p);
        assert_eq!(p.clone().and(Predicate::always()), p);
    }

    #[test]
    fn nested_and_is_flattened() {
        let p = Predicate::contains(Field::Name, "a")
            .and(Predicate::contains(Field::City, "b"))
            .and(Predicate::contains(Field::Name, "c"));
        match p {
            Predicate::And(items) => assert_eq!(items.len(), 3),
            other => panic!("expected And, got {:?}", other),
        }
    }

    #[test]
    fn empty_all_of_matches_everything() {
        let p: Predicate<Field> = Predicate::all_of(Vec::new());
        assert!(p.is_always());
    }

    #[test]
    fn any_of_single_item_is_unwrapped() {
        let p = Predicate::any_of(vec![Predicate::contains(Field::City, "hanoi")]);
        assert_eq!(p, Predicate::contains(Field::City, "hanoi"));
    }

    #[test]
    fn any_of_with_always_is_always() {
        let p = Predicate::any_of(vec![
            Predicate::contains(Field::City, "hanoi"),
            Predicate::Always,
        ]);
        assert!(p.is_always());
    }
}
