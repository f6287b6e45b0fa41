//! Keyed insert-or-overwrite with a tagged outcome.
//!
//! Both derived tables share the same write discipline: look the row up by
//! its composite key, mutate it in place if it exists, construct and insert
//! it otherwise, and tell the caller which branch ran. This module holds that
//! branch once so the two write paths cannot drift apart.

/// Outcome of an upsert, tagged with the previous value on overwrite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Upsert<V> {
    /// No row existed at the key; a new one was inserted.
    Created,
    /// A row existed and was overwritten in place.
    Updated { previous: V },
}

impl<V: Copy> Upsert<V> {
    /// The overwritten value, if the update branch ran.
    pub fn previous(&self) -> Option<V> {
        match self {
            Upsert::Created => None,
            Upsert::Updated { previous } => Some(*previous),
        }
    }
}

impl<V> Upsert<V> {
    /// True if a new row was inserted.
    pub fn is_created(&self) -> bool {
        matches!(self, Upsert::Created)
    }

    /// Stable label for callers that report the branch.
    pub fn operation(&self) -> &'static str {
        match self {
            Upsert::Created => "create",
            Upsert::Updated { .. } => "update",
        }
    }
}

impl Upsert<f64> {
    /// Change relative to the overwritten value; `None` on create.
    pub fn delta(&self, current: f64) -> Option<f64> {
        self.previous().map(|previous| current - previous)
    }
}

/// Write policy for operations that upsert a derived row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertMode {
    /// Insert if absent, overwrite if present.
    CreateOrUpdate,
    /// Overwrite only; the caller reports not-found when the row is absent.
    UpdateOnly,
}

/// Run the upsert branch for a looked-up row.
///
/// `revise` mutates the existing row in place and returns the value being
/// overwritten; `fresh` constructs the row for the insert branch. Either way
/// the row is handed to `persist` and returned alongside the tagged outcome.
pub(crate) fn upsert<T, V, E>(
    existing: Option<T>,
    fresh: impl FnOnce() -> T,
    revise: impl FnOnce(&mut T) -> V,
    persist: impl FnOnce(&T) -> Result<(), E>,
) -> Result<(T, Upsert<V>), E> {
    match existing {
        Some(mut row) => {
            let previous = revise(&mut row);
            persist(&row)?;
            Ok((row, Upsert::Updated { previous }))
        }
        None => {
            let row = fresh();
            persist(&row)?;
            Ok((row, Upsert::Created))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    #[test]
    fn inserts_when_absent() {
        let (row, outcome) = upsert(
            None::<i64>,
            || 42,
            |r| std::mem::replace(r, 42),
            |_| Ok::<_, Infallible>(()),
        )
        .unwrap();
        assert_eq!(row, 42);
        assert!(outcome.is_created());
        assert_eq!(outcome.previous(), None);
        assert_eq!(outcome.operation(), "create");
    }

    #[test]
    fn overwrites_and_reports_previous_when_present() {
        let (row, outcome) = upsert(
            Some(7i64),
            || 42,
            |r| std::mem::replace(r, 42),
            |_| Ok::<_, Infallible>(()),
        )
        .unwrap();
        assert_eq!(row, 42);
        assert_eq!(outcome.previous(), Some(7));
        assert_eq!(outcome.operation(), "update");
    }

    #[test]
    fn delta_is_relative_to_previous() {
        let updated = Upsert::Updated { previous: 80.0 };
        assert_eq!(updated.delta(84.0), Some(4.0));
        assert_eq!(Upsert::Created.delta(84.0), None);
    }
}
