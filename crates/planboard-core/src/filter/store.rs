// ── Query-backed filter store ──
//
// The query text is the only state. Every read parses it fresh and
// every write re-encodes it, so a snapshot can never drift from the
// address bar.

use tracing::trace;

use super::{FilterState, parse_query};

/// Owner of the canonical query text for one view of the dashboard.
///
/// Single writer, synchronous: each mutation is applied before the next
/// read, so no locking is involved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterStateStore {
    query: String,
}

impl FilterStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt existing query text (e.g. from a bookmarked URL).
    ///
    /// The text is normalized immediately so [`query`](Self::query)
    /// always returns what the store itself would have produced.
    pub fn from_query(query: &str) -> Self {
        Self {
            query: parse_query(query).to_query(),
        }
    }

    /// Current query text, without a leading `?`.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Parse the current text into a fresh snapshot.
    pub fn read(&self) -> FilterState {
        parse_query(&self.query)
    }

    /// Set `key` to `value`, or remove it when `value` is `None` or empty.
    /// Returns the new query text.
    pub fn set(&mut self, key: &str, value: Option<&str>) -> &str {
        let next = self.read().with(key, value);
        self.write(&next)
    }

    pub fn remove(&mut self, key: &str) -> &str {
        self.set(key, None)
    }

    /// Drop every key.
    pub fn clear(&mut self) -> &str {
        self.query.clear();
        trace!("filter state cleared");
        &self.query
    }

    /// Replace the whole state. Used when navigating to a saved view:
    /// nothing from the previous state survives.
    pub fn replace_all(&mut self, state: &FilterState) -> &str {
        self.write(state)
    }

    /// Recomputed from the text on every call.
    pub fn active_filter_count(&self) -> usize {
        self.read().active_filter_count()
    }

    fn write(&mut self, state: &FilterState) -> &str {
        self.query = state.to_query();
        trace!(query = %self.query, "filter state updated");
        &self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn set_then_read() {
        let mut store = FilterStateStore::new();
        store.set("status", Some("blocked"));
        assert_eq!(store.read().get("status"), Some("blocked"));
        assert_eq!(store.query(), "status=blocked");
    }

    #[test]
    fn set_empty_removes_key() {
        let mut store = FilterStateStore::from_query("status=blocked&module=demand_planning");
        assert_eq!(store.set("status", Some("")), "module=demand_planning");
        assert_eq!(store.set("module", None), "");
    }

    #[test]
    fn earlier_snapshots_are_not_affected() {
        let mut store = FilterStateStore::from_query("status=open");
        let before = store.read();
        store.set("status", Some("blocked"));
        store.clear();
        assert_eq!(before.get("status"), Some("open"));
        assert!(store.read().is_empty());
    }

    #[test]
    fn clear_empties_query() {
        let mut store = FilterStateStore::from_query("?status=blocked&sort=aging");
        assert_eq!(store.clear(), "");
        assert_eq!(store.active_filter_count(), 0);
    }

    #[test]
    fn active_count_tracks_mutations() {
        let mut store = FilterStateStore::from_query("status=blocked&sort=aging&order=desc");
        assert_eq!(store.active_filter_count(), 1);
        store.set("module", Some("supply_planning"));
        assert_eq!(store.active_filter_count(), 2);
        store.remove("status");
        assert_eq!(store.active_filter_count(), 1);
    }

    #[test]
    fn replace_all_does_not_merge() {
        let mut store = FilterStateStore::from_query("module=demand_planning&owner=ana");
        let target: FilterState = [("status", "blocked")].into_iter().collect();
        store.replace_all(&target);
        assert_eq!(store.read(), target);
    }

    #[test]
    fn from_query_normalizes_text() {
        let store = FilterStateStore::from_query("?status=open,blocked&status=at_risk&empty=");
        assert_eq!(store.query(), "status=at_risk");
    }

    proptest! {
        #[test]
        fn prop_set_is_visible_to_read(
            start in prop::collection::vec(("[a-z_]{1,8}", "[a-z0-9,_ ]{1,12}"), 0..6),
            key in "[a-z_]{1,8}",
            value in "[a-zA-Z0-9,&=%+ _-]{1,16}",
        ) {
            let initial: FilterState = start.into_iter().collect();
            let mut store = FilterStateStore::from_query(&initial.to_query());

            store.set(&key, Some(&value));
            let after = store.read();
            prop_assert_eq!(after.get(&key), Some(value.as_str()));

            // Idempotent both ways.
            store.set(&key, Some(&value));
            prop_assert_eq!(store.read(), after);
            store.set(&key, None);
            prop_assert!(!store.read().contains_key(&key));
            store.set(&key, None);
            prop_assert!(!store.read().contains_key(&key));
        }

        #[test]
        fn prop_round_trip_through_text(
            pairs in prop::collection::vec(("[a-z_]{1,8}", "[ -~]{1,12}"), 0..6),
        ) {
            let state: FilterState = pairs.into_iter().collect();
            let store = FilterStateStore::from_query(&state.to_query());
            prop_assert_eq!(store.read(), state);
        }
    }
}
