// ── Filter state ──
//
// A `FilterState` is a point-in-time view over query text. It is never
// mutated in place: every change produces a new snapshot and new text.

mod query;
mod store;

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

pub use query::{encode_query, parse_query};
pub use store::FilterStateStore;

/// Key that names the sort field.
pub const SORT_KEY: &str = "sort";
/// Key that names the sort direction.
pub const ORDER_KEY: &str = "order";

// ── FilterKey ───────────────────────────────────────────────────────

/// A query key, split into the reserved ordering keys and everything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Sort,
    Order,
    Field(String),
}

impl FilterKey {
    pub fn parse(raw: &str) -> Self {
        match raw {
            SORT_KEY => Self::Sort,
            ORDER_KEY => Self::Order,
            other => Self::Field(other.to_owned()),
        }
    }

    /// Reserved keys describe ordering, not filtering.
    pub fn is_reserved(&self) -> bool {
        matches!(self, Self::Sort | Self::Order)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Sort => SORT_KEY,
            Self::Order => ORDER_KEY,
            Self::Field(name) => name,
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Sorting ─────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Typed reading of the `sort` / `order` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

// ── FilterState ─────────────────────────────────────────────────────

/// Immutable snapshot of active filters, keyed by query key.
///
/// Equality treats the state as a set of pairs: `IndexMap` compares as a
/// map, so insertion order never affects `==`. Insertion order is kept
/// only so re-encoded text stays stable for the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, String>", into = "IndexMap<String, String>")]
pub struct FilterState {
    pairs: IndexMap<String, String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.keys().map(String::as_str)
    }

    /// Number of keys that filter rows, ignoring `sort` and `order`.
    pub fn active_filter_count(&self) -> usize {
        self.pairs
            .keys()
            .filter(|key| !FilterKey::parse(key).is_reserved())
            .count()
    }

    /// Return a new snapshot with `key` set, or removed when `value` is
    /// `None` or empty.
    pub fn with(&self, key: &str, value: Option<&str>) -> Self {
        let mut next = self.clone();
        match value {
            Some(v) if !v.is_empty() && !key.is_empty() => {
                next.pairs.insert(key.to_owned(), v.to_owned());
            }
            _ => {
                next.pairs.shift_remove(key);
            }
        }
        next
    }

    /// Return a new snapshot without `key`.
    pub fn without(&self, key: &str) -> Self {
        self.with(key, None)
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.get(ORDER_KEY)?.parse().ok()
    }

    /// The sort field and direction, if a `sort` key is present.
    /// Direction falls back to ascending when `order` is absent or unknown.
    pub fn sort(&self) -> Option<SortSpec> {
        let field = self.get(SORT_KEY)?;
        Some(SortSpec {
            field: field.to_owned(),
            direction: self.direction().unwrap_or_default(),
        })
    }

    /// Query text in insertion order.
    pub fn to_query(&self) -> String {
        encode_query(self.iter())
    }

    /// Order-independent encoding used for equality between states.
    ///
    /// Keys are sorted; values are compared as opaque strings, so
    /// `status=open,blocked` and `status=blocked,open` are different.
    pub fn canonical(&self) -> String {
        let mut pairs: Vec<(&str, &str)> = self.iter().collect();
        pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
        encode_query(pairs)
    }
}

impl<K, V> FromIterator<(K, V)> for FilterState
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut pairs = IndexMap::new();
        for (key, value) in iter {
            let (key, value): (String, String) = (key.into(), value.into());
            if key.is_empty() || value.is_empty() {
                continue;
            }
            pairs.insert(key, value);
        }
        Self { pairs }
    }
}

impl From<IndexMap<String, String>> for FilterState {
    fn from(map: IndexMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<FilterState> for IndexMap<String, String> {
    fn from(state: FilterState) -> Self {
        state.pairs
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state(pairs: &[(&str, &str)]) -> FilterState {
        pairs.iter().copied().collect()
    }

    #[test]
    fn reserved_keys() {
        assert!(FilterKey::parse("sort").is_reserved());
        assert!(FilterKey::parse("order").is_reserved());
        assert!(!FilterKey::parse("status").is_reserved());
        assert!(!FilterKey::parse("Sort").is_reserved());
    }

    #[test]
    fn active_count_ignores_sort_and_order() {
        let s = state(&[("status", "blocked"), ("sort", "aging"), ("order", "desc")]);
        assert_eq!(s.active_filter_count(), 1);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn with_inserts_and_overwrites() {
        let s = FilterState::new().with("status", Some("open"));
        let s = s.with("status", Some("blocked"));
        assert_eq!(s.get("status"), Some("blocked"));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn with_none_or_empty_removes() {
        let s = state(&[("status", "open"), ("module", "demand_planning")]);
        assert!(!s.with("status", None).contains_key("status"));
        assert!(!s.with("status", Some("")).contains_key("status"));
        assert_eq!(s.without("absent"), s);
    }

    #[test]
    fn with_leaves_original_snapshot_untouched() {
        let before = state(&[("status", "open")]);
        let _after = before.with("status", Some("blocked"));
        assert_eq!(before.get("status"), Some("open"));
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a = state(&[("module", "demand_planning"), ("status", "blocked")]);
        let b = state(&[("status", "blocked"), ("module", "demand_planning")]);
        assert_eq!(a, b);
        assert_eq!(a.canonical(), b.canonical());
        assert_ne!(a.to_query(), b.to_query());
    }

    #[test]
    fn canonical_keeps_comma_lists_opaque() {
        let a = state(&[("status", "open,blocked")]);
        let b = state(&[("status", "blocked,open")]);
        assert_ne!(a.canonical(), b.canonical());
    }

    #[test]
    fn sort_defaults_to_ascending() {
        let s = state(&[("sort", "aging")]);
        assert_eq!(
            s.sort(),
            Some(SortSpec {
                field: "aging".into(),
                direction: SortDirection::Asc,
            })
        );

        let s = s.with("order", Some("sideways"));
        assert_eq!(s.direction(), None);
        assert_eq!(s.sort().unwrap().direction, SortDirection::Asc);

        let s = s.with("order", Some("desc"));
        assert_eq!(s.sort().unwrap().direction, SortDirection::Desc);
    }

    #[test]
    fn order_without_sort_is_not_a_sort() {
        assert_eq!(state(&[("order", "desc")]).sort(), None);
    }

    #[test]
    fn serde_round_trips_as_a_map() {
        let s = state(&[("status", "blocked"), ("sort", "aging")]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"status":"blocked","sort":"aging"}"#);

        let back: FilterState = serde_json::from_str(r#"{"status":"","module":"x"}"#).unwrap();
        assert_eq!(back, state(&[("module", "x")]));
    }
}
