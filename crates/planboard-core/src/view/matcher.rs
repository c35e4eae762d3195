// ── Active view resolution ──
//
// Decides which saved view, if any, the current filter state selects,
// and builds the navigation targets for the view switcher.

use serde::Serialize;
use tracing::debug;

use super::{EntityDomain, SavedView, SavedViewRegistry};
use crate::filter::{FilterState, FilterStateStore, parse_query};

/// Outcome of matching a filter state against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "view", rename_all = "lowercase")]
pub enum ActiveView<'a> {
    /// No filters at all.
    All,
    /// The first view in registry order whose filters equal the state.
    Saved(&'a SavedView),
    /// Filters are present but no saved view matches them.
    Custom,
}

impl ActiveView<'_> {
    /// Short identifier: `all`, the view id, or `custom`.
    pub fn id(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Saved(view) => &view.id,
            Self::Custom => "custom",
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Matches filter states against a registry for one base path.
#[derive(Debug, Clone, Copy)]
pub struct ViewMatcher<'a> {
    registry: &'a SavedViewRegistry,
    base_path: &'a str,
}

impl<'a> ViewMatcher<'a> {
    pub fn new(registry: &'a SavedViewRegistry, base_path: &'a str) -> Self {
        Self {
            registry,
            base_path,
        }
    }

    pub fn registry(&self) -> &'a SavedViewRegistry {
        self.registry
    }

    pub fn base_path(&self) -> &'a str {
        self.base_path
    }

    /// Resolve the active view for `entity`.
    ///
    /// Comparison is on canonical encodings: key order is irrelevant, but
    /// comma-joined values are compared as opaque strings. Reordering
    /// `open,blocked` to `blocked,open` stops a view from matching.
    pub fn active(&self, entity: EntityDomain, state: &FilterState) -> ActiveView<'a> {
        if state.is_empty() {
            return ActiveView::All;
        }

        let canonical = state.canonical();
        let found = self
            .registry
            .for_entity(entity)
            .find(|view| view.filters.canonical() == canonical);

        match found {
            Some(view) => {
                debug!(view = %view.id, %entity, "saved view active");
                ActiveView::Saved(view)
            }
            None => {
                debug!(%entity, filters = %canonical, "no saved view matches");
                ActiveView::Custom
            }
        }
    }

    /// Resolve directly from query text.
    pub fn active_for_query(&self, entity: EntityDomain, query: &str) -> ActiveView<'a> {
        self.active(entity, &parse_query(query))
    }

    /// "All" is active iff there is nothing in the query text.
    pub fn is_all_active(state: &FilterState) -> bool {
        state.is_empty()
    }

    /// Whether `view` is the one [`active`](Self::active) would pick.
    ///
    /// Returns `false` for a view shadowed by an earlier duplicate.
    pub fn is_active(&self, view: &SavedView, state: &FilterState) -> bool {
        match self.active(view.entity, state) {
            ActiveView::Saved(active) => active.id == view.id,
            ActiveView::All | ActiveView::Custom => false,
        }
    }

    /// Navigation target for the unfiltered list.
    pub fn all_href(&self) -> String {
        self.base_path.to_owned()
    }

    /// Navigation target for `view`: `base_path?query`.
    pub fn href(&self, view: &SavedView) -> String {
        let query = view.query();
        if query.is_empty() {
            self.all_href()
        } else {
            format!("{}?{query}", self.base_path)
        }
    }

    /// Apply `view` to `store`, replacing whatever was there.
    pub fn navigate<'s>(&self, store: &'s mut FilterStateStore, view: &SavedView) -> &'s str {
        debug!(view = %view.id, "navigating to saved view");
        store.replace_all(&view.filters)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use pretty_assertions::assert_eq;

    fn state(pairs: &[(&str, &str)]) -> FilterState {
        pairs.iter().copied().collect()
    }

    #[test]
    fn empty_state_is_all_and_nothing_else() {
        let registry = SavedViewRegistry::builtin();
        let matcher = ViewMatcher::new(&registry, "/objects");
        let empty = FilterState::new();

        assert_eq!(matcher.active(EntityDomain::Objects, &empty), ActiveView::All);
        assert_eq!(matcher.active(EntityDomain::Issues, &empty), ActiveView::All);
        assert!(ViewMatcher::is_all_active(&empty));
        for view in &registry {
            assert!(!matcher.is_active(view, &empty), "{} matched empty", view.id);
        }
    }

    #[test]
    fn exact_match_selects_view() {
        let registry = SavedViewRegistry::builtin();
        let matcher = ViewMatcher::new(&registry, "/objects");
        let active = matcher.active_for_query(EntityDomain::Objects, "status=blocked");
        assert_eq!(active.id(), "blocked");
    }

    #[test]
    fn entity_domain_scopes_matching() {
        let registry = SavedViewRegistry::builtin();
        let matcher = ViewMatcher::new(&registry, "/issues");
        let active = matcher.active_for_query(EntityDomain::Issues, "status=blocked");
        assert_eq!(active.id(), "issues_blocked");

        let active = matcher.active_for_query(EntityDomain::Issues, "module=demand_planning");
        assert_eq!(active, ActiveView::Custom);
    }

    #[test]
    fn key_order_does_not_matter() {
        let view = SavedView::new(
            "dp_blocked",
            "DP Blocked",
            EntityDomain::Objects,
            [("status", "blocked"), ("module", "demand_planning")],
        );
        let registry = SavedViewRegistry::from_views([view]).unwrap();
        let matcher = ViewMatcher::new(&registry, "/objects");

        let current = state(&[("module", "demand_planning"), ("status", "blocked")]);
        assert_eq!(matcher.active(EntityDomain::Objects, &current).id(), "dp_blocked");
    }

    #[test]
    fn sort_only_view_matches() {
        let registry = SavedViewRegistry::builtin();
        let matcher = ViewMatcher::new(&registry, "/objects");
        let active = matcher.active_for_query(EntityDomain::Objects, "order=desc&sort=aging");
        assert_eq!(active.id(), "stale");
    }

    #[test]
    fn extra_key_means_custom() {
        let registry = SavedViewRegistry::builtin();
        let matcher = ViewMatcher::new(&registry, "/objects");
        let active = matcher.active_for_query(EntityDomain::Objects, "status=blocked&owner=ana");
        assert_eq!(active, ActiveView::Custom);
    }

    #[test]
    fn comma_lists_match_only_verbatim() {
        let registry = SavedViewRegistry::builtin();
        let matcher = ViewMatcher::new(&registry, "/issues");

        let exact =
            matcher.active_for_query(EntityDomain::Issues, "status=open,in_progress,blocked");
        assert_eq!(exact.id(), "issues_open");

        let encoded =
            matcher.active_for_query(EntityDomain::Issues, "status=open%2Cin_progress%2Cblocked");
        assert_eq!(encoded.id(), "issues_open");

        let reordered =
            matcher.active_for_query(EntityDomain::Issues, "status=blocked,open,in_progress");
        assert_eq!(reordered, ActiveView::Custom);
    }

    #[test]
    fn first_duplicate_in_registry_order_wins() {
        let first = SavedView::new("first", "First", EntityDomain::Objects, [("owner", "ana")]);
        let second = SavedView::new("second", "Second", EntityDomain::Objects, [("owner", "ana")]);
        let registry = SavedViewRegistry::from_views([first, second]).unwrap();
        let matcher = ViewMatcher::new(&registry, "/objects");

        let current = state(&[("owner", "ana")]);
        assert_eq!(matcher.active(EntityDomain::Objects, &current).id(), "first");
        assert!(matcher.is_active(registry.get("first").unwrap(), &current));
        assert!(!matcher.is_active(registry.get("second").unwrap(), &current));
    }

    #[test]
    fn href_renders_base_path_and_query() {
        let registry = SavedViewRegistry::builtin();
        let matcher = ViewMatcher::new(&registry, "/objects");

        assert_eq!(matcher.all_href(), "/objects");
        assert_eq!(
            matcher.href(registry.get("stale").unwrap()),
            "/objects?sort=aging&order=desc"
        );
        assert_eq!(
            matcher.href(registry.get("issues_open").unwrap()),
            "/objects?status=open%2Cin_progress%2Cblocked"
        );
    }

    #[test]
    fn navigate_replaces_and_reactivates() {
        let registry = SavedViewRegistry::builtin();
        let matcher = ViewMatcher::new(&registry, "/objects");
        let mut store = FilterStateStore::from_query("owner=ana&status=open");

        let view = registry.require("demand_planning").unwrap();
        assert_eq!(matcher.navigate(&mut store, view), "module=demand_planning");
        assert_eq!(
            matcher.active(EntityDomain::Objects, &store.read()).id(),
            "demand_planning"
        );

        store.clear();
        assert!(matcher.active(EntityDomain::Objects, &store.read()).is_all());
    }

    #[test]
    fn missing_view_is_an_error_not_a_match() {
        let registry = SavedViewRegistry::builtin();
        assert!(matches!(
            registry.require("ghost"),
            Err(CoreError::ViewNotFound { .. })
        ));
    }

    #[test]
    fn active_view_serializes_with_kind() {
        let registry = SavedViewRegistry::builtin();
        let matcher = ViewMatcher::new(&registry, "/objects");
        let active = matcher.active_for_query(EntityDomain::Objects, "status=at_risk");
        insta::assert_json_snapshot!(active, @r#"
        {
          "kind": "saved",
          "view": {
            "id": "at_risk",
            "label": "At Risk",
            "entity": "objects",
            "filters": {
              "status": "at_risk"
            }
          }
        }
        "#);
    }
}
