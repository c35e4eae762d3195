// ── Saved views ──
//
// Named filter presets per entity domain. The registry is assembled once
// at startup and is read-only afterwards.

pub mod matcher;

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::CoreError;
use crate::filter::FilterState;

pub use matcher::{ActiveView, ViewMatcher};

/// The collection a saved view applies to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntityDomain {
    Objects,
    Issues,
}

impl EntityDomain {
    /// Parse user text, reporting the offending value on failure.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        Self::from_str(raw).map_err(|_| CoreError::UnknownEntity {
            value: raw.to_owned(),
        })
    }
}

/// A named filter preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedView {
    pub id: String,
    pub label: String,
    pub entity: EntityDomain,
    pub filters: FilterState,
}

impl SavedView {
    pub fn new<'a>(
        id: impl Into<String>,
        label: impl Into<String>,
        entity: EntityDomain,
        filters: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            entity,
            filters: filters.into_iter().collect(),
        }
    }

    /// Query text that reproduces this view's filters.
    pub fn query(&self) -> String {
        self.filters.to_query()
    }
}

// ── Registry ────────────────────────────────────────────────────────

/// Fixed catalog of saved views, in registry order.
///
/// Order matters: when two views in one domain share identical filters,
/// the earlier one wins the match.
#[derive(Debug, Clone)]
pub struct SavedViewRegistry {
    views: Vec<SavedView>,
    by_id: HashMap<String, usize>,
}

impl SavedViewRegistry {
    /// The views shipped with the dashboard.
    pub fn builtin() -> Self {
        let views = builtin_views();
        let by_id = views
            .iter()
            .enumerate()
            .map(|(index, view)| (view.id.clone(), index))
            .collect();
        Self { views, by_id }
    }

    /// Built-ins followed by `extra`, in the order given.
    pub fn with_views(extra: impl IntoIterator<Item = SavedView>) -> Result<Self, CoreError> {
        Self::from_views(builtin_views().into_iter().chain(extra))
    }

    /// A registry holding exactly `views`. Ids must be unique across
    /// both domains.
    pub fn from_views(views: impl IntoIterator<Item = SavedView>) -> Result<Self, CoreError> {
        let views: Vec<SavedView> = views.into_iter().collect();
        let mut by_id = HashMap::with_capacity(views.len());
        for (index, view) in views.iter().enumerate() {
            if by_id.insert(view.id.clone(), index).is_some() {
                return Err(CoreError::DuplicateView {
                    id: view.id.clone(),
                });
            }
        }
        Ok(Self { views, by_id })
    }

    pub fn get(&self, id: &str) -> Option<&SavedView> {
        self.by_id.get(id).and_then(|&index| self.views.get(index))
    }

    /// Like [`get`](Self::get), but an unknown id is an error.
    pub fn require(&self, id: &str) -> Result<&SavedView, CoreError> {
        self.get(id)
            .ok_or_else(|| CoreError::ViewNotFound { id: id.to_owned() })
    }

    /// Views for one domain, in registry order.
    pub fn for_entity(&self, entity: EntityDomain) -> impl Iterator<Item = &SavedView> {
        self.views.iter().filter(move |v| v.entity == entity)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SavedView> {
        self.views.iter()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl Default for SavedViewRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a SavedViewRegistry {
    type Item = &'a SavedView;
    type IntoIter = std::slice::Iter<'a, SavedView>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn builtin_views() -> Vec<SavedView> {
    use EntityDomain::{Issues, Objects};

    vec![
        SavedView::new("blocked", "Blocked", Objects, [("status", "blocked")]),
        SavedView::new("at_risk", "At Risk", Objects, [("status", "at_risk")]),
        SavedView::new(
            "stale",
            "Stale >15d",
            Objects,
            [("sort", "aging"), ("order", "desc")],
        ),
        SavedView::new(
            "demand_planning",
            "Demand Planning",
            Objects,
            [("module", "demand_planning")],
        ),
        SavedView::new(
            "supply_planning",
            "Supply Planning",
            Objects,
            [("module", "supply_planning")],
        ),
        SavedView::new(
            "issues_open",
            "All Open",
            Issues,
            [("status", "open,in_progress,blocked")],
        ),
        SavedView::new("issues_blocked", "Blocked", Issues, [("status", "blocked")]),
        SavedView::new(
            "issues_dependencies",
            "Dependencies",
            Issues,
            [("issue_type", "dependency")],
        ),
    ]
}
