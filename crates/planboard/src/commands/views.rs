//! Saved view command handlers.

use serde::Serialize;
use tabled::Tabled;

use planboard_core::{
    ActiveView, EntityDomain, FilterStateStore, SavedView, SavedViewRegistry, ViewMatcher,
};

use crate::cli::{ViewsArgs, ViewsCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ViewRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Entity")]
    entity: String,
    #[tabled(rename = "Query")]
    query: String,
}

impl From<&SavedView> for ViewRow {
    fn from(v: &SavedView) -> Self {
        Self {
            id: v.id.clone(),
            label: v.label.clone(),
            entity: v.entity.to_string(),
            query: v.query(),
        }
    }
}

// ── Reports ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct MatchReport<'a> {
    entity: EntityDomain,
    active: ActiveView<'a>,
    href: String,
}

#[derive(Serialize)]
struct LinkReport<'a> {
    #[serde(flatten)]
    view: &'a SavedView,
    href: String,
}

fn match_detail(report: &MatchReport<'_>, color: bool) -> String {
    match report.active {
        ActiveView::All => output::highlight("All", color),
        ActiveView::Saved(view) => format!(
            "{} {}",
            output::highlight(&view.label, color),
            output::dim(&format!("({})", view.id), color)
        ),
        ActiveView::Custom => output::dim("Custom filters (no saved view)", color),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ViewsArgs, ctx: &Context) -> Result<(), CliError> {
    let registry = ctx.config.registry()?;

    match args.command {
        ViewsCommand::List { entity } => {
            let views: Vec<&SavedView> = match entity {
                Some(e) => registry.for_entity(e.into()).collect(),
                None => registry.iter().collect(),
            };
            let out = output::render_list(
                ctx.output,
                &views,
                |v| ViewRow::from(*v),
                |v| v.id.clone(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        ViewsCommand::Match { entity, query } => {
            let entity = EntityDomain::from(entity);
            let matcher = ViewMatcher::new(&registry, ctx.config.base_path(entity));
            let store = FilterStateStore::from_query(util::query_part(&query));
            let active = matcher.active(entity, &store.read());

            let href = match active {
                ActiveView::Saved(view) => matcher.href(view),
                ActiveView::All => matcher.all_href(),
                ActiveView::Custom => link(matcher.base_path(), store.query()),
            };
            let report = MatchReport {
                entity,
                active,
                href,
            };
            let out = output::render_single(
                ctx.output,
                &report,
                |r| match_detail(r, ctx.color),
                |r| r.active.id().to_owned(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        ViewsCommand::Open { id } => {
            let (view, href) = open(&registry, ctx, &id)?;
            let report = LinkReport { view, href };
            let out = output::render_single(
                ctx.output,
                &report,
                |r| r.href.clone(),
                |r| r.href.clone(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }
    }
}

/// Resolve a view and navigate a fresh store to it, returning the link.
fn open<'r>(
    registry: &'r SavedViewRegistry,
    ctx: &Context,
    id: &str,
) -> Result<(&'r SavedView, String), CliError> {
    let view = registry.require(id)?;
    let matcher = ViewMatcher::new(registry, ctx.config.base_path(view.entity));
    let mut store = FilterStateStore::new();
    let href = link(matcher.base_path(), matcher.navigate(&mut store, view));
    Ok((view, href))
}

fn link(base: &str, query: &str) -> String {
    if query.is_empty() {
        base.to_owned()
    } else {
        format!("{base}?{query}")
    }
}
