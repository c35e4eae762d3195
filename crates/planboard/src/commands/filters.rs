//! Filter query command handlers.

use serde::Serialize;
use tabled::Tabled;

use planboard_core::{FilterKey, FilterState, FilterStateStore, SortSpec};

use crate::cli::{FiltersArgs, FiltersCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Report ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct FilterReport {
    query: String,
    canonical: String,
    active_filters: usize,
    filters: FilterState,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<SortSpec>,
}

impl FilterReport {
    fn from_store(store: &FilterStateStore) -> Self {
        let state = store.read();
        Self {
            query: store.query().to_owned(),
            canonical: state.canonical(),
            active_filters: store.active_filter_count(),
            sort: state.sort(),
            filters: state,
        }
    }
}

#[derive(Tabled)]
struct PairRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
}

fn detail(report: &FilterReport, color: bool) -> String {
    use std::fmt::Write;

    if report.filters.is_empty() {
        return output::dim("No filters (All)", color);
    }

    let rows: Vec<PairRow> = report
        .filters
        .iter()
        .map(|(key, value)| PairRow {
            key: key.to_owned(),
            value: value.to_owned(),
            kind: if FilterKey::parse(key).is_reserved() {
                "sort"
            } else {
                "filter"
            },
        })
        .collect();

    let mut out = output::render_table(&rows);
    let _ = write!(
        out,
        "\n{} active filter{}",
        report.active_filters,
        if report.active_filters == 1 { "" } else { "s" }
    );
    if let Some(ref sort) = report.sort {
        let _ = write!(out, ", sorted by {} {}", sort.field, sort.direction);
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: FiltersArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        FiltersCommand::Show { query } => {
            let store = FilterStateStore::from_query(util::query_part(&query));
            let report = FilterReport::from_store(&store);
            let out = output::render_single(
                ctx.output,
                &report,
                |r| detail(r, ctx.color),
                |r| r.query.clone(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        FiltersCommand::Set { query, key, value } => {
            let mut store = FilterStateStore::from_query(util::query_part(&query));
            store.set(&key, value.as_deref());
            print_query(&store, ctx)
        }

        FiltersCommand::Remove { query, key } => {
            let mut store = FilterStateStore::from_query(util::query_part(&query));
            store.remove(&key);
            print_query(&store, ctx)
        }

        FiltersCommand::Clear => {
            let mut store = FilterStateStore::new();
            store.clear();
            print_query(&store, ctx)
        }

        FiltersCommand::Count { query } => {
            let store = FilterStateStore::from_query(util::query_part(&query));
            output::print_output(&store.active_filter_count().to_string(), ctx.quiet);
            Ok(())
        }
    }
}

/// Mutating commands print the resulting query; structured formats wrap
/// it in the full report.
fn print_query(store: &FilterStateStore, ctx: &Context) -> Result<(), CliError> {
    let report = FilterReport::from_store(store);
    let out = output::render_single(
        ctx.output,
        &report,
        |r| r.query.clone(),
        |r| r.query.clone(),
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
