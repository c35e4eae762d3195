//! Object code command handlers.

use std::str::FromStr;

use serde::Serialize;
use tabled::Tabled;

use planboard_core::{Category, InMemoryCodeStore, ModuleType, ObjectCode, next_code};

use crate::cli::{CodePairArgs, CodesArgs, CodesCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Report ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct CodeReport {
    code: String,
    module: ModuleType,
    category: Category,
    sequence: u64,
}

impl From<ObjectCode> for CodeReport {
    fn from(c: ObjectCode) -> Self {
        Self {
            code: c.to_string(),
            module: c.module,
            category: c.category,
            sequence: c.sequence,
        }
    }
}

#[derive(Tabled)]
struct CodeRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Module")]
    module: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Seq")]
    sequence: u64,
}

impl From<&CodeReport> for CodeRow {
    fn from(r: &CodeReport) -> Self {
        Self {
            code: r.code.clone(),
            module: r.module.to_string(),
            category: r.category.to_string(),
            sequence: r.sequence,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: CodesArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        CodesCommand::Next(pair) => {
            let (module, category, names) = resolve_pair(&pair)?;
            let report = CodeReport::from(next_code(&names, module, category)?);
            print_single(&report, ctx)
        }

        CodesCommand::Allocate { pair, count } => {
            let (module, category, names) = resolve_pair(&pair)?;

            let store = InMemoryCodeStore::new();
            store.seed(&names);
            let allocator = ctx.config.allocator();

            let mut reports = Vec::new();
            for _ in 0..count {
                let code = allocator.allocate(&store, module, category)?;
                reports.push(CodeReport::from(code));
            }
            tracing::info!(count, total = store.len(), "allocated object codes");

            let out = output::render_list(
                ctx.output,
                &reports,
                |r| CodeRow::from(r),
                |r| r.code.clone(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        CodesCommand::Parse { code } => {
            let report = CodeReport::from(ObjectCode::from_str(&code)?);
            print_single(&report, ctx)
        }
    }
}

/// Parse the module/category text and gather existing identifiers from
/// positional args and `--from-file`.
fn resolve_pair(pair: &CodePairArgs) -> Result<(ModuleType, Category, Vec<String>), CliError> {
    let module = ModuleType::parse(&pair.module)?;
    let category = Category::parse(&pair.category)?;

    let mut names = pair.names.clone();
    if let Some(ref path) = pair.from_file {
        names.extend(util::read_names(path)?);
    }
    tracing::debug!(%module, %category, existing = names.len(), "resolved code pair");
    Ok((module, category, names))
}

fn print_single(report: &CodeReport, ctx: &Context) -> Result<(), CliError> {
    let out = output::render_single(
        ctx.output,
        report,
        |r| {
            format!(
                "{}  {}",
                output::highlight(&r.code, ctx.color),
                output::dim(&format!("{} / {} #{}", r.module, r.category, r.sequence), ctx.color)
            )
        },
        |r| r.code.clone(),
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
