use std::time::Instant;

use crate::analyzer::classifier::classify;
use crate::config::EngineConfig;
use crate::error::AppError;
use crate::parser::columns::{self, normalize_columns};
use crate::parser::dates::parse_series;
use crate::parser::reader::read_flexible;
use crate::parser::types::{LoadSummary, Ticket, TicketTable};

/// Full load pass for one uploaded file: flexible read → column
/// normalization → whole-column date parsing → type classification.
/// Runs once per upload; the resulting table is read-only afterwards.
pub fn load_table(bytes: &[u8], config: &EngineConfig) -> Result<TicketTable, AppError> {
    let start = Instant::now();

    let raw = read_flexible(bytes)?;
    let col_map = normalize_columns(&raw, config)?;

    // Dates are parsed as whole columns so the locale/format layer is
    // chosen once per column, not per cell.
    let column_strings = |canonical: &str| -> Vec<String> {
        raw.rows
            .iter()
            .map(|row| col_map.get(row, canonical).unwrap_or("").to_string())
            .collect()
    };
    let created = parse_series(&column_strings(columns::CREATED));
    let resolved = if col_map.has(columns::RESOLVED) {
        parse_series(&column_strings(columns::RESOLVED))
    } else {
        vec![None; raw.rows.len()]
    };

    let mut unparsed_created = 0usize;
    let mut unparsed_resolved = 0usize;
    let tickets: Vec<Ticket> = raw
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let field = |canonical: &str| col_map.get(row, canonical).map(str::to_string);
            let issue_type = field(columns::ISSUE_TYPE);
            let project = field(columns::PROJECT);
            let normalized_type = classify(issue_type.as_deref(), project.as_deref(), config);
            if created[i].is_none() && col_map.get(row, columns::CREATED).is_some() {
                unparsed_created += 1;
            }
            if resolved[i].is_none() && col_map.get(row, columns::RESOLVED).is_some() {
                unparsed_resolved += 1;
            }
            Ticket {
                analyst: field(columns::ANALYST),
                status: col_map.get(row, columns::STATUS).unwrap_or("").to_string(),
                created: created[i],
                resolved: resolved[i],
                project,
                issue_type,
                application: field(columns::APPLICATION),
                summary: field(columns::SUMMARY),
                description: field(columns::DESCRIPTION),
                normalized_type,
            }
        })
        .collect();

    let summary = LoadSummary {
        total_rows: tickets.len(),
        discarded_rows: raw.discarded_rows,
        unparsed_created,
        unparsed_resolved,
        delimiter: raw.delimiter as char,
        decoding: raw.decoding,
        parse_duration_ms: start.elapsed().as_millis() as u64,
    };
    log::info!(
        "carga: {} linhas ({} descartadas, sep={:?}, {}) em {}ms",
        summary.total_rows,
        summary.discarded_rows,
        summary.delimiter,
        summary.decoding,
        summary.parse_duration_ms
    );

    Ok(TicketTable { tickets, summary })
}
