use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::error::AppError;
use crate::parser::types::RawTable;

/// Canonical field names used everywhere downstream of the normalizer.
pub const ANALYST: &str = "analyst";
pub const STATUS: &str = "status";
pub const CREATED: &str = "created";
pub const RESOLVED: &str = "resolved";
pub const PROJECT: &str = "project";
pub const SUMMARY: &str = "summary";
pub const DESCRIPTION: &str = "description";
pub const APPLICATION: &str = "application";
pub const ISSUE_TYPE: &str = "issue_type";

/// Canonical columns the pipeline cannot work without.
pub const REQUIRED: &[&str] = &[ANALYST, STATUS, CREATED];

/// Maps canonical column names to their index in a raw table row.
pub struct ColumnMap {
    indices: HashMap<String, usize>,
}

impl ColumnMap {
    /// Resolve each canonical name against the raw headers using the
    /// configured alias table. Matching is case-sensitive exact on trimmed
    /// headers; the first alias present wins, and when the same header
    /// occurs twice only its first occurrence is used.
    pub fn from_headers(headers: &[String], config: &EngineConfig) -> Self {
        let mut first_index: HashMap<&str, usize> = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            first_index.entry(header.trim()).or_insert(i);
        }

        let mut indices = HashMap::new();
        for (canonical, aliases) in &config.column_aliases {
            for alias in aliases {
                if let Some(&i) = first_index.get(alias.as_str()) {
                    indices.insert(canonical.clone(), i);
                    break;
                }
            }
        }
        ColumnMap { indices }
    }

    /// Value of a canonical column in `row`, trimmed; `None` when the
    /// column is absent or the cell is empty.
    pub fn get<'a>(&self, row: &'a [String], canonical: &str) -> Option<&'a str> {
        let value = self
            .indices
            .get(canonical)
            .and_then(|&i| row.get(i))
            .map(|s| s.trim())?;
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    pub fn has(&self, canonical: &str) -> bool {
        self.indices.contains_key(canonical)
    }
}

/// Validate that every required canonical column was resolved.
/// Terminal, user-facing failure: lists the missing canonical names.
pub fn validate_required(col_map: &ColumnMap) -> Result<(), AppError> {
    let missing: Vec<String> = REQUIRED
        .iter()
        .filter(|&&c| !col_map.has(c))
        .map(|c| c.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::MissingColumns(missing))
    }
}

/// Normalize and validate in one step — the entry point used by the
/// pipeline after a successful read.
pub fn normalize_columns(table: &RawTable, config: &EngineConfig) -> Result<ColumnMap, AppError> {
    let col_map = ColumnMap::from_headers(&table.headers, config);
    validate_required(&col_map)?;
    Ok(col_map)
}
