use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

// ── Static regex ──────────────────────────────────────────────────────────────

/// Portuguese month names and abbreviations, full names first so the
/// alternation never stops at a prefix. Word-boundary matched and
/// case-insensitive, mirroring how the exports mix "05/mai/25" with
/// "05/May/25" in a single column.
static PT_MONTHS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(janeiro|fevereiro|março|marco|abril|maio|junho|julho|agosto|setembro|outubro|novembro|dezembro|jan|fev|mar|abr|mai|jun|jul|ago|set|out|nov|dez)\b",
    )
    .expect("PT_MONTHS: invalid pattern")
});

fn english_month(pt: &str) -> Option<&'static str> {
    Some(match pt {
        "jan" => "Jan",
        "fev" => "Feb",
        "mar" => "Mar",
        "abr" => "Apr",
        "mai" => "May",
        "jun" => "Jun",
        "jul" => "Jul",
        "ago" => "Aug",
        "set" => "Sep",
        "out" => "Oct",
        "nov" => "Nov",
        "dez" => "Dec",
        "janeiro" => "January",
        "fevereiro" => "February",
        "março" | "marco" => "March",
        "abril" => "April",
        "maio" => "May",
        "junho" => "June",
        "julho" => "July",
        "agosto" => "August",
        "setembro" => "September",
        "outubro" => "October",
        "novembro" => "November",
        "dezembro" => "December",
        _ => return None,
    })
}

/// Replace Portuguese month tokens with their English equivalents so the
/// chrono `%b`/`%B` specifiers can take over.
pub fn replace_pt_months(text: &str) -> String {
    PT_MONTHS
        .replace_all(text, |caps: &regex::Captures| {
            let token = caps[1].to_lowercase();
            english_month(&token)
                .map(str::to_string)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

// ── Format tables ─────────────────────────────────────────────────────────────

/// Auto-inference list, day-before-month preference. Two-digit-year
/// variants come before four-digit ones: `%Y` happily consumes "25" as the
/// year 25, so it must only be reached when `%y` has already failed.
const FLEXIBLE_FORMATS: &[&str] = &[
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%y %H:%M",
    "%d/%m/%Y %H:%M",
    "%d/%b/%y %I:%M %p",
    "%d/%b/%Y %I:%M %p",
    "%d/%b/%y %H:%M",
    "%d/%b/%Y %H:%M",
    "%d-%m-%y %H:%M",
    "%d-%m-%Y %H:%M",
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d/%b/%y",
    "%d/%b/%Y",
    "%d-%m-%y",
    "%d-%m-%Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d",
];

/// Explicit formats for the third layer, tried in order against the
/// month-substituted text.
const EXPLICIT_FORMATS: &[&str] = &[
    "%d/%b/%y %I:%M %p",
    "%d/%b/%Y %I:%M %p",
    "%d/%b/%y %H:%M",
    "%d/%b/%Y %H:%M",
    "%d/%m/%Y %H:%M",
    "%d/%m/%y %H:%M",
    "%d/%m/%Y",
    "%d/%m/%y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d",
];

/// Parse one value with one format. Date-only formats land at midnight.
fn parse_with_format(s: &str, fmt: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
        return Some(dt);
    }
    NaiveDate::parse_from_str(trimmed, fmt)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Best-effort parse of a single value, day-first, format auto-tried.
pub fn parse_flexible(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    FLEXIBLE_FORMATS
        .iter()
        .find_map(|fmt| parse_with_format(trimmed, fmt))
}

/// Convert a whole raw column to timestamps. Never fails: unparseable
/// entries become `None`.
///
/// Layered strategy, each layer attempted on the whole sequence:
/// 1. direct day-first parse — accepted when ≥1 value parsed and the null
///    rate stays ≤ 20%;
/// 2. PT→EN month substitution, then retry — accepted when ≥1 value parsed;
/// 3. explicit format list against the substituted text — first format
///    parsing ≥1 value wins;
/// 4. terminal best-effort pass; whatever still fails stays `None`.
pub fn parse_series(raw: &[String]) -> Vec<Option<NaiveDateTime>> {
    if raw.is_empty() {
        return Vec::new();
    }

    let direct: Vec<Option<NaiveDateTime>> = raw.iter().map(|s| parse_flexible(s)).collect();
    let parsed = direct.iter().filter(|v| v.is_some()).count();
    let nulls = raw.len() - parsed;
    if parsed > 0 && nulls * 5 <= raw.len() {
        return direct;
    }

    let substituted: Vec<String> = raw.iter().map(|s| replace_pt_months(s)).collect();
    let retried: Vec<Option<NaiveDateTime>> =
        substituted.iter().map(|s| parse_flexible(s)).collect();
    if retried.iter().any(Option::is_some) {
        return retried;
    }

    for fmt in EXPLICIT_FORMATS {
        let attempt: Vec<Option<NaiveDateTime>> = substituted
            .iter()
            .map(|s| parse_with_format(s, fmt))
            .collect();
        if attempt.iter().any(Option::is_some) {
            return attempt;
        }
    }

    substituted.iter().map(|s| parse_flexible(s)).collect()
}
