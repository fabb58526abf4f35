use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::analyzer::period::business_day_denominator;
use crate::analyzer::stats::{mean, seconds_to_days};
use crate::parser::types::Ticket;

/// One row of the per-analyst summary table.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalystSummary {
    pub analyst: String,
    /// Tickets created inside the period.
    pub total: u64,
    /// Tickets resolved inside the period with a closed status.
    pub closed: u64,
    /// Tickets created inside the period and not resolved by period end.
    pub open: u64,
    pub mean_time_to_close_days: f64,
    pub mean_closed_per_business_day: f64,
}

#[derive(Default)]
struct Accumulator {
    total: u64,
    closed: u64,
    open: u64,
    /// Time-to-close in fractional days, closed set only, both timestamps
    /// present. May hold negative values from dirty data.
    durations: Vec<f64>,
}

fn in_window(dt: Option<chrono::NaiveDateTime>, start: NaiveDate, end: NaiveDate) -> bool {
    dt.map(|d| {
        let date = d.date();
        date >= start && date <= end
    })
    .unwrap_or(false)
}

/// Per-analyst metrics over an already-union-filtered view.
///
/// The four row masks are re-derived here against the full `[start, end]`
/// bounds — the union filter is a superset of each of them. Rows without
/// an analyst are silently excluded from grouping (they stay in the
/// dataset for the KPI totals). An analyst absent from every mask does
/// not appear in the output at all; an analyst present in some masks gets
/// zeros for the others. Sorted descending by (total, closed).
pub fn summarize_analysts(
    rows: &[&Ticket],
    start: NaiveDate,
    end: NaiveDate,
    closed_statuses: &HashSet<String>,
) -> Vec<AnalystSummary> {
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for ticket in rows {
        let Some(analyst) = ticket.analyst.as_deref() else {
            continue;
        };

        let created_in = in_window(ticket.created, start, end);
        let closed_in = in_window(ticket.resolved, start, end)
            && closed_statuses.contains(&ticket.status);
        let still_open = created_in
            && ticket
                .resolved
                .map(|r| r.date() > end)
                .unwrap_or(true);

        if !created_in && !closed_in {
            continue;
        }
        let acc = groups.entry(analyst).or_default();
        if created_in {
            acc.total += 1;
        }
        if closed_in {
            acc.closed += 1;
            if let (Some(created), Some(resolved)) = (ticket.created, ticket.resolved) {
                acc.durations
                    .push(seconds_to_days((resolved - created).num_seconds()));
            }
        }
        if still_open {
            acc.open += 1;
        }
    }

    // Business-day denominator is a property of the period, identical for
    // every analyst, and counts zero-activity weekdays too.
    let denominator = business_day_denominator(start, end) as f64;

    let mut summaries: Vec<AnalystSummary> = groups
        .into_iter()
        .map(|(analyst, acc)| AnalystSummary {
            analyst: analyst.to_string(),
            total: acc.total,
            closed: acc.closed,
            open: acc.open,
            mean_time_to_close_days: mean(&acc.durations),
            mean_closed_per_business_day: acc.closed as f64 / denominator,
        })
        .collect();

    summaries.sort_by(|a, b| b.total.cmp(&a.total).then(b.closed.cmp(&a.closed)));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::types::TicketKind;
    use chrono::NaiveDateTime;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn ticket(
        analyst: Option<&str>,
        status: &str,
        created: Option<&str>,
        resolved: Option<&str>,
    ) -> Ticket {
        Ticket {
            analyst: analyst.map(str::to_string),
            status: status.to_string(),
            created: created.map(dt),
            resolved: resolved.map(dt),
            project: None,
            issue_type: None,
            application: None,
            summary: None,
            description: None,
            normalized_type: TicketKind::Other,
        }
    }

    fn closed_set() -> HashSet<String> {
        crate::config::EngineConfig::default().closed_statuses
    }

    fn summarize(rows: &[Ticket], start: &str, end: &str) -> Vec<AnalystSummary> {
        let refs: Vec<&Ticket> = rows.iter().collect();
        summarize_analysts(&refs, date(start), date(end), &closed_set())
    }

    #[test]
    fn test_time_to_close_two_days_exact() {
        let rows = vec![ticket(
            Some("Ana"),
            "Resolvido",
            Some("2025-01-01 00:00:00"),
            Some("2025-01-03 00:00:00"),
        )];
        let out = summarize(&rows, "2025-01-01", "2025-01-31");
        assert_eq!(out.len(), 1);
        assert!((out[0].mean_time_to_close_days - 2.0).abs() < 1e-10);
        assert_eq!(out[0].closed, 1);
        assert_eq!(out[0].total, 1);
        assert_eq!(out[0].open, 0);
    }

    #[test]
    fn test_open_means_unresolved_by_period_end() {
        let rows = vec![
            // Created in window, never resolved → open.
            ticket(Some("Ana"), "Aberto", Some("2025-01-10 09:00:00"), None),
            // Created in window, resolved after window end → still open.
            ticket(
                Some("Ana"),
                "Resolvido",
                Some("2025-01-15 09:00:00"),
                Some("2025-02-05 09:00:00"),
            ),
            // Created and resolved in window → not open.
            ticket(
                Some("Ana"),
                "Resolvido",
                Some("2025-01-05 09:00:00"),
                Some("2025-01-06 09:00:00"),
            ),
        ];
        let out = summarize(&rows, "2025-01-01", "2025-01-31");
        assert_eq!(out[0].total, 3);
        assert_eq!(out[0].open, 2);
        assert_eq!(out[0].closed, 1);
    }

    #[test]
    fn test_closed_requires_closed_status() {
        // Resolved timestamp in window but status not in the closed set.
        let rows = vec![ticket(
            Some("Ana"),
            "Em andamento",
            Some("2025-01-05 09:00:00"),
            Some("2025-01-10 09:00:00"),
        )];
        let out = summarize(&rows, "2025-01-01", "2025-01-31");
        assert_eq!(out[0].closed, 0);
        // Resolved within the window, so the row does not count as open.
        assert_eq!(out[0].open, 0);
        assert_eq!(out[0].mean_time_to_close_days, 0.0);
    }

    #[test]
    fn test_closed_outside_creation_window_counts_closed_only() {
        // Created before the window, resolved inside it: closed=1, total=0.
        let rows = vec![ticket(
            Some("Ana"),
            "Closed",
            Some("2024-12-01 09:00:00"),
            Some("2025-01-10 09:00:00"),
        )];
        let out = summarize(&rows, "2025-01-01", "2025-01-31");
        assert_eq!(out[0].total, 0);
        assert_eq!(out[0].closed, 1);
        assert_eq!(out[0].open, 0);
    }

    #[test]
    fn test_null_analyst_rows_dropped_from_grouping() {
        let rows = vec![
            ticket(None, "Resolvido", Some("2025-01-05 09:00:00"), None),
            ticket(Some("Bia"), "Aberto", Some("2025-01-05 09:00:00"), None),
        ];
        let out = summarize(&rows, "2025-01-01", "2025-01-31");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].analyst, "Bia");
    }

    #[test]
    fn test_zero_activity_analyst_absent() {
        // Union-filtered row (resolved in window) whose status is not
        // closed and whose creation predates the window: no mask hits.
        let rows = vec![ticket(
            Some("Caio"),
            "Em andamento",
            Some("2024-12-01 09:00:00"),
            Some("2025-01-10 09:00:00"),
        )];
        let out = summarize(&rows, "2025-01-01", "2025-01-31");
        assert!(out.is_empty());
    }

    #[test]
    fn test_mean_closed_per_business_day_constant_denominator() {
        // 2025-01-06..2025-01-12 has exactly 5 business days.
        let rows = vec![
            ticket(
                Some("Ana"),
                "Resolvido",
                Some("2025-01-06 09:00:00"),
                Some("2025-01-07 09:00:00"),
            ),
            ticket(
                Some("Bia"),
                "Resolvido",
                Some("2025-01-06 09:00:00"),
                Some("2025-01-08 09:00:00"),
            ),
            ticket(
                Some("Bia"),
                "Resolvido",
                Some("2025-01-06 09:00:00"),
                Some("2025-01-09 09:00:00"),
            ),
        ];
        let out = summarize(&rows, "2025-01-06", "2025-01-12");
        let ana = out.iter().find(|s| s.analyst == "Ana").unwrap();
        let bia = out.iter().find(|s| s.analyst == "Bia").unwrap();
        assert!((ana.mean_closed_per_business_day - 1.0 / 5.0).abs() < 1e-10);
        assert!((bia.mean_closed_per_business_day - 2.0 / 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_weekend_only_period_denominator_floored_at_one() {
        let rows = vec![ticket(
            Some("Ana"),
            "Resolvido",
            Some("2025-01-11 09:00:00"),
            Some("2025-01-11 15:00:00"),
        )];
        let out = summarize(&rows, "2025-01-11", "2025-01-12");
        assert!((out[0].mean_closed_per_business_day - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_negative_duration_does_not_crash() {
        // Dirty data: resolution precedes creation.
        let rows = vec![ticket(
            Some("Ana"),
            "Resolvido",
            Some("2025-01-10 09:00:00"),
            Some("2025-01-08 09:00:00"),
        )];
        let out = summarize(&rows, "2025-01-01", "2025-01-31");
        assert!((out[0].mean_time_to_close_days + 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_sort_descending_by_total_then_closed() {
        let mut rows = Vec::new();
        for _ in 0..3 {
            rows.push(ticket(Some("Ana"), "Aberto", Some("2025-01-05 09:00:00"), None));
        }
        for _ in 0..3 {
            rows.push(ticket(
                Some("Bia"),
                "Resolvido",
                Some("2025-01-05 09:00:00"),
                Some("2025-01-06 09:00:00"),
            ));
        }
        rows.push(ticket(Some("Caio"), "Aberto", Some("2025-01-05 09:00:00"), None));
        let out = summarize(&rows, "2025-01-01", "2025-01-31");
        // Ana and Bia tie on total=3; Bia has more closed.
        assert_eq!(out[0].analyst, "Bia");
        assert_eq!(out[1].analyst, "Ana");
        assert_eq!(out[2].analyst, "Caio");
    }

    #[test]
    fn test_closed_never_double_counted() {
        let rows = vec![
            ticket(
                Some("Ana"),
                "Resolvido",
                Some("2025-01-05 09:00:00"),
                Some("2025-01-10 09:00:00"),
            ),
            ticket(
                Some("Ana"),
                "Cancelado",
                Some("2025-01-06 09:00:00"),
                Some("2025-01-11 09:00:00"),
            ),
        ];
        let refs: Vec<&Ticket> = rows.iter().collect();
        let closed = closed_set();
        let out = summarize_analysts(&refs, date("2025-01-01"), date("2025-01-31"), &closed);
        let expected = rows
            .iter()
            .filter(|t| {
                t.resolved
                    .map(|r| r.date() >= date("2025-01-01") && r.date() <= date("2025-01-31"))
                    .unwrap_or(false)
                    && closed.contains(&t.status)
            })
            .count() as u64;
        assert_eq!(out[0].closed, expected);
        assert_eq!(out[0].closed, 2);
    }

    #[test]
    fn test_empty_input_yields_empty_table() {
        let out = summarize(&[], "2025-01-01", "2025-01-31");
        assert!(out.is_empty());
    }
}
