use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::analyzer::stats::{mean, seconds_to_days};
use crate::parser::types::{Ticket, TicketKind};

/// Dataset-wide scalars over the filtered view.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryKpi {
    pub total_union: usize,
    pub request_count: usize,
    pub request_pct: f64,
    pub incident_count: usize,
    pub incident_pct: f64,
    pub mean_time_to_close_days: f64,
}

/// One bar of the Top-10 applications breakdown.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationCount {
    pub application: String,
    pub count: usize,
}

/// One row of the detail table: the fixed display subset.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRow {
    pub project: Option<String>,
    pub analyst: Option<String>,
    pub status: String,
    pub issue_type: Option<String>,
    pub normalized_type: &'static str,
    pub application: Option<String>,
    pub created: Option<NaiveDateTime>,
    pub resolved: Option<NaiveDateTime>,
    pub summary: Option<String>,
    pub description: Option<String>,
}

/// Summary KPIs per the period semantics: counts and percentages over the
/// union-filtered view, mean time-to-close restricted to rows resolved
/// inside the window with a closed status. Percentages are 0 for an empty
/// view instead of dividing by zero.
pub fn summary_kpi(
    rows: &[&Ticket],
    start: NaiveDate,
    end: NaiveDate,
    closed_statuses: &HashSet<String>,
) -> SummaryKpi {
    let total = rows.len();
    let incident_count = rows
        .iter()
        .filter(|t| t.normalized_type == TicketKind::Incident)
        .count();
    let request_count = rows
        .iter()
        .filter(|t| t.normalized_type == TicketKind::Request)
        .count();

    let pct = |count: usize| {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        }
    };

    let durations: Vec<f64> = rows
        .iter()
        .filter(|t| {
            t.resolved
                .map(|r| {
                    let d = r.date();
                    d >= start && d <= end
                })
                .unwrap_or(false)
                && closed_statuses.contains(&t.status)
        })
        .filter_map(|t| match (t.created, t.resolved) {
            (Some(c), Some(r)) => Some(seconds_to_days((r - c).num_seconds())),
            _ => None,
        })
        .collect();

    SummaryKpi {
        total_union: total,
        request_count,
        request_pct: pct(request_count),
        incident_count,
        incident_pct: pct(incident_count),
        mean_time_to_close_days: mean(&durations),
    }
}

/// Application volume breakdown, descending by count. Missing values are
/// bucketed under `unspecified_label`; name ascending breaks count ties
/// deterministically.
pub fn top_applications(
    rows: &[&Ticket],
    unspecified_label: &str,
    limit: usize,
) -> Vec<ApplicationCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for ticket in rows {
        let app = ticket.application.as_deref().unwrap_or(unspecified_label);
        *counts.entry(app).or_insert(0) += 1;
    }
    let mut out: Vec<ApplicationCount> = counts
        .into_iter()
        .map(|(application, count)| ApplicationCount {
            application: application.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.application.cmp(&b.application))
    });
    out.truncate(limit);
    out
}

/// Detail table for display: fixed column subset, newest first by created
/// timestamp, falling back to the resolved timestamp for rows without one.
pub fn detail_rows(rows: &[&Ticket]) -> Vec<DetailRow> {
    let mut out: Vec<DetailRow> = rows
        .iter()
        .map(|t| DetailRow {
            project: t.project.clone(),
            analyst: t.analyst.clone(),
            status: t.status.clone(),
            issue_type: t.issue_type.clone(),
            normalized_type: t.normalized_type.label(),
            application: t.application.clone(),
            created: t.created,
            resolved: t.resolved,
            summary: t.summary.clone(),
            description: t.description.clone(),
        })
        .collect();
    out.sort_by_key(|r| Reverse(r.created.or(r.resolved)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn ticket(kind: TicketKind, status: &str, resolved: Option<&str>) -> Ticket {
        Ticket {
            analyst: Some("Ana".to_string()),
            status: status.to_string(),
            created: Some(dt("2025-01-02 08:00:00")),
            resolved: resolved.map(dt),
            project: None,
            issue_type: None,
            application: None,
            summary: None,
            description: None,
            normalized_type: kind,
        }
    }

    fn closed_set() -> HashSet<String> {
        crate::config::EngineConfig::default().closed_statuses
    }

    #[test]
    fn test_kpi_counts_and_percentages() {
        let rows = vec![
            ticket(TicketKind::Incident, "Aberto", None),
            ticket(TicketKind::Request, "Aberto", None),
            ticket(TicketKind::Request, "Aberto", None),
            ticket(TicketKind::Other, "Aberto", None),
        ];
        let refs: Vec<&Ticket> = rows.iter().collect();
        let kpi = summary_kpi(&refs, date("2025-01-01"), date("2025-01-31"), &closed_set());
        assert_eq!(kpi.total_union, 4);
        assert_eq!(kpi.incident_count, 1);
        assert_eq!(kpi.request_count, 2);
        assert!((kpi.incident_pct - 25.0).abs() < 1e-10);
        assert!((kpi.request_pct - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_empty_view_no_division_by_zero() {
        let kpi = summary_kpi(&[], date("2025-01-01"), date("2025-01-31"), &closed_set());
        assert_eq!(kpi.total_union, 0);
        assert_eq!(kpi.incident_pct, 0.0);
        assert_eq!(kpi.request_pct, 0.0);
        assert_eq!(kpi.mean_time_to_close_days, 0.0);
    }

    #[test]
    fn test_kpi_mean_ttc_only_closed_in_window() {
        let rows = vec![
            // Closed in window: counts (2.0 days).
            ticket(TicketKind::Other, "Resolvido", Some("2025-01-04 08:00:00")),
            // Resolved after window: excluded.
            ticket(TicketKind::Other, "Resolvido", Some("2025-02-10 08:00:00")),
            // Resolved in window but status not closed: excluded.
            ticket(TicketKind::Other, "Em andamento", Some("2025-01-04 08:00:00")),
        ];
        let refs: Vec<&Ticket> = rows.iter().collect();
        let kpi = summary_kpi(&refs, date("2025-01-01"), date("2025-01-31"), &closed_set());
        assert!((kpi.mean_time_to_close_days - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_top_applications_order_and_bucket() {
        let mut rows = Vec::new();
        for app in [Some("SAP"), Some("SAP"), Some("Portal"), None, None, None] {
            let mut t = ticket(TicketKind::Other, "Aberto", None);
            t.application = app.map(str::to_string);
            rows.push(t);
        }
        let refs: Vec<&Ticket> = rows.iter().collect();
        let top = top_applications(&refs, "Não informado", 10);
        assert_eq!(top[0].application, "Não informado");
        assert_eq!(top[0].count, 3);
        assert_eq!(top[1].application, "SAP");
        assert_eq!(top[1].count, 2);
        assert_eq!(top[2].application, "Portal");
    }

    #[test]
    fn test_top_applications_limit() {
        let mut rows = Vec::new();
        for i in 0..15 {
            let mut t = ticket(TicketKind::Other, "Aberto", None);
            t.application = Some(format!("App{i:02}"));
            rows.push(t);
        }
        let refs: Vec<&Ticket> = rows.iter().collect();
        let top = top_applications(&refs, "Não informado", 10);
        assert_eq!(top.len(), 10);
    }

    #[test]
    fn test_detail_rows_sorted_created_descending() {
        let mut a = ticket(TicketKind::Other, "Aberto", None);
        a.created = Some(dt("2025-01-10 08:00:00"));
        let mut b = ticket(TicketKind::Other, "Aberto", None);
        b.created = Some(dt("2025-01-20 08:00:00"));
        let mut c = ticket(TicketKind::Other, "Resolvido", Some("2025-01-15 08:00:00"));
        c.created = None;
        let rows = vec![a, b, c];
        let refs: Vec<&Ticket> = rows.iter().collect();
        let details = detail_rows(&refs);
        assert_eq!(details[0].created, Some(dt("2025-01-20 08:00:00")));
        // The created-less row sorts by its resolved timestamp.
        assert_eq!(details[1].resolved, Some(dt("2025-01-15 08:00:00")));
        assert_eq!(details[2].created, Some(dt("2025-01-10 08:00:00")));
    }
}
