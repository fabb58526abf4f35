use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analyzer::analyst::{summarize_analysts, AnalystSummary};
use crate::analyzer::kpi::{detail_rows, summary_kpi, top_applications, ApplicationCount, DetailRow, SummaryKpi};
use crate::analyzer::period::{filter_union, PeriodSpec};
use crate::config::EngineConfig;
use crate::error::AppError;
use crate::parser::load_table;
use crate::parser::types::{Ticket, TicketTable};

const TOP_APPLICATIONS_LIMIT: usize = 10;

/// Analyst selection from the filter sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AnalystFilter {
    All,
    Only { name: String },
}

/// Everything the presentation client can vary between recomputations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    pub period: PeriodSpec,
    pub analyst: AnalystFilter,
    /// Status multi-select. An empty selection means "no status filter",
    /// matching the original sidebar widget semantics.
    pub statuses: Vec<String>,
}

impl Default for FilterParams {
    fn default() -> Self {
        FilterParams {
            period: PeriodSpec::AllTime,
            analyst: AnalystFilter::All,
            statuses: Vec::new(),
        }
    }
}

/// One full recomputation pass, everything derived from the same resolved
/// period so the analyst table and the KPI cards cannot drift.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub analysts: Vec<AnalystSummary>,
    pub kpi: SummaryKpi,
    pub top_applications: Vec<ApplicationCount>,
    pub details: Vec<DetailRow>,
}

/// One uploaded file's worth of state: the immutable loaded table plus the
/// engine configuration. Every `report` call derives fresh views, so
/// re-filtering is idempotent and order-independent.
#[derive(Debug)]
pub struct AnalysisSession {
    table: TicketTable,
    config: EngineConfig,
}

impl AnalysisSession {
    /// Load, normalize, date-parse and classify the uploaded bytes once.
    pub fn load(bytes: &[u8], config: EngineConfig) -> Result<Self, AppError> {
        let table = load_table(bytes, &config)?;
        Ok(AnalysisSession { table, config })
    }

    pub fn table(&self) -> &TicketTable {
        &self.table
    }

    /// Sorted distinct analysts for the filter widget (null rows omitted).
    pub fn analyst_options(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .table
            .tickets
            .iter()
            .filter_map(|t| t.analyst.clone())
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Sorted distinct statuses present in the dataset.
    pub fn status_options(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .table
            .tickets
            .iter()
            .filter(|t| !t.status.is_empty())
            .map(|t| t.status.clone())
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Min/max over all created and resolved dates in the dataset.
    fn dataset_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self
            .table
            .tickets
            .iter()
            .flat_map(|t| [t.created, t.resolved])
            .flatten()
            .map(|dt| dt.date());
        let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
        for d in dates {
            bounds = Some(match bounds {
                None => (d, d),
                Some((lo, hi)) => (lo.min(d), hi.max(d)),
            });
        }
        bounds
    }

    /// Resolve the selected period, narrowing the AllTime sentinel to the
    /// dataset's real bounds when any timestamp exists.
    fn resolve_period(&self, period: &PeriodSpec) -> (NaiveDate, NaiveDate) {
        let (start, end) = period.resolve();
        if *period == PeriodSpec::AllTime {
            if let Some((lo, hi)) = self.dataset_bounds() {
                return (lo, hi);
            }
        }
        (start, end)
    }

    /// One full computation pass for the current filters.
    pub fn report(&self, filters: &FilterParams) -> Report {
        let (start, end) = self.resolve_period(&filters.period);

        let mut view: Vec<&Ticket> = filter_union(&self.table.tickets, start, end);
        if let AnalystFilter::Only { name } = &filters.analyst {
            view.retain(|t| t.analyst.as_deref() == Some(name.as_str()));
        }
        if !filters.statuses.is_empty() {
            view.retain(|t| filters.statuses.iter().any(|s| s == &t.status));
        }

        Report {
            period_start: start,
            period_end: end,
            analysts: summarize_analysts(&view, start, end, &self.config.closed_statuses),
            kpi: summary_kpi(&view, start, end, &self.config.closed_statuses),
            top_applications: top_applications(
                &view,
                &self.config.unspecified_application_label,
                TOP_APPLICATIONS_LIMIT,
            ),
            details: detail_rows(&view),
        }
    }
}
