use chrono::NaiveDateTime;
use serde::Serialize;

/// Rectangular table produced by the flexible reader, before any
/// column normalization. Every row has exactly `headers.len()` fields.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Delimiter the winning attempt used.
    pub delimiter: u8,
    /// Human label of the decoding that won ("utf-8", "latin-1", ...).
    pub decoding: &'static str,
    /// Rows discarded by a lenient attempt (wrong field count).
    pub discarded_rows: usize,
}

/// Normalized ticket category derived from free-text type/project fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TicketKind {
    Incident,
    Request,
    Other,
}

impl TicketKind {
    pub fn label(self) -> &'static str {
        match self {
            TicketKind::Incident => "Incident",
            TicketKind::Request => "Request",
            TicketKind::Other => "Outro",
        }
    }
}

/// One ticket after column normalization, date parsing and classification.
/// Immutable after load; all filtering produces borrowed views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub analyst: Option<String>,
    pub status: String,
    pub created: Option<NaiveDateTime>,
    pub resolved: Option<NaiveDateTime>,
    pub project: Option<String>,
    pub issue_type: Option<String>,
    pub application: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub normalized_type: TicketKind,
}

/// Load metadata handed to the presentation client alongside the table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSummary {
    pub total_rows: usize,
    pub discarded_rows: usize,
    pub unparsed_created: usize,
    pub unparsed_resolved: usize,
    pub delimiter: char,
    pub decoding: &'static str,
    pub parse_duration_ms: u64,
}

/// The loaded-and-normalized dataset for one uploaded file. Read-only for
/// the rest of the session; re-filtering never touches it.
#[derive(Debug, Clone)]
pub struct TicketTable {
    pub tickets: Vec<Ticket>,
    pub summary: LoadSummary,
}
