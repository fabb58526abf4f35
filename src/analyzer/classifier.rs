use crate::config::EngineConfig;
use crate::parser::types::TicketKind;

/// Derive the normalized ticket category from the free-text type and
/// project fields. Pure per-row function, computed once at load.
///
/// Incident keywords take precedence over request keywords, so
/// "Service Request - Incidente" classifies as Incident. Matching is
/// substring on the lowercased concatenation; no accent folding beyond
/// the literal variants in the keyword tables.
pub fn classify(
    issue_type: Option<&str>,
    project: Option<&str>,
    config: &EngineConfig,
) -> TicketKind {
    let mut text = String::new();
    for field in [issue_type, project].into_iter().flatten() {
        text.push(' ');
        text.push_str(field);
    }
    let text = text.to_lowercase();

    if config.incident_keywords.iter().any(|k| text.contains(k.as_str())) {
        return TicketKind::Incident;
    }
    if config.request_keywords.iter().any(|k| text.contains(k.as_str())) {
        return TicketKind::Request;
    }
    TicketKind::Other
}
