use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Immutable engine configuration: the bilingual alias/keyword tables that
/// drive column normalization, closed-status detection and type
/// classification. Built once (usually via `Default`) and passed explicitly
/// into each component so they stay testable in isolation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Canonical column name → raw header aliases, in priority order.
    /// Matching is case-sensitive exact, against trimmed headers.
    pub column_aliases: Vec<(String, Vec<String>)>,
    /// Statuses counted as terminal (PT + EN), matched exactly.
    pub closed_statuses: HashSet<String>,
    /// Substring keywords marking an incident. Checked before requests.
    pub incident_keywords: Vec<String>,
    /// Substring keywords marking a service request.
    pub request_keywords: Vec<String>,
    /// Bucket label for rows without an application value.
    pub unspecified_application_label: String,
}

/// Aliases observed in Jira/Sheets exports, PT and EN. First match wins.
const COLUMN_ALIASES: &[(&str, &[&str])] = &[
    (
        "analyst",
        &[
            "Responsável",
            "Responsavel",
            "Assignee",
            "Assignee display name",
            "Atribuído a",
            "Atribuido a",
            "Owner",
            "Agent",
            "Atendente",
        ],
    ),
    ("status", &["Status", "Status name", "State"]),
    (
        "created",
        &[
            "Criado",
            "Created",
            "Data de criação",
            "Created date",
            "Data de criação do ticket",
            "Created Time",
            "Data de abertura",
        ],
    ),
    (
        "resolved",
        &[
            "Resolvido",
            "Resolved",
            "Resolution date",
            "Data de resolução",
            "Data de conclusão",
            "Resolved Time",
            "Data de fechamento",
            "Fechado em",
        ],
    ),
    (
        "project",
        &["Nome do projeto", "Project name", "Projeto", "Project"],
    ),
    (
        "summary",
        &["Resumo", "Summary", "Assunto", "Title", "Título"],
    ),
    (
        "description",
        &["Descrição", "Description", "Detalhes", "Details"],
    ),
    (
        "application",
        &[
            "Campo personalizado (Application/Software)",
            "Application/Software",
            "Aplicação",
            "Aplicacao",
            "Sistema",
            "App",
            "Application",
        ],
    ),
    (
        "issue_type",
        &[
            "Tipo",
            "Issue Type",
            "Tipo de solicitação",
            "Tipo de solicitacao",
            "Type",
        ],
    ),
];

const CLOSED_STATUSES: &[&str] = &[
    "Resolvido",
    "Fechada",
    "Concluído",
    "Cancelado",
    "Closed",
    "Done",
    "Resolved",
    "Canceled",
    "Cancelled",
    "Completed",
];

const INCIDENT_KEYWORDS: &[&str] = &["incident", "incidente"];

const REQUEST_KEYWORDS: &[&str] = &[
    "request",
    "solicita",
    "requisição",
    "requisicao",
    "service request",
];

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            column_aliases: COLUMN_ALIASES
                .iter()
                .map(|(canonical, aliases)| {
                    (
                        canonical.to_string(),
                        aliases.iter().map(|a| a.to_string()).collect(),
                    )
                })
                .collect(),
            closed_statuses: CLOSED_STATUSES.iter().map(|s| s.to_string()).collect(),
            incident_keywords: INCIDENT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            request_keywords: REQUEST_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            unspecified_application_label: "Não informado".to_string(),
        }
    }
}
