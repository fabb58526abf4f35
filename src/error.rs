use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de entrada/saída: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Colunas obrigatórias ausentes: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Arquivo vazio ou sem dados")]
    EmptyFile,

    #[error("Nenhuma estratégia de leitura conseguiu interpretar o arquivo")]
    UnparsableTable,

    #[error("{0}")]
    Custom(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
