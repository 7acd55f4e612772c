use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// A taxonomia segue o que os stores realmente enxergam: rejeição remota
// (resposta não-2xx), falha de rede (a requisição nem completou), resposta
// ou snapshot ilegível, e violação de precondição na hierarquia.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("O servidor rejeitou a requisição ({status}): {message}")]
    RemoteRejected { status: u16, message: String },

    #[error("Falha de rede: {0}")]
    Network(#[source] anyhow::Error),

    #[error("Resposta ou snapshot ilegível")]
    Parse(#[from] serde_json::Error),

    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Falha no armazenamento local")]
    Storage(#[source] std::io::Error),

    #[error("Um usuário não pode ser subordinado de si mesmo")]
    SelfAssignment,

    #[error("A atribuição criaria um ciclo na hierarquia")]
    CycleDetected,

    // Variante genérica para qualquer outro erro inesperado.
    #[error("Erro interno do cliente")]
    Internal(#[source] anyhow::Error),
}

impl ClientError {
    // Constrói a variante de rede a partir de qualquer causa.
    pub fn network(cause: impl Into<anyhow::Error>) -> Self {
        ClientError::Network(cause.into())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        // Uma resposta com status de erro vira rejeição remota; o resto
        // (DNS, conexão recusada, timeout) é falha de rede.
        match err.status() {
            Some(status) => ClientError::RemoteRejected {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => ClientError::Network(err.into()),
        }
    }
}
