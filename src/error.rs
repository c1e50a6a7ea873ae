//! Erros do domínio
//!
//! Todas as falhas possíveis de uma execução ficam em um único enum fechado.
//! Nenhuma camada faz retry: o erro sobe com `?` até o `main`, que encerra
//! o processo com código 1.

use thiserror::Error;

/// Categoria de um erro, para o orquestrador decidir se para ou continua.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Validation,
    Precondition,
    Transport,
    Http,
    ResponseShape,
    Output,
}

#[derive(Error, Debug)]
pub enum FetcherError {
    /// Variáveis obrigatórias ausentes ou em branco (todas listadas).
    #[error("The following required environment variables are empty: {}", .keys.join(", "))]
    MissingConfig { keys: Vec<String> },

    #[error("Could not parse date {date:?} (expected yyyy-mm-dd): {source}")]
    DateParse {
        date: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error(
        "The date {date} is not within the valid range. Please check that your dates are correct and follow the yyyy-mm-dd format."
    )]
    DateOutOfRange { date: String },

    #[error("LUNO_API_KEY and LUNO_API_SECRET environment variables are required")]
    MissingCredentials,

    /// Falha de DNS/conexão antes de existir uma resposta HTTP.
    #[error("Network error: {reason}")]
    Transport { reason: String },

    /// Resposta não-2xx com corpo JSON.
    #[error("API Error: {message}")]
    Api { message: String },

    /// Resposta não-2xx com corpo que não é JSON.
    #[error("HTTP {status}: {reason}\nResponse: {body}")]
    Http {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("No trades found in response")]
    MissingTrades,

    #[error("Malformed trades in response: {0}")]
    InvalidTrades(String),

    /// Falha em uma janela de um par; `source` é o erro original.
    #[error("fetching {pair} [{since} .. {before}]")]
    Window {
        pair: String,
        since: i64,
        before: i64,
        #[source]
        source: Box<FetcherError>,
    },

    #[error("Could not decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetcherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingConfig { .. } => ErrorKind::Configuration,
            Self::DateParse { .. } | Self::DateOutOfRange { .. } => ErrorKind::Validation,
            Self::MissingCredentials => ErrorKind::Precondition,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Api { .. } | Self::Http { .. } => ErrorKind::Http,
            Self::MissingTrades | Self::InvalidTrades(_) | Self::Decode(_) => {
                ErrorKind::ResponseShape
            }
            Self::Csv(_) | Self::Io(_) => ErrorKind::Output,
            Self::Window { source, .. } => source.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetcherError>;
