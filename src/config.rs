//! Configuração via arquivo `.env` e variáveis de ambiente
//!
//! A configuração é lida uma única vez no início e vira uma `Config`
//! imutável, passada por referência para quem precisa. Nada é escrito de
//! volta no ambiente do processo.

use crate::error::{FetcherError, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

pub const LUNO_API_KEY: &str = "LUNO_API_KEY";
pub const LUNO_API_SECRET: &str = "LUNO_API_SECRET";
pub const TOKENS: &str = "TOKENS";
pub const CURRENCY: &str = "CURRENCY";
pub const START_DATE: &str = "START_DATE";
pub const END_DATE: &str = "END_DATE";

/// Chaves obrigatórias, na ordem em que são reportadas quando faltam.
pub const REQUIRED_KEYS: [&str; 6] = [
    LUNO_API_KEY,
    LUNO_API_SECRET,
    TOKENS,
    CURRENCY,
    START_DATE,
    END_DATE,
];

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_secret: String,
    pub tokens: Vec<String>,
    pub currency: String,
    pub start_date: String,
    pub end_date: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("tokens", &self.tokens)
            .field("currency", &self.currency)
            .field("start_date", &self.start_date)
            .field("end_date", &self.end_date)
            .finish()
    }
}

impl Config {
    /// Carrega a configuração a partir de um arquivo `.env`.
    ///
    /// Valores do arquivo têm precedência sobre o ambiente do processo. Se o
    /// arquivo não existir, apenas o ambiente é consultado.
    ///
    /// # Retorno
    /// `Err(MissingConfig)` listando todas as chaves ausentes ou em branco
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, |key| dotenvy::var(key).ok())
    }

    /// Igual a `load`, com a busca no ambiente injetada.
    pub fn load_with<F>(path: &Path, env_lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_file = if path.exists() {
            let entries = read_env_file(path)?;
            info!("Configuração lida de {}", path.display());
            entries
        } else {
            debug!("{} não existe, usando apenas o ambiente", path.display());
            HashMap::new()
        };

        Self::from_lookup(|key| from_file.get(key).cloned().or_else(|| env_lookup(key)))
    }

    /// Monta a configuração a partir de uma função de busca por chave.
    ///
    /// Validação tudo-ou-nada: se qualquer chave faltar, nenhuma `Config` é
    /// criada e o erro nomeia todas as chaves que faltaram.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut values = HashMap::new();
        let mut missing = Vec::new();

        for key in REQUIRED_KEYS {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => {
                    values.insert(key, value);
                }
                _ => missing.push(key.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(FetcherError::MissingConfig { keys: missing });
        }

        let mut take = |key: &str| values.remove(key).unwrap_or_default();

        Ok(Self {
            api_key: take(LUNO_API_KEY),
            api_secret: take(LUNO_API_SECRET),
            tokens: parse_tokens(&take(TOKENS)),
            currency: take(CURRENCY),
            start_date: take(START_DATE),
            end_date: take(END_DATE),
        })
    }
}

/// Lê as entradas `KEY=VALUE` de um arquivo `.env`.
///
/// Linhas vazias, comentários (`#`) e linhas sem `=` são ignorados. O valor é
/// tudo depois do primeiro `=`, sem aspas simples ou duplas ao redor. Nada é
/// expandido: `$` é mantido literalmente.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents.lines().filter_map(parse_env_line).collect())
}

fn parse_env_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    let value = value.trim();
    let value = ['"', '\'']
        .iter()
        .find_map(|&quote| {
            value
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        })
        .unwrap_or(value);

    Some((key.trim().to_string(), value.to_string()))
}

/// Separa a lista de tokens por vírgula, removendo espaços ao redor.
pub fn parse_tokens(raw: &str) -> Vec<String> {
    raw.split(',').map(|token| token.trim().to_string()).collect()
}
