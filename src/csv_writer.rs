//! Escrita incremental do CSV de trades

use crate::error::Result;
use crate::types::{TradeRecord, TRADE_FIELDS};
use serde_json::Value;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

/// Converte um valor JSON em célula do CSV.
///
/// Strings saem como estão; `null` vira célula vazia; números, booleanos e
/// estruturas aninhadas saem como texto JSON.
pub fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Acrescenta um lote de trades ao arquivo CSV.
///
/// O cabeçalho só é escrito se o arquivo não existia antes desta chamada, então
/// chamadas repetidas na mesma execução nunca duplicam o cabeçalho.
///
/// # Argumentos
/// * `trades` - Lote devolvido por uma janela da API
/// * `path` - Arquivo de saída da execução
///
/// # Retorno
/// Número de linhas de dados escritas
pub fn append_trades(trades: &[TradeRecord], path: &Path) -> Result<usize> {
    let file_exists = path.exists();

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if !file_exists {
        writer.write_record(TRADE_FIELDS)?;
        debug!("Cabeçalho escrito em {}", path.display());
    }

    for trade in trades {
        writer.write_record(TRADE_FIELDS.iter().map(|field| render_cell(trade.get(field))))?;
    }

    writer.flush()?;
    Ok(trades.len())
}
