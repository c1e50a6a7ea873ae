//! Orquestração: tokens × janelas semanais
//!
//! Para cada token, o intervalo de datas é quebrado em janelas de até 7 dias.
//! Cada janela vira uma chamada à API e o lote devolvido é acrescentado ao
//! CSV da execução. Tudo é sequencial; o primeiro erro aborta a execução e o
//! que já foi escrito fica no disco.

use crate::csv_writer::append_trades;
use crate::error::{FetcherError, Result};
use crate::types::{DateRange, TradeRecord, Window};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// Uma semana em milissegundos.
pub const WEEK_MS: i64 = 604_800 * 1000;

/// Fonte de trades por janela. Implementada pelo `LunoClient`.
#[async_trait]
pub trait TradeSource: Send + Sync {
    async fn list_trades(
        &self,
        token: &str,
        currency: &str,
        since: i64,
        before: i64,
    ) -> Result<Vec<TradeRecord>>;
}

#[async_trait]
impl<T: TradeSource + ?Sized> TradeSource for &T {
    async fn list_trades(
        &self,
        token: &str,
        currency: &str,
        since: i64,
        before: i64,
    ) -> Result<Vec<TradeRecord>> {
        (**self).list_trades(token, currency, since, before).await
    }
}

/// Quebra `[start, end]` em janelas de no máximo `size` ms.
///
/// Cada janela termina em `min(inicio + size, end)` e a próxima começa 1 ms
/// depois. Se `start >= end` não há janelas.
///
/// # Exemplo
/// `split_windows(0, 1_000_000_000, WEEK_MS)` →
/// `[(0, 604800000), (604800001, 1000000000)]`
pub fn split_windows(start: i64, end: i64, size: i64) -> Vec<Window> {
    let mut windows = Vec::new();
    let mut cursor = start;

    while cursor < end {
        let upper = cursor.saturating_add(size).min(end);
        windows.push(Window::new(cursor, upper));
        cursor = upper + 1;
    }

    windows
}

/// Nome do CSV de uma execução.
pub fn output_filename(run_id: i64) -> String {
    format!("luno_trades_{}.csv", run_id)
}

/// Totais de uma execução completa.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub tokens: usize,
    pub windows: usize,
    pub trades: usize,
}

pub struct TradeFetcher<S: TradeSource> {
    source: S,
    output_path: PathBuf,
}

impl<S: TradeSource> TradeFetcher<S> {
    pub fn new(source: S, output_path: PathBuf) -> Self {
        Self {
            source,
            output_path,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Busca todos os trades de todos os tokens no intervalo.
    ///
    /// # Argumentos
    /// * `tokens` - Tokens na ordem da configuração
    /// * `currency` - Moeda de cotação (o par é `token + currency`)
    /// * `range` - Intervalo já validado
    ///
    /// # Retorno
    /// Totais da execução, ou o primeiro erro encontrado
    pub async fn run(
        &self,
        tokens: &[String],
        currency: &str,
        range: DateRange,
    ) -> Result<FetchSummary> {
        let mut summary = FetchSummary::default();

        for token in tokens {
            for window in split_windows(range.start, range.end, WEEK_MS) {
                let written = self
                    .fetch_window(token, currency, window)
                    .await
                    .map_err(|source| FetcherError::Window {
                        pair: format!("{}{}", token, currency),
                        since: window.start,
                        before: window.end,
                        source: Box::new(source),
                    })?;

                info!(
                    "{}{} [{} .. {}]: {} trades",
                    token, currency, window.start, window.end, written
                );

                summary.windows += 1;
                summary.trades += written;
            }
            summary.tokens += 1;
        }

        Ok(summary)
    }

    async fn fetch_window(&self, token: &str, currency: &str, window: Window) -> Result<usize> {
        let trades = self
            .source
            .list_trades(token, currency, window.start, window.end)
            .await?;
        append_trades(&trades, &self.output_path)
    }
}
