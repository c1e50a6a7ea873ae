//! Tipos e estruturas de dados

use serde::Deserialize;
use serde_json::{Map, Value};

/// Colunas do CSV, na ordem em que a Luno devolve os campos de um trade.
pub const TRADE_FIELDS: [&str; 13] = [
    "base",
    "client_order_id",
    "counter",
    "fee_base",
    "fee_counter",
    "is_buy",
    "order_id",
    "pair",
    "price",
    "sequence",
    "timestamp",
    "type",
    "volume",
];

/// Um trade como veio da API.
///
/// Os campos não são interpretados: o objeto JSON é repassado intacto até o
/// CSV. Campo ausente vira célula vazia.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct TradeRecord(pub Map<String, Value>);

impl TradeRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

/// Intervalo de datas já validado, em milissegundos desde a epoch.
///
/// `start < end` não é exigido: um intervalo invertido só não gera janelas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: i64,
    pub end: i64,
}

/// Sub-intervalo de no máximo uma semana, unidade de uma chamada à API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: i64, // since
    pub end: i64,   // before
}

impl Window {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }
}
