//! Luno Trades - histórico de trades da Luno em CSV
//!
//! Lê credenciais, tokens e intervalo de datas de um `.env`, busca os trades
//! em janelas semanais pela API REST e acrescenta tudo em
//! `luno_trades_<run_id>.csv`.

pub mod api_client;
pub mod config;
pub mod csv_writer;
pub mod dates;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod types;

pub use api_client::LunoClient;
pub use config::Config;
pub use error::{ErrorKind, FetcherError, Result};
pub use fetcher::{TradeFetcher, TradeSource};
pub use types::{DateRange, TradeRecord, Window};
