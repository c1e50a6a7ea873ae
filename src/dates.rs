//! Validação de datas `yyyy-mm-dd`
//!
//! Datas são interpretadas como meia-noite UTC, para que o mesmo `.env`
//! produza os mesmos timestamps em qualquer máquina.

use crate::config::Config;
use crate::error::{FetcherError, Result};
use crate::types::DateRange;
use chrono::{NaiveDate, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Nenhuma data igual ou anterior a esta é aceita.
pub const EARLIEST_DATE: &str = "2009-01-09";

/// Timestamp atual em milissegundos.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn date_to_ms(date: &str) -> Result<i64> {
    let parsed =
        NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|source| FetcherError::DateParse {
            date: date.to_string(),
            source,
        })?;
    Ok(parsed.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis())
}

/// Converte uma data em timestamp (ms) e valida o intervalo.
///
/// # Argumentos
/// * `date` - Data no formato `yyyy-mm-dd`
/// * `now_ms` - Instante atual em ms (limite superior, inclusivo)
///
/// # Retorno
/// Timestamp em ms, estritamente depois de 2009-01-09 e no máximo `now_ms`
pub fn parse_date_to_timestamp(date: &str, now_ms: i64) -> Result<i64> {
    let parsed = date_to_ms(date)?;
    let earliest = date_to_ms(EARLIEST_DATE)?;

    if parsed <= earliest || parsed > now_ms {
        return Err(FetcherError::DateOutOfRange {
            date: date.to_string(),
        });
    }

    Ok(parsed)
}

/// Valida `START_DATE` e `END_DATE` da configuração, nessa ordem.
pub fn validate_range(config: &Config, now_ms: i64) -> Result<DateRange> {
    let start = parse_date_to_timestamp(&config.start_date, now_ms)?;
    let end = parse_date_to_timestamp(&config.end_date, now_ms)?;
    Ok(DateRange { start, end })
}
