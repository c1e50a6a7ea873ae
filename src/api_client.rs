//! Cliente HTTP da API REST da Luno (`/api/1/listtrades`)
//!
//! Cada chamada é um GET autenticado com HTTP Basic. Erros HTTP e de
//! transporte viram `FetcherError`; nunca é devolvido um resultado parcial.

use crate::error::{FetcherError, Result};
use crate::fetcher::TradeSource;
use crate::types::TradeRecord;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{info, warn};

pub const LUNO_API_URL: &str = "https://api.luno.com/api/1/listtrades";

/// Máximo de trades por requisição aceito pela Luno.
pub const LIST_TRADES_LIMIT: u32 = 1000;

/// Parâmetros de uma consulta de trades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeQuery {
    pub pair: String,
    pub since: i64,
    pub before: i64,
    pub limit: u32,
}

impl TradeQuery {
    pub fn new(token: &str, currency: &str, since: i64, before: i64) -> Self {
        Self {
            pair: format!("{}{}", token, currency),
            since,
            before,
            limit: LIST_TRADES_LIMIT,
        }
    }

    /// Parâmetros da query string, na ordem em que vão na URL.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("pair", self.pair.clone()),
            ("since", self.since.to_string()),
            ("before", self.before.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

/// Valor do header `Authorization` para HTTP Basic.
pub fn basic_auth_header(api_key: &str, api_secret: &str) -> String {
    let credentials = format!("{}:{}", api_key, api_secret);
    format!("Basic {}", STANDARD.encode(credentials.as_bytes()))
}

/// Monta o erro de uma resposta não-2xx.
///
/// Se o corpo for JSON, usa o campo `message` (ou o corpo inteiro, se não
/// houver). Se não for JSON, devolve status, motivo e corpo cru.
pub fn http_error(status: StatusCode, body: &str) -> FetcherError {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => {
            let message = match json.get("message") {
                Some(Value::String(message)) => message.clone(),
                Some(other) => other.to_string(),
                None => body.to_string(),
            };
            FetcherError::Api { message }
        }
        Err(_) => FetcherError::Http {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            body: body.to_string(),
        },
    }
}

/// Extrai a lista `trades` de uma resposta já decodificada.
///
/// `trades` ausente é erro. `trades: null` é tratado como lote vazio.
pub fn extract_trades(response: Value) -> Result<Vec<TradeRecord>> {
    let trades = match response {
        Value::Object(mut map) => map.remove("trades").ok_or(FetcherError::MissingTrades)?,
        _ => return Err(FetcherError::MissingTrades),
    };

    if trades.is_null() {
        return Ok(Vec::new());
    }

    serde_json::from_value(trades).map_err(|e| FetcherError::InvalidTrades(e.to_string()))
}

fn transport_error(err: reqwest::Error) -> FetcherError {
    let mut reason = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(inner) = source {
        reason.push_str(": ");
        reason.push_str(&inner.to_string());
        source = inner.source();
    }
    FetcherError::Transport { reason }
}

pub struct LunoClient {
    client: Client,
    base_url: String,
    auth_header: String,
}

impl LunoClient {
    /// Cria cliente apontando para a API pública da Luno.
    pub fn new(api_key: &str, api_secret: &str) -> Result<Self> {
        Self::with_base_url(LUNO_API_URL, api_key, api_secret)
    }

    /// Cria cliente com URL customizada (usado em testes).
    ///
    /// Credenciais em branco falham aqui, antes de qualquer requisição.
    pub fn with_base_url(base_url: &str, api_key: &str, api_secret: &str) -> Result<Self> {
        if api_key.trim().is_empty() || api_secret.trim().is_empty() {
            return Err(FetcherError::MissingCredentials);
        }

        Ok(Self {
            client: Client::new(),
            base_url: base_url.to_string(),
            auth_header: basic_auth_header(api_key, api_secret),
        })
    }

    /// Executa uma consulta e devolve o JSON da resposta.
    pub async fn call(&self, query: &TradeQuery) -> Result<Value> {
        let params = query.params();
        let request = self
            .client
            .get(&self.base_url)
            .query(&params)
            .header(AUTHORIZATION, &self.auth_header)
            .build()
            .map_err(transport_error)?;

        info!("URL: {}", request.url());
        info!("Params: {:?}", params);

        let response = self.client.execute(request).await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            warn!(
                "HTTP Error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            );
            warn!("Error body: {}", body);
            return Err(http_error(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TradeSource for LunoClient {
    async fn list_trades(
        &self,
        token: &str,
        currency: &str,
        since: i64,
        before: i64,
    ) -> Result<Vec<TradeRecord>> {
        let query = TradeQuery::new(token, currency, since, before);
        let response = self.call(&query).await?;
        extract_trades(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_header_is_base64_of_key_and_secret() {
        // base64("key:secret")
        assert_eq!(basic_auth_header("key", "secret"), "Basic a2V5OnNlY3JldA==");
    }

    #[test]
    fn query_params_follow_listtrades_contract() {
        let query = TradeQuery::new("XBT", "ZAR", 10, 20);
        assert_eq!(
            query.params(),
            vec![
                ("pair", "XBTZAR".to_string()),
                ("since", "10".to_string()),
                ("before", "20".to_string()),
                ("limit", "1000".to_string()),
            ]
        );
    }

    #[test]
    fn json_error_body_uses_message_field() {
        let err = http_error(StatusCode::BAD_REQUEST, r#"{"message":"bad pair"}"#);
        assert!(matches!(err, FetcherError::Api { .. }));
        assert!(err.to_string().contains("bad pair"));
    }

    #[test]
    fn json_error_body_without_message_falls_back_to_body() {
        let err = http_error(StatusCode::BAD_REQUEST, r#"{"error":"ErrInvalidPair"}"#);
        assert!(err.to_string().contains("ErrInvalidPair"));
    }

    #[test]
    fn non_json_error_body_is_kept_raw() {
        let err = http_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        match &err {
            FetcherError::Http { status, body, .. } => {
                assert_eq!(*status, 500);
                assert_eq!(body, "<html>oops</html>");
            }
            other => panic!("erro inesperado: {other:?}"),
        }
        assert!(err.to_string().contains("<html>oops</html>"));
    }

    #[test]
    fn missing_trades_key_is_an_error() {
        assert!(matches!(
            extract_trades(json!({"error": "nope"})),
            Err(FetcherError::MissingTrades)
        ));
        assert!(matches!(
            extract_trades(json!([])),
            Err(FetcherError::MissingTrades)
        ));
    }

    #[test]
    fn trades_are_passed_through() {
        let trades = extract_trades(json!({
            "trades": [{"pair": "XBTZAR", "price": "100.00", "extra": 1}]
        }))
        .unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].get("pair"), Some(&json!("XBTZAR")));
        assert_eq!(trades[0].get("extra"), Some(&json!(1)));

        assert!(extract_trades(json!({"trades": null})).unwrap().is_empty());
        assert!(matches!(
            extract_trades(json!({"trades": "x"})),
            Err(FetcherError::InvalidTrades(_))
        ));
    }

    #[test]
    fn blank_credentials_fail_before_any_request() {
        assert!(matches!(
            LunoClient::new("", "secret"),
            Err(FetcherError::MissingCredentials)
        ));
        assert!(matches!(
            LunoClient::new("key", "  "),
            Err(FetcherError::MissingCredentials)
        ));
    }
}
