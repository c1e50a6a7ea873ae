mod common;

use common::serve_once;
use luno_trades::api_client::TradeQuery;
use luno_trades::{ErrorKind, FetcherError, LunoClient, TradeSource};

#[tokio::test]
async fn sends_authenticated_get_with_encoded_query() {
    let body = r#"{"trades":[{"pair":"XBTZAR","price":"100.00","volume":"0.5"}]}"#;
    let (url, request) = serve_once("200 OK", "application/json", body).await;

    let client = LunoClient::with_base_url(&url, "key", "secret").unwrap();
    let trades = client
        .list_trades("XBT", "ZAR", 1_588_291_200_000, 1_588_896_000_000)
        .await
        .unwrap();

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].get("price").unwrap(), "100.00");

    let request = request.await.unwrap();
    let first_line = request.lines().next().unwrap();
    assert_eq!(
        first_line,
        "GET /api/1/listtrades?pair=XBTZAR&since=1588291200000&before=1588896000000&limit=1000 HTTP/1.1"
    );
    assert!(
        request
            .to_ascii_lowercase()
            .contains("authorization: basic a2v5onnly3jlda==")
    );
}

#[tokio::test]
async fn http_400_with_json_surfaces_message() {
    let (url, _request) =
        serve_once("400 Bad Request", "application/json", r#"{"message":"bad pair"}"#).await;

    let client = LunoClient::with_base_url(&url, "key", "secret").unwrap();
    let err = client.call(&TradeQuery::new("XXX", "ZAR", 1, 2)).await.unwrap_err();

    assert!(matches!(err, FetcherError::Api { .. }));
    assert!(err.to_string().contains("bad pair"));
    assert_eq!(err.kind(), ErrorKind::Http);
}

#[tokio::test]
async fn http_500_with_text_surfaces_raw_body() {
    let (url, _request) =
        serve_once("500 Internal Server Error", "text/plain", "upstream is down").await;

    let client = LunoClient::with_base_url(&url, "key", "secret").unwrap();
    let err = client.list_trades("XBT", "ZAR", 1, 2).await.unwrap_err();

    match &err {
        FetcherError::Http { status, .. } => assert_eq!(*status, 500),
        other => panic!("erro inesperado: {other:?}"),
    }
    assert!(err.to_string().contains("upstream is down"));
}

#[tokio::test]
async fn success_without_trades_key_is_an_error() {
    let (url, _request) = serve_once("200 OK", "application/json", r#"{"foo":1}"#).await;

    let client = LunoClient::with_base_url(&url, "key", "secret").unwrap();
    let err = client.list_trades("XBT", "ZAR", 1, 2).await.unwrap_err();

    assert!(matches!(err, FetcherError::MissingTrades));
    assert_eq!(err.kind(), ErrorKind::ResponseShape);
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{}/api/1/listtrades", addr);
    let client = LunoClient::with_base_url(&url, "key", "secret").unwrap();
    let err = client.list_trades("XBT", "ZAR", 1, 2).await.unwrap_err();

    assert!(matches!(err, FetcherError::Transport { .. }));
    assert!(err.to_string().starts_with("Network error:"));
}
