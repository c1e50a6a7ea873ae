//! Inicialização do tracing
//!
//! O nível geral vem de `RUST_LOG` (padrão `info`). O diagnóstico das
//! chamadas à API (URL, parâmetros, status e corpo de erro) é sempre exibido,
//! qualquer que seja `RUST_LOG`.

use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

/// Diretiva fixa para o diagnóstico do cliente HTTP.
pub const API_DIAGNOSTICS: &str = "luno_trades::api_client=info";

/// Monta o filtro a partir do valor de `RUST_LOG`.
pub fn env_filter(rust_log: Option<&str>) -> EnvFilter {
    let filter = rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    match API_DIAGNOSTICS.parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Instala o subscriber global, escrevendo na saída padrão.
pub fn init() {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(rust_log.as_deref()))
        .with_writer(std::io::stdout)
        .init();
}
