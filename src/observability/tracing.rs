use tracing::Span;
use tracing_subscriber::EnvFilter;

use crate::exchange::PairConfig;

/// Installs the global subscriber. Filtering follows `RUST_LOG`,
/// defaulting to `info`; set `RATEINFRA_LOG_FORMAT=json` for JSON output.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("RATEINFRA_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

pub fn trace_pair_sampling(pair: &PairConfig) -> Span {
    tracing::info_span!(
        "pair_sampling",
        from = %pair.from_currency,
        to = %pair.to_currency,
        payment_method = %pair.payment_method_id,
    )
}
