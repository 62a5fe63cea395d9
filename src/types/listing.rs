use serde::Deserialize;

/// A single advertisement on the OTC order book.
///
/// The exchange returns prices as decimal strings. Parsing is deferred
/// to the sampler so that one malformed listing never fails a whole
/// response.
#[derive(Clone, Debug, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub price: String,
}

impl Listing {
    pub fn new(price: impl Into<String>) -> Self {
        Listing { price: price.into() }
    }
}
