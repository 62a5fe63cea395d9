use crate::types::Listing;

/// Half-open range of order book positions considered for sampling.
///
/// Position 0 is excluded by default: the top advert on the OTC book is
/// routinely a promoted or bait quote and would skew the sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleWindow {
    pub start: usize,
    pub end: usize,
}

impl Default for SampleWindow {
    fn default() -> Self {
        SampleWindow { start: 1, end: 10 }
    }
}

impl SampleWindow {
    pub fn new(start: usize, end: usize) -> Self {
        SampleWindow { start, end }
    }

    fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// Reduces a page of order book listings to a single representative price.
///
/// Listings inside the window are parsed individually; anything that is
/// not a finite non-negative decimal is dropped without failing the
/// sample. Returns `None` when no listing in the window survives parsing.
#[derive(Clone, Debug, Default)]
pub struct PriceSampler {
    window: SampleWindow,
}

impl PriceSampler {
    pub fn new(window: SampleWindow) -> Self {
        PriceSampler { window }
    }

    pub fn window(&self) -> SampleWindow {
        self.window
    }

    pub fn compute(&self, listings: &[Listing]) -> Option<f64> {
        let prices: Vec<f64> = listings
            .iter()
            .skip(self.window.start)
            .take(self.window.len())
            .filter_map(|listing| parse_price(&listing.price))
            .collect();

        if prices.is_empty() {
            return None;
        }

        Some(median(prices))
    }
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price >= 0.0)
}

fn median(mut values: Vec<f64>) -> f64 {
    // Values are finite by construction, so the comparator is total.
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
