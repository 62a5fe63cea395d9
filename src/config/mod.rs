use serde::{Deserialize, Serialize};

use crate::sampler::SampleWindow;

pub mod loader;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SamplerConfig {
    /// First order book position included in the sample.
    pub window_start: usize,
    /// One past the last position included.
    pub window_end: usize,
    /// Seconds between passes. Absent means one pass per invocation,
    /// for cron-driven deployments.
    pub poll_interval_secs: Option<u64>,
}

impl SamplerConfig {
    pub fn window(&self) -> SampleWindow {
        SampleWindow::new(self.window_start, self.window_end)
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig {
            window_start: 1, // position 0 is the promoted listing
            window_end: 10,
            poll_interval_secs: None,
        }
    }
}
