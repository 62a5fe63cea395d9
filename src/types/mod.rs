pub mod listing;
pub mod rate;

pub use listing::Listing;
pub use rate::RateRecord;
