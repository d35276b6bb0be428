pub mod disease;
pub mod remedy;

pub use disease::Disease;
pub use remedy::{Remedy, RemedyLookup, SummaryResponse};
