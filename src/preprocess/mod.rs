// Text preprocessing: abstract extraction, cleaning, stemming, and the
// parallel pool that runs it over a directory.

pub mod cleaner;
pub mod pool;
pub mod traits;
