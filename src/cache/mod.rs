mod cache;
mod clock;

pub use cache::{CacheEntry, ResultCache};
pub use clock::{Clock, ManualClock, SystemClock};
