pub mod change_detector;
pub mod recent_cache;

pub use change_detector::is_new;
pub use recent_cache::{update_cache, CACHE_LIMIT};
