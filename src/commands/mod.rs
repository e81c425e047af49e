pub mod adjust;
pub mod annotate;
pub mod dedup;
pub mod enrich;

use crate::utils::{MenrichError, Result};
use rayon::ThreadPoolBuilder;

pub(crate) fn initialize_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    log::debug!("Initializing thread pool with {} threads...", num_threads);
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("menrich-{}", i))
        .build()
        .map_err(|e| MenrichError::ThreadPool(e.to_string()))
}
