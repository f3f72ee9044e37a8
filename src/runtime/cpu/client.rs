//! CPU client and parallelism configuration

use crate::error::Result;
#[cfg(feature = "rayon")]
use crate::error::Error;
#[cfg(feature = "rayon")]
use std::sync::Arc;

/// Default lower bound on destination rows handed to one rayon task
const DEFAULT_MIN_ROWS_PER_TASK: usize = 16;

/// Parallelism settings for CPU kernels
///
/// The results of every kernel are independent of these settings; they only
/// affect scheduling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParallelismConfig {
    max_num_threads: Option<usize>,
    min_rows_per_task: usize,
}

impl ParallelismConfig {
    /// Use the global rayon pool with the default task granularity
    pub fn new() -> Self {
        Self {
            max_num_threads: None,
            min_rows_per_task: DEFAULT_MIN_ROWS_PER_TASK,
        }
    }

    /// Cap the number of worker threads (`None` = global rayon pool)
    pub fn with_max_num_threads(mut self, threads: Option<usize>) -> Self {
        self.max_num_threads = threads;
        self
    }

    /// Minimum number of destination rows processed by one task
    ///
    /// Values below 1 are clamped to 1.
    pub fn with_min_rows_per_task(mut self, rows: usize) -> Self {
        self.min_rows_per_task = rows.max(1);
        self
    }

    /// Thread cap, if any
    pub fn max_num_threads(&self) -> Option<usize> {
        self.max_num_threads
    }

    /// Minimum rows per task
    pub fn min_rows_per_task(&self) -> usize {
        self.min_rows_per_task
    }
}

impl Default for ParallelismConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// CPU client for operation dispatch
///
/// Cheap to clone; clones share the same thread pool.
#[derive(Clone, Debug)]
pub struct CpuClient {
    config: ParallelismConfig,
    #[cfg(feature = "rayon")]
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl CpuClient {
    /// Create a client that runs on the global rayon pool
    pub fn new() -> Self {
        Self {
            config: ParallelismConfig::new(),
            #[cfg(feature = "rayon")]
            pool: None,
        }
    }

    /// Create a client with explicit parallelism settings
    ///
    /// A thread cap builds a private pool owned by this client (and its
    /// clones). Without the `rayon` feature the cap is ignored and kernels
    /// run sequentially.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the cap is zero or the pool
    /// cannot be built.
    ///
    /// [`Error::InvalidArgument`]: crate::error::Error::InvalidArgument
    pub fn with_parallelism(config: ParallelismConfig) -> Result<Self> {
        #[cfg(feature = "rayon")]
        {
            let pool = match config.max_num_threads {
                Some(0) => {
                    return Err(Error::invalid_argument(
                        "max_num_threads",
                        "must be at least 1",
                    ));
                }
                Some(threads) => {
                    let pool = rayon::ThreadPoolBuilder::new()
                        .num_threads(threads)
                        .thread_name(|i| format!("gspmm-cpu-{i}"))
                        .build()
                        .map_err(|e| Error::invalid_argument("max_num_threads", e.to_string()))?;
                    log::debug!("built private rayon pool with {threads} threads");
                    Some(Arc::new(pool))
                }
                None => None,
            };
            Ok(Self { config, pool })
        }

        #[cfg(not(feature = "rayon"))]
        {
            if config.max_num_threads.is_some() {
                log::debug!("rayon feature disabled, ignoring max_num_threads");
            }
            Ok(Self { config })
        }
    }

    /// The parallelism settings of this client
    pub fn parallelism(&self) -> &ParallelismConfig {
        &self.config
    }

    /// Minimum rayon split length for row-parallel kernels
    #[cfg(feature = "rayon")]
    #[inline]
    pub(crate) fn rayon_min_len(&self) -> usize {
        self.config.min_rows_per_task
    }

    /// Run `f` inside this client's thread pool
    ///
    /// Rayon parallel iterators inside `f` use the private pool when one is
    /// configured, the global pool otherwise.
    #[cfg(feature = "rayon")]
    pub(crate) fn install_parallelism<R, F>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}

impl Default for CpuClient {
    fn default() -> Self {
        Self::new()
    }
}
