//! Application context shared across route handlers via Axum state.

use std::sync::Arc;

use cm_av::ToolRegistry;
use cm_core::config::Config;
use tokio::sync::Semaphore;

/// Immutable, process-wide server state.
///
/// Configuration and tool paths are fixed at startup. `job_slots` bounds how
/// many ffmpeg processes may run at once; with the default of one, combine
/// requests are processed strictly one after another.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub tools: Arc<ToolRegistry>,
    pub job_slots: Arc<Semaphore>,
}

impl AppContext {
    pub fn new(config: Config, tools: ToolRegistry) -> Self {
        let slots = config.combine.max_concurrent_jobs.max(1);
        Self {
            config: Arc::new(config),
            tools: Arc::new(tools),
            job_slots: Arc::new(Semaphore::new(slots)),
        }
    }
}
