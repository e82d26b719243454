use crate::backend::{FileBackend, HttpBackend, TemplateBackend};
use crate::statics;
use clap::Parser;
use std::{path::PathBuf, sync::Arc, time::Duration};

/// Administration console for SCADA signal templates.
#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct ConsoleConfig {
    /// Base URL of the configuration backend API
    #[arg(long, env = "SCADA_CONSOLE_API_URL", default_value = statics::DEFAULT_API_URL)]
    pub api_url: String,

    /// Edit a local templates JSON file instead of talking to the backend
    #[arg(long, env = "SCADA_CONSOLE_TEMPLATES_FILE")]
    pub templates_file: Option<PathBuf>,

    /// HTTP request timeout in seconds (no timeout when unset)
    #[arg(long, env = "SCADA_CONSOLE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// How often the dashboard refreshes template statistics
    #[arg(long, env = "SCADA_CONSOLE_STATS_REFRESH_SECS", default_value_t = 30)]
    pub stats_refresh_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: statics::DEFAULT_API_URL.to_string(),
            templates_file: None,
            timeout_secs: None,
            stats_refresh_secs: 30,
        }
    }
}

impl ConsoleConfig {
    pub fn stats_refresh(&self) -> Duration {
        Duration::from_secs(self.stats_refresh_secs.max(1))
    }

    /// The backend selected by this configuration: the local file when one is given.
    pub fn backend(&self) -> anyhow::Result<Arc<dyn TemplateBackend>> {
        if let Some(path) = &self.templates_file {
            return Ok(Arc::new(FileBackend::new(path.clone())));
        }
        let timeout = self.timeout_secs.map(Duration::from_secs);
        Ok(Arc::new(HttpBackend::new(&self.api_url, timeout)?))
    }
}
