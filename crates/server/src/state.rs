use imagepress_core::{Config, ConversionOrchestrator, StagingArea, UsageCounters};

/// Shared application state
pub struct AppState {
    config: Config,
    staging: StagingArea,
    orchestrator: ConversionOrchestrator,
    usage: UsageCounters,
}

impl AppState {
    pub fn new(config: Config, orchestrator: ConversionOrchestrator, usage: UsageCounters) -> Self {
        let staging = StagingArea::from_config(&config.uploads);
        Self {
            config,
            staging,
            orchestrator,
            usage,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    pub fn orchestrator(&self) -> &ConversionOrchestrator {
        &self.orchestrator
    }

    pub fn usage(&self) -> &UsageCounters {
        &self.usage
    }
}
