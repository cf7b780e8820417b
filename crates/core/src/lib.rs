pub mod config;
pub mod encoder;
pub mod orchestrator;
pub mod testing;
pub mod upload;
pub mod usage;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, CounterBackend, CounterStoreConfig, DeploymentMode, EncoderConfig,
    SanitizedConfig, ServerConfig, UploadConfig, UpstashConfig,
};
pub use encoder::{
    EncodedImage, EncoderError, ImageEncoder, ImageKind, OutputFormat, StandardEncoder,
    ALLOWED_MIME_TYPES,
};
pub use orchestrator::{BatchError, BatchReport, ConversionOrchestrator, ConversionResult, FileOutcome};
pub use upload::{
    validate_batch, StagedFile, StagingArea, StagingError, StagingWriter, UploadedFile,
    ValidationError,
};
pub use usage::{
    create_counter_store, CounterStore, SqliteCounterStore, StoreError, UpstashCounterStore,
    UsageCounters, UsageTotals,
};
