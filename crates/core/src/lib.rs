pub mod config;
pub mod gate;
pub mod listing;
pub mod orchestrator;
pub mod progress;
pub mod storage;
pub mod testing;
pub mod transport;

pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use gate::{gate, Gate, GateMonitor};
pub use listing::{normalize, DownloadStep, ItemKind, RemoteItem, ANONYMOUS_EXT};
pub use orchestrator::{CountPolicy, DownloadOrchestrator, DownloaderConfig, OrchestratorError};
pub use progress::{ProgressPublisher, ProgressSnapshot, TaskState};
pub use storage::ReportStorage;
pub use transport::{DeviceTransport, DownloadVariant, RemoteEntry, TransportError};
