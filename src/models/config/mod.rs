use std::path::Path;

mod error;
mod monitor_config;

pub use error::ConfigError;
pub use monitor_config::MonitorConfig;

/// Common interface for loading configuration files
pub trait ConfigLoader: Sized {
	fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	fn validate(&self) -> Result<(), String>;

	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}
}
