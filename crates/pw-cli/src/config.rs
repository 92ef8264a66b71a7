//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use pw_core::DEFAULT_SENTINEL;

/// Application configuration.
///
/// Column roles default to the service-use export this tool grew up on; any
/// of them can be remapped through the config file or `PW_*` environment
/// variables when the input uses different headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory that receives the output tables.
    pub output_dir: PathBuf,

    /// Column holding the entity identifier.
    pub entity_column: String,

    /// Column holding the category label.
    pub category_column: String,

    /// Column holding the setting attribute.
    pub setting_column: String,

    /// Column holding the start date.
    pub start_column: String,

    /// Column holding the end date.
    pub end_column: String,

    /// chrono format string for the two date columns.
    pub date_format: String,

    /// Reserved marker for missing group values.
    pub missing_sentinel: String,

    /// End date substituted for still-open records, in `date_format`.
    /// Rows with no end date are dropped when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_end_date: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            entity_column: "ClientID".to_owned(),
            category_column: "WardTeam".to_owned(),
            setting_column: "Setting".to_owned(),
            start_column: "ReferralDate".to_owned(),
            end_column: "ReferralDischarge".to_owned(),
            date_format: "%d/%m/%Y".to_owned(),
            missing_sentinel: DEFAULT_SENTINEL.to_owned(),
            fallback_end_date: None,
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (PW_*)
        figment = figment.merge(Env::prefixed("PW_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for pw.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pw"))
}
