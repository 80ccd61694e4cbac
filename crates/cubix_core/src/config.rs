//! # Client Configuration
//!
//! Loaded once at startup from a TOML file. Every field has a default, so an
//! empty file is a valid configuration.
//!
//! ```toml
//! username = "builder"
//! view_distance = 256
//! fps_limit = "Limit120FPS"
//! classic_mode = true
//! ```

use std::path::Path;

use cubix_shared::{FpsLimitMethod, GameVersion, VersionId, DEFAULT_MAX_VIEWDIST, DEFAULT_VIEW_DISTANCE};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Startup configuration for the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Player name.
    pub username: String,
    /// Server verification key.
    pub mppass: String,
    /// Initial window width.
    pub width: i32,
    /// Initial window height.
    pub height: i32,
    /// Window title.
    pub title: String,
    /// Preferred view distance.
    pub view_distance: i32,
    /// Upper bound for the view distance.
    pub max_view_distance: i32,
    /// Frame pacing strategy.
    pub fps_limit: FpsLimitMethod,
    /// Classic protocol version (27..=30); ignored when CPE is enabled.
    pub protocol_version: Option<u8>,
    /// Behave like the classic 0.30 client.
    pub classic_mode: bool,
    /// Allow hacks while in classic mode.
    pub classic_hacks: bool,
    /// Allow custom block definitions.
    pub allow_custom_blocks: bool,
    /// Enable protocol extensions.
    pub use_cpe: bool,
    /// Allow servers to change textures.
    pub allow_server_textures: bool,
    /// Bob the camera while walking.
    pub view_bobbing: bool,
    /// Allow liquids to be broken and picked.
    pub breakable_liquids: bool,
    /// Use the simple arm animation.
    pub simple_arms_anim: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            username: "Singleplayer".to_owned(),
            mppass: String::new(),
            width: 854,
            height: 480,
            title: "Cubix".to_owned(),
            view_distance: DEFAULT_VIEW_DISTANCE,
            max_view_distance: DEFAULT_MAX_VIEWDIST,
            fps_limit: FpsLimitMethod::default(),
            protocol_version: None,
            classic_mode: false,
            classic_hacks: false,
            allow_custom_blocks: true,
            use_cpe: true,
            allow_server_textures: true,
            view_bobbing: true,
            breakable_liquids: false,
            simple_arms_anim: false,
        }
    }
}

impl ClientConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfig`] if the text is not valid TOML or
    /// a field has the wrong type, and [`ConfigError::UnknownProtocolVersion`]
    /// if `protocol_version` is not in the version table.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`ClientConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks fields that serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProtocolVersion`] for an unknown version.
    pub fn validate(&self) -> ConfigResult<()> {
        self.requested_version().map(|_| ())
    }

    /// Returns the requested protocol version, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProtocolVersion`] for an unknown version.
    pub fn requested_version(&self) -> ConfigResult<Option<VersionId>> {
        self.protocol_version
            .map(|raw| VersionId::from_u8(raw).ok_or(ConfigError::UnknownProtocolVersion(raw)))
            .transpose()
    }

    /// Loads the protocol version descriptor this configuration selects.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProtocolVersion`] for an unknown version.
    pub fn load_version(&self) -> ConfigResult<&'static GameVersion> {
        Ok(GameVersion::select(self.requested_version()?, self.use_cpe))
    }
}
