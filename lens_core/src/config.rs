//! # Configuration
//!
//! `LensConfig` is the root of the TOML config file. Every section falls
//! back to its defaults, so an empty file is a valid config.
//!
//! ```toml
//! [viewer]
//! transition_ms = 250
//!
//! [search]
//! browser = "pyterrier"
//! search_algorithm = "BM25"
//!
//! [[search.aspects]]
//! id = "5f0c2f52-8a4e-4a4f-9c55-52a7a4b1a0c1"
//! name = "pro"
//! selected = true
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{LensError, LensResult};
use crate::settings::{SearchSettings, ViewerSettings};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    pub viewer: ViewerSettings,
    pub search: SearchSettings,
}

impl LensConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lens_core::config::LensConfig;
    ///
    /// let config = LensConfig::from_toml_str("[viewer]\ntransition_ms = 250\n").unwrap();
    /// assert_eq!(config.viewer.transition_ms, 250);
    /// assert_eq!(config.viewer.slides_per_page, 2);
    /// ```
    pub fn from_toml_str(contents: &str) -> LensResult<Self> {
        let config: LensConfig = toml::from_str(contents)
            .map_err(|e| LensError::serialization(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> LensResult<String> {
        toml::to_string_pretty(self).map_err(|e| LensError::serialization(e.to_string()))
    }

    pub fn validate(&self) -> LensResult<()> {
        self.viewer.validate()
    }
}
