use serde::Deserialize;

use crate::domain::errors::ConfigError;
use crate::domain::view::{SyncState, ViewDimensions};
use crate::view_state::ViewState;

/// Per-browser settings supplied by the host page as JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowserConfig {
    pub width: f64,
    pub height: f64,
    #[serde(alias = "miniMode")]
    pub figure_mode: bool,
    pub resolution_locked: bool,
    pub default_pixel_size: f64,
    /// Compact state string restored after the first dataset loads.
    pub state: Option<String>,
    pub synch_state: Option<SyncState>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        let dims = ViewDimensions::default();
        Self {
            width: dims.width,
            height: dims.height,
            figure_mode: false,
            resolution_locked: false,
            default_pixel_size: 1.0,
            state: None,
            synch_state: None,
        }
    }
}

impl BrowserConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.initial_state()?;
        Ok(config)
    }

    pub fn dimensions(&self) -> ViewDimensions {
        ViewDimensions::new(self.width, self.height)
    }

    pub fn initial_state(&self) -> Result<Option<ViewState>, ConfigError> {
        match &self.state {
            Some(state) => Ok(Some(state.parse()?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = BrowserConfig::from_json(r#"{"width": 800, "miniMode": true}"#).unwrap();
        assert_eq!(config.width, 800.0);
        assert_eq!(config.height, 640.0);
        assert!(config.figure_mode);
        assert_eq!(config.default_pixel_size, 1.0);
    }

    #[test]
    fn bad_state_string_is_rejected() {
        let err = BrowserConfig::from_json(r#"{"state": "1,1,zero,0,0,1"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::State(_)));
    }
}
