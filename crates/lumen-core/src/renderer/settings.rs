// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration of the forward pipeline.

use super::error::SettingsError;
use serde::{Deserialize, Serialize};

/// Upper bound accepted for [`PipelineSettings::max_visible_lights`].
pub const MAX_VISIBLE_LIGHTS_LIMIT: usize = 256;

/// Capacity used when no configuration overrides it.
pub const DEFAULT_MAX_VISIBLE_LIGHTS: usize = 16;

/// Settings that drive a forward pipeline instance.
///
/// Every field has a default, so a RON file only needs to name what it changes:
///
/// ```
/// use lumen_core::renderer::PipelineSettings;
///
/// let settings = PipelineSettings::from_ron_str("(max_visible_lights: 4, instancing: true)").unwrap();
/// assert_eq!(settings.max_visible_lights, 4);
/// assert!(settings.instancing);
/// assert!(!settings.dynamic_batching);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Merge small draws sharing a compatible material at submission time.
    pub dynamic_batching: bool,
    /// Batch GPU-instanceable draws into one submission.
    pub instancing: bool,
    /// Length of each light uniform array.
    pub max_visible_lights: usize,
    /// When `true`, light intensity scales the linear color. Otherwise it
    /// scales the gamma-encoded color.
    pub use_linear_light_intensity: bool,
    /// Enables the error-material pass for drawables with only legacy pass tags.
    pub diagnostics: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            dynamic_batching: false,
            instancing: false,
            max_visible_lights: DEFAULT_MAX_VISIBLE_LIGHTS,
            use_linear_light_intensity: true,
            diagnostics: false,
        }
    }
}

impl PipelineSettings {
    /// Checks that the settings describe a buildable pipeline.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_visible_lights == 0 || self.max_visible_lights > MAX_VISIBLE_LIGHTS_LIMIT {
            return Err(SettingsError::InvalidLightCapacity {
                value: self.max_visible_lights,
                limit: MAX_VISIBLE_LIGHTS_LIMIT,
            });
        }
        Ok(())
    }

    /// Parses and validates settings from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            ron::from_str(text).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Writes the settings as pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, SettingsError> {
        let pretty_config = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty_config)
            .map_err(|e| SettingsError::Serialize(e.to_string()))
    }
}
