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

//! Defines the error types of the forward pipeline.
//!
//! Nothing on the per-frame path is fatal. These errors only surface from
//! construction-time configuration and from misuse of the public buffers.

use thiserror::Error;

/// An error raised while loading or validating [`PipelineSettings`](super::PipelineSettings).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// The light uniform capacity is zero or above the hard limit.
    #[error("max_visible_lights must be in 1..={limit}, got {value}")]
    InvalidLightCapacity {
        /// The rejected capacity.
        value: usize,
        /// The largest accepted capacity.
        limit: usize,
    },
    /// The settings text could not be parsed.
    #[error("Failed to parse pipeline settings: {0}")]
    Parse(String),
    /// The settings could not be written out.
    #[error("Failed to serialize pipeline settings: {0}")]
    Serialize(String),
}

/// An error raised by a [`CommandBuffer`](super::api::CommandBuffer) when its
/// sample scopes are misused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// `end_sample` was called with no open scope.
    #[error("end_sample('{name}') called with no open sample scope")]
    NoOpenSample {
        /// The name passed to `end_sample`.
        name: String,
    },
    /// `end_sample` named a scope other than the innermost open one.
    #[error("end_sample('{found}') does not match the open scope '{expected}'")]
    MismatchedSample {
        /// The innermost open scope.
        expected: String,
        /// The name passed to `end_sample`.
        found: String,
    },
}

/// An error raised when replacing the light index map of a
/// [`CullingResults`](super::api::CullingResults).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LightIndexMapError {
    /// The new map does not have one entry per visible light.
    #[error("light index map has {found} entries but {expected} lights are visible")]
    LengthMismatch {
        /// Number of visible lights.
        expected: usize,
        /// Length of the rejected map.
        found: usize,
    },
}
