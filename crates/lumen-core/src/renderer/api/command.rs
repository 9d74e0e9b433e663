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

//! Recorded GPU-facing commands and the named buffer that holds them.
//!
//! A [`CommandBuffer`] is recorded by the orchestrator, handed to the
//! [`RenderContext`](crate::renderer::traits::RenderContext) for execution and
//! then cleared, so one instance serves every camera of every frame.

use crate::math::{LinearRgba, Vec4};
use crate::renderer::error::CommandError;
use std::fmt;

/// Names a global shader property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderPropertyId(&'static str);

impl ShaderPropertyId {
    /// Per-slot light colors.
    pub const VISIBLE_LIGHT_COLORS: Self = Self("_VisibleLightColors");
    /// Per-slot direction to light (w = 0) or light position (w = 1).
    pub const VISIBLE_LIGHT_DIRECTIONS_OR_POSITIONS: Self =
        Self("_VisibleLightDirectionsOrPositions");
    /// Per-slot range and cone attenuation factors.
    pub const VISIBLE_LIGHT_ATTENUATIONS: Self = Self("_VisibleLightAttenuations");
    /// Per-slot spot directions.
    pub const VISIBLE_LIGHT_SPOT_DIRECTIONS: Self = Self("_VisibleLightSpotDirections");
    /// Per-object light index offset and count; zero disables per-object lights.
    pub const LIGHT_INDICES_OFFSET_AND_COUNT: Self = Self("unity_LightIndicesOffsetAndCount");

    /// Creates a property id from a static name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the property name.
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ShaderPropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A single recorded command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Clears the bound render targets.
    ClearRenderTarget {
        /// Clear the depth buffer.
        clear_depth: bool,
        /// Clear the color target.
        clear_color: bool,
        /// Color written when `clear_color` is set.
        background: LinearRgba,
    },
    /// Sets a global vector property.
    SetGlobalVector {
        /// Target property.
        id: ShaderPropertyId,
        /// New value.
        value: Vec4,
    },
    /// Uploads a global vector array property.
    SetGlobalVectorArray {
        /// Target property.
        id: ShaderPropertyId,
        /// New contents.
        values: Vec<Vec4>,
    },
    /// Opens a named profiling scope.
    BeginSample(String),
    /// Closes the innermost profiling scope.
    EndSample(String),
}

/// A named, reusable list of commands.
#[derive(Debug, Clone)]
pub struct CommandBuffer {
    name: String,
    commands: Vec<Command>,
    open_samples: Vec<String>,
}

impl CommandBuffer {
    /// Creates an empty buffer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
            open_samples: Vec::new(),
        }
    }

    /// The buffer's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The recorded commands, in order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Records a clear of depth and/or color.
    pub fn clear_render_target(&mut self, clear_depth: bool, clear_color: bool, background: LinearRgba) {
        self.commands.push(Command::ClearRenderTarget {
            clear_depth,
            clear_color,
            background,
        });
    }

    /// Records a global vector write.
    pub fn set_global_vector(&mut self, id: ShaderPropertyId, value: Vec4) {
        self.commands.push(Command::SetGlobalVector { id, value });
    }

    /// Records a global vector array upload.
    pub fn set_global_vector_array(&mut self, id: ShaderPropertyId, values: &[Vec4]) {
        self.commands.push(Command::SetGlobalVectorArray {
            id,
            values: values.to_vec(),
        });
    }

    /// Opens a profiling scope.
    pub fn begin_sample(&mut self, name: &str) {
        self.open_samples.push(name.to_owned());
        self.commands.push(Command::BeginSample(name.to_owned()));
    }

    /// Closes the innermost profiling scope, which must be named `name`.
    ///
    /// Scopes may span executions: a scope opened before one execution can be
    /// closed in a later one, as long as [`CommandBuffer::clear`] is not
    /// called while it is open.
    pub fn end_sample(&mut self, name: &str) -> Result<(), CommandError> {
        match self.open_samples.last() {
            None => Err(CommandError::NoOpenSample {
                name: name.to_owned(),
            }),
            Some(open) if open != name => Err(CommandError::MismatchedSample {
                expected: open.clone(),
                found: name.to_owned(),
            }),
            Some(_) => {
                self.open_samples.pop();
                self.commands.push(Command::EndSample(name.to_owned()));
                Ok(())
            }
        }
    }

    /// Returns `true` when every opened scope has been closed.
    pub fn is_balanced(&self) -> bool {
        self.open_samples.is_empty()
    }

    /// Drops the recorded commands. Open scopes stay open.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Drops the recorded commands and forgets every open scope.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.open_samples.clear();
    }
}
