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

//! Acts as the **[A]gent** for the forward pipeline.
//!
//! The agent owns the per-frame scratch state and runs the fixed per-camera
//! sequence: cull, clear, pack and upload lights, then issue the opaque, sky,
//! transparent and optional fallback draws. The numeric work and the draw
//! request construction are delegated to `lumen-lanes`.

mod agent;
mod stats;

pub use agent::*;
pub use stats::*;
