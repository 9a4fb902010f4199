// Copyright 2025 Chris Custine
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

//! Seam between the view controller and the map engine.
//!
//! The map owns its layers. The controller only keeps the handle of the
//! layer it attached last so it can take it down again.

use std::fmt;

use thiserror::Error;

use crate::wms::WmsOverlay;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("an overlay layer is already attached")]
    SlotOccupied,

    #[error("overlay layer {0} is not attached")]
    UnknownHandle(String),

    #[error("map rejected overlay {layer}: {reason}")]
    Rejected { layer: String, reason: String },
}

/// Something that can display a single WMS overlay on a map.
pub trait OverlayHost {
    /// Non-owning reference to an attached layer.
    type Handle: Clone + PartialEq + fmt::Debug;

    fn attach(&mut self, overlay: &WmsOverlay) -> Result<Self::Handle, OverlayError>;

    fn detach(&mut self, handle: &Self::Handle) -> Result<(), OverlayError>;
}
