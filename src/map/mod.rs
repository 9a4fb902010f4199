//! Map tile sources and overlay management.
//!
//! This module provides the basemap tile sources, the WMS-backed overlay
//! tile source, and the single-slot overlay host the view controller drives.

pub mod basemap;
pub mod overlays;
pub mod wms_tiles;

pub use basemap::{BasemapSource, BasemapStyle};
pub use overlays::MapOverlays;
pub use wms_tiles::WmsTileSource;
