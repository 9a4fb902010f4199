//! UI panels.
//!
//! Panels only read controller state and return the events the user
//! triggered; the app applies those events after drawing.

pub mod chart_panel;
pub mod legend;
pub mod selection_panel;
