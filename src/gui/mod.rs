//! GUI module - application window and dashboard views

mod advanced;
mod app;
mod control_panel;
mod explorer;
mod widgets;

pub use app::DashboardApp;
pub use control_panel::{ControlPanel, ControlPanelAction, Section};
