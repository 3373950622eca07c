//! egui rendering. Everything here reads a [`DashboardView`](crate::view::DashboardView)
//! and turns clicks into [`AppState`](crate::state::AppState) calls.

pub mod charts;
pub mod dashboard;
pub mod panels;
