//! hexgrid - Hex grid addressing and edit engine
//!
//! This library provides the grid engine shared by hexgrid (TUI editor) and hgx (CLI tool).

pub mod app;
pub mod buffer;
pub mod grid;
pub mod ui;
