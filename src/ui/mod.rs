//! UI panel rendering subsystem
//!
//! This module contains all UI panel rendering logic for the mod launcher:
//! - Header panel (game selector, launch options, launch button)
//! - Tree panel (categories and their mods)
//! - Load order panel (enabled mods in load order)
//! - Details panel (selected mod fields and description)
//! - Status bar (memory, counts, progress, transient messages)
//! - Game path modal (blocking prompt for the install folder)
//! - Table header component (sortable column headers)
//! - Panel manager (panel orchestration, layout and drag hover tracking)

pub mod details_panel;
pub mod game_path_modal;
pub mod header;
pub mod load_order_panel;
pub mod panel_manager;
pub mod rows;
pub mod status_bar;
pub mod table_header;
pub mod tree_panel;
