//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Main frame rendering and layout
//! - `input`: Keyboard event handling
//! - `styles`: Color palette and text styling
//! - `screens`: Per-screen content (home, sign-in form, admin panel)

pub mod input;
pub mod render;
pub mod screens;
pub mod styles;
