//! Grid Snake - single-player snake on a walled grid
//!
//! This library provides:
//! - Core game logic, free of I/O (game module)
//! - Keyboard input mapping (input module)
//! - TUI rendering driven by game events (render module)
//! - Session statistics (metrics module)
//! - The interactive terminal run loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
