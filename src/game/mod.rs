//! Core game logic for Snake
//!
//! This module has no I/O or rendering dependencies. The front end drives a
//! [`GameSession`] one tick at a time and observes it through [`GameEvent`]s.

pub mod config;
pub mod controller;
pub mod direction;
pub mod error;
pub mod grid;
pub mod session;
pub mod snake;

// Re-export commonly used types
pub use config::GameConfig;
pub use controller::{InputController, NoInput, ScriptedController};
pub use direction::Direction;
pub use error::{GameError, GameResult};
pub use grid::{Grid, Position, TileChange, TileState, MAX_GRID_SIZE};
pub use session::{GameEvent, GameSession, TickOutcome};
pub use snake::{Movement, Snake};
