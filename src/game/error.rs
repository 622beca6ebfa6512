use thiserror::Error;

/// Errors raised by the game core.
///
/// None of these are recoverable for a running session: callers should drop
/// the session once one surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// A grid coordinate outside `[0, size)` was read or written
    #[error("position ({x}, {y}) is outside the {size}x{size} grid")]
    OutOfBounds { x: i32, y: i32, size: usize },

    /// No empty cell is left to host food
    #[error("no empty cell left to place food")]
    GridFull,

    /// An operation was attempted in a state that forbids it
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Configuration values that cannot produce a playable game
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GameError::OutOfBounds { x: -1, y: 3, size: 5 };
        assert_eq!(err.to_string(), "position (-1, 3) is outside the 5x5 grid");

        let err = GameError::InvalidState("tick after game over");
        assert_eq!(err.to_string(), "invalid state: tick after game over");
    }
}
