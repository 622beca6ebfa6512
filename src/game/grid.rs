//! The arena: a square matrix of tiles with hard walls.
//!
//! The grid is the single source of truth for occupancy. Every write goes
//! through [`Grid::set`], which also records a [`TileChange`] so that a
//! renderer can mirror the board without re-reading it.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use super::direction::Direction;
use super::error::{GameError, GameResult};

/// Sampling budget used by [`Grid::place_food_random`] before it falls back
/// to enumerating empty cells.
pub const DEFAULT_FOOD_ATTEMPTS: u32 = 100;

/// Largest side length a grid accepts; bigger boards do not fit a terminal
pub const MAX_GRID_SIZE: usize = 200;

/// A position on the game grid
///
/// Signed so that a step off the edge (e.g. `(-1, 0)`) is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// True if the two positions are exactly one orthogonal step apart
    pub fn is_adjacent(&self, other: Position) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

/// Logical content of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileState {
    #[default]
    Empty,
    SnakeBody,
    Food,
}

/// A single cell write, in the order it happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileChange {
    pub position: Position,
    pub state: TileState,
}

pub struct Grid {
    size: usize,
    tiles: Vec<TileState>,
    food_attempts: u32,
    rng: StdRng,
    changes: Vec<TileChange>,
}

impl Grid {
    /// Create an all-empty grid of `size` x `size` cells.
    ///
    /// `food_attempts` bounds the random sampling in
    /// [`place_food_random`](Self::place_food_random).
    pub fn new(size: usize, food_attempts: u32, rng: StdRng) -> GameResult<Self> {
        let cells = size
            .checked_mul(size)
            .filter(|_| (1..=MAX_GRID_SIZE).contains(&size))
            .ok_or_else(|| {
                GameError::InvalidConfig(format!(
                    "grid size must be between 1 and {}, got {}",
                    MAX_GRID_SIZE, size
                ))
            })?;

        Ok(Self {
            size,
            tiles: vec![TileState::Empty; cells],
            food_attempts,
            rng,
            changes: Vec::new(),
        })
    }

    /// Create a grid whose food sequence is reproducible
    pub fn with_seed(size: usize, seed: u64) -> GameResult<Self> {
        Self::new(size, DEFAULT_FOOD_ATTEMPTS, StdRng::seed_from_u64(seed))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Check if a position is within the grid bounds
    pub fn in_bounds(&self, pos: Position) -> bool {
        let size = self.size as i32;
        pos.x >= 0 && pos.y >= 0 && pos.x < size && pos.y < size
    }

    fn index(&self, pos: Position) -> GameResult<usize> {
        if !self.in_bounds(pos) {
            return Err(GameError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                size: self.size,
            });
        }
        Ok(pos.y as usize * self.size + pos.x as usize)
    }

    pub fn get(&self, pos: Position) -> GameResult<TileState> {
        self.index(pos).map(|idx| self.tiles[idx])
    }

    /// Overwrite one cell and record the change
    pub fn set(&mut self, pos: Position, state: TileState) -> GameResult<()> {
        let idx = self.index(pos)?;
        self.tiles[idx] = state;
        self.changes.push(TileChange {
            position: pos,
            state,
        });
        trace!(x = pos.x, y = pos.y, ?state, "tile changed");
        Ok(())
    }

    /// Moving into `pos` ends the game: it is a wall or part of the snake.
    pub fn is_collision(&self, pos: Position) -> bool {
        match self.get(pos) {
            Ok(state) => state == TileState::SnakeBody,
            Err(_) => true,
        }
    }

    /// Mark a uniformly random empty cell as food.
    ///
    /// Samples random cells up to the configured budget first; if every
    /// sample hits an occupied cell, picks uniformly among the remaining empty
    /// cells instead. Fails with [`GameError::GridFull`] only when there is no
    /// empty cell at all.
    pub fn place_food_random(&mut self) -> GameResult<Position> {
        let size = self.size as i32;

        for _ in 0..self.food_attempts {
            let pos = Position::new(self.rng.gen_range(0..size), self.rng.gen_range(0..size));
            if self.get(pos)? == TileState::Empty {
                self.set(pos, TileState::Food)?;
                return Ok(pos);
            }
        }

        let empty: Vec<Position> = self.positions_of(TileState::Empty).collect();
        let pos = *empty.choose(&mut self.rng).ok_or(GameError::GridFull)?;
        debug!(
            attempts = self.food_attempts,
            empty = empty.len(),
            "food sampling budget exhausted, chose from empty cells"
        );
        self.set(pos, TileState::Food)?;
        Ok(pos)
    }

    /// All positions with their tile state, row by row
    pub fn tiles(&self) -> impl Iterator<Item = (Position, TileState)> + '_ {
        let size = self.size;
        self.tiles.iter().enumerate().map(move |(idx, state)| {
            (
                Position::new((idx % size) as i32, (idx / size) as i32),
                *state,
            )
        })
    }

    pub fn positions_of(&self, state: TileState) -> impl Iterator<Item = Position> + '_ {
        self.tiles()
            .filter(move |(_, tile)| *tile == state)
            .map(|(pos, _)| pos)
    }

    pub fn count(&self, state: TileState) -> usize {
        self.tiles.iter().filter(|tile| **tile == state).count()
    }

    /// Hand over every change recorded since the last call
    pub fn take_changes(&mut self) -> Vec<TileChange> {
        std::mem::take(&mut self.changes)
    }
}
