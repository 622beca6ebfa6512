use std::collections::VecDeque;

use tracing::debug;

use super::direction::Direction;
use super::error::{GameError, GameResult};
use super::grid::{Grid, Position, TileState};

/// What a single [`Snake::update`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Head advanced onto an empty cell, tail followed
    Moved,
    /// Head advanced onto food, tail stayed
    Grew,
    /// Next cell was a wall or the body; nothing moved
    Collided,
}

/// The snake in the game
///
/// Every segment in `body` is marked [`TileState::SnakeBody`] on the grid it
/// was created on; `update` keeps the two in step.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, head at the front
    body: VecDeque<Position>,
    /// Direction applied on the next update
    direction: Direction,
}

impl Snake {
    /// Place a one-segment snake facing up at `head`
    pub fn new(grid: &mut Grid, head: Position) -> GameResult<Self> {
        Self::from_body(grid, vec![head], Direction::Up)
    }

    /// Place a snake with an explicit body, head first.
    ///
    /// The body must be non-empty, in bounds, on empty cells and a connected
    /// path of unit steps.
    pub fn from_body(
        grid: &mut Grid,
        body: Vec<Position>,
        direction: Direction,
    ) -> GameResult<Self> {
        if body.is_empty() {
            return Err(GameError::InvalidConfig("snake needs at least one segment".into()));
        }
        if body.windows(2).any(|pair| !pair[0].is_adjacent(pair[1])) {
            return Err(GameError::InvalidConfig("snake body is not connected".into()));
        }
        for pos in &body {
            if grid.get(*pos)? != TileState::Empty {
                return Err(GameError::InvalidConfig(format!(
                    "snake segment ({}, {}) overlaps an occupied cell",
                    pos.x, pos.y
                )));
            }
            grid.set(*pos, TileState::SnakeBody)?;
        }

        Ok(Self {
            body: body.into(),
            direction,
        })
    }

    /// Store the direction for the next update. Reversing into the body is
    /// allowed and ends the game on the next tick.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false for a constructed snake
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Segments from head to tail
    pub fn body(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Advance one cell in the current direction.
    ///
    /// On collision `on_game_over` runs and neither the body nor the grid is
    /// touched. On food `on_food` runs before the head is written, while the
    /// target cell still holds food, and the tail stays put.
    pub fn update<G, F>(
        &mut self,
        grid: &mut Grid,
        on_game_over: G,
        on_food: F,
    ) -> GameResult<Movement>
    where
        G: FnOnce(),
        F: FnOnce(&mut Grid) -> GameResult<()>,
    {
        let next = self.head().moved_in_direction(self.direction);

        if grid.is_collision(next) {
            debug!(x = next.x, y = next.y, "snake collided");
            on_game_over();
            return Ok(Movement::Collided);
        }

        let movement = match grid.get(next)? {
            TileState::Food => {
                on_food(grid)?;
                Movement::Grew
            }
            _ => {
                if let Some(tail) = self.body.pop_back() {
                    grid.set(tail, TileState::Empty)?;
                }
                Movement::Moved
            }
        };

        self.body.push_front(next);
        grid.set(next, TileState::SnakeBody)?;

        Ok(movement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_food(_: &mut Grid) -> GameResult<()> {
        Ok(())
    }

    fn assert_consistent(snake: &Snake, grid: &Grid) {
        let mut on_grid: Vec<_> = grid.positions_of(TileState::SnakeBody).collect();
        let mut body: Vec<_> = snake.body().collect();
        on_grid.sort_by_key(|p| (p.y, p.x));
        body.sort_by_key(|p| (p.y, p.x));
        assert_eq!(on_grid, body);
        assert!(snake
            .body()
            .zip(snake.body().skip(1))
            .all(|(a, b)| a.is_adjacent(b)));
    }

    #[test]
    fn test_snake_creation_marks_grid() {
        let mut grid = Grid::with_seed(5, 1).unwrap();
        let snake = Snake::new(&mut grid, Position::new(2, 2)).unwrap();

        assert_eq!(snake.len(), 1);
        assert_eq!(snake.direction(), Direction::Up);
        assert_eq!(grid.get(Position::new(2, 2)), Ok(TileState::SnakeBody));
        assert_consistent(&snake, &grid);
    }

    #[test]
    fn test_from_body_rejects_gaps() {
        let mut grid = Grid::with_seed(5, 1).unwrap();
        let result = Snake::from_body(
            &mut grid,
            vec![Position::new(1, 1), Position::new(3, 1)],
            Direction::Left,
        );
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_move_onto_empty_cell() {
        let mut grid = Grid::with_seed(5, 1).unwrap();
        let mut snake = Snake::from_body(
            &mut grid,
            vec![Position::new(2, 2), Position::new(2, 3)],
            Direction::Up,
        )
        .unwrap();
        grid.take_changes();

        let movement = snake.update(&mut grid, || panic!("no collision"), no_food);

        assert_eq!(movement, Ok(Movement::Moved));
        assert_eq!(snake.head(), Position::new(2, 1));
        assert_eq!(snake.tail(), Position::new(2, 2));
        assert_eq!(snake.len(), 2);
        assert_eq!(grid.get(Position::new(2, 3)), Ok(TileState::Empty));
        // tail cleared, then head written
        let changes = grid.take_changes();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].position, Position::new(2, 3));
        assert_eq!(changes[0].state, TileState::Empty);
        assert_eq!(changes[1].position, Position::new(2, 1));
        assert_eq!(changes[1].state, TileState::SnakeBody);
        assert_consistent(&snake, &grid);
    }

    #[test]
    fn test_move_onto_food_grows() {
        let mut grid = Grid::with_seed(5, 1).unwrap();
        let mut snake = Snake::new(&mut grid, Position::new(2, 2)).unwrap();
        grid.set(Position::new(2, 1), TileState::Food).unwrap();
        let mut fed = false;

        let movement = snake.update(
            &mut grid,
            || panic!("no collision"),
            |grid| {
                fed = true;
                // the target still holds food while the callback runs
                assert_eq!(grid.get(Position::new(2, 1)), Ok(TileState::Food));
                Ok(())
            },
        );

        assert_eq!(movement, Ok(Movement::Grew));
        assert!(fed);
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), Position::new(2, 1));
        assert_eq!(snake.tail(), Position::new(2, 2));
        assert_consistent(&snake, &grid);
    }

    #[test]
    fn test_wall_collision_leaves_state_untouched() {
        let mut grid = Grid::with_seed(5, 1).unwrap();
        let mut snake = Snake::from_body(
            &mut grid,
            vec![Position::new(0, 2), Position::new(1, 2)],
            Direction::Left,
        )
        .unwrap();
        grid.take_changes();
        let before = snake.clone();
        let mut over = false;

        let movement = snake.update(&mut grid, || over = true, no_food);

        assert_eq!(movement, Ok(Movement::Collided));
        assert!(over);
        assert_eq!(snake, before);
        assert!(grid.take_changes().is_empty());
    }

    #[test]
    fn test_self_collision() {
        let mut grid = Grid::with_seed(6, 1).unwrap();
        // Head at (2,2) heading down into its own body at (2,3)
        let mut snake = Snake::from_body(
            &mut grid,
            vec![
                Position::new(2, 2),
                Position::new(3, 2),
                Position::new(3, 3),
                Position::new(2, 3),
                Position::new(1, 3),
            ],
            Direction::Down,
        )
        .unwrap();
        let mut over = false;

        let movement = snake.update(&mut grid, || over = true, no_food);

        assert_eq!(movement, Ok(Movement::Collided));
        assert!(over);
        assert_eq!(snake.len(), 5);
        assert_consistent(&snake, &grid);
    }

    #[test]
    fn test_reversal_runs_into_neck() {
        let mut grid = Grid::with_seed(5, 1).unwrap();
        let mut snake = Snake::from_body(
            &mut grid,
            vec![Position::new(2, 1), Position::new(2, 2)],
            Direction::Up,
        )
        .unwrap();

        snake.set_direction(Direction::Down);
        assert_eq!(snake.direction(), Direction::Down);

        let mut over = false;
        let movement = snake.update(&mut grid, || over = true, no_food);
        assert_eq!(movement, Ok(Movement::Collided));
        assert!(over);
    }

    #[test]
    fn test_food_callback_error_propagates() {
        let mut grid = Grid::with_seed(5, 1).unwrap();
        let mut snake = Snake::new(&mut grid, Position::new(2, 2)).unwrap();
        grid.set(Position::new(2, 1), TileState::Food).unwrap();

        let result = snake.update(&mut grid, || {}, |_| Err(GameError::GridFull));

        assert_eq!(result, Err(GameError::GridFull));
        assert_eq!(snake.len(), 1);
    }
}
