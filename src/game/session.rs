use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};

use super::config::GameConfig;
use super::controller::InputController;
use super::error::{GameError, GameResult};
use super::grid::{Grid, Position, TileChange};
use super::snake::{Movement, Snake};

/// Something a collaborator (renderer, logger) may want to observe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    TileChanged(TileChange),
    ScoreChanged { score: u32 },
    GameOver { score: u32 },
}

/// Result of a successful tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The snake moved one cell
    Moved,
    /// The snake ate food and grew
    Ate,
    /// The snake hit a wall or itself; the session is over
    GameOver,
}

#[derive(Debug, Default)]
struct Scoreboard {
    score: u32,
    game_over: bool,
    events: Vec<GameEvent>,
}

impl Scoreboard {
    fn add_points(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        info!(score = self.score, "score changed");
        self.events.push(GameEvent::ScoreChanged { score: self.score });
    }

    fn trigger_game_over(&mut self) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        info!(score = self.score, "game over");
        self.events.push(GameEvent::GameOver { score: self.score });
    }
}

/// One game from start to game over.
///
/// Owns the grid, the snake and the input source. The caller drives it by
/// calling [`tick`](Self::tick) at a fixed rate and must stop once a tick
/// reports [`TickOutcome::GameOver`].
pub struct GameSession<C: InputController> {
    grid: Grid,
    snake: Snake,
    controller: C,
    scoreboard: Scoreboard,
    ticks: u64,
}

impl<C: InputController> GameSession<C> {
    /// Start a game: snake at the center facing up, one food on the board
    pub fn new(config: &GameConfig, controller: C) -> GameResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut grid = Grid::new(config.grid_size, config.food_attempts, rng)?;

        let center = (config.grid_size / 2) as i32;
        let snake = Snake::new(&mut grid, Position::new(center, center))?;
        let food = grid.place_food_random()?;

        info!(
            size = config.grid_size,
            food_x = food.x,
            food_y = food.y,
            "session started"
        );

        Ok(Self::from_parts(grid, snake, controller))
    }

    /// Assemble a session from a prepared grid and snake.
    ///
    /// The snake must have been placed on this grid.
    pub fn from_parts(grid: Grid, snake: Snake, controller: C) -> Self {
        Self {
            grid,
            snake,
            controller,
            scoreboard: Scoreboard::default(),
            ticks: 0,
        }
    }

    /// Advance the game by one step.
    ///
    /// Fails with [`GameError::InvalidState`] once the game is over, without
    /// touching any state. Any other error also ends the session.
    pub fn tick(&mut self) -> GameResult<TickOutcome> {
        if self.scoreboard.game_over {
            return Err(GameError::InvalidState("tick after game over"));
        }

        if let Some(direction) = self.controller.update_direction() {
            self.snake.set_direction(direction);
        }

        let scoreboard = &mut self.scoreboard;
        let mut collided = false;
        let result = self.snake.update(
            &mut self.grid,
            || collided = true,
            |grid| {
                scoreboard.add_points(1);
                grid.place_food_random().map(|_| ())
            },
        );

        if collided {
            self.trigger_game_over();
        }

        let movement = match result {
            Ok(movement) => movement,
            Err(err) => {
                error!(error = %err, tick = self.ticks, "tick failed, ending session");
                self.trigger_game_over();
                return Err(err);
            }
        };

        self.ticks += 1;

        Ok(match movement {
            Movement::Moved => TickOutcome::Moved,
            Movement::Grew => TickOutcome::Ate,
            Movement::Collided => TickOutcome::GameOver,
        })
    }

    /// End the game. Later calls change nothing.
    pub fn trigger_game_over(&mut self) {
        self.scoreboard.trigger_game_over();
    }

    pub fn add_points(&mut self, points: u32) {
        self.scoreboard.add_points(points);
    }

    pub fn is_game_over(&self) -> bool {
        self.scoreboard.game_over
    }

    pub fn score(&self) -> u32 {
        self.scoreboard.score
    }

    /// Number of ticks that completed without error
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    /// Everything that happened since the last call: tile changes in write
    /// order, followed by score and game-over events.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        let mut events: Vec<GameEvent> = self
            .grid
            .take_changes()
            .into_iter()
            .map(GameEvent::TileChanged)
            .collect();
        events.append(&mut self.scoreboard.events);
        events
    }
}
