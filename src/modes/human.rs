use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use crate::game::{GameConfig, GameError, GameSession, TickOutcome};
use crate::input::{InputHandler, KeyAction, KeyboardController};
use crate::metrics::GameMetrics;
use crate::render::{BoardView, Renderer};

/// Interactive play in the terminal
pub struct HumanMode {
    config: GameConfig,
    session: GameSession<KeyboardController>,
    view: BoardView,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let (session, view) = Self::start_session(&config)?;

        Ok(Self {
            config,
            session,
            view,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    fn start_session(config: &GameConfig) -> Result<(GameSession<KeyboardController>, BoardView)> {
        let mut session = GameSession::new(config, KeyboardController::new())
            .context("Failed to start game session")?;
        let mut view = BoardView::new(session.grid().size());
        view.apply_all(&session.drain_events());
        Ok((session, view))
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(Duration::from_millis(self.config.tick_interval_ms()));
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Render at ~30 FPS
        let mut render_timer = interval(Duration::from_millis(33));

        info!(
            tick_ms = self.config.tick_interval_ms(),
            size = self.config.grid_size,
            "game loop started"
        );

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.session.is_game_over() {
                        self.update_game()?;
                    }
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.view, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(direction) => self.session.controller_mut().press(direction),
            KeyAction::Restart => {
                if let Err(err) = self.reset_game() {
                    warn!(error = %err, "restart failed");
                }
            }
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn update_game(&mut self) -> Result<()> {
        let result = self.session.tick();
        self.view.apply_all(&self.session.drain_events());

        match result {
            Ok(TickOutcome::GameOver) => {
                self.metrics.on_game_over(self.session.score());
                Ok(())
            }
            Ok(_) => Ok(()),
            // Every cell is snake: nothing left to play for
            Err(GameError::GridFull) => {
                warn!(score = self.session.score(), "board is full");
                self.metrics.on_game_over(self.session.score());
                Ok(())
            }
            Err(err) => Err(err).context("Game tick failed"),
        }
    }

    fn reset_game(&mut self) -> Result<()> {
        let (session, view) = Self::start_session(&self.config)?;
        self.session = session;
        self.view = view;
        self.metrics.on_game_start();
        info!("game restarted");
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mode() -> HumanMode {
        HumanMode::new(GameConfig::default().with_seed(8)).unwrap()
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert!(!mode.session.is_game_over());
        assert_eq!(mode.session.score(), 0);
        assert_eq!(mode.view.head(), Some(Position::new(10, 10)));
    }

    #[test]
    fn test_key_press_steers_next_tick() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char('a')));
        mode.update_game().unwrap();

        assert_eq!(mode.session.snake().direction(), Direction::Left);
        assert_eq!(mode.view.head(), Some(mode.session.snake().head()));
    }

    #[test]
    fn test_runs_until_wall_then_stops() {
        let mut mode = mode();
        while !mode.session.is_game_over() {
            mode.update_game().unwrap();
        }

        assert!(mode.view.is_game_over());
        assert_eq!(mode.metrics.games_played, 1);
    }

    #[test]
    fn test_game_reset() {
        let mut mode = mode();
        while !mode.session.is_game_over() {
            mode.update_game().unwrap();
        }

        mode.handle_event(key(KeyCode::Char('r')));

        assert!(!mode.session.is_game_over());
        assert_eq!(mode.session.score(), 0);
        assert!(!mode.view.is_game_over());
        assert_eq!(mode.metrics.games_played, 1);
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Esc));
        assert!(mode.should_quit);
    }
}
