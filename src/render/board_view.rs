use crate::game::{GameEvent, Position, TileState};

/// What the renderer knows about the board.
///
/// Starts empty and is brought up to date only by applying the session's
/// events, so it never needs to borrow the session while drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    size: usize,
    tiles: Vec<TileState>,
    head: Option<Position>,
    score: u32,
    game_over: bool,
}

impl BoardView {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            tiles: vec![TileState::Empty; size * size],
            head: None,
            score: 0,
            game_over: false,
        }
    }

    pub fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::TileChanged(change) => {
                let pos = change.position;
                if pos.x < 0 || pos.y < 0 {
                    return;
                }
                let (x, y) = (pos.x as usize, pos.y as usize);
                if x >= self.size || y >= self.size {
                    return;
                }
                self.tiles[y * self.size + x] = change.state;
                // The snake writes its new head last
                if change.state == TileState::SnakeBody {
                    self.head = Some(pos);
                }
            }
            GameEvent::ScoreChanged { score } => self.score = *score,
            GameEvent::GameOver { score } => {
                self.score = *score;
                self.game_over = true;
            }
        }
    }

    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            self.apply(event);
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn tile(&self, x: usize, y: usize) -> TileState {
        self.tiles[y * self.size + x]
    }

    pub fn head(&self) -> Option<Position> {
        self.head
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameSession, NoInput, TickOutcome};

    fn mirror_matches(view: &BoardView, session: &GameSession<NoInput>) {
        for (pos, state) in session.grid().tiles() {
            assert_eq!(view.tile(pos.x as usize, pos.y as usize), state);
        }
        assert_eq!(view.head(), Some(session.snake().head()));
        assert_eq!(view.score(), session.score());
    }

    #[test]
    fn test_view_follows_session_events() {
        let config = GameConfig::new(6).with_seed(5);
        let mut session = GameSession::new(&config, NoInput).unwrap();
        let mut view = BoardView::new(config.grid_size);

        view.apply_all(&session.drain_events());
        mirror_matches(&view, &session);

        loop {
            let outcome = session.tick().unwrap();
            view.apply_all(&session.drain_events());
            if outcome == TickOutcome::GameOver {
                break;
            }
            mirror_matches(&view, &session);
        }

        assert!(view.is_game_over());
    }

    #[test]
    fn test_out_of_range_change_ignored() {
        use crate::game::TileChange;

        let mut view = BoardView::new(3);
        let before = view.clone();
        view.apply(&GameEvent::TileChanged(TileChange {
            position: Position::new(-1, 4),
            state: TileState::Food,
        }));
        assert_eq!(view, before);
    }
}
