//! Game room management.
//!
//! A room is one human against the AI. It owns the game, the player's
//! placement flow and the bot, and replies to every human move with the
//! AI's move so the client always gets the turn back.

use rand::rngs::StdRng;
use rand::SeedableRng;
use scrabble_core::{
    play_turn, Bot, CellHighlight, Coord, Direction, DictionaryChecker, FlowError, FlowInput,
    FlowOutput, GameError, GameEvent, GameState, MoveProposer, MoveReport, Names, PlacementFlow,
    Side, BOARD_SIZE,
};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::protocol::{GameSnapshot, GameStatus};

#[derive(Debug, Error)]
pub enum RoomError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("Placement is still in progress; cancel it first")]
    PlacementInProgress,
}

/// What a turn produced: the human's committed word (if any) and every
/// event from the human's move and the AI's reply, in order.
#[derive(Debug, Clone, Default)]
pub struct TurnOutcome {
    pub report: Option<MoveReport>,
    pub events: Vec<GameEvent>,
}

/// A single-player game room.
pub struct GameRoom {
    pub id: Uuid,
    pub player_id: Uuid,
    pub status: GameStatus,
    pub game: GameState,
    flow: PlacementFlow,
    bot: Box<dyn MoveProposer + Send + Sync>,
    /// Picks hints
    rng: StdRng,
}

impl GameRoom {
    pub fn new(id: Uuid, player_id: Uuid, player_name: String, seed: Option<u64>) -> Self {
        let (game, bot, rng) = match seed {
            Some(seed) => (
                GameState::with_rng(player_name, &mut StdRng::seed_from_u64(seed)),
                Bot::with_seed(seed),
                StdRng::seed_from_u64(seed),
            ),
            None => (
                GameState::new(player_name),
                Bot::new(),
                StdRng::from_entropy(),
            ),
        };
        Self::from_parts(id, player_id, game, bot, rng)
    }

    /// Build a room around an existing game and AI
    pub fn from_parts(
        id: Uuid,
        player_id: Uuid,
        game: GameState,
        bot: impl MoveProposer + Send + Sync + 'static,
        rng: StdRng,
    ) -> Self {
        let status = if game.is_finished() {
            GameStatus::Finished
        } else {
            GameStatus::InGame
        };
        Self {
            id,
            player_id,
            status,
            game,
            flow: PlacementFlow::new(),
            bot: Box::new(bot),
            rng,
        }
    }

    pub fn names(&self) -> Names {
        Names::from_game(&self.game)
    }

    pub fn submit_word<D: DictionaryChecker + ?Sized>(
        &mut self,
        word: String,
        dictionary: &D,
    ) -> Result<FlowOutput, RoomError> {
        self.check_playing()?;
        Ok(self
            .flow
            .handle(FlowInput::WordSubmitted(word), &self.game, dictionary)?)
    }

    /// Clicks are allowed after the game ends, for inspecting the board
    pub fn select_cell<D: DictionaryChecker + ?Sized>(
        &mut self,
        row: usize,
        col: usize,
        dictionary: &D,
    ) -> Result<FlowOutput, RoomError> {
        let input = FlowInput::CellClicked(Coord::new(row, col));
        Ok(self.flow.handle(input, &self.game, dictionary)?)
    }

    pub fn cancel_placement<D: DictionaryChecker + ?Sized>(
        &mut self,
        dictionary: &D,
    ) -> Result<FlowOutput, RoomError> {
        Ok(self.flow.handle(FlowInput::Cancel, &self.game, dictionary)?)
    }

    /// Finish the placement flow and commit the word
    pub fn choose_direction<D: DictionaryChecker + ?Sized>(
        &mut self,
        direction: Direction,
        dictionary: &D,
    ) -> Result<TurnOutcome, RoomError> {
        self.check_playing()?;
        let request = match self
            .flow
            .handle(FlowInput::DirectionChosen(direction), &self.game, dictionary)?
        {
            FlowOutput::Ready(request) => request,
            _ => return Err(FlowError::NoStart.into()),
        };

        let plan = self.game.validate(&request).map_err(GameError::from)?;
        let report = self.game.commit_placement(&plan, Side::Player)?;
        Ok(self.with_ai_reply(report))
    }

    /// Play a word given all at once
    pub fn play_word<D: DictionaryChecker + ?Sized>(
        &mut self,
        word: &str,
        row: usize,
        col: usize,
        direction: Direction,
        dictionary: &D,
    ) -> Result<TurnOutcome, RoomError> {
        self.check_playing()?;
        if !self.flow.is_idle() {
            return Err(RoomError::PlacementInProgress);
        }
        let report = self.game.play_word(
            Side::Player,
            dictionary,
            word,
            Coord::new(row, col),
            direction,
        )?;
        Ok(self.with_ai_reply(report))
    }

    pub fn pass(&mut self) -> Result<TurnOutcome, RoomError> {
        self.check_playing()?;
        self.flow = PlacementFlow::new();
        let mut events = self.game.pass(Side::Player)?;
        events.extend(self.ai_reply());
        self.refresh_status();
        Ok(TurnOutcome {
            report: None,
            events,
        })
    }

    pub fn hint(&mut self) -> Result<String, RoomError> {
        Ok(self.game.hint(Side::Player, &mut self.rng)?)
    }

    pub fn quit(&mut self) -> Vec<GameEvent> {
        self.flow = PlacementFlow::new();
        let events = self.game.quit();
        self.refresh_status();
        events
    }

    pub fn highlights(&self) -> Vec<Vec<CellHighlight>> {
        (0..BOARD_SIZE)
            .map(|row| {
                (0..BOARD_SIZE)
                    .map(|col| self.flow.highlight(&self.game.board, Coord::new(row, col)))
                    .collect()
            })
            .collect()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game: serde_json::to_value(&self.game).unwrap_or_default(),
            board: self.game.board.to_string().lines().map(String::from).collect(),
            highlights: self.highlights(),
            rack: self.game.rack(Side::Player).as_string(),
            player_score: self.game.score(Side::Player),
            ai_score: self.game.score(Side::Ai),
            current_turn: self.game.current_turn,
            tiles_in_bag: self.game.bag.len(),
            status: self.status,
        }
    }

    fn check_playing(&self) -> Result<(), RoomError> {
        if self.game.is_finished() {
            return Err(GameError::GameOver.into());
        }
        Ok(())
    }

    fn with_ai_reply(&mut self, report: MoveReport) -> TurnOutcome {
        let mut events = report.events.clone();
        events.extend(self.ai_reply());
        self.refresh_status();
        TurnOutcome {
            report: Some(report),
            events,
        }
    }

    /// Let the AI move if it is its turn. If its move is refused the AI
    /// passes, so the turn always comes back.
    fn ai_reply(&mut self) -> Vec<GameEvent> {
        if self.game.is_finished() || self.game.current_turn != Side::Ai {
            return Vec::new();
        }
        match play_turn(&mut self.game, Side::Ai, self.bot.as_mut()) {
            Ok(events) => events,
            Err(e) => {
                warn!("AI move refused in game {}: {}; passing instead", self.id, e);
                self.game.pass(Side::Ai).unwrap_or_default()
            }
        }
    }

    fn refresh_status(&mut self) {
        if self.game.is_finished() {
            self.status = GameStatus::Finished;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scrabble_core::{
        FinishReason, PlacementError, PlacementPlan, PlacementRequest, Tile, WordList, CENTER,
        TOTAL_TILES,
    };

    fn tiles(s: &str) -> Vec<Tile> {
        s.chars().filter_map(Tile::from_char).collect()
    }

    fn dict() -> WordList {
        WordList::from_text("cat\nat\ndog\nto\n")
    }

    /// AI only knows DOG and has the letters for it
    fn room(player: &str, ai: &str) -> GameRoom {
        let mut rng = StdRng::seed_from_u64(5);
        let game = GameState::with_racks("Ada", tiles(player), tiles(ai), &mut rng).unwrap();
        GameRoom::from_parts(
            Uuid::new_v4(),
            Uuid::new_v4(),
            game,
            Bot::with_words(["DOG"]),
            rng,
        )
    }

    #[test]
    fn test_create_room() {
        let room = GameRoom::new(Uuid::new_v4(), Uuid::new_v4(), "Ada".to_string(), Some(3));

        assert_eq!(room.status, GameStatus::InGame);
        assert_eq!(room.game.current_turn, Side::Player);
        assert_eq!(room.names().player, "Ada");
        assert_eq!(room.snapshot().rack.len(), 7);
        assert_eq!(room.game.tile_total(), TOTAL_TILES);
    }

    #[test]
    fn test_flow_commits_and_ai_replies() {
        let mut room = room("CATRSEI", "DOGSEEN");
        let dict = dict();

        room.submit_word("cat".into(), &dict).unwrap();
        room.select_cell(7, 7, &dict).unwrap();
        assert_eq!(room.highlights()[7][7], CellHighlight::Selected);

        let outcome = room.choose_direction(Direction::Horizontal, &dict).unwrap();
        let report = outcome.report.unwrap();
        assert_eq!(report.points, 5);
        assert_eq!(report.next_turn, Side::Ai);

        // AI answered with DOG, handing the turn back
        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::WordPlayed { side: Side::Ai, .. })));
        assert_eq!(room.game.current_turn, Side::Player);
        assert_eq!(room.highlights()[7][7], CellHighlight::PlacedPlayer);
    }

    #[test]
    fn test_rejected_placement_keeps_turn() {
        let mut room = room("CATRSEI", "DOGSEEN");
        let err = room
            .play_word("cat", 0, 0, Direction::Horizontal, &dict())
            .unwrap_err();
        assert!(matches!(
            err,
            RoomError::Game(GameError::Placement(PlacementError::MustCoverCenter))
        ));
        assert_eq!(room.game.current_turn, Side::Player);
        assert!(room.game.board.is_empty());
    }

    #[test]
    fn test_play_word_blocked_mid_flow() {
        let mut room = room("CATRSEI", "DOGSEEN");
        room.submit_word("cat".into(), &dict()).unwrap();
        let err = room
            .play_word("cat", 7, 7, Direction::Horizontal, &dict())
            .unwrap_err();
        assert!(matches!(err, RoomError::PlacementInProgress));

        room.cancel_placement(&dict()).unwrap();
        assert!(room
            .play_word("cat", 7, 7, Direction::Horizontal, &dict())
            .is_ok());
    }

    #[test]
    fn test_pass_then_ai_pass_ends_game() {
        // AI has no O, so it can't play DOG
        let mut room = room("CATRSEI", "DGSEENN");
        let outcome = room.pass().unwrap();

        assert!(outcome.report.is_none());
        assert_eq!(room.status, GameStatus::Finished);
        assert!(matches!(
            outcome.events.last(),
            Some(GameEvent::GameOver {
                reason: FinishReason::ConsecutivePasses,
                ..
            })
        ));
        assert!(room.hint().is_err());
    }

    /// Proposes AT down from the A of an opening CAT, whatever its rack
    struct OverreachingProposer;

    impl MoveProposer for OverreachingProposer {
        fn propose(&mut self, game: &GameState, _side: Side) -> Option<PlacementPlan> {
            let request = PlacementRequest::parse("AT", 7, 8, Direction::Vertical).ok()?;
            game.validate(&request).ok()
        }
    }

    #[test]
    fn test_refused_ai_move_passes_turn_back() {
        let mut rng = StdRng::seed_from_u64(5);
        // no T and no blank for the AI
        let game =
            GameState::with_racks("Ada", tiles("CATRSEI"), tiles("DOGSEEN"), &mut rng).unwrap();
        let mut room = GameRoom::from_parts(
            Uuid::new_v4(),
            Uuid::new_v4(),
            game,
            OverreachingProposer,
            rng,
        );

        let outcome = room
            .play_word("cat", 7, 7, Direction::Horizontal, &dict())
            .unwrap();

        assert!(outcome
            .events
            .contains(&GameEvent::Passed { side: Side::Ai }));
        assert_eq!(room.game.current_turn, Side::Player);
        assert_eq!(room.status, GameStatus::InGame);
        assert_eq!(room.game.board.tile_count(), 3);
        assert_eq!(room.game.tile_total(), TOTAL_TILES);
    }

    #[test]
    fn test_quit() {
        let mut room = room("CATRSEI", "DOGSEEN");
        let events = room.quit();
        assert_eq!(events.len(), 1);
        assert_eq!(room.status, GameStatus::Finished);
        assert!(matches!(
            room.submit_word("cat".into(), &dict()),
            Err(RoomError::Game(GameError::GameOver))
        ));
        // the board can still be inspected
        assert!(matches!(
            room.select_cell(7, 7, &dict()),
            Ok(FlowOutput::Inspect { coord, tile: None }) if coord == CENTER
        ));
    }
}
