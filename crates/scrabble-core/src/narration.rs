//! Spoken feedback.
//!
//! The engine never speaks. It returns [`GameEvent`]s; hosts turn them into
//! sentences with [`describe`] and hand those to a [`Narrator`], typically a
//! queue drained by a separate worker so speech never blocks a turn.

use crate::actions::{FinishReason, GameEvent, Outcome};
use crate::board::{Side, BOARD_SIZE};
use crate::flow::FlowOutput;
use crate::game::GameState;
use crate::tiles::Tile;

/// Consumer of narration lines (speech engine, log, socket...)
pub trait Narrator {
    fn announce(&mut self, text: &str);
}

/// Collects lines in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingNarrator {
    pub lines: Vec<String>,
}

impl Narrator for RecordingNarrator {
    fn announce(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
}

/// Display names for both sides
#[derive(Debug, Clone)]
pub struct Names {
    pub player: String,
    pub ai: String,
}

impl Names {
    pub fn from_game(game: &GameState) -> Self {
        Self {
            player: game.player(Side::Player).name.clone(),
            ai: game.player(Side::Ai).name.clone(),
        }
    }
}

/// Render one event as a sentence, spoken to the human player
pub fn describe(event: &GameEvent, names: &Names) -> String {
    match event {
        GameEvent::WordPlayed {
            side: Side::Player,
            word,
            points,
            total,
            ..
        } => format!(
            "You played '{}' for {} points. Your score is now {}.",
            word, points, total
        ),
        GameEvent::WordPlayed {
            side: Side::Ai,
            word,
            points,
            total,
            ..
        } => format!(
            "I placed the word {} for {} points. My score is now {}.",
            word, points, total
        ),
        GameEvent::TilesDrawn {
            side: Side::Player,
            count,
        } => format!("You drew {} new tiles.", count),
        GameEvent::TilesDrawn { side: Side::Ai, .. } => "I drew some new tiles.".to_string(),
        GameEvent::MilestoneReached {
            side: Side::Player,
            score,
        } => format!(
            "Wow, {}! You've reached {} points! Excellent playing!",
            names.player, score
        ),
        GameEvent::MilestoneReached { side: Side::Ai, .. } => {
            "I've reached 50 points! I'm doing well, but the game is still on!".to_string()
        }
        GameEvent::Passed { side: Side::Player } => "You passed your turn.".to_string(),
        GameEvent::Passed { side: Side::Ai } => {
            "Hmm, I couldn't find a good word this turn.".to_string()
        }
        GameEvent::TurnChanged { side: Side::Player } => "It's your turn now.".to_string(),
        GameEvent::TurnChanged { side: Side::Ai } => {
            "It's my turn now. I'm thinking about my move.".to_string()
        }
        GameEvent::GameOver {
            reason,
            outcome,
            player_score,
            ai_score,
        } => {
            let why = match reason {
                FinishReason::TilesExhausted => "All the tiles are used up. ",
                FinishReason::ConsecutivePasses => "We both passed, so the game is over. ",
                FinishReason::Quit => "",
            };
            let verdict = match outcome {
                Outcome::Winner(Side::Player) => {
                    format!("Congratulations, {}! You win!", names.player)
                }
                Outcome::Winner(Side::Ai) => {
                    format!("The {} wins! Better luck next time.", names.ai)
                }
                Outcome::Tie => "It's a tie!".to_string(),
            };
            format!(
                "{}{} Final scores: {} {}, {} {}.",
                why, verdict, names.player, player_score, names.ai, ai_score
            )
        }
    }
}

/// Describe every event, in order, to a narrator
pub fn narrate<N: Narrator + ?Sized>(events: &[GameEvent], names: &Names, narrator: &mut N) {
    for event in events {
        narrator.announce(&describe(event, names));
    }
}

/// Prompt for whatever the placement flow asks next
pub fn describe_flow(output: &FlowOutput) -> String {
    match output {
        FlowOutput::ChooseStart { word } => {
            format!("Now select the starting position for '{}' on the board.", word)
        }
        FlowOutput::ChooseDirection { start, .. } => format!(
            "Starting at {}. Choose horizontal or vertical placement.",
            start
        ),
        FlowOutput::Inspect {
            coord,
            tile: Some(Tile::Blank),
        } => format!("Cell at {} holds a blank tile.", coord),
        FlowOutput::Inspect {
            coord,
            tile: Some(tile),
        } => format!("Cell at {} holds the letter {}.", coord, tile),
        FlowOutput::Inspect { coord, tile: None } => format!("Cell at {} is empty.", coord),
        FlowOutput::Ready(request) => format!(
            "Placing '{}' at {}, {}.",
            request.word,
            request.start,
            request.direction.name()
        ),
        FlowOutput::Cancelled => "Placement cancelled.".to_string(),
    }
}

/// Greeting for a new game
pub fn welcome(names: &Names) -> String {
    format!(
        "Hello, {}! Welcome to Accessible Scrabble! I'll be your AI assistant throughout the game.",
        names.player
    )
}

/// The rules, one line per spoken sentence
pub fn rules() -> Vec<String> {
    vec![
        "Create words on the board using letters from your rack and letters already on the board."
            .to_string(),
        "The first word must cover the center square.".to_string(),
        "Later words must connect to words already on the board.".to_string(),
        "Every word must be a valid dictionary word.".to_string(),
        "Each letter scores its face value; blank tiles score nothing.".to_string(),
        format!(
            "To play a word, enter it, choose its starting cell on the {} by {} board, then choose horizontal or vertical.",
            BOARD_SIZE, BOARD_SIZE
        ),
        "The game ends when the bag is empty and a rack runs out, or when both sides pass in a row."
            .to_string(),
    ]
}
