//! Shared chess data model.
//!
//! Engine-annotated game records, movetext helpers, and the opening book
//! used to name openings and locate where a game leaves theory.

pub mod game_data;
pub mod movetext;
pub mod opening_book;

pub use game_data::{GameRecord, GameResult, MoveRecord, MISSING_ELO, UNKNOWN_OPENING};
pub use opening_book::{BookError, BookLine, OpeningBook, OpeningLineBook, OpeningMatch};
