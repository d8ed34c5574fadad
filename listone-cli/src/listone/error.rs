//! Listone failures caused by the caller's input
//!
//! These travel inside `anyhow::Error` and are recovered with `downcast_ref`
//! where the HTTP layer has to pick a status code.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListoneError {
    /// Upload did not contain a `file` part
    MissingFile,
    /// Payload is not a readable xlsx workbook
    InvalidWorkbook(String),
    /// File contained no usable player rows
    EmptyListone,
    UnknownTeam(String),
    UnknownPlayer(i64),
    /// Every copy of the player is already rostered
    NoCopiesLeft { player_id: i64, max_copies: u32 },
}

impl fmt::Display for ListoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListoneError::MissingFile => write!(f, "No file uploaded"),
            ListoneError::InvalidWorkbook(reason) => {
                write!(f, "Invalid Excel workbook: {}", reason)
            }
            ListoneError::EmptyListone => {
                write!(f, "The listone contains no player rows")
            }
            ListoneError::UnknownTeam(name) => write!(f, "Unknown team: {}", name),
            ListoneError::UnknownPlayer(id) => write!(f, "Unknown player: {}", id),
            ListoneError::NoCopiesLeft {
                player_id,
                max_copies,
            } => write!(
                f,
                "Player {} is already rostered by {} teams",
                player_id, max_copies
            ),
        }
    }
}

impl std::error::Error for ListoneError {}
