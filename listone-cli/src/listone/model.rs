//! Player records and listone rows

use std::fmt;

use serde::{Deserialize, Serialize};

/// Playing role of a footballer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Portiere,
    Difensore,
    Centrocampista,
    Attaccante,
}

impl Role {
    /// Fallback for unknown role codes in an uploaded listone
    pub const FALLBACK: Role = Role::Centrocampista;

    /// Parse the one-letter code used in the quotations file (P, D, C, A)
    pub fn from_code(code: &str) -> Option<Role> {
        match code.trim().to_uppercase().as_str() {
            "P" => Some(Role::Portiere),
            "D" => Some(Role::Difensore),
            "C" => Some(Role::Centrocampista),
            "A" => Some(Role::Attaccante),
            _ => None,
        }
    }

    /// Parse the stored name (e.g. "PORTIERE")
    pub fn from_name(name: &str) -> Option<Role> {
        match name {
            "PORTIERE" => Some(Role::Portiere),
            "DIFENSORE" => Some(Role::Difensore),
            "CENTROCAMPISTA" => Some(Role::Centrocampista),
            "ATTACCANTE" => Some(Role::Attaccante),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Portiere => "PORTIERE",
            Role::Difensore => "DIFENSORE",
            Role::Centrocampista => "CENTROCAMPISTA",
            Role::Attaccante => "ATTACCANTE",
        }
    }

    /// Position in the listone ordering: goalkeepers first, forwards last
    pub fn rank(&self) -> u8 {
        match self {
            Role::Portiere => 0,
            Role::Difensore => 1,
            Role::Centrocampista => 2,
            Role::Attaccante => 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row accepted from an uploaded quotations file
#[derive(Debug, Clone, PartialEq)]
pub struct QuotationRow {
    /// 1-based row number in the source sheet
    pub row: u32,
    pub id: i64,
    pub role: Role,
    pub lastname: String,
    pub realteam: String,
    pub value: i64,
}

/// A persisted player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: i64,
    pub lastname: String,
    pub role: Role,
    pub realteam: String,
    pub value: i64,
}

impl From<&QuotationRow> for Player {
    fn from(row: &QuotationRow) -> Self {
        Player {
            id: row.id,
            lastname: row.lastname.clone(),
            role: row.role,
            realteam: row.realteam.clone(),
            value: row.value,
        }
    }
}

/// A player together with the number of fantasy teams rostering it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerAvailability {
    pub player: Player,
    pub teams_count: u32,
}
