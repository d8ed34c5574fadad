//! Available copies per player and the listone ordering

use std::cmp::Ordering;

use crate::listone::{Player, PlayerAvailability};

/// Row color of a player in the generated listone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityBand {
    /// Three or more copies left
    Green,
    /// Two copies left
    Red,
    /// Last copy
    Black,
}

impl AvailabilityBand {
    /// Band for a number of free copies; `None` when nothing is left
    pub fn for_copies(copies: u32) -> Option<AvailabilityBand> {
        match copies {
            0 => None,
            1 => Some(AvailabilityBand::Black),
            2 => Some(AvailabilityBand::Red),
            _ => Some(AvailabilityBand::Green),
        }
    }

    /// Fill color as 0xRRGGBB
    pub fn fill_color(&self) -> u32 {
        match self {
            AvailabilityBand::Green => 0x00AA00,
            AvailabilityBand::Red => 0xFF0000,
            AvailabilityBand::Black => 0x000000,
        }
    }
}

/// One row of the generated listone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListoneEntry {
    pub player: Player,
    pub teams_count: u32,
    pub copies: u32,
    pub band: AvailabilityBand,
}

/// Compute free copies, drop exhausted players and sort the rest
pub fn build_entries(players: Vec<PlayerAvailability>, max_copies: u32) -> Vec<ListoneEntry> {
    let total = players.len();

    let mut entries: Vec<ListoneEntry> = players
        .into_iter()
        .filter_map(|p| {
            let copies = max_copies.saturating_sub(p.teams_count);
            let band = AvailabilityBand::for_copies(copies)?;
            Some(ListoneEntry {
                player: p.player,
                teams_count: p.teams_count,
                copies,
                band,
            })
        })
        .collect();

    entries.sort_by(|a, b| compare_players(&a.player, &b.player));

    log::debug!(
        "Listone view: {} available of {} players (max {} copies)",
        entries.len(),
        total,
        max_copies
    );

    entries
}

/// Role, then surname ignoring case, then id
pub fn compare_players(a: &Player, b: &Player) -> Ordering {
    a.role
        .rank()
        .cmp(&b.role.rank())
        .then_with(|| a.lastname.to_lowercase().cmp(&b.lastname.to_lowercase()))
        .then_with(|| a.id.cmp(&b.id))
}
