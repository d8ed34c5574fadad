//! Read player quotations from an uploaded listone workbook
//!
//! Layout of the first worksheet (1-based):
//! - row 1: title, row 2: column headers, players from row 3
//! - column A: player id, B: role code, D: surname, E: real team, F: quotation
//!
//! Positions are absolute sheet coordinates, so a title row left blank does
//! not shift the data.

use std::collections::HashMap;
use std::io::Cursor;

use anyhow::Result;
use calamine::{Data, Range, Reader, Xlsx};

use crate::config::ListoneSettings;
use crate::listone::{ListoneError, QuotationRow, Role};

/// Rows above the first player (title + header)
const HEADER_ROWS: u32 = 2;

/// Zero-based column indices of the quotations layout
mod cols {
    pub const ID: u32 = 0;
    pub const ROLE: u32 = 1;
    pub const LASTNAME: u32 = 3;
    pub const REALTEAM: u32 = 4;
    pub const VALUE: u32 = 5;
}

/// Result of parsing a quotations workbook
#[derive(Debug, Clone, Default)]
pub struct ParsedListone {
    /// Name of the worksheet that was read
    pub sheet_name: String,
    /// Accepted rows, one per player id
    pub rows: Vec<QuotationRow>,
    /// Rows that looked like data but could not be used
    pub skipped: Vec<SkippedRow>,
    /// Ids that appeared more than once; the last occurrence was kept
    pub duplicate_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based sheet row
    pub row: u32,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// One of id, role or surname is empty
    Incomplete,
    /// The id cell is not a positive integer
    InvalidId(String),
}

/// Parse an in-memory xlsx payload into quotation rows
pub fn parse_listone(bytes: &[u8], settings: &ListoneSettings) -> Result<ParsedListone> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| ListoneError::InvalidWorkbook(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ListoneError::InvalidWorkbook("workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ListoneError::InvalidWorkbook(format!("sheet '{}': {}", sheet_name, e)))?;

    let mut parsed = read_rows(&range, settings);
    parsed.sheet_name = sheet_name;

    log::info!(
        "Parsed listone sheet '{}': {} players, {} skipped rows, {} duplicate ids",
        parsed.sheet_name,
        parsed.rows.len(),
        parsed.skipped.len(),
        parsed.duplicate_ids.len()
    );

    Ok(parsed)
}

fn read_rows(range: &Range<Data>, settings: &ListoneSettings) -> ParsedListone {
    let mut parsed = ParsedListone::default();

    let Some((last_row, _)) = range.end() else {
        return parsed;
    };

    // Player id -> index in parsed.rows
    let mut positions: HashMap<i64, usize> = HashMap::new();

    for row in HEADER_ROWS..=last_row {
        let sheet_row = row + 1;
        let cell = |col: u32| range.get_value((row, col));

        let id_text = cell(cols::ID).and_then(cell_text);
        let role_text = cell(cols::ROLE).and_then(cell_text);
        let lastname = cell(cols::LASTNAME).and_then(cell_text);

        let (id_text, role_text, lastname) = match (id_text, role_text, lastname) {
            (Some(id), Some(role), Some(name)) => (id, role, name),
            (None, None, None) => continue,
            _ => {
                log::debug!("Skipping incomplete listone row {}", sheet_row);
                parsed.skipped.push(SkippedRow {
                    row: sheet_row,
                    reason: SkipReason::Incomplete,
                });
                continue;
            }
        };

        let Some(id) = cell(cols::ID).and_then(cell_id) else {
            log::warn!("Skipping listone row {}: invalid id '{}'", sheet_row, id_text);
            parsed.skipped.push(SkippedRow {
                row: sheet_row,
                reason: SkipReason::InvalidId(id_text),
            });
            continue;
        };

        let role = Role::from_code(&role_text).unwrap_or_else(|| {
            log::warn!(
                "Unknown role '{}' for player {} at row {}, using {}",
                role_text,
                id,
                sheet_row,
                Role::FALLBACK
            );
            Role::FALLBACK
        });

        let realteam = cell(cols::REALTEAM)
            .and_then(cell_text)
            .unwrap_or_else(|| settings.default_realteam.clone());

        let value = match cell(cols::VALUE).filter(|c| !is_blank(c)) {
            None => settings.default_value,
            Some(c) => match cell_number(c) {
                Some(v) => match v.round() as i64 {
                    0 => settings.default_value,
                    rounded => rounded,
                },
                None => {
                    log::warn!(
                        "Invalid quotation for player {} at row {}, using {}",
                        id,
                        sheet_row,
                        settings.default_value
                    );
                    settings.default_value
                }
            },
        };

        let quotation = QuotationRow {
            row: sheet_row,
            id,
            role,
            lastname,
            realteam,
            value,
        };

        match positions.get(&id) {
            Some(&index) => {
                log::warn!(
                    "Player {} appears again at row {} (first at row {}), keeping the later row",
                    id,
                    sheet_row,
                    parsed.rows[index].row
                );
                parsed.duplicate_ids.push(id);
                parsed.rows[index] = quotation;
            }
            None => {
                positions.insert(id, parsed.rows.len());
                parsed.rows.push(quotation);
            }
        }
    }

    parsed
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Cell rendered as trimmed text; `None` for empty or non-textual cells
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                Some((*f as i64).to_string())
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) if f.is_finite() => Some(*f),
        Data::String(s) => s.trim().replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Player ids are positive integers; numeric text like "123" is accepted
fn cell_id(cell: &Data) -> Option<i64> {
    let id = match cell {
        Data::Int(i) => *i,
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 => *f as i64,
        Data::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    (id > 0).then_some(id)
}
