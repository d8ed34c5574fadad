//! Write the availability listone to xlsx

use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

use crate::listone::{AvailabilityBand, ListoneEntry};

/// Column indices of the generated listone
mod cols {
    pub const ID: u16 = 0;
    pub const LASTNAME: u16 = 1;
    pub const ROLE: u16 = 2;
    pub const REALTEAM: u16 = 3;
    pub const VALUE: u16 = 4;
    pub const COPIES: u16 = 5;
}

/// Header text and width of every column, in column order
const COLUMNS: [(&str, f64); 6] = [
    ("ID", 10.0),
    ("Cognome", 25.0),
    ("Ruolo", 15.0),
    ("Squadra", 20.0),
    ("Quotazione", 10.0),
    ("Copie Disp.", 15.0),
];

/// Row formats, one per availability band
struct BandFormats {
    green: Format,
    red: Format,
    black: Format,
}

impl BandFormats {
    fn new() -> Self {
        Self {
            green: band_format(AvailabilityBand::Green),
            red: band_format(AvailabilityBand::Red),
            black: band_format(AvailabilityBand::Black),
        }
    }

    fn get(&self, band: AvailabilityBand) -> &Format {
        match band {
            AvailabilityBand::Green => &self.green,
            AvailabilityBand::Red => &self.red,
            AvailabilityBand::Black => &self.black,
        }
    }
}

fn band_format(band: AvailabilityBand) -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(band.fill_color()))
}

/// Render the listone workbook into memory
pub fn render_listone(entries: &[ListoneEntry], sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet
        .set_name(sheet_name)
        .with_context(|| format!("Invalid worksheet name: {}", sheet_name))?;
    write_header(worksheet)?;

    let formats = BandFormats::new();
    for (idx, entry) in entries.iter().enumerate() {
        write_entry(worksheet, idx as u32 + 1, entry, formats.get(entry.band))?;
    }

    let bytes = workbook
        .save_to_buffer()
        .context("Failed to render listone workbook")?;

    log::info!("Rendered listone with {} players ({} bytes)", entries.len(), bytes.len());

    Ok(bytes)
}

fn write_header(ws: &mut Worksheet) -> Result<()> {
    let bold = Format::new().set_bold();
    for (col, (title, width)) in COLUMNS.iter().enumerate() {
        ws.set_column_width(col as u16, *width)?;
        ws.write_string_with_format(0, col as u16, *title, &bold)?;
    }
    Ok(())
}

fn write_entry(ws: &mut Worksheet, row: u32, entry: &ListoneEntry, format: &Format) -> Result<()> {
    let player = &entry.player;
    ws.write_number_with_format(row, cols::ID, player.id as f64, format)?;
    ws.write_string_with_format(row, cols::LASTNAME, &player.lastname, format)?;
    ws.write_string_with_format(row, cols::ROLE, player.role.as_str(), format)?;
    ws.write_string_with_format(row, cols::REALTEAM, &player.realteam, format)?;
    ws.write_number_with_format(row, cols::VALUE, player.value as f64, format)?;
    ws.write_number_with_format(row, cols::COPIES, entry.copies, format)?;
    Ok(())
}
