//! Listone synchronization
//!
//! Import a quotations workbook, reconcile the player table with it and
//! render the availability listone for the league.

pub mod availability;
pub mod excel;
pub mod pipeline;
pub mod reconcile;

mod error;
mod model;

pub use availability::{AvailabilityBand, ListoneEntry, build_entries};
pub use error::ListoneError;
pub use excel::{parse_listone, render_listone};
pub use model::*;
pub use pipeline::{export_listone, run_sync};
pub use reconcile::{SyncReport, sync_listone};

/// Content type of generated workbooks
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Insert a date before the extension: `Listone_Aggiornato.xlsx` -> `Listone_Aggiornato_2025-09-01.xlsx`
pub fn dated_file_name(base: &str, date: chrono::NaiveDate) -> String {
    let stem = base.strip_suffix(".xlsx").unwrap_or(base);
    format!("{}_{}.xlsx", stem, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_dated_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        assert_eq!(
            dated_file_name("Listone_Aggiornato.xlsx", date),
            "Listone_Aggiornato_2025-09-01.xlsx"
        );
        assert_eq!(dated_file_name("export", date), "export_2025-09-01.xlsx");
    }
}
