//! Excel import of quotations and export of the availability listone

mod reader;
mod writer;

pub use reader::{SkipReason, SkippedRow, parse_listone};
pub use writer::render_listone;
