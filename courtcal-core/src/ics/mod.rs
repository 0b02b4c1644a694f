//! Calendar file generation and parsing (RFC 5545).
//!
//! `parse_calendar` and `render_calendar` are the only sanctioned access
//! path to the published feed files; the sync pipeline treats each file as
//! a read-modify-write cycle through this module.

mod generate;
mod parse;

pub use generate::render_calendar;
pub use parse::parse_calendar;
