//! Modules d'export (CSV)

pub mod csv;

pub use self::csv::{export_to_csv, write_csv};
