//! I/O module
//!
//! Handles batch input and summary output.
//!
//! # Components
//!
//! - `source` - Record sources (local file, in-memory bytes)
//! - `decoder` - Splits raw bytes into rows
//! - `csv_format` - Summary output serialization

pub mod csv_format;
pub mod decoder;
pub mod source;

pub use csv_format::write_summary_csv;
pub use decoder::{data_rows, decode};
pub use source::{FileSource, MemorySource};
