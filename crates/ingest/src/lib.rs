//! Input tables: declared schemas, header validation and row parsing.
//!
//! The presentation shell hands over string tables (`RawTable`); this crate
//! checks them against a declared schema and turns rows into typed records.
//! A missing column aborts the run; bad rows are dropped and counted.

mod parse;
mod schema;
mod table;

pub use parse::{parse_custom_skus, parse_date, parse_history, parse_transitions, Ingested};
pub use schema::{
    Column, ResolvedColumns, TableSchema, CUSTOM_SKU_SCHEMA, HISTORY_SCHEMA, TRANSITION_SCHEMA,
};
pub use table::{read_csv, read_csv_file, RawTable};
