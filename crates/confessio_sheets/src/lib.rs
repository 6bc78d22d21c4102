//! Google Sheets store client for the Confessio publishing pipeline.
//!
//! The submission form writes one row per confession; this crate reads
//! the unprocessed tail of the sheet, writes terminal statuses back, and
//! keeps two pieces of shared state that live in fixed cells: the
//! running post counter and the Instagram access token pair.
//!
//! Reads and writes go through the Sheets v4 `values` endpoints with a
//! bearer token. No locking: the pipeline assumes non-overlapping
//! scheduled invocations.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod layout;

pub use client::SheetsClient;
pub use layout::{
    COUNT_CELL, DATA_RANGE, FIRST_DATA_ROW, STATUS_COLUMN, TOKEN_RANGE, parse_unprocessed_tail,
};
