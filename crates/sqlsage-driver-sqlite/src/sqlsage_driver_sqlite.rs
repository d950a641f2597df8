//! sqlsage SQLite driver
//!
//! Implements the `Connection` trait over rusqlite so analysis results can
//! be benchmarked against a real database.

mod connection;

pub use connection::*;
