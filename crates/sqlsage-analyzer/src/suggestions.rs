//! Optimization suggestions
//!
//! Rule-based analysis of a statement's structure producing actionable
//! recommendations and a 0-100 performance score.

mod advisor;

pub use advisor::*;
