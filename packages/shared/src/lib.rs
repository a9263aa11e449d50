//! Utilities shared by the Vicinity packages.

pub mod logger;
pub mod time;
