// src/lib.rs

#[macro_use]
pub mod log;

pub mod cli;
pub mod core;
pub mod csv;
pub mod error;
pub mod net;
pub mod params;
pub mod progress;
pub mod scrape;
pub mod stats;
pub mod store;
pub mod sync;
