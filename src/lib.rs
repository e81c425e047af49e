pub mod annot;
pub mod cli;
pub mod commands;
pub mod enrich;
pub mod matches;
pub mod stats;
pub mod utils;
