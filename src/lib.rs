pub mod builder;
pub mod config;
pub mod display;
pub mod errors;
pub mod parse;
pub mod persist;
pub mod pipeline;
pub mod plot;
pub mod runner;
pub mod stats;
pub mod types;
