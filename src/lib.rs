pub mod config;
pub mod environment;
pub mod error;
pub mod grouper;
pub mod input;
pub mod report;
pub mod resolver;
pub mod runner;
pub mod types;
