pub mod analyzers;
pub mod calendar;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod report;
pub mod source;
pub mod stats;
