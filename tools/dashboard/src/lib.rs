pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod report;
pub mod tui;
pub mod usecase;
