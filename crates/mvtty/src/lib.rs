pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod ui;

pub mod runtime;
