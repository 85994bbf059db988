//! Quire: a small blog backed by a single SQLite file.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod util;
