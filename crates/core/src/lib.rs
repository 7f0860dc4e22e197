//! Core types and shared functionality for lboxd.
//!
//! This crate provides:
//! - The record types produced by extraction (films, reviews, lists, people, metadata)
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod model;

pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use model::{
    FilmListEntries, FilmLog, FilmMetadata, FilmReference, ListReference, PersonReference, Rating, Review,
    UserProfile, normalize_whitespace,
};
