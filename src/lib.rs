//! gonggo - funding announcement aggregation pipeline.
//!
//! Collects open calls for proposals from the funding-program API, dozens of
//! agency websites and the public procurement API, scores them for
//! relevance, and stores the new ones in SQLite.

pub mod cli;
pub mod config;
pub mod deadline;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod repository;
pub mod schema;
pub mod scoring;
pub mod scrapers;
