//! Grade Computation & Aggregation Engine
//!
//! This crate turns raw per-paper exam scores into subject grades, selects
//! the subjects that count toward a student's overall result, computes mean
//! points and overall grades, and aggregates and ranks those results across
//! streams, classes, gender groups and custom groups.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
