//! Core module: domain models and the habit-tracking engine

pub mod challenges;
pub mod leveling;
pub mod models;
pub mod report;
pub mod store;
pub mod tracker;
