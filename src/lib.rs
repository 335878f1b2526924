//! Shared library for `CityAid`
//! Contains the contribution log, challenge engine and profile bookkeeping used by the CLI

pub mod core;
pub mod shared;

pub use shared::*;
