//! Functionality shared by the marshal crates that isn't part of the data model: log setup and
//! the pieces of configuration every component understands.

pub mod config;
pub mod log;
