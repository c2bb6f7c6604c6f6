//! Command implementations for the mutrack CLI

pub mod config;
pub mod layout;
