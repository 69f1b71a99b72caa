//! Playout - SMIL index compiler and server for digital signage players
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod dispatch;
pub mod external;
pub mod identity;
pub mod index;
pub mod server;
pub mod store;
