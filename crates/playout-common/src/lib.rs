//! Playout-Common: Shared types and utilities.
//!
//! This crate provides the vocabulary used across the playout workspace:
//!
//! - **Typed IDs**: Wrappers for playlist and zone identifiers
//! - **Core Types**: Enums for player models, lifecycle status, and playlist modes
//! - **Player Entity**: The read-only player record the index compiler consumes
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use playout_common::{Error, PlayerStatus, PlaylistId, Result};
//!
//! let playlist = PlaylistId::from(12);
//! assert!(playlist.is_assigned());
//!
//! assert_eq!(PlayerStatus::from_code(2), PlayerStatus::Released);
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("player"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod player;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use player::*;
pub use types::*;
