//! Playout-DB: Database schema and query operations
//!
//! This crate stores players and playlist content in SQLite using rusqlite
//! and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database rows
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use playout_db::pool::{init_pool, get_conn};
//! use playout_db::queries::players;
//!
//! let pool = init_pool("/var/lib/playout/playout.db").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let player = players::get_player(&conn, "a8294bat-c28f-50af-f94o-800869af5854").unwrap();
//! println!("Found: {:?}", player.map(|p| p.name));
//! ```

pub mod models;
pub mod pool;
pub mod queries;
