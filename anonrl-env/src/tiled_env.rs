//! Tile coding of (state, action) pairs.
mod base;
mod config;
mod tile_coding;
pub use base::TiledEnv;
pub use config::{TiledEnvConfig, TilingConfig};
pub use tile_coding::{tiles, Iht};
