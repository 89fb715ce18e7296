//! # Miner Development Tools
//!
//! Command-line tools for development:
//! - Data validators
//! - Crafting table listings
//! - Save inspection

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod validate;
