//! Row transformation
//!
//! This module turns the extraction row stream into export records:
//!
//! - [`normalize`] - Nullable scalar to display string
//! - [`unicode`] - Rare ideograph detection for buyer names
//! - [`mapper`] - Row to record mapping with header/detail rules

pub mod mapper;
pub mod normalize;
pub mod unicode;

pub use mapper::{map_row, map_rows, MappedBatch};
pub use normalize::to_display;
pub use unicode::contains_rare_ideograph;
