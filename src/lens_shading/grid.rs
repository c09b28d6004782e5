//! Gain grid computation module
//!
//! Reduces each channel plane to a coarse grid of block values and derives
//! the fixed-point gains that flatten it.

pub mod aggregate;
pub mod gain;
pub mod types;

pub use aggregate::{GRID_PITCH, aggregate, check_cell_size};
pub use gain::{build_gain_grid, channel_ordering, derive};
pub use types::{BlockGrid, Channel, ChannelGains, GainGrid};
