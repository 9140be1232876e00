pub mod csv;
pub mod json;
pub mod units;

pub use units::{length_unit, velocity_unit, Hud};
