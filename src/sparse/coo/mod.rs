//! COO (Coordinate) format

mod conversion;
mod core;

pub use core::CooGraph;
