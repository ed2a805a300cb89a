//! Domain model and attendance arithmetic for the student attendance tracker.

pub mod error;
pub mod model;
pub mod stats;
pub mod threshold;
pub mod time;

pub use error::Error;
pub use time::Clock;
