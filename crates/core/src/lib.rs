#![forbid(unsafe_code)]

pub mod catalog;
pub mod model;
pub mod rank;
pub mod time;

pub use rank::Rank;
pub use time::Clock;
