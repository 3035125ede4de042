#![forbid(unsafe_code)]

pub mod flat_file;
pub mod repository;
pub mod sqlite;
