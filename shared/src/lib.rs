//! Configuration and wire types shared by the tollgate server and its tests.

pub mod config;
pub mod types;
