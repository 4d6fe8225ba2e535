//! # RoboMaze
//!
//! Application layer over the `robomaze_core` engines: maze preparation,
//! engine comparison and the headless and real-time simulation drivers.

pub mod app;

pub use robomaze_core::AppConfig;
