//! Gamepilot -- Dual-Cadence Game Agent
//!
//! Drives a live desktop game by capturing the screen, asking a
//! vision-capable model for the next move, and executing the answer as
//! constrained input instructions across a staggered worker population.

pub mod types;
pub mod error;
pub mod config;
pub mod parser;
pub mod actions;
pub mod screen;
pub mod providers;
pub mod output;
pub mod worker;
pub mod orchestrator;
