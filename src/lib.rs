//! Snake in the terminal
//!
//! This library provides:
//! - Core game logic (game module): grid, snake, fixed-cadence engine
//! - Terminal key capture into a held-key snapshot (input module)
//! - TUI rendering (render module)
//! - Session stats shown in the header (metrics module)
//! - The interactive play loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
