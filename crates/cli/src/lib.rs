//! Lendpool CLI - config validation and scripted simulations
//!
//! Simulations run the real ledger against the mock oracle, mock tokens
//! and a manual clock, optionally journaling every event to disk.

pub mod commands;
pub mod script;
pub mod simulation;

pub use script::{Script, Step, Token};
pub use simulation::{Simulation, SimulationReport, StepOutcome};
