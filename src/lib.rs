//! tbrun: a thin launcher for HDL testbench runs
//!
//! The heavy lifting (compilation, simulation, test discovery) belongs
//! to an external test framework. This crate only prepares a run:
//!
//! - translates bare name fragments on the command line into the
//!   wildcard patterns the framework expects
//! - registers HDL libraries and source files from a sources file or a
//!   conventional layout
//! - detects the GUI request and collects saved waveform viewer
//!   sessions
//! - hands control to the framework runner and, after a passing run,
//!   opens the collected sessions in the viewer

pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod sources;
pub mod translate;
pub mod viewer;

pub use error::{LaunchError, Result};
