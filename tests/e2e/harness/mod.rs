//! E2E test harness for attention tracking.
//!
//! Builders and assertions here cover more than the current scenarios use.

#![allow(dead_code)]

pub mod assertions;
pub mod runner;
pub mod steps;

pub use assertions::Assertion;
pub use scenario::Scenario;
pub use workspace::TestWorkspace;
