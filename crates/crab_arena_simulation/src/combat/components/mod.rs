//! Combat components

pub mod action;
pub mod pose;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod action_tests;

// Re-export all components
pub use action::*;
pub use pose::*;
