//! Combat systems (action timers + hit resolution)

pub mod actions;
pub mod damage;


// Re-export all systems
pub use actions::*;
pub use damage::*;
