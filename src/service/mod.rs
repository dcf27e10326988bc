pub mod roster;
pub mod scheduler;
