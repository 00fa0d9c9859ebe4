//! Application layer: selection resolution, shell launching, and the command tying them together.

pub mod command;
pub mod launcher;
pub mod resolver;
