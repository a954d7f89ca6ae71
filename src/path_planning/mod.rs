// Path Planning algorithms module

pub mod steering;

pub use steering::*;
