// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod category;
pub mod map;
pub mod place;

pub use category::*;
pub use map::*;
pub use place::*;
