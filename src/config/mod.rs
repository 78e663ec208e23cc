// src/config/mod.rs
// DOCUMENTATION: Configuration module organization
// PURPOSE: Re-export configuration components

pub mod data;
pub mod env;

pub use data::init_place_store;
pub use env::Config;
