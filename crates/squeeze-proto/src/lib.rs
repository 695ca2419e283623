//! Wire model, configuration and string tables shared by the player menu.

pub mod config;
pub mod platform;
pub mod protocol;
pub mod strings;
