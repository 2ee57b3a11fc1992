//! # Domain Module
//!
//! Core domain types for notification server discovery.

pub mod config;
pub mod entities;
pub mod errors;
pub mod topic;
pub mod value_objects;

pub use config::*;
pub use entities::*;
pub use errors::*;
pub use topic::*;
pub use value_objects::*;
