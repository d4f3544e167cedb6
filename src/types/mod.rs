//! Yandex OAuth Types
//!
//! Configuration, token, profile and callback types.

pub mod callback;
pub mod config;
pub mod scope;
pub mod token;
pub mod user_info;

pub use callback::*;
pub use config::*;
pub use token::*;
pub use user_info::*;
