//! Core Components
//!
//! HTTP transport and redirect-flow session storage.

pub mod session;
pub mod transport;

pub use session::*;
pub use transport::*;
