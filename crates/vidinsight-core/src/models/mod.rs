//! Data models for the client
//!
//! `upload` holds what the upload page works with, `analysis` the result document
//! served by the gateway.

mod analysis;
mod upload;

pub use analysis::*;
pub use upload::*;
