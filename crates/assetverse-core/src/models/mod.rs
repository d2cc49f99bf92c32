//! Data models for the client
//!
//! Each sub-module covers one feature area: the signed-in session, the signed-upload
//! flow, and dashboard navigation.

mod navigation;
mod session;
mod upload;

pub use navigation::*;
pub use session::*;
pub use upload::*;
