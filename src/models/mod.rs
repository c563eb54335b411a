//! Data models for the SM-Clone client.
//!
//! These models match the JSON documents served by the SM-Clone API.

mod post;
mod requests;
mod user;

pub use post::*;
pub use requests::*;
pub use user::*;
