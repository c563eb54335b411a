//! SM-Clone client
//!
//! Client-side session and request layer for the SM-Clone social network:
//! session state with a pure lifecycle reducer, an authenticated request
//! gateway that handles expired sessions uniformly, typed API operations,
//! form validation and image uploads.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod notify;
pub mod routes;
pub mod search;
pub mod session;
pub mod validation;

pub use api::{SocialClient, Timeline};
pub use config::Config;
pub use errors::ClientError;
pub use session::{Mode, Session, SessionEvent, SessionStore};
