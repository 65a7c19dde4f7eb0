//! Landmark API Library
//!
//! HTTP handlers, the submission pipeline and application setup for the
//! Landmark real estate back office.

mod api_doc;
pub mod constants;
pub mod error;
mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
mod utils;

pub use api_doc::ApiDoc;
pub use error::{ErrorResponse, HttpAppError};
