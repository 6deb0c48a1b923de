//! # capstone_api
//!
//! Client for the capstone portal REST backend.
//!
//! # Features
//!
//! - **Services**: one thin wrapper per backend area (semesters, teams,
//!   invitations, theses, checklists, users, whitelists)
//! - **Sessions**: file-backed token store with explicit init and logout
//! - **Claims**: role/user-id/expiry normalisation for session tokens
//! - **Mock Transport**: scripted backend for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use capstone_api::{ApiConfig, PortalClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::load(None)?;
//!     let client = PortalClient::from_config(&config)?;
//!
//!     if client.restore_session()?.is_some() {
//!         for semester in client.semesters().list().await? {
//!             println!("{} {}", semester.semester_code, semester.status());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod claims;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod services;
pub mod session;
pub mod transport;

pub use claims::SessionClaims;
pub use client::PortalClient;
pub use config::{ApiConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiResult, GENERIC_ERROR_MESSAGE};
pub use http::HttpTransport;
pub use mock::{CapturedCall, MockTransport};
pub use services::*;
pub use session::{Session, SessionStore};
pub use transport::{ApiRequest, ApiResponse, Method, MultipartForm, RequestBody, Transport};
