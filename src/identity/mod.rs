//! IdentityIQ integration
//!
//! `client` owns credentials and tokens; `facade` is the restricted surface
//! handed to tool handlers.

pub mod client;
pub mod error;
pub mod facade;
pub mod transport;
pub mod types;

pub use client::SailPointApi;
pub use error::IdentityError;
pub use facade::{IdentityOperations, ToolClient, UnconfiguredIdentity};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{ClientSecret, IdentityCredentials, OperationResult, RefreshAck};
