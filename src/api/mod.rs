// Agencies API module.
// Provides the HTTP client, endpoint functions and the source trait used by sync.

pub mod client;
pub mod endpoints;
pub mod source;
pub mod types;

pub use client::{ClientConfig, HttpLogLevel, MetroClient};
pub use source::AgencySource;
pub use types::Agency;
