//! Configured LLM endpoints (read-only).
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/endpoints` | List configured endpoints |
//! | GET | `/api/endpoints/{name}` | Get one endpoint |

pub mod handlers;
pub mod registry;
pub mod routes;

pub use registry::{EndpointDescriptor, EndpointRegistry, RegistryError};
