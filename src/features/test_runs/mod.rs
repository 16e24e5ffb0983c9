//! Prompt testing against configured LLM endpoints.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/test-runs` | Render a prompt version and send it to up to 5 endpoints |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::{TestRunService, TestRunner};
