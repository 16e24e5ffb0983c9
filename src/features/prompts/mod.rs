//! Prompt storage: append-only version history with per-version upvotes.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/prompts` | Save a new version |
//! | GET | `/api/prompts` | Browse latest versions (search, pagination) |
//! | GET | `/api/prompts/{name}/latest` | Latest version of a prompt |
//! | GET | `/api/prompts/{name}/versions` | Version history |
//! | GET | `/api/prompts/{name}/versions/{version}` | One version |
//! | POST | `/api/prompts/{name}/versions/{version}/upvote` | Upvote a version |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::PromptService;
