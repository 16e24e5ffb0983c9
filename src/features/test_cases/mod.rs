//! Saved test cases: input values plus the output a prompt is expected to give.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/prompts/{name}/test-cases` | List test cases of a prompt |
//! | POST | `/api/prompts/{name}/test-cases` | Add a test case |
//! | PUT | `/api/prompts/{name}/test-cases/{id}` | Update a test case |
//! | DELETE | `/api/prompts/{name}/test-cases/{id}` | Delete a test case |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::TestCaseService;
