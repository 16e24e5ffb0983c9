//! Template preview and variable discovery.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/templates/render` | Render a template with supplied values |
//! | POST | `/api/templates/variables` | List variables a template references |

pub mod dtos;
pub mod handlers;
pub mod routes;
