pub mod test_run_service;
pub mod test_runner;

pub use test_run_service::TestRunService;
pub use test_runner::{EndpointError, EndpointResult, TestRunner};
