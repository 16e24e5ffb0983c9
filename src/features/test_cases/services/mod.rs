pub mod test_case_service;

pub use test_case_service::TestCaseService;
