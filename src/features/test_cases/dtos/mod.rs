pub mod test_case_dto;

pub use test_case_dto::{CreateTestCaseDto, TestCaseResponseDto, UpdateTestCaseDto};
