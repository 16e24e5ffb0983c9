pub mod test_case_handler;

pub use test_case_handler::*;
