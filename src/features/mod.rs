pub mod endpoints;
pub mod prompts;
pub mod templates;
pub mod test_cases;
pub mod test_runs;
