//! Adapters implementing the experiment collaborator ports

mod assertion_checker;
mod failure_generator;

pub use assertion_checker::LogStoreAssertionChecker;
pub use failure_generator::ScenarioFailureGenerator;
