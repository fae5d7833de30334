pub mod answer;
pub mod config;
pub mod credential;
pub mod deadline;
pub mod directory;
pub mod models;
pub mod summary;
pub mod ticket;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
