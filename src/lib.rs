pub mod actions;
pub mod breaking;
pub mod cli;
pub mod config;
pub mod error;
pub mod failure;
pub mod github;
pub mod semantic;
pub mod version;

pub use error::{ReleaseActionError, Result};
