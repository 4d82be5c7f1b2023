pub mod burndown;
pub mod cancel;
pub mod doctor;
pub mod encoding;
pub mod error;
pub mod git;
pub mod history;
pub mod io;
pub mod lifecycle;
pub mod paths;
pub mod sprint;
pub mod store;
pub mod story;
pub mod types;

pub use error::{Result, SprintError};
