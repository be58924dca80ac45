pub mod config;
pub mod credential;
pub mod error;
pub mod history;
pub mod io;
pub mod lock;
pub mod paths;
pub mod plan;
pub mod request;
pub mod session;
pub mod streak;
pub mod summary;

pub use error::{CoachError, Result};
