pub mod config;
pub mod export;
pub mod generate;
pub mod history;
pub mod key;
pub mod plan;
pub mod prayer;
pub mod reset;
pub mod status;
pub mod task;
