pub mod cli;
pub mod cli_handlers;
pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod models;
pub mod policy;
pub mod time_format;
pub mod view;

pub use crate::core::Schedule;
pub use error::{Result, ScheduleError};
pub use models::*;
