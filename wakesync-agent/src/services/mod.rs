mod command_service;
mod wake_service;

pub use command_service::*;
pub use wake_service::*;
