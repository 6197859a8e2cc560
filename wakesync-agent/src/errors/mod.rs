pub mod command;
pub mod wake;

pub use command::CommandError;
pub use wake::WakeError;
