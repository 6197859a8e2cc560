pub mod settings;

pub use settings::{Broker, BrokerAuth, Logger, Settings, Wake};
