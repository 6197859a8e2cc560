use serde::{Deserialize, Serialize};

/// Inbound wake request as published on the command topic. Unknown
/// fields are ignored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WakeCommand {
    pub mac: String,
}

impl WakeCommand {
    /// The target address with surrounding whitespace trimmed and hex
    /// digits uppercased, independent of sender casing.
    pub fn normalized_mac(&self) -> String {
        self.mac.trim().to_uppercase()
    }
}
