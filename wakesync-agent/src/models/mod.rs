mod command;
mod packet;

pub use command::WakeCommand;
pub use packet::{MAC_LEN, MacAddress, MagicPacket, PACKET_LEN};
