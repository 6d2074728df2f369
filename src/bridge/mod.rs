pub mod channel;
pub mod codec;
pub mod message;
pub mod server;

pub use channel::Channel;
pub use codec::ChannelCodec;
pub use message::ChannelMessage;
pub use server::BridgeServer;
