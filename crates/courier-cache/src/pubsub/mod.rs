//! Pub/sub channels, publisher, and notifier

pub mod channels;
pub mod notifier;
pub mod publisher;

pub use channels::{
    PubSubChannel, BROADCAST_CHANNEL, CONVERSATION_CHANNEL_PREFIX, USER_CHANNEL_PREFIX,
};
pub use notifier::RedisNotifier;
pub use publisher::{PubSubEvent, Publisher};
