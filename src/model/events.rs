use crate::model::gateway::Ready;
use crate::presentation::channel::Channel;
use crate::presentation::guild::{Guild, UnavailableGuild};
use crate::presentation::message::{DeletedMessage, Message};
use serde_json::{Value, from_value};
use tracing::warn;

/// Events delivered to the client by the gateway
#[derive(Debug, Clone)]
pub enum Event {
    /// Session established
    Ready(Box<Ready>),
    /// Session resumed after a reconnect
    Resumed,
    /// Message created
    MessageCreate(Box<Message>),
    /// Message edited; partial object, kept raw
    MessageUpdate(Value),
    /// Message deleted
    MessageDelete(DeletedMessage),
    /// Guild became available or the bot joined it
    GuildCreate(Box<Guild>),
    /// Guild became unavailable or the bot left it
    GuildDelete(UnavailableGuild),
    /// Channel created
    ChannelCreate(Box<Channel>),
    /// Slash command or component interaction, kept raw
    InteractionCreate(Value),
    /// Any other dispatch, or a known one whose data did not parse
    Unknown {
        /// Dispatch name (`t`)
        name: String,
        /// Dispatch data (`d`)
        data: Value,
    },
}

impl Event {
    /// Builds an event from a dispatch name and its data
    ///
    /// Known dispatches whose data does not parse are kept as [`Event::Unknown`].
    #[must_use]
    pub fn from_dispatch(name: &str, data: Value) -> Self {
        match Self::try_from_dispatch(name, data.clone()) {
            Ok(event) => event,
            Err(e) => {
                warn!("Failed to parse {} dispatch: {}", name, e);
                Event::Unknown {
                    name: name.to_string(),
                    data,
                }
            }
        }
    }

    /// Like [`Event::from_dispatch`], but reports data that does not parse
    pub fn try_from_dispatch(name: &str, data: Value) -> Result<Self, serde_json::Error> {
        let event = match name {
            "READY" => Event::Ready(Box::new(from_value(data)?)),
            "RESUMED" => Event::Resumed,
            "MESSAGE_CREATE" => Event::MessageCreate(Box::new(from_value(data)?)),
            "MESSAGE_UPDATE" => Event::MessageUpdate(data),
            "MESSAGE_DELETE" => Event::MessageDelete(from_value(data)?),
            "GUILD_CREATE" => Event::GuildCreate(Box::new(from_value(data)?)),
            "GUILD_DELETE" => Event::GuildDelete(from_value(data)?),
            "CHANNEL_CREATE" => Event::ChannelCreate(Box::new(from_value(data)?)),
            "INTERACTION_CREATE" => Event::InteractionCreate(data),
            _ => Event::Unknown {
                name: name.to_string(),
                data,
            },
        };
        Ok(event)
    }

    /// Dispatch name of the event
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Event::Ready(_) => "READY",
            Event::Resumed => "RESUMED",
            Event::MessageCreate(_) => "MESSAGE_CREATE",
            Event::MessageUpdate(_) => "MESSAGE_UPDATE",
            Event::MessageDelete(_) => "MESSAGE_DELETE",
            Event::GuildCreate(_) => "GUILD_CREATE",
            Event::GuildDelete(_) => "GUILD_DELETE",
            Event::ChannelCreate(_) => "CHANNEL_CREATE",
            Event::InteractionCreate(_) => "INTERACTION_CREATE",
            Event::Unknown { name, .. } => name,
        }
    }
}
