//! Configuration module for VoFo.
//!
//! Settings are loaded once at startup and handed to the chat workflow and the
//! HTTP service explicitly.

mod settings;

pub use settings::{
    BotSettings, DeliveryStrategy, ExtractorSettings, GeneralSettings, PlaybackSettings,
    ServerSettings, Settings, BOT_TOKEN_ENV,
};
