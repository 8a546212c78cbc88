//! User-facing chat texts.

use crate::config::DeliveryStrategy;

pub const WELCOME: &str = "🎶 Welcome to VoFo Music Bot!\n\n\
    Send me any song name or artist and I'll fetch and stream it for you instantly! 🎧";

pub const INVALID_QUERY: &str = "❌ Please send a valid song name.";

pub const MISSING_STREAM: &str = "❌ Failed to get audio stream URL.";

pub const FAILURE: &str = "❌ Failed to play or stream song. Try again later.";

pub fn searching(query: &str) -> String {
    format!("🔍 Searching for {} ...", query)
}

pub fn not_found(query: &str) -> String {
    format!("⚠️ No results found for '{}'", query)
}

pub fn fetching(strategy: DeliveryStrategy, title: &str) -> String {
    match strategy {
        DeliveryStrategy::Stream => format!("🎵 Fetching stream for: {} ...", title),
        DeliveryStrategy::Download => format!("⬇️ Downloading: {} ...", title),
    }
}

pub fn caption(strategy: DeliveryStrategy, title: &str) -> String {
    match strategy {
        DeliveryStrategy::Stream => format!("🎶 {}\n\n▶️ Streamed by VoFo", title),
        DeliveryStrategy::Download => format!("🎶 {}\n\n🎧 Downloaded by VoFo", title),
    }
}

pub fn done(strategy: DeliveryStrategy, title: &str) -> String {
    match strategy {
        DeliveryStrategy::Stream => format!("✅ Streaming: {}", title),
        DeliveryStrategy::Download => format!("✅ Sent: {}", title),
    }
}
