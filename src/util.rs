use chrono::{DateTime, Utc};

/// Parse a user reference. Accepts:
/// - Mention: "<@123>" or "<@!123>"
/// - Raw ID: "123"
pub fn parse_user_ref(s: &str) -> Option<u64> {
    let s = s.trim();
    let id = match s.strip_prefix("<@").and_then(|r| r.strip_suffix('>')) {
        Some(inner) => inner.strip_prefix('!').unwrap_or(inner),
        None => s,
    };
    id.parse::<u64>().ok()
}

/// Parse a channel reference: "<#123>" or "123".
pub fn parse_channel_ref(s: &str) -> Option<u64> {
    let s = s.trim();
    let id = s
        .strip_prefix("<#")
        .and_then(|r| r.strip_suffix('>'))
        .unwrap_or(s);
    id.parse::<u64>().ok()
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
