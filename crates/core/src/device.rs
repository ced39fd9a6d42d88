//! Coarse device classification from a `User-Agent` header.

use serde::{Deserialize, Serialize};

use crate::content::text_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
    Bot,
    Unknown,
}

text_enum!(DeviceType, "device type", {
    Mobile => "mobile",
    Tablet => "tablet",
    Desktop => "desktop",
    Bot => "bot",
    Unknown => "unknown",
});

/// Ordered rules; the first class with a matching token wins.
///
/// Crawlers often advertise a mobile or desktop platform, and Android
/// phones advertise `Linux`, so the order here is significant.
const RULES: &[(DeviceType, &[&str])] = &[
    (DeviceType::Bot, &["bot", "crawler", "spider", "crawling"]),
    (DeviceType::Tablet, &["ipad", "tablet"]),
    (DeviceType::Mobile, &["mobi", "iphone", "android"]),
    (DeviceType::Desktop, &["windows", "macintosh", "linux"]),
];

/// Classify a user agent. Missing or unrecognised agents are `Unknown`.
pub fn classify_user_agent(user_agent: Option<&str>) -> DeviceType {
    let Some(ua) = user_agent else {
        return DeviceType::Unknown;
    };
    let ua = ua.to_ascii_lowercase();

    RULES
        .iter()
        .find(|(_, tokens)| tokens.iter().any(|token| ua.contains(token)))
        .map_or(DeviceType::Unknown, |(device, _)| *device)
}
