//! Driver roster records

use serde::{Deserialize, Serialize};

/// Fallback colour for drivers without a parseable team colour
pub const DEFAULT_TEAM_RGB: (u8, u8, u8) = (128, 128, 128);

/// A driver entered in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub session_key: u32,
    pub driver_number: u32,
    #[serde(default)]
    pub broadcast_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub name_acronym: String,
    #[serde(default)]
    pub team_name: Option<String>,
    /// Hex colour without the leading `#`
    #[serde(default)]
    pub team_colour: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub headshot_url: Option<String>,
}

impl Driver {
    /// Team colour as RGB, grey when missing or malformed
    pub fn team_colour_rgb(&self) -> (u8, u8, u8) {
        self.team_colour
            .as_deref()
            .and_then(parse_hex_rgb)
            .unwrap_or(DEFAULT_TEAM_RGB)
    }
}

fn parse_hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
