use serde::{Deserialize, Serialize};

/// An opaque RGB colour attached to a track, used as the ambient background
/// while that track is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Accent {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}
impl Accent {
    /// The colour used when no track is selected, or when a track's accent
    /// cannot be understood.
    pub const NEUTRAL: Accent = Accent::new(0, 0, 0);

    /// Create a new accent from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb`. The leading `#` is optional and hex digits
    /// are case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                // Each short-form digit is doubled: `#abc` is `#aabbcc`.
                let short = |s: &str| channel(s).map(|c| c * 0x11);
                Some(Self::new(
                    short(&hex[0..1])?,
                    short(&hex[1..2])?,
                    short(&hex[2..3])?,
                ))
            }
            _ => None,
        }
    }

    /// Render as lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
impl Default for Accent {
    fn default() -> Self {
        Self::NEUTRAL
    }
}
impl std::fmt::Display for Accent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
