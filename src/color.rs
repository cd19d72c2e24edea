//! Background color parsing.
//!
//! Contact-sheet backgrounds are given as hex strings, either `#RRGGBB` or
//! `#RRGGBBAA`. The leading `#` is optional and digits are case-insensitive.
//! Named colors and CSS functions such as `rgb()` are not accepted.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use image::Rgba;

use crate::error::SheetError;

/// An RGBA color parsed from a hex string.
///
/// # Example
///
/// ```
/// use vidsheet::Color;
///
/// let color: Color = "#00FF0080".parse()?;
/// assert_eq!(color.to_rgba().0, [0, 255, 0, 128]);
/// # Ok::<(), vidsheet::SheetError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
    /// Alpha channel, 255 is fully opaque.
    pub alpha: u8,
}

impl Color {
    /// Opaque white, the default contact-sheet background.
    pub const WHITE: Color = Color::opaque(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Color = Color::opaque(0, 0, 0);

    /// Create a fully opaque color.
    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 255,
        }
    }

    /// Parse a `#RRGGBB` or `#RRGGBBAA` hex string.
    ///
    /// Surrounding whitespace and a single leading `#` are ignored. Six
    /// digits produce an opaque color.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::ConfigError`] if the digit count is neither 6
    /// nor 8, or if any two-digit group is not hexadecimal.
    pub fn parse_hex(value: &str) -> Result<Self, SheetError> {
        let trimmed = value.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if hex.len() != 6 && hex.len() != 8 {
            return Err(SheetError::ConfigError(format!(
                "background color must be #RRGGBB or #RRGGBBAA: {value}"
            )));
        }

        let channel = |offset: usize| -> Result<u8, SheetError> {
            hex.get(offset..offset + 2)
                .filter(|pair| pair.bytes().all(|byte| byte.is_ascii_hexdigit()))
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| {
                    SheetError::ConfigError(format!(
                        "background color has invalid hex digits: {value}"
                    ))
                })
        };

        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self {
            red: channel(0)?,
            green: channel(2)?,
            blue: channel(4)?,
            alpha,
        })
    }

    /// Convert to the `image` crate's pixel type.
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.red, self.green, self.blue, self.alpha])
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl FromStr for Color {
    type Err = SheetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Color::parse_hex(value)
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "#{:02X}{:02X}{:02X}{:02X}",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

impl From<Color> for Rgba<u8> {
    fn from(color: Color) -> Self {
        color.to_rgba()
    }
}
