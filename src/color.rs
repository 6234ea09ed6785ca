// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Color utilities.
//!
//! Print colors are written either as ANSI SGR escape sequences (`"\x1b[32m"`,
//! `"\x1b[38;2;255;128;0m"`) or as color names understood by [`colored`] (`"green"`,
//! `"bright red"`).

use std::str::FromStr;

use colored::Color;

/// Color used for console lines of regular entries.
pub const DEFAULT_PRINT_COLOR: Color = Color::Green;

/// Color used for console lines of alert entries.
pub const ALERT_PRINT_COLOR: Color = Color::Red;

/// Parse a print color from an SGR escape sequence or a color name.
///
/// Returns `None` if the input is neither.
///
/// # Examples
///
/// ```
/// use colored::Color;
/// use logscribe::color::parse_color;
///
/// assert_eq!(parse_color("\x1b[32m"), Some(Color::Green));
/// assert_eq!(parse_color("magenta"), Some(Color::Magenta));
/// assert_eq!(parse_color("not a color"), None);
/// ```
pub fn parse_color(src: &str) -> Option<Color> {
    match src.strip_prefix("\x1b[").and_then(|s| s.strip_suffix('m')) {
        Some(code) => parse_sgr(code),
        None => Color::from_str(src.trim()).ok(),
    }
}

fn parse_sgr(code: &str) -> Option<Color> {
    let parts = code.split(';').collect::<Vec<_>>();
    match parts.as_slice() {
        ["38", "2", r, g, b] => Some(Color::TrueColor {
            r: r.parse().ok()?,
            g: g.parse().ok()?,
            b: b.parse().ok()?,
        }),
        [n] => {
            let color = match n.parse::<u8>().ok()? {
                30 => Color::Black,
                31 => Color::Red,
                32 => Color::Green,
                33 => Color::Yellow,
                34 => Color::Blue,
                35 => Color::Magenta,
                36 => Color::Cyan,
                37 => Color::White,
                90 => Color::BrightBlack,
                91 => Color::BrightRed,
                92 => Color::BrightGreen,
                93 => Color::BrightYellow,
                94 => Color::BrightBlue,
                95 => Color::BrightMagenta,
                96 => Color::BrightCyan,
                97 => Color::BrightWhite,
                _ => return None,
            };
            Some(color)
        }
        _ => None,
    }
}

/// Render a color as its foreground SGR escape sequence.
///
/// This is the inverse of [`parse_color`] for escape sequences and is used when options are
/// serialized.
pub fn to_sgr(color: Color) -> String {
    let code = match color {
        Color::Black => "30",
        Color::Red => "31",
        Color::Green => "32",
        Color::Yellow => "33",
        Color::Blue => "34",
        Color::Magenta => "35",
        Color::Cyan => "36",
        Color::White => "37",
        Color::BrightBlack => "90",
        Color::BrightRed => "91",
        Color::BrightGreen => "92",
        Color::BrightYellow => "93",
        Color::BrightBlue => "94",
        Color::BrightMagenta => "95",
        Color::BrightCyan => "96",
        Color::BrightWhite => "97",
        Color::TrueColor { r, g, b } => return format!("\x1b[38;2;{r};{g};{b}m"),
        #[allow(unreachable_patterns)]
        _ => "39",
    };
    format!("\x1b[{code}m")
}

pub(crate) mod serde_color {
    use colored::Color;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;
    use serde::de::Error;

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_sgr(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let src = String::deserialize(deserializer)?;
        super::parse_color(&src).ok_or_else(|| D::Error::custom(format!("unknown color: {src:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sgr_codes() {
        assert_eq!(parse_color("\x1b[31m"), Some(Color::Red));
        assert_eq!(parse_color("\x1b[96m"), Some(Color::BrightCyan));
        assert_eq!(
            parse_color("\x1b[38;2;1;2;3m"),
            Some(Color::TrueColor { r: 1, g: 2, b: 3 })
        );
        assert_eq!(parse_color("\x1b[0m"), None);
        assert_eq!(parse_color("\x1b[38;2;300;0;0m"), None);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(parse_color("yellow"), Some(Color::Yellow));
        assert_eq!(parse_color("bright blue"), Some(Color::BrightBlue));
        assert_eq!(parse_color(""), None);
    }

    #[test]
    fn test_sgr_round_trip_for_default_colors() {
        for color in [DEFAULT_PRINT_COLOR, ALERT_PRINT_COLOR] {
            assert_eq!(parse_color(&to_sgr(color)), Some(color));
        }
    }
}
