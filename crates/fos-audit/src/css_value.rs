//! Computed CSS Values
//!
//! Small typed parser for the computed style strings hosts report
//! (`outline`, `box-shadow`, `border`, `font-size`).

/// CSS length value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

/// Length units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Em,
    Rem,
    Percent,
    Pt,
}

impl Length {
    pub fn px(value: f64) -> Self {
        Self { value, unit: LengthUnit::Px }
    }

    /// Parse `12px`, `1.5em`, `50%`, `0`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(s.len());
        let (number, unit) = s.split_at(split);
        let value = number.parse::<f64>().ok()?;

        let unit = match unit.to_ascii_lowercase().as_str() {
            "px" => LengthUnit::Px,
            "em" => LengthUnit::Em,
            "rem" => LengthUnit::Rem,
            "%" => LengthUnit::Percent,
            "pt" => LengthUnit::Pt,
            "" if value == 0.0 => LengthUnit::Px,
            _ => return None,
        };

        Some(Self { value, unit })
    }

    /// Value in CSS pixels, for absolute units only
    pub fn to_px(&self) -> Option<f64> {
        match self.unit {
            LengthUnit::Px => Some(self.value),
            LengthUnit::Pt => Some(self.value * 96.0 / 72.0),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }
}

/// CSS color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// 0.0 (transparent) to 1.0
    pub alpha: f64,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, alpha: 0.0 };

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha <= 0.0
    }

    /// Parse `rgb()`, `rgba()`, `#rgb`, `#rrggbb`, `#rrggbbaa` or a basic keyword
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();

        if let Some(args) = s.strip_prefix("rgba(").or_else(|| s.strip_prefix("rgb(")) {
            let args = args.strip_suffix(')')?;
            let parts: Vec<&str> = args
                .split(|c: char| c == ',' || c == '/' || c == ' ')
                .filter(|p| !p.is_empty())
                .collect();
            if parts.len() < 3 {
                return None;
            }
            let channel = |p: &str| p.parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
            let alpha = match parts.get(3) {
                Some(a) => parse_alpha(a)?,
                None => 1.0,
            };
            return Some(Self { r: channel(parts[0])?, g: channel(parts[1])?, b: channel(parts[2])?, alpha });
        }

        if let Some(hex) = s.strip_prefix('#') {
            return Self::from_hex(hex);
        }

        Some(match s.as_str() {
            "transparent" => Self::TRANSPARENT,
            "black" => Self::rgb(0, 0, 0),
            "white" => Self::rgb(255, 255, 255),
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 128, 0),
            "blue" => Self::rgb(0, 0, 255),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "orange" => Self::rgb(255, 165, 0),
            "currentcolor" => Self::rgb(0, 0, 0),
            _ => return None,
        })
    }

    fn from_hex(hex: &str) -> Option<Self> {
        let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 => {
                let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok().map(|v| v * 17);
                Some(Self::rgb(digit(0)?, digit(1)?, digit(2)?))
            }
            6 => Some(Self::rgb(pair(0)?, pair(2)?, pair(4)?)),
            8 => Some(Self { r: pair(0)?, g: pair(2)?, b: pair(4)?, alpha: pair(6)? as f64 / 255.0 }),
            _ => None,
        }
    }
}

fn parse_alpha(s: &str) -> Option<f64> {
    match s.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok().map(|v| v / 100.0),
        None => s.parse::<f64>().ok(),
    }
}

/// Line style keywords shared by `outline` and `border`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    None,
    Hidden,
    Auto,
    Visible,
}

impl LineStyle {
    fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_lowercase().as_str() {
            "none" => Self::None,
            "hidden" => Self::Hidden,
            "auto" => Self::Auto,
            "solid" | "dotted" | "dashed" | "double" | "groove" | "ridge" | "inset" | "outset" => Self::Visible,
            _ => return None,
        })
    }
}

/// `outline` / `border` shorthand in computed form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub width: Option<Length>,
    pub style: Option<LineStyle>,
    pub color: Option<Color>,
}

impl Line {
    pub fn parse(s: &str) -> Self {
        let mut line = Line { width: None, style: None, color: None };
        for token in split_top_level(s, ' ') {
            if let Some(style) = LineStyle::parse(token) {
                line.style = Some(style);
            } else if let Some(width) = Length::parse(token) {
                line.width = Some(width);
            } else if let Some(color) = Color::parse(token) {
                line.color = Some(color);
            }
        }
        line
    }

    /// Paints something: non-none style, non-zero width, non-transparent color.
    /// Missing components take their initial values (`none`, `medium`, opaque).
    pub fn is_painted(&self) -> bool {
        let styled = matches!(self.style, Some(LineStyle::Visible | LineStyle::Auto));
        let wide = self.width.map_or(true, |w| !w.is_zero());
        let colored = self.color.map_or(true, |c| !c.is_transparent());
        styled && wide && colored
    }
}

/// One `box-shadow` layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Option<Color>,
    pub lengths: usize,
    pub inset: bool,
}

/// Parse a `box-shadow` list. `none` yields an empty list.
pub fn parse_box_shadow(s: &str) -> Vec<Shadow> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("none") {
        return Vec::new();
    }

    split_top_level(s, ',')
        .into_iter()
        .map(|layer| {
            let mut shadow = Shadow { color: None, lengths: 0, inset: false };
            for token in split_top_level(layer, ' ') {
                if token.eq_ignore_ascii_case("inset") {
                    shadow.inset = true;
                } else if Length::parse(token).is_some() {
                    shadow.lengths += 1;
                } else if let Some(color) = Color::parse(token) {
                    shadow.color = Some(color);
                }
            }
            shadow
        })
        .collect()
}

/// Whether any shadow layer paints a visible color
pub fn shadow_is_visible(s: &str) -> bool {
    parse_box_shadow(s)
        .iter()
        .any(|layer| layer.lengths >= 2 && layer.color.map_or(false, |c| !c.is_transparent()))
}

/// Split on `sep` outside parentheses, dropping empty pieces
pub fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);

    parts.into_iter().map(str::trim).filter(|p| !p.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_parse() {
        assert_eq!(Length::parse("16px"), Some(Length::px(16.0)));
        assert_eq!(Length::parse("0"), Some(Length::px(0.0)));
        assert_eq!(Length::parse("13.33px").and_then(|l| l.to_px()), Some(13.33));
        assert_eq!(Length::parse("1.5em").map(|l| l.unit), Some(LengthUnit::Em));
        assert_eq!(Length::parse("12"), None);
        assert_eq!(Length::parse("solid"), None);
    }

    #[test]
    fn test_color_parse() {
        assert_eq!(Color::parse("rgb(0, 95, 204)"), Some(Color::rgb(0, 95, 204)));
        assert!(Color::parse("rgba(0, 0, 0, 0)").unwrap().is_transparent());
        assert!(!Color::parse("rgba(0, 0, 0, 0.5)").unwrap().is_transparent());
        assert_eq!(Color::parse("#fff"), Some(Color::rgb(255, 255, 255)));
        assert!(Color::parse("#00000000").unwrap().is_transparent());
        assert_eq!(Color::parse("bogus"), None);
    }

    #[test]
    fn test_line_parse() {
        let outline = Line::parse("rgb(16, 16, 16) none 0px");
        assert_eq!(outline.style, Some(LineStyle::None));
        assert!(!outline.is_painted());

        let focus_ring = Line::parse("rgb(0, 95, 204) auto 1px");
        assert!(focus_ring.is_painted());

        let border = Line::parse("2px solid rgba(0, 0, 0, 0)");
        assert!(!border.is_painted());
    }

    #[test]
    fn test_box_shadow() {
        assert!(!shadow_is_visible("none"));
        assert!(!shadow_is_visible("rgba(0, 0, 0, 0) 0px 0px 0px 0px"));
        assert!(shadow_is_visible("rgb(0, 95, 204) 0px 0px 0px 3px"));
        assert!(shadow_is_visible("rgba(0, 0, 0, 0) 0px 0px 0px 0px, rgb(255, 0, 0) 0px 0px 4px 2px"));
    }

    #[test]
    fn test_split_top_level() {
        assert_eq!(
            split_top_level("rgb(1, 2, 3) 0px, red 1px", ','),
            vec!["rgb(1, 2, 3) 0px", "red 1px"]
        );
    }
}
