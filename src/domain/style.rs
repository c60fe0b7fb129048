//! Stamp options and text styling.

use super::StandardFont;
use crate::error::{StamperError, StamperResult};
use std::str::FromStr;

/// Format used for the default (today's) date.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default font name, matched against [`StandardFont::from_name`].
pub const DEFAULT_FONT_NAME: &str = "times-roman";

/// Default font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// RGB colour with components nominally in `[0, 1]`.
///
/// Values are written to the PDF as given; nothing clamps them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses `r,g,b` floats or a `#RRGGBB` hex string.
    pub fn parse(input: &str) -> StamperResult<Self> {
        let input = input.trim();
        let invalid = |reason: &str| StamperError::InvalidInput {
            parameter: "color".to_string(),
            reason: format!("{} (got '{}')", reason, input),
        };

        if let Some(hex) = input.strip_prefix('#') {
            if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid("expected #RRGGBB"));
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16)
                    .map(|v| v as f32 / 255.0)
                    .map_err(|_| invalid("expected #RRGGBB"))
            };
            return Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?));
        }

        let parts: Vec<&str> = input.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(invalid("expected three comma-separated components"));
        }
        let mut rgb = [0.0f32; 3];
        for (slot, part) in rgb.iter_mut().zip(&parts) {
            *slot = part
                .parse::<f32>()
                .map_err(|_| invalid("components must be numbers"))?;
        }
        Ok(Self::new(rgb[0], rgb[1], rgb[2]))
    }

    pub fn components(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Rgb {
    type Err = StamperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Resolved font, size and colour used when writing a stamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: StandardFont,
    pub size: f32,
    pub color: Rgb,
}

/// Caller-facing options for a stamping run.
#[derive(Debug, Clone)]
pub struct StampOptions {
    /// Text to insert; today's date when `None`
    pub date_str: Option<String>,

    /// Font size in points
    pub font_size: f32,

    /// Fill colour of the inserted text
    pub font_color: Rgb,

    /// Standard font name (`times-roman`, `helv`, `Courier-Bold`, ...)
    pub font_name: String,

    /// Print progress and confirmation lines to stdout
    pub verbose: bool,
}

impl Default for StampOptions {
    fn default() -> Self {
        Self {
            date_str: None,
            font_size: DEFAULT_FONT_SIZE,
            font_color: Rgb::BLACK,
            font_name: DEFAULT_FONT_NAME.to_string(),
            verbose: true,
        }
    }
}

impl StampOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date_str = Some(date.into());
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.font_color = color;
        self
    }

    pub fn with_font(mut self, name: impl Into<String>) -> Self {
        self.font_name = name.into();
        self
    }

    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }

    /// The date string to insert: the configured one, or today's local date.
    pub fn resolved_date(&self) -> String {
        match &self.date_str {
            Some(date) => date.clone(),
            None => chrono::Local::now()
                .format(DEFAULT_DATE_FORMAT)
                .to_string(),
        }
    }

    /// Validates the font name against the standard font registry.
    pub fn font(&self) -> StamperResult<StandardFont> {
        StandardFont::from_name(&self.font_name).ok_or_else(|| StamperError::UnsupportedFont {
            name: self.font_name.clone(),
        })
    }

    /// Resolves the text style, failing on an unsupported font.
    pub fn text_style(&self) -> StamperResult<TextStyle> {
        Ok(TextStyle {
            font: self.font()?,
            size: self.font_size,
            color: self.font_color,
        })
    }
}
