//! Standard PDF font registry.
//!
//! Every conforming PDF viewer ships the 14 standard Type 1 fonts, so a
//! stamp written with one of them needs no embedding. Names are accepted
//! case-insensitively, either as the PostScript name (`Times-Roman`) or as
//! the four-letter short forms common in PDF tooling (`tiro`, `helv`).

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// One of the 14 standard PDF fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    #[default]
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    Symbol,
    ZapfDingbats,
}

impl StandardFont {
    pub const ALL: [StandardFont; 14] = [
        Self::Helvetica,
        Self::HelveticaBold,
        Self::HelveticaOblique,
        Self::HelveticaBoldOblique,
        Self::TimesRoman,
        Self::TimesBold,
        Self::TimesItalic,
        Self::TimesBoldItalic,
        Self::Courier,
        Self::CourierBold,
        Self::CourierOblique,
        Self::CourierBoldOblique,
        Self::Symbol,
        Self::ZapfDingbats,
    ];

    /// PostScript name written as `/BaseFont`.
    pub fn base_font(self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::TimesRoman => "Times-Roman",
            Self::TimesBold => "Times-Bold",
            Self::TimesItalic => "Times-Italic",
            Self::TimesBoldItalic => "Times-BoldItalic",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
            Self::Symbol => "Symbol",
            Self::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Four-letter short name.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Helvetica => "helv",
            Self::HelveticaBold => "hebo",
            Self::HelveticaOblique => "heit",
            Self::HelveticaBoldOblique => "hebi",
            Self::TimesRoman => "tiro",
            Self::TimesBold => "tibo",
            Self::TimesItalic => "tiit",
            Self::TimesBoldItalic => "tibi",
            Self::Courier => "cour",
            Self::CourierBold => "cobo",
            Self::CourierOblique => "coit",
            Self::CourierBoldOblique => "cobi",
            Self::Symbol => "symb",
            Self::ZapfDingbats => "zadb",
        }
    }

    /// Looks up a font by PostScript or short name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        static REGISTRY: Lazy<HashMap<String, StandardFont>> = Lazy::new(|| {
            let mut map = HashMap::new();
            for font in StandardFont::ALL {
                map.insert(font.base_font().to_ascii_lowercase(), font);
                map.insert(font.short_name().to_string(), font);
            }
            map
        });

        REGISTRY.get(&name.trim().to_ascii_lowercase()).copied()
    }

    /// Symbolic fonts carry their own built-in encoding.
    pub fn is_symbolic(self) -> bool {
        matches!(self, Self::Symbol | Self::ZapfDingbats)
    }
}

impl fmt::Display for StandardFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_font())
    }
}
