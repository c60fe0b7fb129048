//! Font dictionaries reduced to what text extraction needs.
//!
//! For each font we keep its glyph advances, its vertical extent, and a
//! code-to-Unicode mapping. Type0 fonts are read as two-byte codes. Simple
//! fonts are read one byte per glyph and decoded as WinAnsi unless a
//! `/ToUnicode` CMap says otherwise.

use super::encoding::decode_win_ansi;
use super::metrics::{standard_width, DEFAULT_GLYPH_WIDTH};
use super::objects::{dict_entry, number, resolve, stream_bytes};
use lopdf::{Dictionary, Document, Object};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

const DEFAULT_ASCENT: f32 = 0.8;
const DEFAULT_DESCENT: f32 = -0.2;
const DEFAULT_CID_WIDTH: f32 = 1000.0;

/// Longest bfrange we expand; larger ranges are truncated.
const MAX_RANGE: u32 = 0xFFFF;

/// Metrics and decoding tables for one font resource.
#[derive(Debug, Clone)]
pub struct FontInfo {
    pub base_font: String,
    /// Composite (Type0) font with two-byte codes
    pub two_byte: bool,
    /// Ascender as a fraction of the em
    pub ascent: f32,
    /// Descender as a fraction of the em, negative below the baseline
    pub descent: f32,
    first_char: u32,
    widths: Vec<f32>,
    cid_widths: HashMap<u32, f32>,
    missing_width: Option<f32>,
    to_unicode: HashMap<u32, String>,
}

impl Default for FontInfo {
    fn default() -> Self {
        Self {
            base_font: String::new(),
            two_byte: false,
            ascent: DEFAULT_ASCENT,
            descent: DEFAULT_DESCENT,
            first_char: 0,
            widths: Vec::new(),
            cid_widths: HashMap::new(),
            missing_width: None,
            to_unicode: HashMap::new(),
        }
    }
}

impl FontInfo {
    /// Reads a font dictionary. Missing or malformed entries fall back to defaults.
    pub fn load(doc: &Document, font: &Dictionary) -> Self {
        let mut info = FontInfo {
            base_font: font
                .get(b"BaseFont")
                .and_then(Object::as_name)
                .map(|n| String::from_utf8_lossy(n).into_owned())
                .unwrap_or_default(),
            ..Default::default()
        };

        let is_type0 = font.get(b"Subtype").and_then(Object::as_name).ok() == Some(b"Type0".as_slice());

        let descriptor_owner = if is_type0 {
            info.two_byte = true;
            let descendant = font
                .get(b"DescendantFonts")
                .ok()
                .map(|obj| resolve(doc, obj))
                .and_then(|obj| obj.as_array().ok())
                .and_then(|array| array.first())
                .map(|obj| resolve(doc, obj))
                .and_then(|obj| obj.as_dict().ok());
            if let Some(cid_font) = descendant {
                info.missing_width = cid_font.get(b"DW").ok().and_then(number);
                if let Some(w) = cid_font.get(b"W").ok().map(|obj| resolve(doc, obj)) {
                    info.cid_widths = parse_cid_widths(doc, w);
                }
            }
            descendant
        } else {
            info.first_char = font
                .get(b"FirstChar")
                .ok()
                .and_then(number)
                .map_or(0, |n| n.max(0.0) as u32);
            if let Some(Object::Array(widths)) = font.get(b"Widths").ok().map(|obj| resolve(doc, obj)) {
                info.widths = widths
                    .iter()
                    .map(|w| number(resolve(doc, w)).unwrap_or(0.0))
                    .collect();
            }
            Some(font)
        };

        if let Some(descriptor) = descriptor_owner.and_then(|d| dict_entry(doc, d, b"FontDescriptor")) {
            if let Some(ascent) = descriptor.get(b"Ascent").ok().and_then(number) {
                if ascent > 0.0 {
                    info.ascent = ascent / 1000.0;
                }
            }
            if let Some(descent) = descriptor.get(b"Descent").ok().and_then(number) {
                if descent != 0.0 {
                    info.descent = -(descent.abs()) / 1000.0;
                }
            }
            if !info.two_byte {
                info.missing_width = descriptor
                    .get(b"MissingWidth")
                    .ok()
                    .and_then(number)
                    .filter(|w| *w > 0.0);
            }
        }

        if let Some(Object::Stream(stream)) = font.get(b"ToUnicode").ok().map(|obj| resolve(doc, obj)) {
            match stream_bytes(stream) {
                Ok(bytes) => info.to_unicode = parse_to_unicode(&String::from_utf8_lossy(&bytes)),
                Err(e) => log::warn!("Ignoring unreadable ToUnicode CMap for {}: {}", info.base_font, e),
            }
        }

        info
    }

    /// Splits a shown string into character codes.
    pub fn codes(&self, bytes: &[u8]) -> Vec<u32> {
        if self.two_byte {
            bytes
                .chunks(2)
                .map(|pair| match pair {
                    [hi, lo] => u32::from(*hi) << 8 | u32::from(*lo),
                    [single] => u32::from(*single),
                    _ => 0,
                })
                .collect()
        } else {
            bytes.iter().map(|b| u32::from(*b)).collect()
        }
    }

    /// Advance width of `code` in 1/1000 em.
    pub fn width(&self, code: u32) -> f32 {
        if self.two_byte {
            return self
                .cid_widths
                .get(&code)
                .copied()
                .or(self.missing_width)
                .unwrap_or(DEFAULT_CID_WIDTH);
        }

        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize).copied())
            .or_else(|| standard_width(&self.base_font, code))
            .or(self.missing_width)
            .unwrap_or(DEFAULT_GLYPH_WIDTH)
    }

    /// Unicode text for `code`; empty when the code has no mapping.
    pub fn unicode(&self, code: u32) -> String {
        if let Some(text) = self.to_unicode.get(&code) {
            return text.clone();
        }
        let fallback = if self.two_byte {
            char::from_u32(code).filter(|c| !c.is_control())
        } else {
            u8::try_from(code).ok().and_then(decode_win_ansi)
        };
        fallback.map(String::from).unwrap_or_default()
    }
}

/// Parses a CIDFont `/W` array: `c [w1 w2 ...]` or `c_first c_last w`.
fn parse_cid_widths(doc: &Document, w: &Object) -> HashMap<u32, f32> {
    let mut widths = HashMap::new();
    let Ok(items) = w.as_array() else {
        return widths;
    };

    let mut i = 0;
    while i < items.len() {
        let Some(first) = number(resolve(doc, &items[i])) else {
            break;
        };
        let first = first.max(0.0) as u32;
        match items.get(i + 1).map(|obj| resolve(doc, obj)) {
            Some(Object::Array(list)) => {
                for (offset, width) in list.iter().enumerate() {
                    let Some(code) = u32::try_from(offset).ok().and_then(|o| first.checked_add(o)) else {
                        break;
                    };
                    if let Some(width) = number(resolve(doc, width)) {
                        widths.insert(code, width);
                    }
                }
                i += 2;
            }
            Some(last) => {
                let (Some(last), Some(width)) = (
                    number(last),
                    items.get(i + 2).and_then(|obj| number(resolve(doc, obj))),
                ) else {
                    break;
                };
                let last = (last.max(0.0) as u32).min(first.saturating_add(MAX_RANGE));
                for code in first..=last {
                    widths.insert(code, width);
                }
                i += 3;
            }
            None => break,
        }
    }
    widths
}

#[derive(Debug, PartialEq)]
enum CMapToken {
    Hex(Vec<u8>),
    Open,
    Close,
}

fn cmap_tokens(section: &str) -> Vec<CMapToken> {
    static TOKEN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"<([0-9A-Fa-f\s]*)>|(\[)|(\])").expect("Valid CMap token regex")
    });

    TOKEN
        .captures_iter(section)
        .map(|caps| {
            if let Some(hex) = caps.get(1) {
                CMapToken::Hex(hex_bytes(hex.as_str()))
            } else if caps.get(2).is_some() {
                CMapToken::Open
            } else {
                CMapToken::Close
            }
        })
        .collect()
}

fn hex_bytes(hex: &str) -> Vec<u8> {
    let digits: Vec<u8> = hex
        .bytes()
        .filter(u8::is_ascii_hexdigit)
        .map(|b| match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            _ => b - b'A' + 10,
        })
        .collect();
    digits
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => hi << 4 | lo,
            [hi] => hi << 4,
            _ => 0,
        })
        .collect()
}

fn code_value(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, b| acc << 8 | u32::from(*b))
}

fn utf16_units(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            [single] => u16::from(*single),
            _ => 0,
        })
        .collect()
}

/// Parses the `bfchar` and `bfrange` sections of a ToUnicode CMap.
pub fn parse_to_unicode(cmap: &str) -> HashMap<u32, String> {
    static BFCHAR: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)beginbfchar(.*?)endbfchar").expect("Valid bfchar regex"));
    static BFRANGE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)beginbfrange(.*?)endbfrange").expect("Valid bfrange regex"));

    let mut map = HashMap::new();

    for section in BFCHAR.captures_iter(cmap) {
        let tokens = cmap_tokens(&section[1]);
        for pair in tokens.chunks(2) {
            if let [CMapToken::Hex(src), CMapToken::Hex(dst)] = pair {
                map.insert(code_value(src), String::from_utf16_lossy(&utf16_units(dst)));
            }
        }
    }

    for section in BFRANGE.captures_iter(cmap) {
        let tokens = cmap_tokens(&section[1]);
        let mut iter = tokens.into_iter();
        while let (Some(CMapToken::Hex(lo)), Some(CMapToken::Hex(hi))) = (iter.next(), iter.next()) {
            let lo = code_value(&lo);
            let hi = code_value(&hi).min(lo.saturating_add(MAX_RANGE));
            match iter.next() {
                Some(CMapToken::Hex(dst)) => {
                    let base = utf16_units(&dst);
                    for (offset, code) in (lo..=hi).enumerate() {
                        let mut units = base.clone();
                        if let Some(last) = units.last_mut() {
                            *last = last.wrapping_add(offset as u16);
                        }
                        map.insert(code, String::from_utf16_lossy(&units));
                    }
                }
                Some(CMapToken::Open) => {
                    let mut next = Some(lo);
                    for token in iter.by_ref() {
                        match token {
                            CMapToken::Hex(dst) => {
                                if let Some(code) = next.filter(|code| *code <= hi) {
                                    map.insert(code, String::from_utf16_lossy(&utf16_units(&dst)));
                                    next = code.checked_add(1);
                                }
                            }
                            CMapToken::Close => break,
                            _ => {}
                        }
                    }
                }
                _ => break,
            }
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    const CMAP: &str = "\
/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
1 begincodespacerange <0000> <FFFF> endcodespacerange
2 beginbfchar
<0003> <0020>
<0011> <0044>
endbfchar
2 beginbfrange
<0024> <0026> <0061>
<0030> <0031> [<0045> <004E>]
endbfrange
endcmap";

    #[test]
    fn test_bfchar_and_bfrange() {
        let map = parse_to_unicode(CMAP);
        assert_eq!(map.get(&0x03).map(String::as_str), Some(" "));
        assert_eq!(map.get(&0x11).map(String::as_str), Some("D"));
        assert_eq!(map.get(&0x24).map(String::as_str), Some("a"));
        assert_eq!(map.get(&0x26).map(String::as_str), Some("c"));
        assert_eq!(map.get(&0x30).map(String::as_str), Some("E"));
        assert_eq!(map.get(&0x31).map(String::as_str), Some("N"));
        assert_eq!(map.len(), 7);
    }

    #[test]
    fn test_simple_font_with_widths() {
        let doc = Document::with_version("1.5");
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => "ABCDEF+Calibri",
            "FirstChar" => 65,
            "Widths" => vec![600.into(), 700.into()],
        };
        let info = FontInfo::load(&doc, &font);
        assert_eq!(info.width(65), 600.0);
        assert_eq!(info.width(66), 700.0);
        assert_eq!(info.width(67), DEFAULT_GLYPH_WIDTH);
        assert_eq!(info.unicode(65), "A");
        assert!(!info.two_byte);
    }

    #[test]
    fn test_standard_font_without_widths() {
        let doc = Document::with_version("1.5");
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        };
        let info = FontInfo::load(&doc, &font);
        assert_eq!(info.width(u32::from(b'E')), 667.0);
        assert_eq!(info.ascent, DEFAULT_ASCENT);
    }

    #[test]
    fn test_cid_widths() {
        let doc = Document::with_version("1.5");
        let w = Object::Array(vec![
            1.into(),
            Object::Array(vec![500.into(), 600.into()]),
            10.into(),
            12.into(),
            250.into(),
        ]);
        let widths = parse_cid_widths(&doc, &w);
        assert_eq!(widths.get(&1), Some(&500.0));
        assert_eq!(widths.get(&2), Some(&600.0));
        assert_eq!(widths.get(&11), Some(&250.0));
        assert_eq!(widths.len(), 5);
    }

    #[test]
    fn test_bfrange_array_at_top_of_code_space() {
        let cmap = "1 beginbfrange\n<FFFFFFFF> <FFFFFFFF> [<0041> <0042>]\nendbfrange";
        let map = parse_to_unicode(cmap);
        assert_eq!(map.get(&u32::MAX).map(String::as_str), Some("A"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_cid_widths_at_top_of_code_space() {
        let doc = Document::with_version("1.5");
        let w = Object::Array(vec![
            Object::Integer(i64::from(u32::MAX)),
            Object::Array(vec![500.into(), 600.into(), 700.into()]),
        ]);
        let widths = parse_cid_widths(&doc, &w);
        assert_eq!(widths.get(&u32::MAX), Some(&500.0));
        assert_eq!(widths.len(), 1);
    }

    #[test]
    fn test_two_byte_codes() {
        let info = FontInfo {
            two_byte: true,
            ..Default::default()
        };
        assert_eq!(info.codes(&[0x00, 0x44, 0x00, 0x61]), vec![0x44, 0x61]);
        assert_eq!(info.unicode(0x44), "D");
    }
}
