//! Stamp writer that places the date in a FreeText annotation.

use super::content::text_operations;
use super::page_edit::{append_annotation, register_form_font};
use super::writer::{StampTarget, StampWriter};
use crate::domain::{StandardFont, TextStyle};
use crate::error::{StamperError, StamperResult};
use crate::layout::encoding::encode_win_ansi;
use crate::layout::metrics::{standard_width, DEFAULT_GLYPH_WIDTH};
use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

/// Depth of the annotation box below the baseline, as a fraction of size.
const BOX_DESCENT: f32 = 0.25;

/// Annotation flag: print the annotation with the page.
const FLAG_PRINT: i64 = 4;

/// Writes the date as a FreeText annotation with its own appearance stream.
///
/// Viewers can move or delete the stamp afterwards; the page content
/// itself is left untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnnotationWriter;

impl AnnotationWriter {
    pub fn new() -> Self {
        Self
    }
}

/// Advance width of `text` in `font` at `size`, from the standard metrics.
pub fn text_width(font: StandardFont, text: &str, size: f32) -> f32 {
    let units: f32 = encode_win_ansi(text)
        .into_iter()
        .map(|code| standard_width(font.base_font(), code as u32).unwrap_or(DEFAULT_GLYPH_WIDTH))
        .sum();
    units / 1000.0 * size
}

/// `/DA` string selecting the form font registered as `font_name`.
fn default_appearance(font_name: &[u8], style: &TextStyle) -> String {
    let [r, g, b] = style.color.components();
    format!(
        "/{} {} Tf {} {} {} rg",
        String::from_utf8_lossy(font_name),
        style.size,
        r,
        g,
        b
    )
}

impl StampWriter for AnnotationWriter {
    fn write(
        &self,
        doc: &mut Document,
        target: &StampTarget,
        text: &str,
        style: &TextStyle,
    ) -> StamperResult<()> {
        let (x, y) = target.geometry.to_user(target.at);
        let width = text_width(style.font, text, style.size);
        let descent = BOX_DESCENT * style.size;
        let height = style.size + descent;

        let (font_name, font_id) = register_form_font(doc, style.font)?;
        let mut fonts = Dictionary::new();
        fonts.set(font_name.clone(), font_id);
        let appearance = Content {
            operations: text_operations(font_name.clone(), text, style, 0.0, descent),
        }
        .encode()
        .map_err(|e| StamperError::pdf("Failed to encode annotation appearance", Some(target.page), e))?;
        let appearance_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![0.into(), 0.into(), Object::Real(width), Object::Real(height)],
                "Resources" => dictionary! { "Font" => fonts },
            },
            appearance,
        ));

        let annot_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "FreeText",
            "Rect" => vec![
                Object::Real(x),
                Object::Real(y - descent),
                Object::Real(x + width),
                Object::Real(y + style.size),
            ],
            "Contents" => Object::String(encode_win_ansi(text), StringFormat::Literal),
            "DA" => Object::string_literal(default_appearance(&font_name, style)),
            "F" => FLAG_PRINT,
            "P" => target.page_id,
            "BS" => dictionary! { "W" => 0 },
            "AP" => dictionary! { "N" => appearance_id },
        });

        log::debug!(
            "Page {}: FreeText annotation {:?} at ({:.1}, {:.1})",
            target.page,
            annot_id,
            x,
            y
        );
        append_annotation(doc, target.page_id, target.page, annot_id)
    }

    fn name(&self) -> &str {
        "FreeText Annotation"
    }
}
