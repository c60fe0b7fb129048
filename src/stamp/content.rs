//! Stamp writer that draws into the page content stream.

use super::page_edit::{append_page_content, register_page_font};
use super::writer::{StampTarget, StampWriter};
use crate::domain::TextStyle;
use crate::error::StamperResult;
use crate::layout::encoding::encode_win_ansi;
use lopdf::content::Operation;
use lopdf::{Document, Object, StringFormat};

/// Writes the date as page text using an unembedded standard font.
///
/// The result is part of the page itself, so it prints and flattens like
/// the surrounding form text.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentStreamWriter;

impl ContentStreamWriter {
    pub fn new() -> Self {
        Self
    }
}

/// Operators that show `text` with its baseline origin at (`x`, `y`).
pub(crate) fn text_operations(
    resource: Vec<u8>,
    text: &str,
    style: &TextStyle,
    x: f32,
    y: f32,
) -> Vec<Operation> {
    let [r, g, b] = style.color.components();
    vec![
        Operation::new("q", vec![]),
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![Object::Name(resource), Object::Real(style.size)],
        ),
        Operation::new(
            "rg",
            vec![Object::Real(r), Object::Real(g), Object::Real(b)],
        ),
        Operation::new(
            "Tm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                1.into(),
                Object::Real(x),
                Object::Real(y),
            ],
        ),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
        Operation::new("Q", vec![]),
    ]
}

impl StampWriter for ContentStreamWriter {
    fn write(
        &self,
        doc: &mut Document,
        target: &StampTarget,
        text: &str,
        style: &TextStyle,
    ) -> StamperResult<()> {
        let resource = register_page_font(doc, target.page_id, target.page, style.font)?;
        let (x, y) = target.geometry.to_user(target.at);
        log::debug!(
            "Page {}: writing '{}' at ({:.1}, {:.1})",
            target.page,
            text,
            x,
            y
        );

        append_page_content(
            doc,
            target.page_id,
            target.page,
            text_operations(resource, text, style, x, y),
        )
    }

    fn name(&self) -> &str {
        "Content Stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Rgb, StandardFont};
    use crate::layout::{PageExtractor, PageGeometry, Point};
    use lopdf::{dictionary, Stream};

    fn blank_page() -> (Document, lopdf::ObjectId) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content = doc.add_object(Stream::new(lopdf::Dictionary::new(), Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog);
        (doc, page_id)
    }

    #[test]
    fn test_written_text_is_extractable_at_target() {
        let (mut doc, page_id) = blank_page();
        let target = StampTarget {
            page: 1,
            page_id,
            geometry: PageGeometry::LETTER,
            at: Point::new(160.0, 100.0),
        };
        let style = TextStyle {
            font: StandardFont::Helvetica,
            size: 12.0,
            color: Rgb::new(1.0, 0.0, 0.0),
        };

        ContentStreamWriter::new()
            .write(&mut doc, &target, "2024-03-15", &style)
            .unwrap();

        let page = PageExtractor::new(&doc).extract(1, page_id).unwrap();
        let line = page.lines().next().unwrap();
        assert_eq!(line.full_text(), "2024-03-15");
        let span = &line.spans[0];
        assert!((span.bbox.left - 160.0).abs() < 0.01);
        // Baseline sits at the target, so the box straddles it.
        assert!(span.bbox.top < 100.0 && span.bbox.bottom > 100.0);
    }

    #[test]
    fn test_operations_carry_style() {
        let style = TextStyle {
            font: StandardFont::Courier,
            size: 9.0,
            color: Rgb::new(0.0, 0.5, 1.0),
        };
        let ops = text_operations(b"DsF1".to_vec(), "x", &style, 1.0, 2.0);
        let tf = ops.iter().find(|op| op.operator == "Tf").unwrap();
        assert_eq!(tf.operands[0], Object::Name(b"DsF1".to_vec()));
        assert_eq!(tf.operands[1], Object::Real(9.0));
        let rg = ops.iter().find(|op| op.operator == "rg").unwrap();
        assert_eq!(rg.operands[2], Object::Real(1.0));
    }
}
