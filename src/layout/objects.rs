//! Small lopdf helpers for walking the object graph.

use super::PageGeometry;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Bound on reference chains and `/Parent` walks, so cycles cannot hang us.
const MAX_CHAIN: usize = 32;

/// Follows references until a direct object is reached.
pub(crate) fn resolve<'a>(doc: &'a Document, mut obj: &'a Object) -> &'a Object {
    for _ in 0..MAX_CHAIN {
        match obj {
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(target) => obj = target,
                Err(_) => return obj,
            },
            _ => return obj,
        }
    }
    obj
}

/// Numeric value of an integer or real object.
pub(crate) fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// Looks up `key` in `dict` and resolves it to a dictionary.
pub(crate) fn dict_entry<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Dictionary> {
    dict.get(key)
        .ok()
        .map(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_dict().ok())
}

/// Reads a page attribute, following `/Parent` for inheritable keys.
pub(crate) fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_CHAIN {
        if let Ok(value) = dict.get(key) {
            return Some(resolve(doc, value));
        }
        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Page MediaBox, falling back to US Letter.
pub fn page_geometry(doc: &Document, page_id: ObjectId) -> PageGeometry {
    inherited(doc, page_id, b"MediaBox")
        .and_then(|obj| obj.as_array().ok())
        .and_then(|array| {
            let values: Vec<f32> = array
                .iter()
                .filter_map(|obj| number(resolve(doc, obj)))
                .collect();
            match values.as_slice() {
                [x0, y0, x1, y1] => Some(PageGeometry::new([*x0, *y0, *x1, *y1])),
                _ => None,
            }
        })
        .unwrap_or(PageGeometry::LETTER)
}

/// Stream data with filters applied when the stream declares any.
pub(crate) fn stream_bytes(stream: &lopdf::Stream) -> lopdf::Result<Vec<u8>> {
    if stream.dict.has(b"Filter") {
        stream.decompressed_content()
    } else {
        Ok(stream.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn test_media_box_inherited_from_pages_node() {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );

        let geometry = page_geometry(&doc, page_id);
        assert_eq!(geometry.media_box, [0.0, 0.0, 595.0, 842.0]);
    }

    #[test]
    fn test_missing_media_box_defaults_to_letter() {
        let mut doc = Document::with_version("1.5");
        let page_id = doc.add_object(dictionary! { "Type" => "Page" });
        assert_eq!(page_geometry(&doc, page_id), PageGeometry::LETTER);
    }
}
