//! Page-level object edits shared by the stamp writers.

use crate::domain::StandardFont;
use crate::error::{StamperError, StamperResult};
use crate::layout::objects::{dict_entry, inherited, resolve};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

/// Prefix for font resources this crate adds to a page.
const FONT_RESOURCE_PREFIX: &str = "DsF";

pub(crate) fn page_dict_mut(
    doc: &mut Document,
    page_id: ObjectId,
    page: u32,
) -> StamperResult<&mut Dictionary> {
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| StamperError::pdf("Page object is not a dictionary", Some(page), e))
}

/// Adds an unembedded standard font object and returns its id.
pub(crate) fn add_standard_font(doc: &mut Document, font: StandardFont) -> ObjectId {
    let mut dict = dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
    };
    if !font.is_symbolic() {
        dict.set("Encoding", "WinAnsiEncoding");
    }
    doc.add_object(dict)
}

fn is_reusable(doc: &Document, dict: &Dictionary, font: StandardFont) -> bool {
    let name_of = |key: &[u8]| dict.get(key).and_then(Object::as_name).ok();
    let encoding_matches = if font.is_symbolic() {
        !dict.has(b"Encoding")
    } else {
        name_of(b"Encoding") == Some(b"WinAnsiEncoding".as_slice())
    };

    name_of(b"Subtype") == Some(b"Type1".as_slice())
        && name_of(b"BaseFont") == Some(font.base_font().as_bytes())
        && dict_entry(doc, dict, b"FontDescriptor").is_none()
        && encoding_matches
}

fn fresh_font_name(fonts: &Dictionary) -> Vec<u8> {
    let mut n = 1;
    loop {
        let candidate = format!("{}{}", FONT_RESOURCE_PREFIX, n).into_bytes();
        if !fonts.has(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Makes `font` available in the page's own `/Resources /Font` and returns
/// the resource name to select it with `Tf`.
///
/// Inherited or shared resource dictionaries are copied onto the page first,
/// so other pages are unaffected.
pub(crate) fn register_page_font(
    doc: &mut Document,
    page_id: ObjectId,
    page: u32,
    font: StandardFont,
) -> StamperResult<Vec<u8>> {
    let mut resources = inherited(doc, page_id, b"Resources")
        .and_then(|obj| obj.as_dict().ok())
        .cloned()
        .unwrap_or_default();
    let mut fonts = dict_entry(doc, &resources, b"Font")
        .cloned()
        .unwrap_or_default();

    let existing = fonts.iter().find_map(|(name, obj)| {
        let dict = resolve(doc, obj).as_dict().ok()?;
        is_reusable(doc, dict, font).then(|| name.clone())
    });

    let name = match existing {
        Some(name) => name,
        None => {
            let font_id = add_standard_font(doc, font);
            let name = fresh_font_name(&fonts);
            log::debug!(
                "Page {}: registering {} as /{}",
                page,
                font,
                String::from_utf8_lossy(&name)
            );
            fonts.set(name.clone(), font_id);
            name
        }
    };

    resources.set("Font", fonts);
    page_dict_mut(doc, page_id, page)?.set("Resources", resources);
    Ok(name)
}

/// Makes `font` resolvable from the document's `/AcroForm /DR /Font`, where
/// viewers look up the font named in an annotation's `/DA`.
///
/// The font's short alias is used unless the form already maps that alias
/// to a different font. Returns the resource name and the font object.
pub(crate) fn register_form_font(
    doc: &mut Document,
    font: StandardFont,
) -> StamperResult<(Vec<u8>, ObjectId)> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|e| StamperError::pdf("Document has no catalog", None, e))?;
    let catalog = doc
        .get_dictionary(catalog_id)
        .map_err(|e| StamperError::pdf("Catalog is not a dictionary", None, e))?;

    let acroform_id = catalog.get(b"AcroForm").and_then(Object::as_reference).ok();
    let mut acroform = dict_entry(doc, catalog, b"AcroForm")
        .cloned()
        .unwrap_or_else(|| dictionary! { "Fields" => Vec::<Object>::new() });
    let mut resources = dict_entry(doc, &acroform, b"DR").cloned().unwrap_or_default();
    let mut fonts = dict_entry(doc, &resources, b"Font").cloned().unwrap_or_default();

    let alias = font.short_name().as_bytes().to_vec();
    let existing = fonts.get(&alias).ok();
    let reused = existing
        .and_then(|obj| obj.as_reference().ok())
        .filter(|id| doc.get_dictionary(*id).is_ok_and(|dict| is_reusable(doc, dict, font)));
    if let Some(id) = reused {
        return Ok((alias, id));
    }

    let name = if existing.is_some() {
        fresh_font_name(&fonts)
    } else {
        alias
    };
    let font_id = add_standard_font(doc, font);
    log::debug!("Registering {} as form font /{}", font, String::from_utf8_lossy(&name));

    fonts.set(name.clone(), font_id);
    resources.set("Font", fonts);
    acroform.set("DR", resources);
    match acroform_id {
        Some(id) => {
            doc.objects.insert(id, Object::Dictionary(acroform));
        }
        None => doc
            .get_object_mut(catalog_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| StamperError::pdf("Catalog is not a dictionary", None, e))?
            .set("AcroForm", acroform),
    }
    Ok((name, font_id))
}

/// Appends `operations` to the page as a new content stream.
///
/// Existing content is bracketed in `q ... Q` first so the new operators
/// start from the default graphics state.
pub(crate) fn append_page_content(
    doc: &mut Document,
    page_id: ObjectId,
    page: u32,
    operations: Vec<Operation>,
) -> StamperResult<()> {
    let existing: Vec<Object> = match doc.get_dictionary(page_id).and_then(|d| d.get(b"Contents")) {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    };

    let mut contents = Vec::with_capacity(existing.len() + 2);
    let mut ops = Vec::with_capacity(operations.len() + 1);
    if !existing.is_empty() {
        let open = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        contents.push(Object::Reference(open));
        contents.extend(existing);
        ops.push(Operation::new("Q", vec![]));
    }
    ops.extend(operations);

    let mut bytes = b"\n".to_vec();
    bytes.extend(
        Content { operations: ops }
            .encode()
            .map_err(|e| StamperError::pdf("Failed to encode stamp content", Some(page), e))?,
    );
    let stamp_id = doc.add_object(Stream::new(Dictionary::new(), bytes));
    contents.push(Object::Reference(stamp_id));

    page_dict_mut(doc, page_id, page)?.set("Contents", Object::Array(contents));
    Ok(())
}

/// Adds an annotation reference to the page's `/Annots` array.
pub(crate) fn append_annotation(
    doc: &mut Document,
    page_id: ObjectId,
    page: u32,
    annot_id: ObjectId,
) -> StamperResult<()> {
    let mut annots = match doc.get_dictionary(page_id).and_then(|d| d.get(b"Annots")) {
        Ok(obj) => match resolve(doc, obj) {
            Object::Array(items) => items.clone(),
            _ => Vec::new(),
        },
        Err(_) => Vec::new(),
    };
    annots.push(Object::Reference(annot_id));

    page_dict_mut(doc, page_id, page)?.set("Annots", Object::Array(annots));
    Ok(())
}
