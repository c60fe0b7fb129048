//! Inline image removal.
//!
//! An inline image (`BI … ID <data> EI`) embeds raw sample bytes in a
//! content stream. lopdf's content parser cannot tokenize that data and
//! stops at `ID` without reporting an error, which silently drops every
//! operator after the image. Inline images carry no text, so they are cut
//! out before parsing.

use std::borrow::Cow;

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | b'\x0c' | b'\0')
}

fn is_delimiter(byte: u8) -> bool {
    matches!(
        byte,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_regular(byte: u8) -> bool {
    !is_whitespace(byte) && !is_delimiter(byte)
}

/// Index just past the literal string opening at `start`.
fn skip_string(content: &[u8], start: usize) -> usize {
    let mut depth = 0usize;
    let mut i = start;
    while i < content.len() {
        match content[i] {
            b'\\' => i += 1,
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    content.len()
}

/// Position of the next `keyword` operator at or after `from`. Strings,
/// comments and names are stepped over whole.
fn find_operator(content: &[u8], from: usize, keyword: &[u8]) -> Option<usize> {
    let mut i = from;
    while i < content.len() {
        match content[i] {
            b'(' => i = skip_string(content, i),
            b'%' => {
                while i < content.len() && !matches!(content[i], b'\r' | b'\n') {
                    i += 1;
                }
            }
            b'/' => {
                i += 1;
                while i < content.len() && is_regular(content[i]) {
                    i += 1;
                }
            }
            byte if !is_regular(byte) => i += 1,
            _ => {
                let start = i;
                while i < content.len() && is_regular(content[i]) {
                    i += 1;
                }
                if &content[start..i] == keyword {
                    return Some(start);
                }
            }
        }
    }
    None
}

/// Index just past the `EI` that ends image data starting at `data`.
///
/// `EI` must be followed by whitespace or the end of the stream. The byte
/// before it may be anything, since writers do not always separate the
/// last sample from the operator.
fn image_end(content: &[u8], data: usize) -> Option<usize> {
    let mut i = data;
    while i + 2 <= content.len() {
        if &content[i..i + 2] == b"EI" && content.get(i + 2).map_or(true, |b| is_whitespace(*b)) {
            return Some(i + 2);
        }
        i += 1;
    }
    None
}

/// Returns `content` with every inline image replaced by a line break.
///
/// Borrows when the stream has no inline images. An image without a
/// closing `EI` swallows the rest of the stream.
pub(crate) fn strip_inline_images(content: &[u8]) -> Cow<'_, [u8]> {
    let Some(mut begin) = find_operator(content, 0, b"BI") else {
        return Cow::Borrowed(content);
    };

    let mut out = Vec::with_capacity(content.len());
    let mut pos = 0;
    let mut images = 0usize;
    loop {
        out.extend_from_slice(&content[pos..begin]);
        out.push(b'\n');
        images += 1;

        // One whitespace byte separates `ID` from the data.
        let end = find_operator(content, begin + 2, b"ID").and_then(|id| image_end(content, id + 3));
        let Some(end) = end else {
            log::warn!("Inline image is not terminated by EI; ignoring the rest of the content stream");
            return Cow::Owned(out);
        };
        pos = end;

        match find_operator(content, pos, b"BI") {
            Some(next) => begin = next,
            None => break,
        }
    }
    out.extend_from_slice(&content[pos..]);

    log::debug!("Skipped {} inline image(s)", images);
    Cow::Owned(out)
}
