//! Single-byte text encodings.
//!
//! WinAnsiEncoding matches Latin-1 everywhere except 0x80..=0x9F, where
//! Windows-1252 places typographic punctuation.

/// Code points WinAnsi assigns in the 0x80..=0x9F range.
const WIN_ANSI_HIGH: [(u8, char); 27] = [
    (0x80, '€'),
    (0x82, '‚'),
    (0x83, 'ƒ'),
    (0x84, '„'),
    (0x85, '…'),
    (0x86, '†'),
    (0x87, '‡'),
    (0x88, 'ˆ'),
    (0x89, '‰'),
    (0x8A, 'Š'),
    (0x8B, '‹'),
    (0x8C, 'Œ'),
    (0x8E, 'Ž'),
    (0x91, '‘'),
    (0x92, '’'),
    (0x93, '“'),
    (0x94, '”'),
    (0x95, '•'),
    (0x96, '–'),
    (0x97, '—'),
    (0x98, '˜'),
    (0x99, '™'),
    (0x9A, 'š'),
    (0x9B, '›'),
    (0x9C, 'œ'),
    (0x9E, 'ž'),
    (0x9F, 'Ÿ'),
];

/// Decodes one WinAnsi byte. Control codes yield `None`.
pub fn decode_win_ansi(byte: u8) -> Option<char> {
    match byte {
        0x00..=0x1F | 0x7F => None,
        0x80..=0x9F => WIN_ANSI_HIGH
            .iter()
            .find(|(code, _)| *code == byte)
            .map(|(_, c)| *c),
        _ => Some(byte as char),
    }
}

/// Encodes text as WinAnsi bytes, substituting `?` for anything unmappable.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u8,
            _ => WIN_ANSI_HIGH
                .iter()
                .find(|(_, mapped)| *mapped == c)
                .map_or(b'?', |(code, _)| *code),
        })
        .collect()
}
