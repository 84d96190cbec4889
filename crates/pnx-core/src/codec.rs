//! Reading and writing cutting-list files.
//!
//! Files on disk are Windows-1251. Input is decoded leniently: UTF-8 first,
//! then Windows-1251, then Latin-1. Output is always Windows-1251 with `?`
//! in place of characters the code page lacks.

use std::fs;
use std::path::Path;

use encoding_rs::{EncoderResult, Encoding, UTF_8, WINDOWS_1251};

use crate::error::Result;

/// Line terminator used when writing, following the platform's text-mode
/// convention.
pub const NEWLINE: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Encoding that successfully decoded a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Windows1251,
    /// Accepts every byte, so it is the last resort.
    Latin1,
}

/// Byte left undefined by the Windows-1251 code page.
const CP1251_UNDEFINED: u8 = 0x98;

/// Read a text file, trying each supported encoding in turn.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let (text, encoding) = decode(&bytes);
    log::debug!("Decoded {} as {:?}", path.display(), encoding);
    Ok(text)
}

/// Decode raw bytes, reporting which encoding was used.
pub fn decode(bytes: &[u8]) -> (String, SourceEncoding) {
    if let Some(text) = decode_strict(UTF_8, bytes) {
        return (text, SourceEncoding::Utf8);
    }
    if !bytes.contains(&CP1251_UNDEFINED) {
        if let Some(text) = decode_strict(WINDOWS_1251, bytes) {
            return (text, SourceEncoding::Windows1251);
        }
    }
    let text = bytes.iter().map(|&b| b as char).collect();
    (text, SourceEncoding::Latin1)
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Encode text as Windows-1251, replacing unmappable characters with `?`.
pub fn encode_cp1251(text: &str) -> Vec<u8> {
    let mut encoder = WINDOWS_1251.new_encoder();
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4096];
    let mut input = text;

    loop {
        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(input, &mut buf, true);
        out.extend_from_slice(&buf[..written]);
        input = &input[read..];

        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => continue,
            EncoderResult::Unmappable(_) => out.push(b'?'),
        }
    }

    out
}

/// Write `\n`-separated text to disk as Windows-1251.
pub fn write_text(path: &Path, text: &str) -> std::io::Result<()> {
    let text = if NEWLINE == "\n" {
        std::borrow::Cow::Borrowed(text)
    } else {
        std::borrow::Cow::Owned(text.replace('\n', NEWLINE))
    };
    fs::write(path, encode_cp1251(&text))
}
