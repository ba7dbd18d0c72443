//! Fixed-column layout of PDB coordinate records.
//!
//! Only the fields needed to classify a record and identify its residue are
//! modelled here. All offsets are 0-indexed byte ranges into a line with its
//! terminator already stripped.

use std::ops::Range;

/// Record name field (columns 1-6).
pub const RECORD_NAME_COLUMNS: Range<usize> = 0..6;
/// Atom serial number field (columns 7-11).
pub const SERIAL_COLUMNS: Range<usize> = 6..11;
/// Residue name field (columns 18-20).
pub const RESIDUE_NAME_COLUMNS: Range<usize> = 17..20;

const ATOM_TAG: &[u8] = b"ATOM  ";
const HETATM_TAG: &[u8] = b"HETATM";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Atom,
    Hetatm,
    Other,
}

impl RecordKind {
    /// Classifies a record by its fixed-width record name field.
    ///
    /// `HETATM` occupies the whole six-column field, so the serial field that
    /// follows decides whether the tag really ends at column 6. A five-digit
    /// serial (`HETATM12345`) is still a heteroatom record; a longer tag such
    /// as `HETATM2    ` is not, because a right-justified serial never has a
    /// blank after its first non-blank character.
    pub fn of(line: &[u8]) -> Self {
        let line = strip_terminator(line);
        match line.get(RECORD_NAME_COLUMNS) {
            Some(tag) if tag == HETATM_TAG && has_right_justified_serial(line) => {
                RecordKind::Hetatm
            }
            Some(tag) if tag == ATOM_TAG => RecordKind::Atom,
            _ => RecordKind::Other,
        }
    }
}

/// Returns the line without its trailing `\n` or `\r\n`.
pub fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Extracts the trimmed residue name of a coordinate record.
///
/// Returns `None` when the line does not reach the end of the residue name
/// field, when the field is blank, or when it is not valid UTF-8.
pub fn residue_name(line: &[u8]) -> Option<&str> {
    let field = strip_terminator(line).get(RESIDUE_NAME_COLUMNS)?;
    let name = std::str::from_utf8(field).ok()?.trim();
    (!name.is_empty()).then_some(name)
}

fn has_right_justified_serial(line: &[u8]) -> bool {
    let end = line.len().min(SERIAL_COLUMNS.end);
    let field = line.get(SERIAL_COLUMNS.start..end).unwrap_or(&[]);
    let body = match field.iter().position(|b| *b != b' ') {
        Some(first) => &field[first..],
        None => return true,
    };
    body.iter().all(u8::is_ascii_alphanumeric)
}
