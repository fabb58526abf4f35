use std::borrow::Cow;

use crate::error::AppError;
use crate::parser::types::RawTable;

/// Explicit delimiters tried after content sniffing, in priority order.
const DELIMITERS: &[u8] = &[b';', b',', b'\t', b'|'];

/// Decodings tried for every attempt, in order. The engine receives an
/// in-memory byte slice, so the platform-default slot collapses to UTF-8.
#[derive(Debug, Clone, Copy)]
enum Decoding {
    Utf8,
    Latin1,
    Windows1252,
}

const DECODINGS: &[Decoding] = &[Decoding::Utf8, Decoding::Latin1, Decoding::Windows1252];

impl Decoding {
    fn label(self) -> &'static str {
        match self {
            Decoding::Utf8 => "utf-8",
            Decoding::Latin1 => "latin-1",
            Decoding::Windows1252 => "windows-1252",
        }
    }

    /// Decode `bytes`, or `None` if the bytes are invalid for this decoding.
    /// Latin-1 accepts any byte sequence, so it never fails.
    fn decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            Decoding::Utf8 => {
                let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
                if had_errors {
                    None
                } else {
                    Some(text)
                }
            }
            Decoding::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes)),
            Decoding::Windows1252 => {
                let (text, _, had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
                if had_errors {
                    None
                } else {
                    Some(text)
                }
            }
        }
    }
}

/// One entry of the ordered strategy cascade.
#[derive(Debug, Clone, Copy)]
struct Attempt {
    /// `None` means sniff the delimiter from content.
    delimiter: Option<u8>,
    /// Lenient attempts discard malformed rows instead of failing.
    lenient: bool,
}

/// Decode an opaque byte stream into a rectangular table.
///
/// Ordered attempts, first success wins: sniffed delimiter, then `;` `,`
/// tab `|`, all strict; the same list again tolerating malformed rows.
/// Every attempt is retried across the decoding list. The input slice is
/// never consumed, so a failed attempt costs nothing but time.
///
/// Terminal fallback: lossy UTF-8, comma, lenient — it only fails on input
/// with no header line at all.
pub fn read_flexible(bytes: &[u8]) -> Result<RawTable, AppError> {
    let mut attempts = Vec::with_capacity(2 * (DELIMITERS.len() + 1));
    for lenient in [false, true] {
        attempts.push(Attempt {
            delimiter: None,
            lenient,
        });
        for &d in DELIMITERS {
            attempts.push(Attempt {
                delimiter: Some(d),
                lenient,
            });
        }
    }

    for attempt in &attempts {
        for &decoding in DECODINGS {
            let Some(text) = decoding.decode(bytes) else {
                continue;
            };
            let Some(delimiter) = attempt.delimiter.or_else(|| sniff_delimiter(&text)) else {
                log::debug!("leitura: sniffing falhou ({})", decoding.label());
                continue;
            };
            match parse_with(&text, delimiter, attempt.lenient, decoding.label(), 2) {
                Some(table) => return Ok(table),
                None => log::debug!(
                    "leitura: tentativa falhou (sep={:?}, lenient={}, {})",
                    delimiter as char,
                    attempt.lenient,
                    decoding.label()
                ),
            }
        }
    }

    // Last resort: replace undecodable bytes instead of failing.
    let text = String::from_utf8_lossy(bytes);
    if let Some(table) = parse_with(&text, b',', true, "utf-8 (lossy)", 1) {
        return Ok(table);
    }
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        Err(AppError::EmptyFile)
    } else {
        Err(AppError::UnparsableTable)
    }
}

/// Pick the most frequent candidate delimiter in the header line, counting
/// only characters outside double quotes. `None` when no candidate occurs.
fn sniff_delimiter(text: &str) -> Option<u8> {
    let first_line = text.lines().find(|l| !l.trim().is_empty())?;
    let mut counts = [0usize; 4];
    let mut in_quotes = false;
    for ch in first_line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(pos) = DELIMITERS.iter().position(|&d| d as char == ch) {
            counts[pos] += 1;
        }
    }
    let mut best: Option<(usize, usize)> = None; // (count, position)
    for (pos, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        match best {
            Some((c, _)) if c >= count => {}
            _ => best = Some((count, pos)),
        }
    }
    best.map(|(_, pos)| DELIMITERS[pos])
}

/// Run one parse attempt. Strict mode fails on the first malformed record;
/// lenient mode discards records whose field count differs from the header.
///
/// Cascade attempts demand `min_columns = 2`: a wrong explicit delimiter
/// degenerates into one giant column, and accepting that would shadow the
/// later lenient attempts that can actually split the file. Only the
/// terminal fallback accepts a single-column table.
fn parse_with(
    text: &str,
    delimiter: u8,
    lenient: bool,
    decoding: &'static str,
    min_columns: usize,
) -> Option<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(lenient)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = match rdr.headers() {
        Ok(h) => h.iter().map(|f| f.to_string()).collect(),
        Err(_) => return None,
    };
    if headers.is_empty() || headers.len() < min_columns {
        return None;
    }

    let mut rows = Vec::new();
    let mut discarded = 0usize;
    for record in rdr.records() {
        match record {
            Ok(rec) if rec.len() == headers.len() => {
                rows.push(rec.iter().map(|f| f.to_string()).collect());
            }
            Ok(_) | Err(_) if lenient => discarded += 1,
            Ok(_) | Err(_) => return None,
        }
    }

    Some(RawTable {
        headers,
        rows,
        delimiter,
        decoding,
        discarded_rows: discarded,
    })
}
