//! Token scanning over a [`CharSource`]

use crate::reader::CharSource;

/// Outcome of scanning one numeric token
#[derive(Debug, Clone, PartialEq)]
pub enum Scanned {
    Number(f64),
    /// Characters that looked like a number but could not be read as one
    Malformed(String),
    /// The next character cannot start a number; nothing was consumed.
    NotANumber,
}

/// Whether `byte` can start a numeric token
pub fn starts_number(byte: u8) -> bool {
    byte.is_ascii_digit() || byte == b'-' || byte == b'.'
}

pub fn is_delimiter(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == b','
}

/// Skip whitespace and commas.
pub fn skip_delimiters<S: CharSource + ?Sized>(src: &mut S) {
    while src.peek_byte().is_some_and(is_delimiter) {
        src.read_byte();
    }
}

/// Scan an optional leading `-`, digits and at most one `.`.
///
/// Stops before the first character that does not fit, so `10L` leaves `L`
/// for the caller and `1.5.5` reads as `1.5` followed by `.5`.
pub fn scan_number<S: CharSource + ?Sized>(src: &mut S) -> Scanned {
    let mut token = String::new();
    let mut seen_dot = false;

    if src.peek_byte() == Some(b'-') {
        src.read_byte();
        token.push('-');
    }
    while let Some(byte) = src.peek_byte() {
        match byte {
            b'0'..=b'9' => token.push(byte as char),
            b'.' if !seen_dot => {
                seen_dot = true;
                token.push('.');
            }
            _ => break,
        }
        src.read_byte();
    }

    if token.is_empty() {
        return Scanned::NotANumber;
    }
    match token.parse::<f64>() {
        Ok(value) => Scanned::Number(value),
        Err(_) => Scanned::Malformed(token),
    }
}

/// Advance just past the next occurrence of `word`.
///
/// Returns false, with the source exhausted, when `word` does not occur.
pub fn find<S: CharSource + ?Sized>(src: &mut S, word: &[u8]) -> bool {
    find_where(src, word, |_| true)
}

/// Advance just past the next `name="` that starts a whole attribute name,
/// so `width` does not match inside `stroke-width`.
pub fn find_attribute<S: CharSource + ?Sized>(src: &mut S, name: &str) -> bool {
    let mut pattern = Vec::with_capacity(name.len() + 3);
    pattern.push(b' ');
    pattern.extend_from_slice(name.as_bytes());
    pattern.extend_from_slice(b"=\"");
    // any whitespace counts as the leading separator
    find_where(src, &pattern, |window| window[0].is_ascii_whitespace())
}

fn find_where<S, F>(src: &mut S, word: &[u8], boundary: F) -> bool
where
    S: CharSource + ?Sized,
    F: Fn(&[u8]) -> bool,
{
    if word.is_empty() {
        return true;
    }
    let matches = |window: &[u8]| {
        // the first pattern byte is the separator checked by `boundary`
        if word[0] == b' ' && word.len() > 1 {
            window[1..] == word[1..] && boundary(window)
        } else {
            window == word
        }
    };

    let mut window: Vec<u8> = Vec::with_capacity(word.len());
    while let Some(byte) = src.read_byte() {
        if window.len() == word.len() {
            window.remove(0);
        }
        window.push(byte);
        if window.len() == word.len() && matches(&window) {
            return true;
        }
    }
    false
}

/// Read up to `delimiter`, consuming it. `None` when the stream ends first.
pub fn read_until<S: CharSource + ?Sized>(src: &mut S, delimiter: u8) -> Option<String> {
    let mut bytes = Vec::new();
    loop {
        match src.read_byte()? {
            byte if byte == delimiter => break,
            byte => bytes.push(byte),
        }
    }
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read one line without its terminator. `None` at the end of the stream.
pub fn read_line<S: CharSource + ?Sized>(src: &mut S) -> Option<String> {
    src.peek_byte()?;
    let mut bytes = Vec::new();
    while let Some(byte) = src.read_byte() {
        if byte == b'\n' {
            break;
        }
        bytes.push(byte);
    }
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    Some(String::from_utf8_lossy(&bytes).into_owned())
}
