//! Attribute lookup
//!
//! Attributes are searched from the start of the source. The read position
//! is restored afterwards so a lookup can happen in the middle of a scan.

use crate::reader::CharSource;
use crate::scan;
use drawall_core::{Result, SvgUnit};

/// Raw value of the first `name="..."` attribute in the source.
pub fn get_attribute<S: CharSource + ?Sized>(src: &mut S, name: &str) -> Result<Option<String>> {
    let saved = src.position();
    src.seek_to_start()?;

    let value = if scan::find_attribute(src, name) {
        scan::read_until(src, b'"')
    } else {
        None
    };

    src.seek(saved)?;
    tracing::trace!("Attribute {} = {:?}", name, value);
    Ok(value)
}

/// Value of the first `name="..."` attribute converted to user units.
///
/// `None` when the attribute is absent or has no numeric prefix.
pub fn get_numeric_attribute<S: CharSource + ?Sized>(
    src: &mut S,
    name: &str,
) -> Result<Option<f64>> {
    Ok(get_attribute(src, name)?.and_then(|raw| {
        let (value, unit) = split_unit(&raw)?;
        Some(unit.to_user_units(value))
    }))
}

/// Split `"21cm"` into `21.0` and its unit. Unknown suffixes count as pixels.
pub fn split_unit(raw: &str) -> Option<(f64, SvgUnit)> {
    let raw = raw.trim();
    let end = raw
        .find(|c: char| !(c.is_ascii_digit() || c == '-' || c == '.'))
        .unwrap_or(raw.len());
    let (number, suffix) = raw.split_at(end);
    let value = number.parse::<f64>().ok()?;
    Some((value, SvgUnit::from_suffix(suffix.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::StringSource;

    const DOC: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"21cm\" height=\"297mm\">\n\
                       <path stroke-width=\"3\" d=\"M0 0\"/></svg>";

    #[test]
    fn test_split_unit() {
        assert_eq!(split_unit("21cm"), Some((21.0, SvgUnit::Cm)));
        assert_eq!(split_unit("-4.5in"), Some((-4.5, SvgUnit::In)));
        assert_eq!(split_unit("640"), Some((640.0, SvgUnit::Px)));
        assert_eq!(split_unit("12em"), Some((12.0, SvgUnit::Px)));
        assert_eq!(split_unit("auto"), None);
    }

    #[test]
    fn test_numeric_attribute_in_user_units() {
        let mut src = StringSource::from(DOC);
        let width = get_numeric_attribute(&mut src, "width").unwrap().unwrap();
        assert!((width - 21.0 * 35.43307).abs() < 1e-9);
        let height = get_numeric_attribute(&mut src, "height").unwrap().unwrap();
        assert!((height - 297.0 * 3.543307).abs() < 1e-9);
    }

    #[test]
    fn test_lookup_restores_position() {
        let mut src = StringSource::from(DOC);
        assert!(scan::find(&mut src, b"<path"));
        let here = src.position();
        assert_eq!(
            get_attribute(&mut src, "xmlns").unwrap().as_deref(),
            Some("http://www.w3.org/2000/svg")
        );
        assert_eq!(src.position(), here);
        assert_eq!(get_attribute(&mut src, "viewBox").unwrap(), None);
        assert_eq!(src.position(), here);
    }
}
