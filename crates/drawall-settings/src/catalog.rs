//! Key/value configuration catalog
//!
//! The format read from the storage card: one `key value` entry per line,
//! the key separated from its value by spaces, tabs or `=`. Blank lines and
//! lines starting with `#` are ignored.
//!
//! Problems with a single line are collected as warnings and the line is
//! skipped. Every key must appear exactly once; a missing or repeated key is
//! fatal.

use crate::config::PlotterConfig;
use crate::error::Result;
use drawall_core::{Anchor, Error, ErrorCode};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Longest line the firmware line buffer holds
pub const MAX_LINE_LENGTH: usize = 32;

/// Every key of the catalog, in file order
pub const CATALOG_KEYS: [&str; 21] = [
    "span",
    "sheetWidth",
    "sheetHeight",
    "sheetPositionX",
    "sheetPositionY",
    "servoWritingAngle",
    "servoMovingAngle",
    "preServoDelay",
    "postServoDelay",
    "steps",
    "diameter",
    "leftDirection",
    "rightDirection",
    "initialDelay",
    "scaleX",
    "scaleY",
    "offsetX",
    "offsetY",
    "defaultSpeed",
    "initPosition",
    "endPosition",
];

/// A line that was skipped or only partly understood
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogWarning {
    pub code: ErrorCode,
    /// 1-based line number
    pub line: usize,
    pub detail: String,
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({})", self.line, self.code, self.detail)
    }
}

/// Outcome of a successful catalog parse
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogReport {
    pub config: PlotterConfig,
    pub warnings: Vec<CatalogWarning>,
}

/// Parse a key/value catalog.
///
/// Fails with [`ErrorCode::TooFewParameters`] when a key is missing and with
/// [`ErrorCode::TooManyParameters`] when a key is given twice.
pub fn parse_catalog(text: &str) -> Result<CatalogReport> {
    let mut config = PlotterConfig::default();
    let mut warnings = Vec::new();
    let mut seen: HashSet<&'static str> = HashSet::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let mut warn = |code: ErrorCode, detail: String| {
            tracing::warn!("Config line {}: {} ({})", line, code, detail);
            warnings.push(CatalogWarning { code, line, detail });
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if raw.trim_end_matches('\r').len() > MAX_LINE_LENGTH {
            warn(ErrorCode::TooLongConfigLine, format!("{} characters", raw.len()));
            continue;
        }

        let Some((key, value)) = split_entry(trimmed) else {
            warn(ErrorCode::WrongConfigLine, trimmed.to_string());
            continue;
        };
        let Some(key) = canonical_key(key) else {
            warn(ErrorCode::UnknownConfigKey, key.to_string());
            continue;
        };

        match assign(&mut config, key, value) {
            Ok(Some(unknown)) => {
                warn(ErrorCode::UnknownConfigPosition, unknown);
            }
            Ok(None) => {}
            Err(()) => {
                warn(ErrorCode::WrongConfigLine, format!("{} = {}", key, value));
                continue;
            }
        }

        if !seen.insert(key) {
            tracing::error!("Config key {} given twice (line {})", key, line);
            return Err(Error::fatal(
                ErrorCode::TooManyParameters,
                format!("{} repeated at line {}", key, line),
            )
            .into());
        }
    }

    if seen.len() < CATALOG_KEYS.len() {
        let missing: Vec<&str> = CATALOG_KEYS
            .iter()
            .copied()
            .filter(|key| !seen.contains(key))
            .collect();
        tracing::error!("Config is missing {} entries", missing.len());
        return Err(Error::fatal(ErrorCode::TooFewParameters, missing.join(", ")).into());
    }

    tracing::info!("Config parsed with {} warnings", warnings.len());
    Ok(CatalogReport { config, warnings })
}

/// Render `config` as a catalog that [`parse_catalog`] reads back.
pub fn write_catalog(config: &PlotterConfig) -> String {
    let values: [String; 21] = [
        config.span.to_string(),
        config.sheet_width.to_string(),
        config.sheet_height.to_string(),
        config.sheet_position_x.to_string(),
        config.sheet_position_y.to_string(),
        config.servo_writing_angle.to_string(),
        config.servo_moving_angle.to_string(),
        config.pre_servo_delay.to_string(),
        config.post_servo_delay.to_string(),
        config.steps.to_string(),
        config.diameter.to_string(),
        config.left_direction.to_string(),
        config.right_direction.to_string(),
        config.initial_delay.to_string(),
        config.scale_x.to_string(),
        config.scale_y.to_string(),
        config.offset_x.to_string(),
        config.offset_y.to_string(),
        config.default_speed.to_string(),
        config.init_position.to_string(),
        config.end_position.to_string(),
    ];
    CATALOG_KEYS
        .iter()
        .zip(values)
        .map(|(key, value)| format!("{} {}\n", key, value))
        .collect()
}

/// Split `key value`, `key=value` or `key = value`.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let end = line.find(|c: char| c.is_whitespace() || c == '=')?;
    let (key, rest) = line.split_at(end);
    let value = rest
        .trim_start()
        .strip_prefix('=')
        .unwrap_or(rest)
        .trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn canonical_key(key: &str) -> Option<&'static str> {
    if key == "servoMoovingAngle" {
        return Some("servoMovingAngle");
    }
    CATALOG_KEYS.iter().copied().find(|k| *k == key)
}

fn parse<T: FromStr>(value: &str) -> std::result::Result<T, ()> {
    value.parse().map_err(|_| ())
}

fn parse_bool(value: &str) -> bool {
    matches!(value, "true" | "yes")
}

/// Store `value` under `key`. Returns the rejected name when a position was
/// not recognized and the centre was used instead.
fn assign(
    config: &mut PlotterConfig,
    key: &str,
    value: &str,
) -> std::result::Result<Option<String>, ()> {
    match key {
        "span" => config.span = parse(value)?,
        "sheetWidth" => config.sheet_width = parse(value)?,
        "sheetHeight" => config.sheet_height = parse(value)?,
        "sheetPositionX" => config.sheet_position_x = parse(value)?,
        "sheetPositionY" => config.sheet_position_y = parse(value)?,
        "servoWritingAngle" => config.servo_writing_angle = parse(value)?,
        "servoMovingAngle" => config.servo_moving_angle = parse(value)?,
        "preServoDelay" => config.pre_servo_delay = parse(value)?,
        "postServoDelay" => config.post_servo_delay = parse(value)?,
        "steps" => config.steps = parse(value)?,
        "diameter" => config.diameter = parse(value)?,
        "leftDirection" => config.left_direction = parse_bool(value),
        "rightDirection" => config.right_direction = parse_bool(value),
        "initialDelay" => config.initial_delay = parse(value)?,
        "scaleX" => config.scale_x = parse(value)?,
        "scaleY" => config.scale_y = parse(value)?,
        "offsetX" => config.offset_x = parse(value)?,
        "offsetY" => config.offset_y = parse(value)?,
        "defaultSpeed" => config.default_speed = parse(value)?,
        "initPosition" | "endPosition" => {
            let (anchor, unknown) = match Anchor::from_str(value) {
                Ok(anchor) => (anchor, None),
                Err(_) => (Anchor::Center, Some(value.to_string())),
            };
            if key == "initPosition" {
                config.init_position = anchor;
            } else {
                config.end_position = anchor;
            }
            return Ok(unknown);
        }
        _ => return Err(()),
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_entry() {
        assert_eq!(split_entry("span 1000"), Some(("span", "1000")));
        assert_eq!(split_entry("span\t\t1000"), Some(("span", "1000")));
        assert_eq!(split_entry("span = 1000"), Some(("span", "1000")));
        assert_eq!(split_entry("span=1000"), Some(("span", "1000")));
        assert_eq!(split_entry("span"), None);
        assert_eq!(split_entry("span   "), None);
        assert_eq!(split_entry("span ="), None);
    }

    #[test]
    fn test_booleans() {
        assert!(parse_bool("true"));
        assert!(parse_bool("yes"));
        assert!(!parse_bool("1"));
        assert!(!parse_bool("no"));
    }

    #[test]
    fn test_canonical_key() {
        assert_eq!(canonical_key("servoMoovingAngle"), Some("servoMovingAngle"));
        assert_eq!(canonical_key("span"), Some("span"));
        assert_eq!(canonical_key("Span"), None);
    }

    #[test]
    fn test_written_catalog_fits_line_buffer() {
        let text = write_catalog(&PlotterConfig::default());
        assert_eq!(text.lines().count(), CATALOG_KEYS.len());
        assert!(text.lines().all(|line| line.len() <= MAX_LINE_LENGTH));
    }
}
