//! Parsing of coordinate pairs typed by an operator.
//!
//! Accepted shapes, tried in order:
//! - `[x, y]`
//! - `(x, y)`
//! - `lat=.. lng=..` / `x=.. y=..` (also `:` instead of `=`)
//! - bare `x, y` or `x y`

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

const NUMBER: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

static BRACKET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\[\s*({NUMBER})\s*,\s*({NUMBER})\s*\]")).unwrap());
static PAREN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\(\s*({NUMBER})\s*,\s*({NUMBER})\s*\)")).unwrap());
static NAMED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)(?:lat|x)\s*[=:]\s*({NUMBER}).*?(?:lng|lon|y)\s*[=:]\s*({NUMBER})"
    ))
    .unwrap()
});
static BARE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^\s*({NUMBER})\s*(?:,|\s)\s*({NUMBER})\s*$")).unwrap());

/// Coordinate parsing errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Could not parse coordinates from: {0}")]
    NoCoordinates(String),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Coordinate is not finite: {0}")]
    NonFinite(String),
}

/// Parse a coordinate pair such as `[7599, 8020]` or `37.99, 32.63`.
pub fn parse_pair(input: &str) -> Result<(f64, f64), ParseError> {
    for re in [&*BRACKET_RE, &*PAREN_RE, &*NAMED_RE, &*BARE_RE] {
        if let Some(captures) = re.captures(input) {
            let a = parse_number(&captures[1])?;
            let b = parse_number(&captures[2])?;
            return Ok((a, b));
        }
    }

    Err(ParseError::NoCoordinates(input.to_string()))
}

/// Parse a pair given either as two arguments or as one combined argument.
pub fn parse_args(args: &[String]) -> Result<(f64, f64), ParseError> {
    match args {
        [a, b] => Ok((parse_number(a)?, parse_number(b)?)),
        [single] => parse_pair(single),
        _ => Err(ParseError::NoCoordinates(args.join(" "))),
    }
}

/// Parse a single finite number.
pub fn parse_number(text: &str) -> Result<f64, ParseError> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidNumber(text.to_string()))?;
    if !value.is_finite() {
        return Err(ParseError::NonFinite(text.to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bracket() {
        assert_eq!(parse_pair("[7599, 8020]"), Ok((7599.0, 8020.0)));
    }

    #[test]
    fn test_parse_parenthesis() {
        assert_eq!(
            parse_pair("The pin is at (37.9928, 32.6345)"),
            Ok((37.9928, 32.6345))
        );
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(parse_pair("lat=37.99 lng=32.63"), Ok((37.99, 32.63)));
        assert_eq!(parse_pair("X: 120, Y: -4.5"), Ok((120.0, -4.5)));
    }

    #[test]
    fn test_parse_bare() {
        assert_eq!(parse_pair("1.5,2"), Ok((1.5, 2.0)));
        assert_eq!(parse_pair("  -3e2  4 "), Ok((-300.0, 4.0)));
    }

    #[test]
    fn test_parse_failure() {
        assert!(matches!(
            parse_pair("somewhere near the garage"),
            Err(ParseError::NoCoordinates(_))
        ));
    }

    #[test]
    fn test_parse_args() {
        let two = vec!["10".to_string(), "20.5".to_string()];
        assert_eq!(parse_args(&two), Ok((10.0, 20.5)));

        let one = vec!["[1, 2]".to_string()];
        assert_eq!(parse_args(&one), Ok((1.0, 2.0)));

        let bad = vec!["abc".to_string(), "1".to_string()];
        assert_eq!(parse_args(&bad), Err(ParseError::InvalidNumber("abc".to_string())));

        assert!(parse_args(&[]).is_err());
    }

    #[test]
    fn test_parse_number_rejects_non_finite() {
        assert_eq!(
            parse_number("inf"),
            Err(ParseError::NonFinite("inf".to_string()))
        );
        assert!(parse_number("NaN").is_err());
    }
}
