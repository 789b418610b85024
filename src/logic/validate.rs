use chrono::NaiveDate;
use thiserror::Error;

/// A request parameter that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("tags must be a comma separated list of words without spaces, got '{0}'")]
    MalformedTags(String),
    #[error("{field} must be a date in YYYYMMDD format, got '{value}'")]
    MalformedDate { field: &'static str, value: String },
    #[error("{field} is not a valid calendar date: '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("{field} must be a non-empty id without whitespace or control characters, got {value:?}")]
    MalformedId { field: &'static str, value: String },
    #[error("period start {from} is after period end {to}")]
    InvertedPeriod { from: NaiveDate, to: NaiveDate },
}

impl ValidationError {
    /// Name of the offending request field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MalformedTags(_) => "tags",
            ValidationError::MalformedDate { field, .. }
            | ValidationError::InvalidDate { field, .. }
            | ValidationError::MalformedId { field, .. } => field,
            ValidationError::InvertedPeriod { .. } => "from,to",
        }
    }
}

/// Parse the `tags` query parameter.
///
/// Empty input means no filter. Tokens are comma separated and trimmed; an
/// empty token or one with inner whitespace rejects the whole list.
pub fn parse_tags(raw: &str) -> Result<Vec<String>, ValidationError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    raw.split(',')
        .map(str::trim)
        .map(|token| {
            if token.is_empty() || token.chars().any(char::is_whitespace) {
                Err(ValidationError::MalformedTags(raw.to_string()))
            } else {
                Ok(token.to_string())
            }
        })
        .collect()
}

/// Parse an 8-digit `YYYYMMDD` date
pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::MalformedDate {
            field,
            value: raw.to_string(),
        });
    }

    // All eight bytes are ASCII digits, so these slices are on char boundaries
    let invalid = || ValidationError::InvalidDate {
        field,
        value: raw.to_string(),
    };
    let year: i32 = raw[0..4].parse().map_err(|_| invalid())?;
    let month: u32 = raw[4..6].parse().map_err(|_| invalid())?;
    let day: u32 = raw[6..8].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Check an id taken from a path segment or request body.
///
/// `.` and `..` are refused since they cannot name a single path segment.
pub fn validate_id<'a>(field: &'static str, raw: &'a str) -> Result<&'a str, ValidationError> {
    let unusable = raw.is_empty()
        || raw == "."
        || raw == ".."
        || raw.chars().any(|c| c.is_whitespace() || c.is_control());
    if unusable {
        return Err(ValidationError::MalformedId {
            field,
            value: raw.to_string(),
        });
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tags_mean_no_filter() {
        assert_eq!(parse_tags("").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_valid_tag_lists() {
        assert_eq!(parse_tags("algorithm").unwrap(), vec!["algorithm"]);
        assert_eq!(parse_tags("algorithm,data").unwrap(), vec!["algorithm", "data"]);
        assert_eq!(parse_tags("algorithm, data").unwrap(), vec!["algorithm", "data"]);
    }

    #[test]
    fn test_blank_looking_tags_are_rejected() {
        for raw in [" ", ",", ", ", " , ", "a,,b", "a,"] {
            let err = parse_tags(raw).expect_err(raw);
            assert_eq!(err.field(), "tags");
        }
    }

    #[test]
    fn test_space_delimited_tags_are_rejected() {
        let err = parse_tags("algorithm data").unwrap_err();
        assert_eq!(err, ValidationError::MalformedTags("algorithm data".to_string()));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("date", "20240229").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_parse_date_rejects_bad_shapes() {
        for raw in ["", "2024229", "202402290", "2024-2-1", "abcdefgh", "２０２４０１０１"] {
            match parse_date("date", raw) {
                Err(ValidationError::MalformedDate { value, .. }) => assert_eq!(value, raw),
                other => panic!("{raw:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_date_rejects_impossible_dates() {
        for raw in ["20230229", "20241301", "20240431", "20240100"] {
            let err = parse_date("from", raw).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidDate { .. }), "{raw}");
            assert!(err.to_string().contains(raw));
            assert_eq!(err.field(), "from");
        }
    }

    #[test]
    fn test_validate_id() {
        assert_eq!(validate_id("algorithm_id", "kmeans-2").unwrap(), "kmeans-2");
        assert!(validate_id("algorithm_id", "").is_err());
        assert!(validate_id("algorithm_id", "k means").is_err());
        assert!(validate_id("result_set_id", "abc\t").is_err());
    }

    #[test]
    fn test_validate_id_rejects_control_characters_and_dot_segments() {
        for raw in ["a\u{1f}b", "nul\u{0}", "bell\u{7}", "del\u{7f}", ".", ".."] {
            let err = validate_id("algorithmId", raw).expect_err(raw);
            assert_eq!(err.field(), "algorithmId");
        }
        assert!(validate_id("algorithmId", "v1.2").is_ok());
        assert!(validate_id("algorithmId", "...").is_ok());
    }
}
