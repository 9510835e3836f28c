use calamine::Data;
use chrono::NaiveDate;

/// One spreadsheet cell, independent of the file format it came from.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
}

impl CellValue {
    pub(super) fn from_workbook(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => Self::Empty,
            Data::String(value) => Self::from_text(value),
            Data::Float(value) => Self::Number(*value),
            Data::Int(value) => Self::Number(*value as f64),
            Data::Bool(value) => Self::Bool(*value),
            Data::DateTime(value) => value
                .as_datetime()
                .map_or(Self::Empty, |value| Self::Date(value.date())),
            Data::DateTimeIso(value) => parse_date(value).map_or_else(|| Self::from_text(value), Self::Date),
            Data::DurationIso(value) => Self::from_text(value),
        }
    }

    pub(super) fn from_text(value: &str) -> Self {
        if value.trim().is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_owned())
        }
    }

    pub(super) fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Text rendering. Whole numbers drop the fractional part so numeric
    /// NIT and phone cells read as `900123` rather than `900123.0`.
    pub(super) fn as_text(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(value) => Some(value.clone()),
            Self::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                Some(format!("{}", *value as i64))
            }
            Self::Number(value) => Some(value.to_string()),
            Self::Date(value) => Some(value.format("%Y-%m-%d").to_string()),
            Self::Bool(value) => Some(value.to_string()),
        }
    }

    pub(super) fn as_amount(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(value) => parse_amount(value),
            _ => None,
        }
    }

    pub(super) fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(value) => Some(*value),
            Self::Text(value) => parse_date(value),
            _ => None,
        }
    }

    pub(super) fn as_days(&self) -> Option<i64> {
        match self {
            Self::Number(value) if value.is_finite() => Some(value.round() as i64),
            Self::Text(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .or_else(|| parse_amount(value).map(|amount| amount.round() as i64)),
            _ => None,
        }
    }
}

/// Parses a money amount written as text.
///
/// Accepts currency symbols, `COP` suffixes, thousands separators in either
/// convention (`1.234.567,50` and `1,234,567.50`), a leading minus and
/// accounting parentheses. A lone separator followed by exactly three digits
/// is read as a thousands separator unless the integer part is zero.
pub(super) fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let (negative, body) = match trimmed.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };

    let cleaned: String = body
        .trim()
        .trim_end_matches("COP")
        .chars()
        .filter(|character| !matches!(character, '$' | ' ' | '\u{a0}'))
        .collect();
    let (negative, cleaned) = match cleaned.strip_prefix('-') {
        Some(rest) => (!negative, rest.to_owned()),
        None => (negative, cleaned),
    };

    if cleaned.is_empty()
        || !cleaned
            .chars()
            .all(|character| character.is_ascii_digit() || matches!(character, '.' | ','))
    {
        return None;
    }

    let decimal_separator = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) => Some(if dot > comma { '.' } else { ',' }),
        (Some(position), None) | (None, Some(position)) => {
            let separator = cleaned[position..].chars().next()?;
            let occurrences = cleaned.matches(separator).count();
            let digits_after = cleaned.len() - position - 1;
            let zero_integer_part = matches!(&cleaned[..position], "" | "0");
            if occurrences > 1 || (digits_after == 3 && !zero_integer_part) {
                None
            } else {
                Some(separator)
            }
        }
        (None, None) => None,
    };

    let normalized: String = cleaned
        .chars()
        .filter_map(|character| match character {
            '.' | ',' if Some(character) == decimal_separator => Some('.'),
            '.' | ',' => None,
            other => Some(other),
        })
        .collect();

    let value = normalized.parse::<f64>().ok()?;
    Some(if negative { -value } else { value })
}

/// Parses a date written as text, ignoring any time part.
pub(super) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split(['T', ' ']).next()?;
    ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_both_separator_conventions() {
        assert_eq!(parse_amount("1.234.567,50"), Some(1_234_567.5));
        assert_eq!(parse_amount("1,234,567.50"), Some(1_234_567.5));
        assert_eq!(parse_amount("$ 1.500"), Some(1500.0));
        assert_eq!(parse_amount("12,5"), Some(12.5));
        assert_eq!(parse_amount("980000 COP"), Some(980_000.0));
    }

    #[test]
    fn zero_integer_part_keeps_three_decimals() {
        assert_eq!(parse_amount("0.500"), Some(0.5));
        assert_eq!(parse_amount("0,125"), Some(0.125));
        assert_eq!(parse_amount("-0.750"), Some(-0.75));
        assert_eq!(parse_amount("1.500"), Some(1500.0));
    }

    #[test]
    fn amounts_accept_negative_notations() {
        assert_eq!(parse_amount("(250.000)"), Some(-250_000.0));
        assert_eq!(parse_amount("-75"), Some(-75.0));
    }

    #[test]
    fn non_numeric_amounts_are_rejected() {
        assert_eq!(parse_amount("pendiente"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn dates_parse_iso_and_day_first() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15);
        assert_eq!(parse_date("2024-03-15"), expected);
        assert_eq!(parse_date("15/03/2024"), expected);
        assert_eq!(parse_date("2024-03-15T00:00:00"), expected);
        assert_eq!(parse_date("2024-03-15 08:30:00"), expected);
        assert_eq!(parse_date("marzo"), None);
    }

    #[test]
    fn whole_numbers_render_without_fraction() {
        assert_eq!(CellValue::Number(900123.0).as_text().as_deref(), Some("900123"));
        assert_eq!(CellValue::Number(12.5).as_text().as_deref(), Some("12.5"));
    }

    #[test]
    fn workbook_cells_map_to_values() {
        assert_eq!(CellValue::from_workbook(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(
            CellValue::from_workbook(&Data::String("  ".to_owned())),
            CellValue::Empty
        );
        assert_eq!(
            CellValue::from_workbook(&Data::DateTimeIso("2024-01-31".to_owned())),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap_or_else(|| panic!("test")))
        );
    }

    #[test]
    fn days_parse_from_text_and_numbers() {
        assert_eq!(CellValue::Text(" 45 ".to_owned()).as_days(), Some(45));
        assert_eq!(CellValue::Number(30.4).as_days(), Some(30));
        assert_eq!(CellValue::Empty.as_days(), None);
    }
}
