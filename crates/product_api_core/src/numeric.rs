use serde_json::Number;

use crate::contract::ValidationError;

/// Converts a store-side arbitrary-precision decimal string to a JSON
/// number: values with no fractional part become integers, everything else
/// becomes a float. `"4.0"` therefore serializes as `4` and `"4.5"` as
/// `4.5`.
pub fn decimal_to_number(text: &str) -> Result<Number, ValidationError> {
    let trimmed = text.trim();

    let (integral, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    if !integral.is_empty() && fraction.chars().all(|c| c == '0') {
        if let Ok(value) = integral.parse::<i64>() {
            return Ok(Number::from(value));
        }
    }

    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .and_then(Number::from_f64)
        .ok_or_else(|| ValidationError::new(format!("Invalid numeric value '{trimmed}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_decimal_serializes_as_integer() {
        let number = decimal_to_number("4.0").expect("value should parse");
        assert_eq!(serde_json::to_string(&number).expect("number serializes"), "4");

        let number = decimal_to_number("120").expect("value should parse");
        assert_eq!(serde_json::to_string(&number).expect("number serializes"), "120");
    }

    #[test]
    fn fractional_decimal_serializes_as_float() {
        let number = decimal_to_number("4.5").expect("value should parse");
        assert_eq!(serde_json::to_string(&number).expect("number serializes"), "4.5");
    }

    #[test]
    fn negative_values_keep_their_sign() {
        let number = decimal_to_number("-12.00").expect("value should parse");
        assert_eq!(number.as_i64(), Some(-12));

        let number = decimal_to_number("-0.25").expect("value should parse");
        assert_eq!(number.as_f64(), Some(-0.25));
    }

    #[test]
    fn bare_fraction_parses_as_float() {
        let number = decimal_to_number(".5").expect("value should parse");
        assert_eq!(number.as_f64(), Some(0.5));
    }

    #[test]
    fn oversized_integral_value_falls_back_to_float() {
        let number = decimal_to_number("92233720368547758080").expect("value should parse");
        assert!(number.is_f64());
    }

    #[test]
    fn rejects_non_numeric_text() {
        decimal_to_number("not-a-number").expect_err("value should fail");
        decimal_to_number("").expect_err("value should fail");
    }
}
