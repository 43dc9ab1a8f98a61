//! Structural validation of checksum-bearing identifiers
//!
//! Regex matches on long digit runs are cheap to produce and mostly wrong.
//! The validators here reject candidates whose check digits do not match,
//! and every failure is reported as plain `false`.

use crate::domain::IdValidationError;
use crate::moderation::models::digits_only;
use std::sync::Arc;

/// Identifier schemes with a checksum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdScheme {
    /// SNILS, 9 payload digits + 2 check digits
    NationalInsurance,
    /// INN, delegated to a [`NationalIdValidator`]
    NationalId,
}

/// External validator for national ID numbers
pub trait NationalIdValidator: Send + Sync {
    /// Validate a raw identifier as written in the text
    fn validate(&self, raw: &str) -> Result<(), IdValidationError>;
}

/// Validate a SNILS number
///
/// Non-digits are ignored, so `112-233-445 95` and `11223344595` agree.
pub fn validate_insurance_number(raw: &str) -> bool {
    let digits: Vec<u32> = digits_only(raw)
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();
    if digits.len() != 11 {
        return false;
    }

    let expected = digits[9] * 10 + digits[10];

    // Weight 1 applies to the last payload digit, weight 9 to the first.
    let total: u32 = digits[..9]
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| (i as u32 + 1) * d)
        .sum();

    let control = match total {
        t if t < 100 => t,
        100 | 101 => 0,
        t => match t % 101 {
            100 => 0,
            c => c,
        },
    };

    control == expected
}

/// INN validator (10-digit legal entity or 12-digit individual)
#[derive(Debug, Clone, Copy, Default)]
pub struct InnValidator;

impl InnValidator {
    const WEIGHTS_10: [u32; 9] = [2, 4, 10, 3, 5, 9, 4, 6, 8];
    const WEIGHTS_11: [u32; 10] = [7, 2, 4, 10, 3, 5, 9, 4, 6, 8];
    const WEIGHTS_12: [u32; 11] = [3, 7, 2, 4, 10, 3, 5, 9, 4, 6, 8];

    fn check_digit(weights: &[u32], digits: &[u32]) -> u32 {
        let sum: u32 = weights.iter().zip(digits).map(|(w, d)| w * d).sum();
        sum % 11 % 10
    }
}

impl NationalIdValidator for InnValidator {
    fn validate(&self, raw: &str) -> Result<(), IdValidationError> {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if !compact.chars().all(|c| c.is_ascii_digit()) {
            return Err(IdValidationError::InvalidFormat);
        }
        let digits: Vec<u32> = compact.chars().filter_map(|c| c.to_digit(10)).collect();

        let valid = match digits.len() {
            10 => Self::check_digit(&Self::WEIGHTS_10, &digits) == digits[9],
            12 => {
                Self::check_digit(&Self::WEIGHTS_11, &digits) == digits[10]
                    && Self::check_digit(&Self::WEIGHTS_12, &digits) == digits[11]
            }
            _ => return Err(IdValidationError::InvalidLength),
        };

        if valid {
            Ok(())
        } else {
            Err(IdValidationError::InvalidChecksum)
        }
    }
}

/// Dispatches identifiers to the validator of their scheme
#[derive(Clone)]
pub struct ChecksumValidator {
    national_id: Arc<dyn NationalIdValidator>,
}

impl ChecksumValidator {
    /// Create a checksum validator with a national ID collaborator
    pub fn new(national_id: Arc<dyn NationalIdValidator>) -> Self {
        Self { national_id }
    }

    /// Validate `raw` under `scheme`; never fails, only answers
    pub fn validate_checksum_id(&self, raw: &str, scheme: IdScheme) -> bool {
        match scheme {
            IdScheme::NationalInsurance => validate_insurance_number(raw),
            IdScheme::NationalId => match self.national_id.validate(raw) {
                Ok(()) => true,
                Err(e) => {
                    tracing::trace!(reason = %e, "National ID candidate rejected");
                    false
                }
            },
        }
    }
}

impl Default for ChecksumValidator {
    fn default() -> Self {
        Self::new(Arc::new(InnValidator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("112-233-445 95", true ; "official example")]
    #[test_case("11223344595", true ; "compact form")]
    #[test_case("112 233 445 95", true ; "space separated")]
    #[test_case("11070434193", true ; "total below 100")]
    #[test_case("05023431600", true ; "total exactly 100")]
    #[test_case("01610339600", true ; "total exactly 101")]
    #[test_case("82098123300", true ; "remainder of 100 collapses")]
    #[test_case("29141777694", true ; "total above 101")]
    #[test_case("112-233-445 96", false ; "wrong control")]
    #[test_case("12345678901", false ; "random digits")]
    #[test_case("1122334459", false ; "too short")]
    #[test_case("112233445951", false ; "too long")]
    fn test_insurance_number(raw: &str, expected: bool) {
        assert_eq!(validate_insurance_number(raw), expected);
    }

    #[test]
    fn test_insurance_number_separator_invariance() {
        for raw in ["29141777694", "12345678901", "05023431600"] {
            let hyphenated = format!("{}-{}-{} {}", &raw[..3], &raw[3..6], &raw[6..9], &raw[9..]);
            assert_eq!(
                validate_insurance_number(raw),
                validate_insurance_number(&hyphenated)
            );
        }
    }

    #[test_case("7707083893", Ok(()) ; "legal entity")]
    #[test_case("500100732259", Ok(()) ; "individual")]
    #[test_case("5001 0073 2259", Ok(()) ; "whitespace is compacted")]
    #[test_case("500100732258", Err(IdValidationError::InvalidChecksum) ; "bad checksum")]
    #[test_case("12345", Err(IdValidationError::InvalidLength) ; "bad length")]
    #[test_case("50010073225X", Err(IdValidationError::InvalidFormat) ; "non digit")]
    fn test_inn_validator(raw: &str, expected: Result<(), IdValidationError>) {
        assert_eq!(InnValidator.validate(raw), expected);
    }

    #[test]
    fn test_checksum_validator_collapses_errors() {
        let validator = ChecksumValidator::default();
        assert!(validator.validate_checksum_id("500100732259", IdScheme::NationalId));
        assert!(!validator.validate_checksum_id("500100732258", IdScheme::NationalId));
        assert!(!validator.validate_checksum_id("garbage", IdScheme::NationalId));
        assert!(validator.validate_checksum_id("112-233-445 95", IdScheme::NationalInsurance));
    }

    struct RejectAll;

    impl NationalIdValidator for RejectAll {
        fn validate(&self, _raw: &str) -> Result<(), IdValidationError> {
            Err(IdValidationError::InvalidFormat)
        }
    }

    #[test]
    fn test_checksum_validator_uses_injected_collaborator() {
        let validator = ChecksumValidator::new(Arc::new(RejectAll));
        assert!(!validator.validate_checksum_id("500100732259", IdScheme::NationalId));
    }
}
