//! Case-number normalization.
//!
//! National case numbers are 20 digits wide and decompose into six
//! fixed segments. The trailing segments (court code, originating-unit
//! code) legitimately differ between instances of the same lawsuit, so
//! linking keys are built from the segments that stay stable across
//! tiers.

/// A structurally decomposed national case number.
///
/// Segment layout over the digit-only string:
/// `sequential(7) check(2) year(4) branch(1) court(2) origin(4)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CnjNumber {
    pub sequential: String,
    pub check: String,
    pub year: String,
    pub branch: String,
    pub court: String,
    pub origin: String,
}

impl CnjNumber {
    /// Decompose a digit-only string of at least 20 digits. Digits past
    /// position 20 are ignored.
    pub fn parse(digits: &str) -> Option<CnjNumber> {
        if digits.len() < 20 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(CnjNumber {
            sequential: digits[0..7].to_string(),
            check: digits[7..9].to_string(),
            year: digits[9..13].to_string(),
            branch: digits[13..14].to_string(),
            court: digits[14..16].to_string(),
            origin: digits[16..20].to_string(),
        })
    }
}

/// Linking keys derived from one raw case number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseKeys {
    /// Tier-stable root: sequential + year + branch.
    pub primary: String,
    /// Wider-recall windowings, in fixed priority order.
    pub alternates: Vec<String>,
}

/// Keep only ASCII digits from a raw case-number string.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Derive the linking keys for a raw case number.
///
/// Full-length numbers get the tier-stable primary key plus two
/// alternate windowings; shorter digit strings carry too little
/// structure to window and become their own single key.
pub fn normalize(raw: &str) -> CaseKeys {
    let digits = digits_only(raw);
    match CnjNumber::parse(&digits) {
        Some(cnj) => {
            let primary = format!("{}{}{}", cnj.sequential, cnj.year, cnj.branch);
            let alternates = vec![
                // Middle-section window: check + year + branch + court.
                digits[7..15].to_string(),
                // Year-first reordering of the stable root.
                format!("{}{}", cnj.year, cnj.sequential),
            ];
            CaseKeys { primary, alternates }
        }
        None => CaseKeys {
            primary: digits,
            alternates: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decomposes_segments() {
        let cnj = CnjNumber::parse("00123456720208020001").unwrap();
        assert_eq!(cnj.sequential, "0012345");
        assert_eq!(cnj.check, "67");
        assert_eq!(cnj.year, "2020");
        assert_eq!(cnj.branch, "8");
        assert_eq!(cnj.court, "02");
        assert_eq!(cnj.origin, "0001");
    }

    #[test]
    fn parse_rejects_short_and_non_digit() {
        assert!(CnjNumber::parse("123").is_none());
        assert!(CnjNumber::parse("0012345672020802000a").is_none());
    }

    #[test]
    fn normalize_strips_punctuation() {
        let keys = normalize("0012345-67.2020.8.02.0001");
        assert_eq!(keys.primary, "001234520208");
    }

    #[test]
    fn primary_key_is_stable_across_tiers() {
        // Same lawsuit, different court/origin segments.
        let a = normalize("00123456720208020001");
        let b = normalize("00123456720208020099");
        assert_eq!(a.primary, b.primary);
    }

    #[test]
    fn alternate_windows_in_priority_order() {
        let keys = normalize("00123456720208020001");
        assert_eq!(keys.alternates, vec!["67202080".to_string(), "20200012345".to_string()]);
    }

    #[test]
    fn short_number_is_its_own_key() {
        let keys = normalize("12345-2020");
        assert_eq!(keys.primary, "123452020");
        assert!(keys.alternates.is_empty());
    }

    #[test]
    fn normalize_is_idempotent_on_primary_keys() {
        let keys = normalize("00123456720208020001");
        let again = normalize(&keys.primary);
        assert_eq!(again.primary, keys.primary);
        assert!(again.alternates.is_empty());
    }
}
