//! Region codes accepted for event filtering.

/// US states and territories followed by Canadian provinces and territories.
pub const REGION_CODES: [&str; 72] = [
    "AL", "AK", "AS", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FM", "FL", "GA", "GU", "HI", "ID",
    "IL", "IN", "IA", "KS", "KY", "LA", "ME", "MH", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE",
    "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "MP", "OH", "OK", "OR", "PW", "PA", "PR", "RI", "SC",
    "SD", "TN", "TX", "UT", "VT", "VI", "VA", "WA", "WV", "WI", "WY", "AB", "BC", "MB", "NB", "NL",
    "NT", "NS", "NU", "ON", "PE", "QC", "SK", "YT",
];

/// Normalize a user supplied region code and check it against the table.
///
/// Returns the upper-cased code when known.
pub fn normalize_region(code: &str) -> Option<String> {
    let code = code.trim().to_ascii_uppercase();
    REGION_CODES.contains(&code.as_str()).then_some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_known_codes() {
        assert_eq!(normalize_region("CA").as_deref(), Some("CA"));
        assert_eq!(normalize_region(" on ").as_deref(), Some("ON"));
    }

    #[test]
    fn test_normalize_rejects_unknown() {
        assert_eq!(normalize_region("ZZ"), None);
        assert_eq!(normalize_region(""), None);
        assert_eq!(normalize_region("California"), None);
    }

    #[test]
    fn test_table_has_no_duplicates() {
        let mut codes = REGION_CODES.to_vec();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), REGION_CODES.len());
    }
}
