/// Trimmed value, empty when missing.
pub fn trimmed(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_string()
}

/// Trimmed and uppercased; registration numbers and tag ids are stored this way.
#[inline]
pub fn key(value: Option<&str>) -> String {
    trimmed(value).to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_uppercases_keys() {
        assert_eq!(key(Some("  reg1 ")), "REG1");
        assert_eq!(key(Some("a3f9c1")), "A3F9C1");
        assert_eq!(key(Some("   ")), "");
        assert_eq!(key(None), "");
    }

    #[test]
    fn trims_names_without_changing_case() {
        assert_eq!(trimmed(Some("  Alice Smith\n")), "Alice Smith");
    }
}
