use regex::Regex;

use crate::runtime::Error;

///////////////////////////////
/// Finds the barcode in a read: the barcode_len bases immediately before
/// separator_len arbitrary bases and the anchor sequence.
///
/// The leftmost occurrence wins
#[derive(Clone, Debug)]
pub struct BarcodeExtractor {
    pattern: Regex,
}

impl BarcodeExtractor {
    pub fn new(barcode_len: usize, separator_len: usize, anchor_seq: &str) -> Result<BarcodeExtractor, Error> {
        let pattern = format!(
            "(.{{{}}}).{{{}}}{}",
            barcode_len,
            separator_len,
            regex::escape(anchor_seq)
        );
        let pattern = Regex::new(&pattern)
            .map_err(|e| Error::parse_error("barcode pattern", Some(e.to_string())))?;
        Ok(BarcodeExtractor { pattern })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Get the barcode, if the anchor is present
    pub fn extract<'a>(&self, seq: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(seq)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barcode_directly_before_anchor() {
        let ex = BarcodeExtractor::new(4, 0, "GGG").unwrap();
        assert_eq!(ex.extract("TTACGTGGGCCC"), Some("ACGT"));
        assert_eq!(ex.as_str(), "(.{4}).{0}GGG");
    }

    #[test]
    fn separator_is_skipped() {
        let ex = BarcodeExtractor::new(4, 2, "GGG").unwrap();
        assert_eq!(ex.extract("ACGTNNGGG"), Some("ACGT"));
        assert_eq!(ex.extract("TACGTCAGGGA"), Some("ACGT"));
    }

    #[test]
    fn missing_anchor_or_short_prefix() {
        let ex = BarcodeExtractor::new(4, 0, "GGG").unwrap();
        assert_eq!(ex.extract("ACGTACGTACGT"), None);
        //Anchor present but not enough bases before it
        assert_eq!(ex.extract("ACGGG"), None);
        assert_eq!(ex.extract(""), None);
    }

    #[test]
    fn leftmost_match_wins() {
        let ex = BarcodeExtractor::new(4, 0, "GG").unwrap();
        assert_eq!(ex.extract("AAAAGGTTTTGG"), Some("AAAA"));
    }

    #[test]
    fn symbols_are_not_checked_here() {
        let ex = BarcodeExtractor::new(4, 0, "GG").unwrap();
        assert_eq!(ex.extract("ANAAGG"), Some("ANAA"));
    }
}
