//! The hashcash stamp and its canonical text encoding.
//!
//! A stamp is seven colon-separated fields:
//!
//! ```text
//! version:bits:timestamp:resource:extension:random:counter
//! ```
//!
//! Fields are kept verbatim. Re-encoding a parsed stamp yields the exact
//! input text, which matters because the proof lives in the digest of that
//! text and not in any of the decoded values.

use std::fmt;
use std::str::FromStr;

use crate::StampError;

/// The only stamp format version this crate reads or writes.
pub const STAMP_VERSION: &str = "1";

/// Separator between stamp fields. Never escaped, so no field may contain it.
pub const FIELD_DELIMITER: char = ':';

const FIELD_COUNT: usize = 7;

/// A decoded version-1 stamp.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Stamp {
    /// Difficulty the minter claims, verbatim. Informational only; verifiers
    /// use their own. See [`Stamp::claimed_bits`].
    pub bits: String,
    /// Creation time digits, see [`crate::StampTime`]. Kept verbatim.
    pub timestamp: String,
    /// The stamped value, e.g. a recipient address.
    pub resource: String,
    /// Reserved; normally empty.
    pub extension: String,
    /// Per-minter random salt.
    pub random: String,
    /// Search counter.
    pub counter: String,
}

impl Stamp {
    /// Decode stamp text.
    ///
    /// Fails only if the text does not split into exactly seven fields or
    /// the version is not `1`. Every other field is taken as is.
    pub fn parse(text: &str) -> Result<Self, StampError> {
        let fields: Vec<&str> = text.split(FIELD_DELIMITER).collect();
        if fields.len() != FIELD_COUNT {
            return Err(StampError::FieldCount(fields.len()));
        }
        if fields[0] != STAMP_VERSION {
            return Err(StampError::UnsupportedVersion(fields[0].to_string()));
        }

        Ok(Self {
            bits: fields[1].to_string(),
            timestamp: fields[2].to_string(),
            resource: fields[3].to_string(),
            extension: fields[4].to_string(),
            random: fields[5].to_string(),
            counter: fields[6].to_string(),
        })
    }

    /// The claimed difficulty as a number, if the bits field is plain
    /// decimal digits that fit a `u32`.
    pub fn claimed_bits(&self) -> Option<u32> {
        if self.bits.is_empty() || !self.bits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.bits.parse().ok()
    }

    /// Whether any text field contains the delimiter, which would make the
    /// encoded form ambiguous.
    pub fn has_embedded_delimiter(&self) -> bool {
        [
            &self.bits,
            &self.timestamp,
            &self.resource,
            &self.extension,
            &self.random,
            &self.counter,
        ]
        .iter()
        .any(|field| field.contains(FIELD_DELIMITER))
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{STAMP_VERSION}:{}:{}:{}:{}:{}:{}",
            self.bits, self.timestamp, self.resource, self.extension, self.random, self.counter
        )
    }
}

impl FromStr for Stamp {
    type Err = StampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPIRED: &str = "1:20:040806:foo::65f460d0726f420d:13a6b8";
    const DATETIME: &str = "1:20:180311205026:someone@gmail.com::2M6FmM7eRvw=:MjU5ODg5";

    #[test]
    fn parses_date_only_stamp() {
        let stamp = Stamp::parse(EXPIRED).unwrap();
        assert_eq!(stamp.bits, "20");
        assert_eq!(stamp.claimed_bits(), Some(20));
        assert_eq!(stamp.timestamp, "040806");
        assert_eq!(stamp.resource, "foo");
        assert_eq!(stamp.extension, "");
        assert_eq!(stamp.random, "65f460d0726f420d");
        assert_eq!(stamp.counter, "13a6b8");
    }

    #[test]
    fn parses_date_time_stamp() {
        let stamp: Stamp = DATETIME.parse().unwrap();
        assert_eq!(stamp.timestamp, "180311205026");
        assert_eq!(stamp.resource, "someone@gmail.com");
        assert_eq!(stamp.random, "2M6FmM7eRvw=");
    }

    #[test]
    fn reencodes_byte_identical() {
        assert_eq!(Stamp::parse(EXPIRED).unwrap().to_string(), EXPIRED);
        assert_eq!(Stamp::parse(DATETIME).unwrap().to_string(), DATETIME);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(Stamp::parse("blah"), Err(StampError::FieldCount(1)));
        assert_eq!(Stamp::parse(""), Err(StampError::FieldCount(1)));
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(
            Stamp::parse("1:20:040806:foo:65f460d0726f420d:13a6b8"),
            Err(StampError::FieldCount(6))
        );
        assert_eq!(
            Stamp::parse("1:20:040806:foo::65f460d0726f420d:13a6b8:"),
            Err(StampError::FieldCount(8))
        );
    }

    #[test]
    fn rejects_other_versions() {
        assert!(matches!(
            Stamp::parse("0:20:040806:foo::65f460d0726f420d:13a6b8"),
            Err(StampError::UnsupportedVersion(v)) if v == "0"
        ));
        assert!(matches!(
            Stamp::parse("01:20:040806:foo::65f460d0726f420d:13a6b8"),
            Err(StampError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn bits_field_is_kept_verbatim() {
        for bits in ["", "020", "+20", "-1", "2o", " 20", "4294967296"] {
            let text = format!("1:{bits}:040806:foo::r:c");
            let stamp = Stamp::parse(&text).unwrap();
            assert_eq!(stamp.bits, bits);
            assert_eq!(stamp.to_string(), text);
        }
    }

    #[test]
    fn claimed_bits_reads_plain_decimal() {
        let claimed = |bits: &str| {
            Stamp::parse(&format!("1:{bits}:040806:foo::r:c"))
                .unwrap()
                .claimed_bits()
        };
        assert_eq!(claimed("0"), Some(0));
        assert_eq!(claimed("020"), Some(20));
        assert_eq!(claimed("4294967295"), Some(u32::MAX));
        assert_eq!(claimed("4294967296"), None);
        assert_eq!(claimed("+20"), None);
        assert_eq!(claimed(""), None);
        assert_eq!(claimed(" 20"), None);
    }

    #[test]
    fn fields_are_not_trimmed() {
        let text = "1:8: 040806 : foo :ext: r : c ";
        let stamp = Stamp::parse(text).unwrap();
        assert_eq!(stamp.timestamp, " 040806 ");
        assert_eq!(stamp.resource, " foo ");
        assert_eq!(stamp.extension, "ext");
        assert_eq!(stamp.to_string(), text);
    }

    #[test]
    fn detects_embedded_delimiter() {
        let mut stamp = Stamp::parse(EXPIRED).unwrap();
        assert!(!stamp.has_embedded_delimiter());
        stamp.resource = "mailto:foo".to_string();
        assert!(stamp.has_embedded_delimiter());
    }
}
