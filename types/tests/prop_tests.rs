use proptest::prelude::*;

use hashcash_types::{Granularity, Stamp, StampTime};

/// Printable ASCII without the field delimiter.
fn field() -> impl Strategy<Value = String> {
    "[ -9;-~]{0,24}"
}

proptest! {
    /// Stamp roundtrip: parse(to_string(s)) == s field for field.
    #[test]
    fn stamp_roundtrip(
        bits in field(),
        timestamp in field(),
        resource in field(),
        extension in field(),
        random in field(),
        counter in field(),
    ) {
        let stamp = Stamp { bits, timestamp, resource, extension, random, counter };
        let text = stamp.to_string();
        let parsed = Stamp::parse(&text).unwrap();
        prop_assert_eq!(&parsed, &stamp);
        prop_assert_eq!(parsed.to_string(), text);
    }

    /// Parsing arbitrary text never panics, and anything accepted re-encodes verbatim.
    #[test]
    fn parse_is_total_and_verbatim(text in "\\PC{0,80}") {
        if let Ok(stamp) = Stamp::parse(&text) {
            prop_assert_eq!(stamp.to_string(), text);
        }
    }

    /// Colon-heavy inputs: only exactly seven fields with version 1 get through.
    #[test]
    fn field_count_is_enforced(parts in prop::collection::vec("[0-9a-z]{0,4}", 1..12)) {
        let text = parts.join(":");
        let result = Stamp::parse(&text);
        if parts.len() != 7 || parts[0] != "1" {
            prop_assert!(result.is_err());
        }
    }

    /// StampTime text roundtrip for every granularity.
    #[test]
    fn stamp_time_roundtrip(secs in -31_536_000i64..3_124_224_000, g in 0usize..3) {
        let instant = chrono::DateTime::<chrono::Utc>::from_timestamp(secs, 0).unwrap();
        let granularity = Granularity::COARSEST_FIRST[g];
        let time = StampTime::truncate(instant, granularity);
        prop_assert!(time.instant() <= instant);
        prop_assert!(instant.timestamp() - time.instant().timestamp() < granularity.unit_secs());
        let parsed = StampTime::parse(&time.to_string()).unwrap();
        prop_assert_eq!(parsed, time);
    }
}
