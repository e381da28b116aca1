//! Recency gate.
//!
//! Decides whether a delta may be applied over the stored document by
//! comparing version markers. Equal markers are accepted: a delta retried
//! after its notification failed must not be turned away as stale.

use registers_model::{RegistersDocument, VersionMarker};

/// Verdict of the recency gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recency {
    /// The delta may be applied.
    Accept(AcceptReason),
    /// The stored document is strictly newer.
    Reject {
        /// Marker currently stored.
        stored: VersionMarker,
    },
}

/// Why a delta was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptReason {
    /// No document exists yet.
    NoDocument,
    /// The document predates version markers.
    NoMarker,
    /// The delta's marker is equal to or after the stored one.
    NotOlder,
}

impl Recency {
    /// Returns true if the delta may be applied.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Recency::Accept(_))
    }
}

/// Evaluates `incoming` against the stored document.
pub fn check_recency(existing: Option<&RegistersDocument>, incoming: VersionMarker) -> Recency {
    let Some(document) = existing else {
        return Recency::Accept(AcceptReason::NoDocument);
    };
    match document.delta_at() {
        None => Recency::Accept(AcceptReason::NoMarker),
        Some(stored) if incoming >= stored => Recency::Accept(AcceptReason::NotOlder),
        Some(stored) => Recency::Reject { stored },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use registers_model::CompanyNumber;

    fn marker(raw: &str) -> VersionMarker {
        VersionMarker::parse(raw).unwrap()
    }

    fn stored(delta_at: Option<&str>) -> RegistersDocument {
        let builder = RegistersDocument::builder(
            CompanyNumber::parse("00006400").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        );
        match delta_at {
            Some(raw) => builder.delta_at(marker(raw)),
            None => builder,
        }
        .build()
        .unwrap()
    }

    #[test]
    fn accepts_when_absent() {
        let verdict = check_recency(None, marker("20240101000000000000"));
        assert_eq!(verdict, Recency::Accept(AcceptReason::NoDocument));
    }

    #[test]
    fn accepts_legacy_document() {
        let doc = stored(None);
        let verdict = check_recency(Some(&doc), marker("19700101000000000000"));
        assert_eq!(verdict, Recency::Accept(AcceptReason::NoMarker));
    }

    #[test]
    fn accepts_equal_marker() {
        let doc = stored(Some("20240101000000000001"));
        let verdict = check_recency(Some(&doc), marker("20240101000000000001"));
        assert_eq!(verdict, Recency::Accept(AcceptReason::NotOlder));
    }

    #[test]
    fn accepts_newer_marker() {
        let doc = stored(Some("20240101000000000001"));
        assert!(check_recency(Some(&doc), marker("20240101000000000002")).is_accepted());
    }

    #[test]
    fn rejects_older_by_one_microsecond() {
        let doc = stored(Some("20240101000000000001"));
        let verdict = check_recency(Some(&doc), marker("20240101000000000000"));
        assert_eq!(
            verdict,
            Recency::Reject {
                stored: marker("20240101000000000001")
            }
        );
        assert!(!verdict.is_accepted());
    }
}
