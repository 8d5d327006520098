// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#[cfg(test)]
mod tests {
    use crate::api::{RemoteRecord, Session};
    use crate::dns_errors::{DnsError, RecordError};
    use crate::matcher::*;
    use crate::record::DesiredRecord;
    use crate::record_set::RecordSet;
    use crate::test_support::{remote, FakeDnsApi};

    fn mx(id: &str, priority: &str) -> RemoteRecord {
        RemoteRecord {
            priority: priority.to_string(),
            ..remote(id, "@", "MX", "mx.example.com")
        }
    }

    #[test]
    fn test_to_remote_has_no_id() {
        let desired =
            DesiredRecord::new("example.com", "mail", "MX", "mx.example.com").with_priority("10");

        let record = to_remote(&desired);

        assert_eq!(record.id, None);
        assert_eq!(record.hostname, "mail");
        assert_eq!(record.priority, "10");
        assert!(!record.delete_record);
    }

    #[test]
    fn test_matches_ignores_type_case() {
        let desired = DesiredRecord::new("example.com", "www", "A", "192.0.2.1");
        assert!(matches(&remote("1", "www", "a", "192.0.2.1"), &desired));
        assert!(!matches(&remote("1", "www", "A", "192.0.2.2"), &desired));
        assert!(!matches(&remote("1", "web", "A", "192.0.2.1"), &desired));
    }

    #[test]
    fn test_matches_priority_only_for_priority_types() {
        let mx_desired =
            DesiredRecord::new("example.com", "@", "MX", "mx.example.com").with_priority("10");
        assert!(matches(&mx("1", "10"), &mx_desired));
        assert!(!matches(&mx("1", "20"), &mx_desired));

        let a_desired =
            DesiredRecord::new("example.com", "www", "A", "192.0.2.1").with_priority("5");
        assert!(matches(&remote("1", "www", "A", "192.0.2.1"), &a_desired));
    }

    #[test]
    fn test_find_match_skips_records_without_id() {
        let desired = DesiredRecord::new("example.com", "www", "A", "192.0.2.1");
        let mut pending = remote("x", "www", "A", "192.0.2.1");
        pending.id = None;
        let set = RecordSet::new(vec![pending, remote("7", "www", "A", "192.0.2.1")]);

        assert_eq!(find_match(&set, &desired).and_then(|r| r.id.as_deref()), Some("7"));
    }

    #[test]
    fn test_find_match_first_duplicate_wins() {
        let desired = DesiredRecord::new("example.com", "www", "A", "192.0.2.1");
        let set = RecordSet::new(vec![
            remote("5", "www", "A", "192.0.2.1"),
            remote("4", "www", "A", "192.0.2.1"),
        ]);

        assert_eq!(find_match(&set, &desired).and_then(|r| r.id.as_deref()), Some("5"));
    }

    #[tokio::test]
    async fn test_resolve_distinguishes_mx_by_priority() {
        let api = FakeDnsApi::new().with_zone("example.com", vec![mx("1", "10"), mx("2", "20")]);
        let desired =
            DesiredRecord::new("example.com", "@", "MX", "mx.example.com").with_priority("20");

        let id = resolve_record_id(&api, &Session::new("s"), &desired)
            .await
            .unwrap();

        assert_eq!(id, "2");
    }

    #[tokio::test]
    async fn test_resolve_reports_unresolved() {
        let api =
            FakeDnsApi::new().with_zone("example.com", vec![remote("1", "www", "A", "192.0.2.1")]);
        let desired = DesiredRecord::new("example.com", "api", "A", "192.0.2.1");

        let err = resolve_record_id(&api, &Session::new("s"), &desired)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DnsError::Record(RecordError::UnresolvedRecordId { ref hostname, .. }) if hostname == "api"
        ));
        assert!(err.is_transient());
    }
}
