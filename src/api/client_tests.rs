// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the CCP HTTP client against a mock endpoint.

#[cfg(test)]
mod tests {
    use crate::api::{DnsApi, NetcupClient, RemoteRecord, Session};
    use crate::config::ProviderConfig;
    use crate::dns_errors::{AuthError, BackendError, DnsError, TransportError};
    use serde_json::{json, Value};
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> NetcupClient {
        let config = ProviderConfig::new("key", "secret", "12345")
            .with_endpoint(format!("{}/run/webservice/servers/endpoint.php?JSON", server.uri()));
        NetcupClient::new(&config).unwrap()
    }

    fn envelope(action: &str, status: &str, status_code: i64, data: Value) -> Value {
        json!({
            "serverrequestid": "srv",
            "clientrequestid": "",
            "action": action,
            "status": status,
            "statuscode": status_code,
            "shortmessage": "",
            "longmessage": format!("{action} {status}"),
            "responsedata": data
        })
    }

    // ========================================================================
    // login / logout
    // ========================================================================

    #[tokio::test]
    async fn test_login_sends_credentials_in_param() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "action": "login",
                "param": {
                    "customernumber": "12345",
                    "apikey": "key",
                    "apipassword": "secret"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
                "login",
                "success",
                2000,
                json!({ "apisessionid": "session-abc" }),
            )))
            .expect(1)
            .mount(&server)
            .await;

        let session = client(&server).login().await.unwrap();

        assert_eq!(session.id(), "session-abc");
    }

    #[tokio::test]
    async fn test_login_invalid_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
                "login",
                "error",
                2011,
                json!(""),
            )))
            .mount(&server)
            .await;

        let err = client(&server).login().await.unwrap_err();

        assert!(matches!(
            err,
            DnsError::Auth(AuthError::InvalidCredentials { .. })
        ));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_login_rate_limited_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
                "login",
                "error",
                2057,
                json!(""),
            )))
            .mount(&server)
            .await;

        let err = client(&server).login().await.unwrap_err();

        assert!(matches!(err, DnsError::Auth(AuthError::RateLimited { .. })));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_login_without_session_id_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
                "login",
                "success",
                2000,
                json!({}),
            )))
            .mount(&server)
            .await;

        let err = client(&server).login().await.unwrap_err();

        assert!(matches!(err, DnsError::MalformedResponse { ref action, .. } if action == "login"));
    }

    #[tokio::test]
    async fn test_logout_sends_session_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "action": "logout",
                "param": { "customernumber": "12345", "apikey": "key", "apisessionid": "sid" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
                "logout",
                "success",
                2000,
                json!(""),
            )))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).logout(&Session::new("sid")).await.unwrap();
    }

    #[tokio::test]
    async fn test_logout_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
                "logout",
                "error",
                4001,
                json!(""),
            )))
            .mount(&server)
            .await;

        let err = client(&server)
            .logout(&Session::new("sid"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DnsError::Backend(BackendError::RequestFailed { status_code: 4001, .. })
        ));
    }

    // ========================================================================
    // record-set actions
    // ========================================================================

    #[tokio::test]
    async fn test_info_dns_records_request_and_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "action": "infoDnsRecords",
                "param": { "domainname": "example.com", "apisessionid": "sid" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
                "infoDnsRecords",
                "success",
                2000,
                json!({ "dnsrecords": [
                    { "id": "1", "hostname": "www", "type": "A", "priority": "0", "destination": "192.0.2.1", "deleterecord": false, "state": "yes" }
                ]}),
            )))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server)
            .info_dns_records(&Session::new("sid"), "example.com")
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(response.response_data["dnsrecords"][0]["id"], "1");
    }

    #[tokio::test]
    async fn test_non_success_envelope_is_returned_as_is() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
                "updateDnsRecords",
                "error",
                4013,
                json!(""),
            )))
            .mount(&server)
            .await;

        let response = client(&server)
            .update_dns_records(&Session::new("sid"), "example.com", &[])
            .await
            .unwrap();

        assert!(!response.is_success());
        assert_eq!(response.status_code, 4013);
    }

    #[tokio::test]
    async fn test_update_dns_records_submits_full_set() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "action": "updateDnsRecords",
                "param": {
                    "domainname": "example.com",
                    "dnsrecordset": { "dnsrecords": [
                        { "hostname": "www", "type": "A", "priority": "", "destination": "192.0.2.7" }
                    ]}
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
                "updateDnsRecords",
                "success",
                2000,
                json!({ "dnsrecords": [] }),
            )))
            .expect(1)
            .mount(&server)
            .await;

        let records = vec![RemoteRecord {
            hostname: "www".to_string(),
            record_type: "A".to_string(),
            destination: "192.0.2.7".to_string(),
            ..RemoteRecord::default()
        }];

        let response = client(&server)
            .update_dns_records(&Session::new("sid"), "example.com", &records)
            .await
            .unwrap();

        assert!(response.is_success());
    }

    // ========================================================================
    // transport
    // ========================================================================

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client(&server).login().await.unwrap_err();

        assert!(matches!(
            err,
            DnsError::Transport(TransportError::UnexpectedHttpResponse { status_code: 503, ref reason, .. })
                if reason == "maintenance"
        ));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_invalid_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .info_dns_records(&Session::new("sid"), "example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, DnsError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let config = ProviderConfig::new("key", "secret", "12345")
            .with_endpoint("http://127.0.0.1:1/endpoint.php?JSON");
        let client = NetcupClient::new(&config).unwrap();

        let err = client.login().await.unwrap_err();

        assert!(matches!(
            err,
            DnsError::Transport(TransportError::HttpConnectionFailed { .. })
        ));
        assert!(err.is_transient());
    }

    #[test]
    fn test_debug_hides_credentials() {
        let config = ProviderConfig::new("very-secret-key", "very-secret-password", "12345");
        let client = NetcupClient::new(&config).unwrap();
        let debug = format!("{client:?}");

        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("12345"));
    }
}
