//! Provider 集成测试
//!
//! The mock tests run by default. The live test needs a disposable Pi-hole:
//! ```bash
//! PIHOLE_SERVER=http://192.168.1.2 PIHOLE_PASSWORD=xxx \
//!     cargo test -p pihole-provider --test provider_test -- --ignored --nocapture --test-threads=1
//! ```

mod common;

use common::{api_calls, authed_server, config, endpoint, ok_body};
use pihole_provider::{Changes, PiholeConfig, Provider, create_provider};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn accept_mutations(server: &MockServer) {
    Mock::given(method("PUT"))
        .and(path_regex(r"^/api/config/dns/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(ok_body()))
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"^/api/config/dns/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

// ============ 变更集 ============

#[tokio::test]
async fn test_apply_changes_order() {
    let server = authed_server().await;
    accept_mutations(&server).await;

    let provider = create_provider(config(&server)).await.expect("provider should connect");
    let changes = Changes {
        create: vec![endpoint("new.example.io", "A", &["10.0.0.1"])],
        update_old: vec![endpoint("moved.example.io", "CNAME", &["old.example.io"])],
        update_new: vec![endpoint("moved.example.io", "CNAME", &["new.example.io"])],
        delete: vec![endpoint("gone.example.io", "AAAA", &["2001:db8::9"])],
    };
    require_ok!(provider.apply_changes(&changes).await);

    assert_eq!(
        api_calls(&server).await,
        vec![
            "DELETE /api/config/dns/hosts/2001%3Adb8%3A%3A9%20gone.example.io",
            "DELETE /api/config/dns/cnameRecords/moved.example.io%2Cold.example.io",
            "PUT /api/config/dns/hosts/10.0.0.1%20new.example.io",
            "PUT /api/config/dns/cnameRecords/moved.example.io%2Cnew.example.io",
        ]
    );
}

#[tokio::test]
async fn test_unchanged_update_is_skipped() {
    let server = authed_server().await;
    accept_mutations(&server).await;

    let provider = create_provider(config(&server)).await.expect("provider should connect");
    let changes = Changes {
        update_old: vec![endpoint("same.example.io", "A", &["10.0.0.1"])],
        update_new: vec![endpoint("same.example.io", "A", &["10.0.0.1"])],
        ..Default::default()
    };
    require_ok!(provider.apply_changes(&changes).await);

    assert!(api_calls(&server).await.is_empty());
}

#[tokio::test]
async fn test_failed_delete_stops_before_creates() {
    let server = authed_server().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(common::error_body(
            "not_found",
            "Item not found",
        )))
        .mount(&server)
        .await;
    accept_mutations(&server).await;

    let provider = create_provider(config(&server)).await.expect("provider should connect");
    let changes = Changes {
        create: vec![endpoint("new.example.io", "A", &["10.0.0.1"])],
        delete: vec![endpoint("missing.example.io", "A", &["10.0.0.2"])],
        ..Default::default()
    };
    let err = require_err!(provider.apply_changes(&changes).await);
    assert!(matches!(
        err,
        pihole_provider::ProviderError::RecordNotFound { ref record, .. }
            if record == "10.0.0.2 missing.example.io"
    ));

    let calls = api_calls(&server).await;
    assert!(calls.iter().all(|c| !c.starts_with("PUT")), "{calls:?}");
}

#[tokio::test]
async fn test_changes_from_webhook_json() {
    let server = authed_server().await;
    accept_mutations(&server).await;

    let changes = require_ok!(serde_json::from_str::<Changes>(
        r#"{
            "Create": [{"dnsName": "web.example.io", "targets": ["10.0.0.5"], "recordType": "A", "recordTTL": 300}],
            "UpdateOld": null,
            "UpdateNew": null,
            "Delete": []
        }"#
    ));
    let provider = create_provider(config(&server)).await.expect("provider should connect");
    require_ok!(provider.apply_changes(&changes).await);

    assert_eq!(
        api_calls(&server).await,
        vec!["PUT /api/config/dns/hosts/10.0.0.5%20web.example.io"]
    );
}

// ============ 协商 ============

#[tokio::test]
async fn test_adjust_endpoints_keeps_supported_types() {
    let server = authed_server().await;

    let provider = create_provider(config(&server)).await.expect("provider should connect");
    let adjusted = require_ok!(
        provider
            .adjust_endpoints(vec![
                endpoint("a.example.io", "A", &["10.0.0.1"]),
                endpoint("a.example.io", "TXT", &["\"heritage=external-dns\""]),
                endpoint("mx.example.io", "MX", &["10 mail.example.io"]),
                endpoint("c.example.io", "CNAME", &["a.example.io"]),
            ])
            .await
    );

    let names: Vec<_> = adjusted
        .iter()
        .map(|e| format!("{} {}", e.record_type, e.dns_name))
        .collect();
    assert_eq!(names, vec!["A a.example.io", "CNAME c.example.io"]);
}

#[tokio::test]
async fn test_domain_filter_negotiation() {
    let server = authed_server().await;

    let config = common::filtered_config(&server, &["example.io"]);
    let provider = create_provider(config).await.expect("provider should connect");

    assert_eq!(provider.id(), "pihole");
    assert_eq!(
        require_ok!(serde_json::to_value(provider.domain_filter())),
        serde_json::json!({"include": ["example.io"]})
    );
}

// ============ 真实服务器 ============

#[tokio::test]
#[ignore]
async fn test_live_create_list_delete() {
    skip_if_no_credentials!("PIHOLE_SERVER");

    let config = PiholeConfig::from_env().expect("invalid PIHOLE_* environment");
    let provider = create_provider(config).await.expect("provider should connect");

    let record = endpoint("_test-pihole-provider.lan", "A", &["192.0.2.10"]);
    let create = Changes {
        create: vec![record.clone()],
        ..Default::default()
    };
    require_ok!(provider.apply_changes(&create).await);

    let records = require_ok!(provider.records().await);
    assert!(
        records.iter().any(|r| r.dns_name == record.dns_name),
        "created record not listed"
    );

    let delete = Changes {
        delete: vec![record.clone()],
        ..Default::default()
    };
    require_ok!(provider.apply_changes(&delete).await);

    let records = require_ok!(provider.records().await);
    assert!(records.iter().all(|r| r.dns_name != record.dns_name));

    println!("✓ live create/list/delete passed");
}
