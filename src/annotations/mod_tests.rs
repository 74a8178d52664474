// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `annotations/mod.rs`

use super::*;
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

fn ingress_with(pairs: &[(&str, &str)]) -> Ingress {
    Ingress {
        metadata: ObjectMeta {
            name: Some("web".to_string()),
            namespace: Some("default".to_string()),
            annotations: Some(
                pairs
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn test_no_annotations_extracts_nothing() {
    let ing = Ingress::default();
    assert!(extract_location_annotations(&ing).is_empty());

    let ing = ingress_with(&[("kubernetes.io/ingress.class", "nginx")]);
    assert!(extract_location_annotations(&ing).is_empty());
}

#[test]
fn test_rewrite_group_uses_defaults_for_unset_members() {
    let ing = ingress_with(&[(REWRITE_TARGET_ANNOTATION, "/api")]);
    let extracted = extract_location_annotations(&ing);

    assert_eq!(
        extracted.get(REWRITE_FIELD),
        Some(&AnnotationValue::Rewrite(Rewrite {
            target: "/api".to_string(),
            add_base_url: false,
            ssl_redirect: true,
            force_ssl_redirect: false,
            app_root: String::new(),
        }))
    );
}

#[test]
fn test_rewrite_group_reads_all_members() {
    let ing = ingress_with(&[
        (ADD_BASE_URL_ANNOTATION, "true"),
        (SSL_REDIRECT_ANNOTATION, "false"),
        (FORCE_SSL_REDIRECT_ANNOTATION, "true"),
        (APP_ROOT_ANNOTATION, "/app"),
    ]);
    let extracted = extract_location_annotations(&ing);

    let Some(AnnotationValue::Rewrite(rewrite)) = extracted.get(REWRITE_FIELD) else {
        panic!("expected rewrite override, got {extracted:?}");
    };
    assert!(rewrite.target.is_empty());
    assert!(rewrite.add_base_url);
    assert!(!rewrite.ssl_redirect);
    assert!(rewrite.force_ssl_redirect);
    assert_eq!(rewrite.app_root, "/app");
}

#[test]
fn test_invalid_rewrite_member_skips_group_only() {
    let ing = ingress_with(&[
        (REWRITE_TARGET_ANNOTATION, "/api"),
        (SSL_REDIRECT_ANNOTATION, "sometimes"),
        (LIMIT_RPS_ANNOTATION, "5"),
    ]);
    let extracted = extract_location_annotations(&ing);

    assert!(!extracted.contains_key(REWRITE_FIELD));
    assert!(!extracted.contains_key(DENIED_KEY_NAME));
    assert!(extracted.contains_key(RATE_LIMIT_FIELD));
}

#[test]
fn test_permanent_redirect_wins_over_temporal() {
    let ing = ingress_with(&[
        (PERMANENT_REDIRECT_ANNOTATION, "https://new.example.com"),
        (TEMPORAL_REDIRECT_ANNOTATION, "https://tmp.example.com"),
    ]);
    let extracted = extract_location_annotations(&ing);

    assert_eq!(
        extracted.get(REDIRECT_FIELD),
        Some(&AnnotationValue::Redirect(Redirect {
            url: "https://new.example.com".to_string(),
            code: 301,
            from_to_www: false,
        }))
    );
}

#[test]
fn test_temporal_redirect_and_www() {
    let ing = ingress_with(&[
        (TEMPORAL_REDIRECT_ANNOTATION, "https://tmp.example.com"),
        (FROM_TO_WWW_REDIRECT_ANNOTATION, "true"),
    ]);
    let extracted = extract_location_annotations(&ing);

    assert_eq!(
        extracted.get(REDIRECT_FIELD),
        Some(&AnnotationValue::Redirect(Redirect {
            url: "https://tmp.example.com".to_string(),
            code: 302,
            from_to_www: true,
        }))
    );
}

#[test]
fn test_rate_limit_group() {
    let ing = ingress_with(&[
        (LIMIT_CONNECTIONS_ANNOTATION, "3"),
        (LIMIT_RPM_ANNOTATION, "600"),
    ]);
    let extracted = extract_location_annotations(&ing);

    assert_eq!(
        extracted.get(RATE_LIMIT_FIELD),
        Some(&AnnotationValue::RateLimit(RateLimit {
            connections: 3,
            rps: 0,
            rpm: 600,
        }))
    );
}

#[test]
fn test_negative_rate_limit_is_ignored() {
    let ing = ingress_with(&[(LIMIT_RPS_ANNOTATION, "-1")]);
    assert!(extract_location_annotations(&ing).is_empty());
}

#[test]
fn test_proxy_group() {
    let ing = ingress_with(&[
        (PROXY_READ_TIMEOUT_ANNOTATION, "120"),
        (PROXY_BODY_SIZE_ANNOTATION, "8m"),
    ]);
    let extracted = extract_location_annotations(&ing);

    assert_eq!(
        extracted.get(PROXY_FIELD),
        Some(&AnnotationValue::Proxy(ProxyConfig {
            connect_timeout_secs: 0,
            send_timeout_secs: 0,
            read_timeout_secs: 120,
            body_size: "8m".to_string(),
        }))
    );
}

#[test]
fn test_scalar_overrides() {
    let ing = ingress_with(&[
        (SECURE_BACKENDS_ANNOTATION, "true"),
        (USE_PORT_IN_REDIRECTS_ANNOTATION, "false"),
        (CONFIGURATION_SNIPPET_ANNOTATION, "more_set_headers \"X: y\";"),
    ]);
    let extracted = extract_location_annotations(&ing);

    assert_eq!(
        extracted.get(SECURE_UPSTREAM_FIELD),
        Some(&AnnotationValue::Bool(true))
    );
    assert_eq!(
        extracted.get(USE_PORT_IN_REDIRECTS_FIELD),
        Some(&AnnotationValue::Bool(false))
    );
    assert_eq!(
        extracted.get(CONFIGURATION_SNIPPET_FIELD),
        Some(&AnnotationValue::Text("more_set_headers \"X: y\";".to_string()))
    );
}

#[test]
fn test_valid_whitelist() {
    let ing = ingress_with(&[(
        WHITELIST_SOURCE_RANGE_ANNOTATION,
        "10.0.0.0/8, 192.168.1.10,2001:db8::/32",
    )]);
    let extracted = extract_location_annotations(&ing);

    assert_eq!(
        extracted.get(WHITELIST_FIELD),
        Some(&AnnotationValue::Whitelist(SourceRange {
            cidrs: vec![
                "10.0.0.0/8".to_string(),
                "192.168.1.10/32".to_string(),
                "2001:db8::/32".to_string(),
            ],
        }))
    );
    assert!(!extracted.contains_key(DENIED_KEY_NAME));
}

#[test]
fn test_invalid_whitelist_denies_location() {
    let ing = ingress_with(&[(WHITELIST_SOURCE_RANGE_ANNOTATION, "10.0.0.0/8,10.0.0.300/24")]);
    let extracted = extract_location_annotations(&ing);

    assert!(!extracted.contains_key(WHITELIST_FIELD));
    let Some(AnnotationValue::Denied(denied)) = extracted.get(DENIED_KEY_NAME) else {
        panic!("expected denial, got {extracted:?}");
    };
    assert!(denied.is_denied());
    assert!(denied.reason().unwrap_or_default().contains("10.0.0.300/24"));
}

#[test]
fn test_whitelist_prefix_out_of_range_denies_location() {
    let ing = ingress_with(&[(WHITELIST_SOURCE_RANGE_ANNOTATION, "10.0.0.0/33")]);
    let extracted = extract_location_annotations(&ing);

    assert!(matches!(
        extracted.get(DENIED_KEY_NAME),
        Some(AnnotationValue::Denied(Denied::Reason(_)))
    ));
}

#[test]
fn test_whitelist_normalizes_host_bits() {
    let ing = ingress_with(&[(WHITELIST_SOURCE_RANGE_ANNOTATION, "10.1.2.3/8")]);
    let extracted = extract_location_annotations(&ing);

    assert_eq!(
        extracted.get(WHITELIST_FIELD),
        Some(&AnnotationValue::Whitelist(SourceRange {
            cidrs: vec!["10.0.0.0/8".to_string()],
        }))
    );
}

#[test]
fn test_whitelist_signed_prefix_denies_location() {
    let ing = ingress_with(&[(WHITELIST_SOURCE_RANGE_ANNOTATION, "10.0.0.0/+8")]);
    let extracted = extract_location_annotations(&ing);

    assert!(!extracted.contains_key(WHITELIST_FIELD));
    let Some(AnnotationValue::Denied(denied)) = extracted.get(DENIED_KEY_NAME) else {
        panic!("expected denial, got {extracted:?}");
    };
    assert!(denied.reason().unwrap_or_default().contains("10.0.0.0/+8"));
}

#[test]
fn test_whitelist_zero_padded_prefix_denies_location() {
    let ing = ingress_with(&[(WHITELIST_SOURCE_RANGE_ANNOTATION, "10.0.0.0/08")]);
    let extracted = extract_location_annotations(&ing);

    assert!(!extracted.contains_key(WHITELIST_FIELD));
    assert!(matches!(
        extracted.get(DENIED_KEY_NAME),
        Some(AnnotationValue::Denied(Denied::Reason(_)))
    ));
}

#[test]
fn test_parse_cidr() {
    assert!(parse_cidr("0.0.0.0/0").is_ok());
    assert!(parse_cidr("fe80::1/128").is_ok());
    assert_eq!(parse_cidr("192.168.1.10").unwrap().to_string(), "192.168.1.10/32");
    assert!(parse_cidr("fe80::1/129").is_err());
    assert!(parse_cidr("10.0.0.1/x").is_err());
    assert!(parse_cidr("10.0.0.0/+8").is_err());
    assert!(parse_cidr("10.0.0.0/-8").is_err());
    assert!(parse_cidr("10.0.0.0/08").is_err());
    assert!(parse_cidr("10.0.0.0/").is_err());
    assert!(parse_cidr("not-an-ip").is_err());
}

#[test]
fn test_value_kinds() {
    assert_eq!(AnnotationValue::Bool(true).kind(), "bool");
    assert_eq!(AnnotationValue::Text(String::new()).kind(), "text");
    assert_eq!(AnnotationValue::Denied(Denied::Allowed).kind(), "denied");
}
