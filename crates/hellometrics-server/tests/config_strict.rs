#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use hellometrics_server::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
server:
  listen: "0.0.0.0:8000"
metrics:
  latency_bucketz: [0.1] # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:8000");
    assert_eq!(cfg.metrics.buckets().unwrap().len(), 14);
    assert_eq!(cfg.metrics.metric_name("request_count"), "request_count");
}

#[test]
fn namespace_prefixes_metric_names() {
    let cfg = config::load_from_str(
        r#"
version: 1
metrics:
  namespace: "fastapi"
  latency_buckets: [0.1, 1.0]
"#,
    )
    .expect("must parse");
    assert_eq!(cfg.metrics.metric_name("request_count"), "fastapi_request_count");
    assert_eq!(cfg.metrics.buckets().unwrap().bounds(), &[0.1, 1.0]);
}

#[test]
fn rejects_unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn rejects_bad_values() {
    for bad in [
        "version: 1\nserver:\n  listen: \"not-an-addr\"\n",
        "version: 1\nmetrics:\n  latency_buckets: []\n",
        "version: 1\nmetrics:\n  latency_buckets: [1.0, 0.5]\n",
        "version: 1\nmetrics:\n  namespace: \"my-app\"\n",
    ] {
        let err = config::load_from_str(bad).expect_err(bad);
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST", "{bad}");
    }
}

#[test]
fn missing_explicit_file_is_an_error() {
    let err = config::load(Some("/nonexistent/hellometrics.yaml".into())).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INTERNAL");
}
