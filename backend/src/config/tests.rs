//! Unit tests for environment configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;

fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn expect_error(result: Result<AppConfig, ConfigError>, label: &str) -> ConfigError {
    match result {
        Ok(_) => panic!("{label}"),
        Err(error) => error,
    }
}

#[rstest]
fn debug_defaults_apply_when_environment_is_empty() {
    let config = config_from_env(&mock_env(&[]), BuildMode::Debug).expect("debug config");

    assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
    assert_eq!(config.app_env, AppEnv::Development);
    assert_eq!(config.jwt.secret.len(), EPHEMERAL_SECRET_LEN);
    assert_eq!(config.jwt.ttl, chrono::Duration::days(7));
    assert!(config.jwt.cookie_secure);
    assert_eq!(config.elasticsearch.url.as_str(), "http://localhost:9200/");
    assert_eq!(config.elasticsearch.timeout, Duration::from_secs(10));
    assert!(config.pusher.is_none());
    assert!(config.cron_secret.is_none());
    assert_eq!(
        config.sweep,
        SweepSettings {
            enabled: true,
            interval: Duration::from_secs(60)
        }
    );
    assert_eq!(config.ws_allowed_origins, ["http://localhost:3000"]);
}

#[rstest]
fn release_requires_jwt_secret() {
    let err = expect_error(
        config_from_env(&mock_env(&[]), BuildMode::Release),
        "expected missing secret to fail",
    );
    assert!(matches!(
        err,
        ConfigError::MissingEnv {
            name: JWT_SECRET_ENV
        }
    ));
}

#[rstest]
fn explicit_values_are_honoured() {
    let env = mock_env(&[
        (BIND_ADDR_ENV, "127.0.0.1:9000"),
        (APP_ENV_ENV, "production"),
        (JWT_SECRET_ENV, "super-secret"),
        (JWT_TTL_ENV, "3600"),
        (JWT_COOKIE_SECURE_ENV, "no"),
        (ES_URL_ENV, "https://search.internal:9243"),
        (ES_USERNAME_ENV, "elastic"),
        (ES_PASSWORD_ENV, "changeme"),
        (ES_TIMEOUT_ENV, "3"),
        (PUSHER_APP_ID_ENV, "42"),
        (PUSHER_KEY_ENV, "key"),
        (PUSHER_SECRET_ENV, "secret"),
        (PUSHER_CLUSTER_ENV, "ap2"),
        (CRON_SECRET_ENV, "cron-token"),
        (SWEEP_INTERVAL_ENV, "120"),
        (WS_ORIGINS_ENV, "https://app.example.com/, https://admin.example.com"),
    ]);

    let config = config_from_env(&env, BuildMode::Release).expect("release config");

    assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");
    assert_eq!(config.app_env, AppEnv::Production);
    assert_eq!(config.jwt.secret.as_slice(), b"super-secret");
    assert_eq!(config.jwt.ttl, chrono::Duration::hours(1));
    assert!(!config.jwt.cookie_secure);
    assert_eq!(config.elasticsearch.username.as_deref(), Some("elastic"));
    assert_eq!(config.elasticsearch.password.as_deref(), Some("changeme"));
    assert_eq!(config.elasticsearch.timeout, Duration::from_secs(3));
    let pusher = config.pusher.expect("pusher configured");
    assert_eq!(pusher.cluster, "ap2");
    assert_eq!(config.cron_secret.as_deref().map(String::as_str), Some("cron-token"));
    assert!(!config.sweep.enabled, "production disables the sweep by default");
    assert_eq!(config.sweep.interval, Duration::from_secs(120));
    assert_eq!(
        config.ws_allowed_origins,
        ["https://app.example.com", "https://admin.example.com"]
    );
}

#[rstest]
#[case(BuildMode::Debug, true)]
#[case(BuildMode::Release, false)]
fn partial_pusher_configuration(#[case] mode: BuildMode, #[case] tolerated: bool) {
    let env = mock_env(&[
        (JWT_SECRET_ENV, "secret"),
        (PUSHER_APP_ID_ENV, "42"),
        (PUSHER_KEY_ENV, "key"),
    ]);
    let result = config_from_env(&env, mode);
    if tolerated {
        assert!(result.expect("tolerated").pusher.is_none());
    } else {
        let err = expect_error(result, "expected partial pusher to fail");
        match err {
            ConfigError::PartialPusher { missing } => {
                assert_eq!(missing, [PUSHER_SECRET_ENV, PUSHER_CLUSTER_ENV]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_rejects_invalid_booleans(#[case] value: &str) {
    let env = mock_env(&[(JWT_SECRET_ENV, "secret"), (JWT_COOKIE_SECURE_ENV, value)]);
    let err = expect_error(
        config_from_env(&env, BuildMode::Release),
        "expected invalid boolean to fail",
    );
    assert!(matches!(
        err,
        ConfigError::InvalidEnv {
            name: JWT_COOKIE_SECURE_ENV,
            ..
        }
    ));
}

#[rstest]
fn debug_tolerates_invalid_booleans() {
    let env = mock_env(&[(SWEEP_ENABLED_ENV, "sometimes")]);
    let config = config_from_env(&env, BuildMode::Debug).expect("debug config");
    assert!(config.sweep.enabled);
}

#[rstest]
#[case(ES_TIMEOUT_ENV, "0")]
#[case(SWEEP_INTERVAL_ENV, "soon")]
#[case(BIND_ADDR_ENV, "not-an-address")]
#[case(ES_URL_ENV, "localhost")]
#[case(JWT_TTL_ENV, "31536001")]
#[case(JWT_TTL_ENV, "9000000000000")]
fn malformed_values_fail_in_any_mode(#[case] name: &'static str, #[case] value: &str) {
    let env = mock_env(&[(name, value)]);
    let err = expect_error(
        config_from_env(&env, BuildMode::Debug),
        "expected malformed value to fail",
    );
    assert!(matches!(err, ConfigError::InvalidEnv { name: actual, .. } if actual == name));
}

#[rstest]
#[case("1", Some(true))]
#[case("Yes", Some(true))]
#[case("y", Some(true))]
#[case("0", Some(false))]
#[case("FALSE", Some(false))]
#[case("n", Some(false))]
#[case("enabled", None)]
fn parses_boolean_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(raw), expected);
}

#[rstest]
fn jwt_ttl_accepts_one_year() {
    let env = mock_env(&[(JWT_SECRET_ENV, "secret"), (JWT_TTL_ENV, "31536000")]);
    let config = config_from_env(&env, BuildMode::Release).expect("release config");
    assert_eq!(config.jwt.ttl, chrono::Duration::days(365));
}

#[rstest]
fn debug_output_redacts_secret() {
    let config = config_from_env(&mock_env(&[(JWT_SECRET_ENV, "hunter2")]), BuildMode::Debug)
        .expect("config");
    assert!(!format!("{:?}", config.jwt).contains("hunter2"));
}
