use super::*;
use secrecy::SecretString;
use sfddl_core::RawConfig;
use std::ffi::c_char;

fn config(auth_mode: &str, login_timeout_secs: Option<u64>) -> ConnectionConfig {
    RawConfig {
        auth_mode: Some(auth_mode.to_string()),
        username: Some("loader".to_string()),
        password: Some(SecretString::new("pw".to_string())),
        okta_url: Some("https://org.okta.com".to_string()),
        account: Some("acct1".to_string()),
        warehouse: Some("wh1".to_string()),
        database: Some("db1".to_string()),
        schema: Some("sch1".to_string()),
        login_timeout_secs,
        statements: vec!["SHOW WAREHOUSES".to_string()],
        ..Default::default()
    }
    .resolve()
    .unwrap()
}

fn value_of<'a>(opts: &'a [(DriverOption, String)], key: &DriverOption) -> Option<&'a str> {
    opts.iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[test]
fn test_snowflake_options() {
    let opts = driver_options(&config("snowflake", None));

    assert_eq!(value_of(&opts, &DriverOption::Named(ACCOUNT)), Some("acct1"));
    assert_eq!(value_of(&opts, &DriverOption::Named(WAREHOUSE)), Some("wh1"));
    assert_eq!(value_of(&opts, &DriverOption::Named(DATABASE)), Some("db1"));
    assert_eq!(value_of(&opts, &DriverOption::Named(SCHEMA)), Some("sch1"));
    assert_eq!(
        value_of(&opts, &DriverOption::Named(AUTH_TYPE)),
        Some(auth_type::DEFAULT)
    );
    assert_eq!(value_of(&opts, &DriverOption::Username), Some("loader"));
    assert_eq!(value_of(&opts, &DriverOption::Password), Some("pw"));
    assert_eq!(
        value_of(&opts, &DriverOption::Named(OCSP_FAIL_OPEN_MODE)),
        Some("true")
    );
    // Okta URL belongs to the inactive mode and is not sent.
    assert!(value_of(&opts, &DriverOption::Named(AUTH_OKTA_URL)).is_none());
    assert!(value_of(&opts, &DriverOption::Named(LOGIN_TIMEOUT)).is_none());
}

#[test]
fn test_okta_options() {
    let opts = driver_options(&config("okta", None));

    assert_eq!(
        value_of(&opts, &DriverOption::Named(AUTH_TYPE)),
        Some(auth_type::OKTA)
    );
    assert_eq!(
        value_of(&opts, &DriverOption::Named(AUTH_OKTA_URL)),
        Some("https://org.okta.com")
    );
    assert_eq!(value_of(&opts, &DriverOption::Named(ACCOUNT)), Some("acct1"));
}

#[test]
fn test_okta_without_login_sends_no_credentials() {
    let config = RawConfig {
        auth_mode: Some("okta".to_string()),
        okta_url: Some("https://org.okta.com".to_string()),
        account: Some("acct1".to_string()),
        warehouse: Some("wh1".to_string()),
        database: Some("db1".to_string()),
        schema: Some("sch1".to_string()),
        statements: vec!["SHOW WAREHOUSES".to_string()],
        ..Default::default()
    }
    .resolve()
    .unwrap();

    let opts = driver_options(&config);
    assert!(value_of(&opts, &DriverOption::Username).is_none());
    assert!(value_of(&opts, &DriverOption::Password).is_none());
}

#[test]
fn test_login_timeout_is_passed_through() {
    let opts = driver_options(&config("snowflake", Some(45)));
    assert_eq!(
        value_of(&opts, &DriverOption::Named(LOGIN_TIMEOUT)),
        Some("45s")
    );
}

#[test]
fn test_describe_plain_error() {
    let err = AdbcError::with_message_and_status("network unreachable", Status::IO);
    assert_eq!(describe_adbc_error(&err), "network unreachable");
}

#[test]
fn test_describe_error_with_vendor_code() {
    let mut err = AdbcError::with_message_and_status(
        "Incorrect username or password",
        Status::Unauthenticated,
    );
    err.vendor_code = 390100;
    err.sqlstate = b"08004".map(|b| b as c_char);
    assert_eq!(
        describe_adbc_error(&err),
        "Error 390100 (08004): Incorrect username or password"
    );
}

#[test]
fn test_connect_error_classification() {
    let auth = AdbcError::with_message_and_status("bad password", Status::Unauthenticated);
    assert!(matches!(connect_error(auth), DbError::AuthError(_)));

    let denied = AdbcError::with_message_and_status("okta denied", Status::Unauthorized);
    assert!(matches!(connect_error(denied), DbError::AuthError(_)));

    let io = AdbcError::with_message_and_status("no route to host", Status::IO);
    assert!(matches!(connect_error(io), DbError::ConnectionError(_)));

    let timeout = AdbcError::with_message_and_status("login timed out", Status::Timeout);
    assert!(matches!(connect_error(timeout), DbError::ConnectionError(_)));
}

fn driver_error(message: &str, vendor_code: i32, sqlstate: &[u8; 5]) -> AdbcError {
    // Shape produced by the Snowflake driver: login failures arrive as IO.
    let mut err = AdbcError::with_message_and_status(message, Status::IO);
    err.vendor_code = vendor_code;
    err.sqlstate = sqlstate.map(|b| b as c_char);
    err
}

#[test]
fn test_rejected_login_reported_as_io_is_auth_error() {
    let wrong_password = driver_error(
        "390100 (08004): Incorrect username or password was specified.",
        390100,
        b"08004",
    );
    match connect_error(wrong_password) {
        DbError::AuthError(message) => assert!(message.starts_with("Error 390100 (08004)")),
        other => panic!("expected AuthError, got {other:?}"),
    }

    let okta = driver_error("390190 (08004): SAML response is invalid", 390190, b"08004");
    assert!(matches!(connect_error(okta), DbError::AuthError(_)));

    let token = driver_error("OAuth access token expired", 390318, b"08004");
    assert!(matches!(connect_error(token), DbError::AuthError(_)));

    let sqlstate_only = driver_error("invalid authorization", 0, b"28000");
    assert!(matches!(connect_error(sqlstate_only), DbError::AuthError(_)));
}

#[test]
fn test_io_failure_outside_login_codes_is_connection_error() {
    let unreachable = driver_error("could not connect to account", 260008, b"08001");
    assert!(matches!(connect_error(unreachable), DbError::ConnectionError(_)));

    let rejected = driver_error("server rejected the connection", 0, b"08004");
    assert!(matches!(connect_error(rejected), DbError::ConnectionError(_)));
}

#[tokio::test]
async fn test_missing_driver_library() {
    let connector = SnowflakeConnector::with_driver_library("sfddl_no_such_driver");
    assert_eq!(connector.db_type(), "snowflake");

    let result = connector.connect(&config("snowflake", None)).await;
    assert!(matches!(result, Err(DbError::DriverLoad(_))));
}
