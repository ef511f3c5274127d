use super::*;

// =============================================================================
// from_values
// =============================================================================

#[test]
fn missing_values_use_defaults() {
    let config = HostConfig::from_values(None, None).unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.host, DEFAULT_HOST);
    assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
}

#[test]
fn blank_values_use_defaults() {
    assert_eq!(HostConfig::from_values(Some("  "), Some("")).unwrap().port, DEFAULT_PORT);
}

#[test]
fn explicit_values_are_parsed() {
    let config = HostConfig::from_values(Some("127.0.0.1"), Some("8080")).unwrap();
    assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
}

#[test]
fn invalid_values_are_errors() {
    assert_eq!(HostConfig::from_values(None, Some("http")), Err(ConfigError::InvalidPort("http".into())));
    assert_eq!(HostConfig::from_values(Some("localhost:1"), None), Err(ConfigError::InvalidHost("localhost:1".into())));
}

// =============================================================================
// from_env: env manipulation requires unsafe in edition 2024.
// =============================================================================

#[test]
fn from_env_reads_host_and_port() {
    unsafe {
        std::env::set_var("HOST", "127.0.0.1");
        std::env::set_var("PORT", "4100");
    }
    let config = HostConfig::from_env();
    unsafe {
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");
    }
    assert_eq!(config.unwrap().socket_addr().to_string(), "127.0.0.1:4100");
}
