use std::env;
use std::time::Duration;

use keyauth::settings::ServerSettings;

#[test]
fn test_server_settings_from_env() {
    // Save original environment variables
    let original_port = env::var("PORT").ok();
    let original_ttl = env::var("SECRET_TTL_SECS").ok();
    let original_suffix = env::var("AUTH_DOMAIN_SUFFIX").ok();

    // Test with environment variables
    env::set_var("PORT", "9100");
    env::set_var("SECRET_TTL_SECS", "120");
    env::set_var("AUTH_DOMAIN_SUFFIX", "golos");
    let settings = ServerSettings::from_env().unwrap();
    assert_eq!(settings.port, 9100);
    assert_eq!(settings.secret_ttl, Some(Duration::from_secs(120)));
    assert_eq!(settings.domain_suffix, "golos");

    // Zero TTL disables expiry
    env::set_var("SECRET_TTL_SECS", "0");
    let settings = ServerSettings::from_env().unwrap();
    assert_eq!(settings.secret_ttl, None);

    // Invalid port is a startup error
    env::set_var("PORT", "not-a-port");
    assert!(ServerSettings::from_env().is_err());

    // Without environment variables the defaults apply
    env::remove_var("PORT");
    env::remove_var("SECRET_TTL_SECS");
    env::remove_var("AUTH_DOMAIN_SUFFIX");
    let settings = ServerSettings::from_env().unwrap();
    assert_eq!(settings.port, 8080);
    assert_eq!(settings.domain_suffix, "commun");

    // Restore original environment variables
    for (name, value) in [
        ("PORT", original_port),
        ("SECRET_TTL_SECS", original_ttl),
        ("AUTH_DOMAIN_SUFFIX", original_suffix),
    ] {
        if let Some(val) = value {
            env::set_var(name, val);
        }
    }
}
