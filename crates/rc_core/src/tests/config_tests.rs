use std::{
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

use rc_shared::domain::Action;

use super::*;
use crate::profile::Key;

fn sources(vars: &[(&str, &str)]) -> ConfigSources {
    ConfigSources {
        env: vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        build_secret: None,
        build_endpoint: None,
    }
}

#[test]
fn missing_secret_is_fatal() {
    let err = load_settings_from(&sources(&[]), &SettingsOverrides::default())
        .expect_err("must refuse to start");
    assert!(matches!(err, ConfigError::MissingSharedSecret));
    assert!(err.to_string().contains("SOCKET_SHARED_SECRET"));
}

#[test]
fn empty_secret_counts_as_missing() {
    let err = load_settings_from(
        &sources(&[("SOCKET_SHARED_SECRET", "")]),
        &SettingsOverrides::default(),
    )
    .expect_err("empty secret");
    assert!(matches!(err, ConfigError::MissingSharedSecret));
}

#[test]
fn secret_lookup_order() {
    let mut src = sources(&[("APP__SOCKET_SHARED_SECRET", "from-app")]);
    src.build_secret = Some("from-build".to_string());
    assert_eq!(resolve_shared_secret(&src).expect("secret").expose(), "from-app");

    src.env
        .insert("SOCKET_SHARED_SECRET".to_string(), "from-env".to_string());
    assert_eq!(resolve_shared_secret(&src).expect("secret").expose(), "from-env");

    src.env.clear();
    assert_eq!(
        resolve_shared_secret(&src).expect("secret").expose(),
        "from-build"
    );
}

#[test]
fn secret_debug_is_redacted() {
    let secret = SharedSecret::new("hunter2").expect("secret");
    let printed = format!("{secret:?}");
    assert!(!printed.contains("hunter2"));
}

#[test]
fn explicit_profile_path_must_exist() {
    let settings = load_settings_from(
        &sources(&[("SOCKET_SHARED_SECRET", "s3cret")]),
        &SettingsOverrides {
            profile: Some(PathBuf::from("/nonexistent/deployment.toml")),
            ..SettingsOverrides::default()
        },
    );
    assert!(matches!(settings, Err(ConfigError::ProfileRead { .. })));
}

#[test]
fn build_time_endpoint_and_default_tables() {
    let mut src = sources(&[("SOCKET_SHARED_SECRET", "s3cret")]);
    src.build_endpoint = Some("ws://actuator.local:9000".to_string());
    let settings = load_settings_from(&src, &SettingsOverrides::default()).expect("settings");
    assert_eq!(settings.endpoint.as_str(), "ws://actuator.local:9000/");
    assert_eq!(settings.profile, ControlProfile::default());
}

#[test]
fn endpoint_precedence_and_validation() {
    let src = sources(&[
        ("SOCKET_SHARED_SECRET", "s3cret"),
        ("APP__ENDPOINT", "ws://from-app:1"),
        ("RC_ENDPOINT", "ws://from-env:2"),
    ]);
    let settings = load_settings_from(&src, &SettingsOverrides::default()).expect("settings");
    assert_eq!(settings.endpoint.host_str(), Some("from-env"));

    let overrides = SettingsOverrides {
        endpoint: Some("wss://from-cli:3".to_string()),
        ..SettingsOverrides::default()
    };
    let settings = load_settings_from(&src, &overrides).expect("settings");
    assert_eq!(settings.endpoint.host_str(), Some("from-cli"));

    let err = parse_endpoint("http://example.com").expect_err("scheme");
    assert!(matches!(err, ConfigError::InvalidEndpoint { .. }));
    assert!(parse_endpoint("not a url").is_err());
    assert!(parse_endpoint(DEFAULT_ENDPOINT).is_ok());
}

#[test]
fn profile_file_and_keymap_override() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("rc_controller_profile_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("deployment.toml");
    fs::write(
        &path,
        "drive_envelope_ms = 4000\n[fire]\nenvelope_ms = 900\nloops = 2\n",
    )
    .expect("write profile");

    let src = sources(&[
        ("SOCKET_SHARED_SECRET", "s3cret"),
        ("RC_PROFILE", path.to_string_lossy().as_ref()),
    ]);
    let settings = load_settings_from(&src, &SettingsOverrides::default()).expect("settings");
    assert_eq!(settings.profile.drive_envelope_ms, 4000);
    assert_eq!(settings.profile.fire.loops, 2);
    assert_eq!(
        settings.profile.keys.resolve(&Key::char('f')),
        Some(Action::Fire)
    );

    let overrides = SettingsOverrides {
        keymap: Some(KeymapPreset::DriveOnly),
        ..SettingsOverrides::default()
    };
    let settings = load_settings_from(&src, &overrides).expect("settings");
    assert_eq!(settings.profile.keys.resolve(&Key::char('f')), None);
    assert_eq!(settings.profile.drive_envelope_ms, 4000);

    fs::write(&path, "drive_envelope_ms = \"soon\"\n").expect("rewrite profile");
    let err = load_settings_from(&src, &SettingsOverrides::default()).expect_err("parse");
    assert!(matches!(err, ConfigError::ProfileParse(_)));

    fs::remove_dir_all(temp_root).expect("cleanup");
}
