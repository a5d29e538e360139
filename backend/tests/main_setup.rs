use petals_web::{AppConfig, config::Env};
use serial_test::serial;
use std::{env, panic};

// --- Setup/Teardown Utilities ---

const CONFIG_VARS: &[&str] = &["APP_ENV", "API_URL", "BIND_ADDR", "ASSETS_DIR", "UPLOADS_DIR"];

/// Runs a test body against a clean set of config variables and restores the
/// originals afterward, even if the body panics.
fn run_with_env<T, R>(test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals {
        unsafe {
            match original_value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_fail_fast() {
    let result = run_with_env(|| {
        panic::catch_unwind(|| {
            unsafe {
                env::set_var("APP_ENV", "production");
            }
            // API_URL is missing.
            AppConfig::load()
        })
    });

    assert!(
        result.is_err(),
        "Production config loading should panic without API_URL"
    );
}

#[test]
#[serial]
fn test_app_config_production_with_api_url() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "production");
            env::set_var("API_URL", "https://api.petalsbyyou.com/api/");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Production);
    // Trailing slash is trimmed.
    assert_eq!(config.api_base_url, "https://api.petalsbyyou.com/api");
    assert!(config.secure_cookies());
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "local");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.api_base_url, "http://localhost:5000/api");
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
    assert_eq!(config.assets_dir, "public");
    assert_eq!(config.uploads_dir, "uploads");
    assert!(!config.secure_cookies());
}

#[test]
#[serial]
fn test_app_config_local_overrides() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("API_URL", "http://api.internal:8080/api");
            env::set_var("BIND_ADDR", "127.0.0.1:4000");
            env::set_var("ASSETS_DIR", "/srv/petals/public");
        }
        AppConfig::load()
    });

    // Unset APP_ENV falls back to local.
    assert_eq!(config.env, Env::Local);
    assert_eq!(config.api_base_url, "http://api.internal:8080/api");
    assert_eq!(config.bind_addr, "127.0.0.1:4000");
    assert_eq!(config.assets_dir, "/srv/petals/public");
}
