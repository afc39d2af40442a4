//! Default configuration lookup. Kept in its own test binary because it changes
//! the working directory and the `TOKENISTA_*` environment.

use std::env;
use std::fs;
use std::path::Path;
use tokenista::{try_load_default_config, Algorithm, Tokenista};

const ENV_VARS: [&str; 6] = [
    "TOKENISTA_SECRET",
    "TOKENISTA_SECRET_FILE",
    "TOKENISTA_OLD_SECRETS",
    "TOKENISTA_OLD_SECRETS_FILE",
    "TOKENISTA_LIFETIME",
    "TOKENISTA_ALGORITHM",
];

fn clear_env() {
    for name in ENV_VARS {
        env::remove_var(name);
    }
}

fn home_or_system_json_config() -> bool {
    let home = dirs::home_dir()
        .map(|home| home.join(".tokenista/config.json").exists())
        .unwrap_or(false);
    home || Path::new("/etc/tokenista/config.json").exists()
}

#[test]
fn test_default_config_lookup_order() {
    let original_dir = env::current_dir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    clear_env();

    fs::write(
        dir.path().join("tokenista.json"),
        r#"{"secret": "json-secret", "lifetime": 600, "algorithm": "sha256"}"#,
    )
    .unwrap();
    #[cfg(feature = "toml")]
    fs::write(
        dir.path().join("tokenista.toml"),
        "secret = \"toml-secret\"\nlifetime = 900\n",
    )
    .unwrap();

    // no environment: ./tokenista.json is found before any TOML file
    let config = try_load_default_config().unwrap();
    assert_eq!(config.secret, "json-secret");
    assert_eq!(config.lifetime, 600);
    assert_eq!(config.algorithm, Algorithm::Sha256);

    // environment wins over files
    env::set_var("TOKENISTA_SECRET", "env-secret");
    let tokenista = Tokenista::from_default_config().unwrap();
    assert_eq!(tokenista.config().secret, "env-secret");
    assert_eq!(tokenista.config().algorithm, Algorithm::Sha1);

    // a broken environment is skipped in favour of the next source
    env::set_var("TOKENISTA_LIFETIME", "junk");
    let config = try_load_default_config().unwrap();
    assert_eq!(config.secret, "json-secret");
    clear_env();

    // a broken JSON file is skipped too
    fs::write(dir.path().join("tokenista.json"), "{ not json").unwrap();
    let config = try_load_default_config();
    #[cfg(feature = "toml")]
    if !home_or_system_json_config() {
        let config = config.unwrap();
        assert_eq!(config.secret, "toml-secret");
        assert_eq!(config.lifetime, 900);
    }
    #[cfg(not(feature = "toml"))]
    if !home_or_system_json_config() {
        assert!(config.is_none());
    }

    env::set_current_dir(original_dir).unwrap();
}
