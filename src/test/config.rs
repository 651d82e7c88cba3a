#[cfg(test)]
mod tests {
    use crate::config::{AuthPlugin, Backend, Config, ConfigError, PasswordStorage};
    use serial_test::serial;
    use std::path::PathBuf;

    const VARS: [&str; 9] = [
        "DB_BACKEND",
        "DB_HOST",
        "DB_PORT",
        "DB_USER",
        "DB_PASSWORD",
        "DB_AUTH_PLUGIN",
        "DB_SQLITE_PATH",
        "ADMIN_PASSWORD_STORAGE",
        "RUST_LOG",
    ];

    fn with_env<R>(set: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
        let vars: Vec<(&str, Option<&str>)> = VARS
            .iter()
            .map(|var| {
                let value = set.iter().find(|(k, _)| k == var).map(|(_, v)| *v);
                (*var, value)
            })
            .collect();
        temp_env::with_vars(vars, f)
    }

    #[test]
    #[serial]
    fn test_defaults_with_password() {
        let config = with_env(&[("DB_PASSWORD", "s3cret")], Config::from_env)
            .expect("Config should load");

        assert_eq!(config.backend, Backend::MySql);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3306);
        assert_eq!(config.user, "root");
        assert_eq!(config.password, "s3cret");
        assert_eq!(config.auth_plugin, AuthPlugin::MysqlNativePassword);
        assert_eq!(config.sqlite_path, PathBuf::from("gym_trainer.db"));
        assert_eq!(config.admin_password, PasswordStorage::Plain);
    }

    #[test]
    #[serial]
    fn test_password_is_required_for_mysql() {
        let result = with_env(&[], Config::from_env);
        assert!(matches!(result, Err(ConfigError::Missing("DB_PASSWORD"))));
    }

    #[test]
    #[serial]
    fn test_empty_password_is_accepted() {
        let config = with_env(&[("DB_PASSWORD", "")], Config::from_env).expect("Config should load");
        assert_eq!(config.password, "");
    }

    #[test]
    #[serial]
    fn test_sqlite_backend_needs_no_password() {
        let config = with_env(
            &[("DB_BACKEND", "sqlite"), ("DB_SQLITE_PATH", "/tmp/fitforge.db")],
            Config::from_env,
        )
        .expect("Config should load");

        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.sqlite_path, PathBuf::from("/tmp/fitforge.db"));
    }

    #[test]
    #[serial]
    fn test_overrides_are_parsed() {
        let config = with_env(
            &[
                ("DB_HOST", "db.internal"),
                ("DB_PORT", "3307"),
                ("DB_USER", "provisioner"),
                ("DB_PASSWORD", "pw"),
                ("DB_AUTH_PLUGIN", "mysql_native_password"),
                ("ADMIN_PASSWORD_STORAGE", "bcrypt"),
            ],
            Config::from_env,
        )
        .expect("Config should load");

        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 3307);
        assert_eq!(config.user, "provisioner");
        assert_eq!(config.auth_plugin, AuthPlugin::MysqlNativePassword);
        assert_eq!(config.admin_password, PasswordStorage::Bcrypt);
    }

    #[test]
    #[serial]
    fn test_invalid_values_are_rejected() {
        let port = with_env(&[("DB_PASSWORD", "pw"), ("DB_PORT", "abc")], Config::from_env);
        assert!(matches!(port, Err(ConfigError::Invalid { var: "DB_PORT", .. })));

        let backend = with_env(&[("DB_BACKEND", "oracle")], Config::from_env);
        assert!(matches!(backend, Err(ConfigError::Invalid { var: "DB_BACKEND", .. })));

        let plugin = with_env(
            &[("DB_PASSWORD", "pw"), ("DB_AUTH_PLUGIN", "sha256_password")],
            Config::from_env,
        );
        assert!(matches!(plugin, Err(ConfigError::Invalid { var: "DB_AUTH_PLUGIN", .. })));
    }

    #[test]
    #[serial]
    fn test_auth_plugin_that_cannot_be_pinned_is_rejected() {
        let result = with_env(
            &[("DB_PASSWORD", "pw"), ("DB_AUTH_PLUGIN", "caching_sha2_password")],
            Config::from_env,
        );
        match result {
            Err(ConfigError::Invalid { var, value }) => {
                assert_eq!(var, "DB_AUTH_PLUGIN");
                assert_eq!(value, "caching_sha2_password");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_empty_host_fails_validation() {
        let result = with_env(&[("DB_PASSWORD", "pw"), ("DB_HOST", "")], Config::from_env);
        assert!(matches!(result, Err(ConfigError::Validation(_))));

        let result = with_env(&[("DB_PASSWORD", "pw"), ("DB_PORT", "0")], Config::from_env);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut config = Config::sqlite("gym_trainer.db");
        config.password = "hunter2".to_string();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
