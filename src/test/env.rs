#[cfg(test)]
mod tests {
    use crate::env::{EnvFile, load_env_files};
    use serial_test::serial;
    use std::fs;

    #[test]
    #[serial]
    fn test_env_files_report_loaded_and_missing() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let present = dir.path().join(".env");
        let absent = dir.path().join(".secrets.env");
        fs::write(&present, "FITFORGE_ENV_HOST=db.from-file\n").expect("Failed to write env file");

        temp_env::with_var_unset("FITFORGE_ENV_HOST", || {
            let files = load_env_files(&[&present, &absent]).expect("Env files should load");

            assert_eq!(
                files,
                vec![EnvFile::Loaded(present.clone()), EnvFile::Missing(absent.clone())]
            );
            assert_eq!(
                std::env::var("FITFORGE_ENV_HOST").as_deref(),
                Ok("db.from-file")
            );
        });
    }

    #[test]
    #[serial]
    fn test_later_env_file_overrides_earlier() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let base = dir.path().join(".env");
        let secrets = dir.path().join(".secrets.env");
        fs::write(&base, "FITFORGE_ENV_PASSWORD=from-env\n").expect("Failed to write env file");
        fs::write(&secrets, "FITFORGE_ENV_PASSWORD=from-secrets\n").expect("Failed to write env file");

        temp_env::with_var_unset("FITFORGE_ENV_PASSWORD", || {
            load_env_files(&[&base, &secrets]).expect("Env files should load");
            assert_eq!(
                std::env::var("FITFORGE_ENV_PASSWORD").as_deref(),
                Ok("from-secrets")
            );
        });
    }
}
