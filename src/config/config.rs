use home_dir::HomeDirExt;
use std::{io::Write, path::PathBuf, time::Duration};

use anyhow::{anyhow, Context, Result};

use super::app_config::AppConfig;
use crate::{
    reconcile::StalePolicy,
    youtube::{auth::OAuthClient, retry::RetryPolicy},
};

pub struct Config {
    config_file: PathBuf,
    app_config: AppConfig,
}

impl Config {
    pub fn new_from_file(config_path: Option<String>) -> Result<Config> {
        if let Some(config_path) = config_path {
            let config_path = expand(&config_path)?;

            Config::new(config_path)
        } else {
            Config::new_default()
        }
    }

    pub fn new_default() -> Result<Config> {
        let config_directory_root =
            std::env::var("XDG_CONFIG_HOME").unwrap_or("~/.config".to_string());

        let config_directory = expand(&config_directory_root)?.join("ka-links");
        let config_file = config_directory.join("config.toml");

        Config::new(config_file)
    }

    fn new(config_file: PathBuf) -> Result<Config> {
        if let Some(parent) = config_file.parent() {
            ensure_dir(&parent.to_path_buf())?;
        }

        let app_config: AppConfig = {
            let file_content = ensure_file(
                &config_file,
                toml::to_string_pretty(&AppConfig::new_default())?,
            )?;

            toml::from_str(&file_content)
                .with_context(|| format!("Cannot parse \"{}\"", config_file.display()))?
        };

        Ok(Config {
            config_file,
            app_config,
        })
    }

    pub fn get_config_file(&self) -> &PathBuf {
        &self.config_file
    }

    pub fn get_oauth_client(&self) -> OAuthClient {
        OAuthClient {
            client_id: self.app_config.client_id.clone(),
            client_secret: self.app_config.client_secret.clone(),
        }
    }

    pub fn get_refresh_token(&self) -> &str {
        &self.app_config.refresh_token
    }

    pub fn get_developer_key(&self) -> &str {
        &self.app_config.developer_key
    }

    pub fn get_catalog_host(&self) -> &str {
        &self.app_config.catalog_host
    }

    pub fn get_partner_name(&self) -> &str {
        &self.app_config.partner_name
    }

    pub fn get_request_delay(&self) -> Duration {
        Duration::from_millis(self.app_config.request_delay_ms)
    }

    pub fn get_retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.app_config.retry_attempts,
            unit: Duration::from_millis(self.app_config.retry_unit_ms),
        }
    }

    /// `--remove-stale` on the command line wins over the file.
    pub fn get_stale_policy(&self, remove_stale_flag: bool) -> StalePolicy {
        if remove_stale_flag || self.app_config.remove_stale {
            StalePolicy::Remove
        } else {
            StalePolicy::Keep
        }
    }

    pub fn get_extra_ids_file(&self) -> Result<Option<PathBuf>> {
        self.app_config
            .extra_ids_file
            .as_ref()
            .map(|f| expand(f))
            .transpose()
    }

    /// Only what the authorization flow needs.
    pub fn validate_client(&self) -> Result<()> {
        for (name, value) in [
            ("client_id", &self.app_config.client_id),
            ("client_secret", &self.app_config.client_secret),
        ] {
            if value.trim().is_empty() {
                return Err(anyhow!(
                    "Given {} is empty (config file path: \"{}\")",
                    name,
                    self.config_file.display()
                ));
            }
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_client()?;

        for (name, value) in [
            ("refresh_token", &self.app_config.refresh_token),
            ("developer_key", &self.app_config.developer_key),
        ] {
            if value.trim().is_empty() {
                return Err(anyhow!(
                    "Given {} is empty (config file path: \"{}\"), run `ka-links authorize` to obtain one",
                    name,
                    self.config_file.display()
                ));
            }
        }

        if self.app_config.retry_attempts == 0 {
            return Err(anyhow!(
                "Given retry_attempts must be at least 1 (config file path: \"{}\")",
                self.config_file.display()
            ));
        }

        if let Some(extra_ids_file) = self.get_extra_ids_file()? {
            if !extra_ids_file.exists() {
                return Err(anyhow!(
                    "Given extra_ids_file (\"{}\") doesn't exist (config file path: \"{}\")",
                    extra_ids_file.display(),
                    self.config_file.display()
                ));
            }
        }

        Ok(())
    }
}

fn expand(path: &String) -> Result<PathBuf> {
    path.expand_home()
        .map_err(|_| anyhow!("Cannot expand home directory in \"{}\"", path))
}

fn ensure_dir(dir: &PathBuf) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    Ok(())
}

fn ensure_file(file_path: &PathBuf, default: String) -> Result<String> {
    if !file_path.exists() {
        let mut file = std::fs::File::create(file_path)?;
        file.write_all(default.as_bytes())?;
        Ok(default)
    } else {
        Ok(std::fs::read_to_string(file_path)?)
    }
}

#[cfg(test)]
mod validation {
    use std::path::PathBuf;

    use crate::{config::app_config::AppConfig, reconcile::StalePolicy};

    use super::Config;

    fn complete() -> AppConfig {
        AppConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            refresh_token: "refresh".to_string(),
            developer_key: "key".to_string(),
            ..AppConfig::new_default()
        }
    }

    fn config(app_config: AppConfig) -> Config {
        Config {
            config_file: PathBuf::new(),
            app_config,
        }
    }

    #[test]
    fn it_should_reject_default_config() {
        let config = config(AppConfig::new_default());

        assert!(config.validate_client().is_err());
        assert!(config.validate().is_err());
    }

    #[test]
    fn it_should_reject_missing_refresh_token() {
        let config = config(AppConfig {
            refresh_token: " ".to_string(),
            ..complete()
        });

        assert!(config.validate_client().is_ok());
        assert!(config.validate().is_err());
    }

    #[test]
    fn it_should_reject_zero_retry_attempts() {
        let config = config(AppConfig {
            retry_attempts: 0,
            ..complete()
        });

        assert!(config.validate().is_err());
    }

    #[test]
    fn it_should_reject_not_existing_extra_ids_file() {
        let config = config(AppConfig {
            extra_ids_file: Some("/foobar/ids.txt".to_string()),
            ..complete()
        });

        assert!(config.validate().is_err());
    }

    #[test]
    fn it_should_accept_correct_config() {
        let config = config(AppConfig {
            extra_ids_file: Some("/tmp".to_string()),
            ..complete()
        });

        assert!(config.validate().is_ok());
    }

    #[test]
    fn it_should_let_flag_enable_stale_removal() {
        let config = config(complete());

        assert_eq!(config.get_stale_policy(false), StalePolicy::Keep);
        assert_eq!(config.get_stale_policy(true), StalePolicy::Remove);

        let config = super::Config {
            config_file: PathBuf::new(),
            app_config: AppConfig {
                remove_stale: true,
                ..complete()
            },
        };
        assert_eq!(config.get_stale_policy(false), StalePolicy::Remove);
    }

    #[test]
    fn it_should_create_default_file_and_read_it_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::new_from_file(Some(path.display().to_string())).unwrap();

        assert!(path.exists());
        assert_eq!(config.get_catalog_host(), "khanacademy.org");
        assert_eq!(config.get_retry_policy().max_attempts, 8);
        assert!(config.validate().is_err());
    }

    #[test]
    fn it_should_fill_defaults_for_omitted_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "client_id = \"id\"\nclient_secret = \"s\"\nrefresh_token = \"r\"\ndeveloper_key = \"k\"\n",
        )
        .unwrap();

        let config = Config::new_from_file(Some(path.display().to_string())).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.get_request_delay().as_millis(), 1000);
        assert_eq!(
            config.get_partner_name(),
            "Monterey Institute for Technology and Education"
        );
    }
}
