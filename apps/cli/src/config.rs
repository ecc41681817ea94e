//! 服务器连接配置 (环境变量)

use std::fmt;

use zmb_core::{MapBuilderError, Result};

pub const ENV_URL: &str = "ZABBIX_URL";
pub const ENV_USER: &str = "ZABBIX_USER";
pub const ENV_PASSWORD: &str = "ZABBIX_PWD";

/// Zabbix 服务器地址与凭据
#[derive(Clone)]
pub struct ServerConfig {
    pub url: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"<masked>")
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过 `lookup` 读取变量，缺失或为空都视为错误
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| {
                    MapBuilderError::config(format!(
                        "required environment variable '{key}' is not set"
                    ))
                })
        };

        Ok(Self {
            url: read(ENV_URL)?,
            user: read(ENV_USER)?,
            password: read(ENV_PASSWORD)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_lookup() {
        let vars = env(&[
            (ENV_URL, "http://zabbix/api_jsonrpc.php"),
            (ENV_USER, "Admin"),
            (ENV_PASSWORD, "zabbix"),
        ]);
        let config = ServerConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.url, "http://zabbix/api_jsonrpc.php");
        assert_eq!(config.user, "Admin");
        assert_eq!(config.password, "zabbix");
    }

    #[test]
    fn test_missing_variable() {
        let vars = env(&[(ENV_URL, "http://zabbix"), (ENV_USER, "Admin")]);
        let err = ServerConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains(ENV_PASSWORD));
    }

    #[test]
    fn test_empty_variable() {
        let vars = env(&[(ENV_URL, ""), (ENV_USER, "Admin"), (ENV_PASSWORD, "x")]);
        let err = ServerConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains(ENV_URL));
    }

    #[test]
    fn test_debug_masks_password() {
        let config = ServerConfig {
            url: "http://zabbix".to_string(),
            user: "Admin".to_string(),
            password: "secret".to_string(),
        };
        assert!(!format!("{config:?}").contains("secret"));
    }
}
