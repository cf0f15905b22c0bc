use serde::{Deserialize, Serialize};
use waybill_auth::AuthConfig;
use waybill_db::TenantStoreConfig;

/// Top-level server configuration, loaded from YAML with `WAYBILL__`
/// environment overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: TenantStoreConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
    8087
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_parses_with_defaults() {
        let cfg: AppConfig = serde_json::from_str(
            r#"{
                "database": {
                    "dsn_template": "sqlite:///tmp/waybill/{db}.db",
                    "control_plane_db": "control"
                },
                "auth": { "jwt_secret": "s" }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8087);
        assert_eq!(cfg.database.control_plane_db, "control");
    }
}
