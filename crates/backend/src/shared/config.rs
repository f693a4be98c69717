use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub shopify: ShopifyConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Upper bound on request bodies; images travel base64-encoded
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShopifyConfig {
    /// e.g. "my-shop.myshopify.com"
    #[serde(default)]
    pub shop_domain: String,
    #[serde(default)]
    pub admin_api_access_token: String,
    pub api_version: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_max_body_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl ShopifyConfig {
    /// Admin GraphQL endpoint of the shop
    pub fn graphql_url(&self) -> String {
        format!(
            "https://{}/admin/api/{}/graphql.json",
            self.shop_domain, self.api_version
        )
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 3000
max_body_bytes = 16777216

[shopify]
shop_domain = ""
admin_api_access_token = ""
api_version = "2025-01"
request_timeout_secs = 30
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// Environment variables (a `.env` file is read first) take precedence
/// over both. Missing shop credentials are an error.
pub fn load_config() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let mut config = read_config_file()?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    check_credentials(&config)?;
    Ok(config)
}

fn read_config_file() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

fn apply_env_overrides(
    config: &mut Config,
    var: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(domain) = var("SHOPIFY_SHOP_DOMAIN") {
        config.shopify.shop_domain = domain;
    }
    if let Some(token) = var("SHOPIFY_ADMIN_API_ACCESS_TOKEN") {
        config.shopify.admin_api_access_token = token;
    }
    if let Some(version) = var("SHOPIFY_API_VERSION") {
        config.shopify.api_version = version;
    }
    if let Some(port) = var("SERVER_PORT") {
        config.server.port = port
            .parse()
            .map_err(|e| anyhow::anyhow!("SERVER_PORT must be a port number: {}", e))?;
    }
    Ok(())
}

fn check_credentials(config: &Config) -> anyhow::Result<()> {
    if config.shopify.shop_domain.trim().is_empty()
        || config.shopify.admin_api_access_token.trim().is_empty()
    {
        anyhow::bail!(
            "Missing Shopify credentials. Check SHOPIFY_SHOP_DOMAIN and SHOPIFY_ADMIN_API_ACCESS_TOKEN."
        );
    }
    Ok(())
}
