use crate::config::toml_config::AppConfig;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "neighborhood-map")]
#[command(about = "Search venues around a neighborhood and filter the results")]
pub struct CliArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Search text, e.g. "pizza near downtown" (defaults to the configured initial query)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Narrow the results by name or address after the search
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Fetch phone and website for every result
    #[arg(long)]
    pub details: bool,

    #[arg(long, env = "FOURSQUARE_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    #[arg(long, env = "FOURSQUARE_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliArgs {
    /// 命令列參數覆蓋設定檔
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(id) = &self.client_id {
            config.provider.client_id = id.clone();
        }
        if let Some(secret) = &self.client_secret {
            config.provider.client_secret = secret.clone();
        }
        if let Some(query) = &self.query {
            config.search.initial_query = query.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_config_values() {
        let args = CliArgs::parse_from([
            "neighborhood-map",
            "--query",
            "tacos in austin",
            "--client-id",
            "cli-id",
            "--client-secret",
            "cli-secret",
        ]);
        let mut config = AppConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.search.initial_query, "tacos in austin");
        assert_eq!(config.provider.client_id, "cli-id");
        assert_eq!(config.provider.client_secret, "cli-secret");
    }
}
