#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::{ShopConfig, DEFAULT_BASKET_KEY};

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::cli::Command;
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_non_empty_string, validate_path, validate_url, Validate};
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "small-shop")]
    #[command(about = "Headless storefront client: catalog, basket and checkout")]
    pub struct CliConfig {
        #[arg(long, default_value = "https://larek-api.nomoreparties.co/api/weblarek")]
        pub api_url: String,

        #[arg(long, default_value = "https://larek-api.nomoreparties.co/content/weblarek")]
        pub cdn_url: String,

        #[arg(long, default_value = "./.small-shop")]
        pub storage_path: String,

        #[arg(long, default_value = super::DEFAULT_BASKET_KEY)]
        pub basket_key: String,

        #[arg(long, help = "Load settings from a TOML file instead of flags")]
        pub config: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    impl ConfigProvider for CliConfig {
        fn api_url(&self) -> &str {
            &self.api_url
        }

        fn cdn_url(&self) -> &str {
            &self.cdn_url
        }

        fn storage_path(&self) -> &str {
            &self.storage_path
        }

        fn basket_key(&self) -> &str {
            &self.basket_key
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_url("api_url", &self.api_url)?;
            validate_url("cdn_url", &self.cdn_url)?;
            validate_path("storage_path", &self.storage_path)?;
            validate_non_empty_string("basket_key", &self.basket_key)
        }
    }

}
