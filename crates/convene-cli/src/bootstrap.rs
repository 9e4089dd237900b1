use convene_config::ConveneConfig;

/// Load `.env` (if present) and the layered configuration.
pub fn load_config() -> anyhow::Result<ConveneConfig> {
    ConveneConfig::load_with_dotenv().map_err(anyhow::Error::from)
}
