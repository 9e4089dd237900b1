use convene_config::ConveneConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &ConveneConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &ConveneConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.firebase.is_configured() && has_single_underscore_key(&env_keys, "CONVENE_FIREBASE")
    {
        warnings.push(
            "Firebase config appears default while CONVENE_FIREBASE* env vars exist. \
             Use double underscores (example: CONVENE_FIREBASE__API_KEY)."
                .to_string(),
        );
    }

    if config.api.base_url == convene_config::ApiConfig::default().base_url
        && has_single_underscore_key(&env_keys, "CONVENE_API")
    {
        warnings.push(
            "API config appears default while CONVENE_API* env vars exist. \
             Use double underscores (example: CONVENE_API__BASE_URL)."
                .to_string(),
        );
    }

    warnings
}

/// Keys under `prefix` that do not use the `__` section separator.
fn has_single_underscore_key(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| {
        key.strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('_') && !rest.starts_with("__"))
    })
}
