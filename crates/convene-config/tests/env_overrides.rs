use figment::Jail;
use convene_config::ConveneConfig;

#[test]
fn external_overrides_fill_config_values() {
    Jail::expect_with(|_jail| {
        let overrides = vec![(
            "CONVENE_FIREBASE__API_KEY".to_string(),
            "AIza_from_external".to_string(),
        )];

        let config = ConveneConfig::load_with_env_overrides(&overrides).expect("config loads");
        assert_eq!(config.firebase.api_key, "AIza_from_external");
        Ok(())
    });
}

#[test]
fn process_env_beats_external_overrides() {
    Jail::expect_with(|jail| {
        jail.set_env("CONVENE_FIREBASE__API_KEY", "AIza_from_env");
        let overrides = vec![(
            "CONVENE_FIREBASE__API_KEY".to_string(),
            "AIza_from_external".to_string(),
        )];

        let config = ConveneConfig::load_with_env_overrides(&overrides).expect("config loads");
        assert_eq!(config.firebase.api_key, "AIza_from_env");
        Ok(())
    });
}

#[test]
fn unprefixed_overrides_are_ignored() {
    Jail::expect_with(|_jail| {
        let overrides = vec![("API__BASE_URL".to_string(), "https://nope".to_string())];

        let config = ConveneConfig::load_with_env_overrides(&overrides).expect("config loads");
        assert_eq!(config.api.base_url, "http://localhost:5000");
        Ok(())
    });
}

#[test]
fn boolean_override_is_typed() {
    Jail::expect_with(|_jail| {
        let overrides = vec![("CONVENE_STORE__KEYRING".to_string(), "false".to_string())];

        let config = ConveneConfig::load_with_env_overrides(&overrides).expect("config loads");
        assert!(!config.store.keyring);
        Ok(())
    });
}
