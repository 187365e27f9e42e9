use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Folder type written to the `[ViewState]` section of fresh marker records.
pub const DEFAULT_FOLDER_TYPE: &str = "Generic";

const ENV_PREFIX: &str = "FOLDER_ICON";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Leave successfully converted source images in place.
    pub keep_originals: bool,
    pub folder_type: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            keep_originals: false,
            folder_type: DEFAULT_FOLDER_TYPE.to_string(),
        }
    }
}

/// Build the configuration from defaults overlaid with `FOLDER_ICON_*`
/// environment variables. There is no configuration file.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    configuration_from(Environment::with_prefix(ENV_PREFIX))
}

fn configuration_from(environment: Environment) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .set_default("keep_originals", false)?
        .set_default("folder_type", DEFAULT_FOLDER_TYPE)?
        .add_source(environment.try_parsing(true))
        .build()?;
    let config = builder.try_deserialize::<AppConfig>()?;

    if config.folder_type.trim().is_empty() {
        return Err(ConfigError::Message(
            "folder_type must not be empty".to_string(),
        ));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = configuration_from(environment(&[])).unwrap();
        assert!(!config.keep_originals);
        assert_eq!(config.folder_type, "Generic");
    }

    #[test]
    fn test_environment_overrides() {
        let config = configuration_from(environment(&[
            ("FOLDER_ICON_KEEP_ORIGINALS", "true"),
            ("FOLDER_ICON_FOLDER_TYPE", "Pictures"),
        ]))
        .unwrap();
        assert!(config.keep_originals);
        assert_eq!(config.folder_type, "Pictures");
    }

    #[test]
    fn test_unrelated_variables_ignored() {
        let config = configuration_from(environment(&[("OTHER_KEEP_ORIGINALS", "true")])).unwrap();
        assert!(!config.keep_originals);
    }

    #[test]
    fn test_empty_folder_type_rejected() {
        let result = configuration_from(environment(&[("FOLDER_ICON_FOLDER_TYPE", " ")]));
        assert!(result.is_err());
    }
}
