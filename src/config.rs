use crate::decode::DecodeSchema;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// Decoding schema override. Reports from a different branch lineup
    /// or channel order are handled here, not by editing code.
    #[serde(default)]
    pub schema: DecodeSchema,
}

fn default_db_path() -> String {
    "dashboard/report.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: default_db_path(),
            schema: DecodeSchema::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load the config file if present, otherwise run on defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ChannelKind;

    #[test]
    fn test_schema_override_from_toml() {
        let cfg: Config = toml::from_str(
            r#"
            db_path = "custom/report.db"

            [schema]
            version = 2
            channels = ["Call Centre", "Talabat"]

            [[schema.branches]]
            name = "Madinaty"
            localized_name = "مدينتي"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.db_path, "custom/report.db");
        assert_eq!(cfg.schema.version, 2);
        assert_eq!(cfg.schema.branches.len(), 1);
        assert_eq!(cfg.schema.branches[0].name, "Madinaty");
        assert_eq!(
            cfg.schema.channels,
            vec![ChannelKind::CallCentre, ChannelKind::Talabat]
        );
    }

    #[test]
    fn test_defaults_when_fields_missing() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.db_path, "dashboard/report.db");
        assert_eq!(cfg.schema.branches.len(), 4);
        assert_eq!(cfg.schema.channels.len(), 3);
    }
}
