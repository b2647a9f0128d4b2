use std::collections::BTreeMap;

use super::{Config, ConfigSource};

fn stable_source_label(source: Option<&ConfigSource>) -> &'static str {
    match source {
        Some(ConfigSource::Cli) => "cli",
        Some(ConfigSource::ConfigFile(_)) => "config",
        Some(ConfigSource::Defaults) | None => "default",
    }
}

impl Config {
    /// Effective configuration as key-value pairs with source attribution
    ///
    /// Keys are sorted so the listing is stable.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();

        let mut add_config = |key: &str, value: String| {
            let source = stable_source_label(self.source_attribution.get(key));
            config.insert(key.to_string(), (value, source.to_string()));
        };

        add_config("root", self.root.to_string());
        add_config("output_file", self.output_file.clone());
        add_config("names_file", self.names_file.clone());
        add_config("replay_output_file", self.replay_output_file.clone());
        add_config("decode", self.decode.to_string());
        add_config("verbose", self.verbose.to_string());

        let exclusions = &self.exclusions;
        for (key, values) in [
            ("extra_dirs", &exclusions.extra_dirs),
            ("extra_files", &exclusions.extra_files),
            ("extra_extensions", &exclusions.extra_extensions),
            ("extra_patterns", &exclusions.extra_patterns),
        ] {
            let source = stable_source_label(self.source_attribution.get("exclusions"));
            config.insert(
                format!("exclusions.{key}"),
                (values.join(", "), source.to_string()),
            );
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn test_effective_config_labels() {
        let mut config = Config::with_root("src");
        config
            .source_attribution
            .insert("root".to_string(), ConfigSource::Cli);
        config.source_attribution.insert(
            "decode".to_string(),
            ConfigSource::ConfigFile(Utf8PathBuf::from("c.toml")),
        );

        let effective = config.effective_config();
        assert_eq!(effective["root"], ("src".to_string(), "cli".to_string()));
        assert_eq!(effective["decode"], ("drop".to_string(), "config".to_string()));
        assert_eq!(
            effective["output_file"],
            ("project_context.txt".to_string(), "default".to_string())
        );
        assert_eq!(effective["exclusions.extra_dirs"].0, "");
    }
}
