//! Configuration du format de sortie CSV

use serde::{Deserialize, Serialize};
use std::path::Path;

use anyhow::{Context, Result};

/// Variable d'environnement qui remplace le séparateur du preset
pub const SEPARATOR_ENV: &str = "CADASTRE_BATI_SEPARATOR";

/// Configuration du fichier CSV produit
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Séparateur de champs
    pub separator: String,

    /// Séparateur décimal (`,` pour un tableur en français)
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,

    /// Écrire la ligne d'en-tête
    #[serde(default = "default_header")]
    pub header: bool,
}

fn default_decimal_separator() -> String {
    ".".to_string()
}

fn default_header() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            separator: ";".to_string(),
            decimal_separator: ".".to_string(),
            header: true,
        }
    }
}

impl OutputConfig {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "excel" => Self::load_embedded(include_str!("presets/excel.json")),
            "gdocs" => Self::load_embedded(include_str!("presets/gdocs.json")),
            "csv" => Self::load_embedded(include_str!("presets/csv.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: excel, gdocs, csv", preset),
        }
    }

    /// Preset embarqué ou chemin vers un fichier JSON
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        let path = Path::new(name_or_path);
        if path.extension().map_or(false, |ext| ext == "json") || path.is_file() {
            Self::load(path)
        } else {
            Self::from_preset(name_or_path)
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }

    /// Applique le séparateur de l'environnement puis celui de la ligne de commande
    pub fn with_overrides(mut self, env: Option<&str>, cli: Option<&str>) -> Self {
        if let Some(sep) = cli.or(env).filter(|s| !s.is_empty()) {
            self.separator = parse_separator(sep);
        }
        self
    }

    /// Comme [`with_overrides`](Self::with_overrides), en lisant `CADASTRE_BATI_SEPARATOR`
    pub fn with_env_and_cli(self, cli: Option<&str>) -> Self {
        let env = std::env::var(SEPARATOR_ENV).ok();
        self.with_overrides(env.as_deref(), cli)
    }
}

/// Interprète les alias de séparateur (`tab`, `\t`, `semicolon`...)
pub fn parse_separator(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "tab" | "\\t" | "tabulation" => "\t".to_string(),
        "semicolon" | "pointvirgule" => ";".to_string(),
        "comma" | "virgule" => ",".to_string(),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let excel = OutputConfig::from_preset("excel").unwrap();
        assert_eq!(excel.separator, ";");
        assert_eq!(excel.decimal_separator, ",");
        assert!(excel.header);

        let gdocs = OutputConfig::from_preset("gdocs").unwrap();
        assert_eq!(gdocs.separator, "\t");
        assert_eq!(gdocs.decimal_separator, ".");

        assert!(OutputConfig::from_preset("libreoffice").is_err());
    }

    #[test]
    fn test_cli_overrides_env() {
        let config = OutputConfig::default().with_overrides(Some("|"), Some("tab"));
        assert_eq!(config.separator, "\t");

        let config = OutputConfig::default().with_overrides(Some("|"), None);
        assert_eq!(config.separator, "|");

        let config = OutputConfig::default().with_overrides(Some(""), None);
        assert_eq!(config.separator, ";");
    }

    #[test]
    fn test_parse_separator() {
        assert_eq!(parse_separator("TAB"), "\t");
        assert_eq!(parse_separator("\\t"), "\t");
        assert_eq!(parse_separator("virgule"), ",");
        assert_eq!(parse_separator("#"), "#");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("cadastre_bati_test_config.json");
        std::fs::write(&path, r#"{"separator": "|"}"#).unwrap();

        let config = OutputConfig::resolve(path.to_str().unwrap()).unwrap();
        assert_eq!(config.separator, "|");
        assert_eq!(config.decimal_separator, ".");
        assert!(config.header);

        std::fs::remove_file(path).ok();
    }
}
