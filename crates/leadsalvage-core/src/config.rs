//! User-facing texts, loadable from TOML.
//!
//! Every literal the pipeline emits lives here so a deployment can swap
//! the Portuguese defaults without touching code. Missing keys fall back
//! to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalvageConfig {
    /// Display name for a record with no usable name fields.
    pub unnamed_lead: String,
    /// Shown for a record whose payload carried no error messages.
    pub generic_record_error: String,
    /// Heading above records recovered from JSON.
    pub structured_heading: String,
    /// Heading above clauses recovered from free text.
    pub plain_text_heading: String,
    pub verdict: VerdictTexts,
}

/// Title and message texts for the result verdict.
///
/// Templates substitute `{created}`, `{total}` and `{failed}`. The `*_one` variants
/// are used when the interpolated count is exactly 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerdictTexts {
    pub failure_title: String,
    pub failure_message: String,
    pub completed_title: String,
    pub success_message: String,
    pub success_message_one: String,
    pub partial_message: String,
    pub partial_failed_one: String,
    pub partial_failed_many: String,
    pub empty_message: String,
}

impl Default for SalvageConfig {
    fn default() -> Self {
        Self {
            unnamed_lead: "Lead sem nome".to_string(),
            generic_record_error: "Erro ao processar este lead. Verifique os dados.".to_string(),
            structured_heading: "Erros no processamento:".to_string(),
            plain_text_heading: "Detalhes do erro:".to_string(),
            verdict: VerdictTexts::default(),
        }
    }
}

impl Default for VerdictTexts {
    fn default() -> Self {
        Self {
            failure_title: "Ocorreu um problema no processamento".to_string(),
            failure_message: "Ocorreram erros durante o processamento dos leads.".to_string(),
            completed_title: "Processamento Concluído!".to_string(),
            success_message: "{created} leads foram importados com sucesso para o Salesforce."
                .to_string(),
            success_message_one: "1 lead foi importado com sucesso para o Salesforce.".to_string(),
            partial_message: "{created} de {total} leads foram importados com sucesso para o Salesforce."
                .to_string(),
            partial_failed_one: "1 lead apresentou erro.".to_string(),
            partial_failed_many: "{failed} leads apresentaram erros.".to_string(),
            empty_message: "Nenhum lead foi processado.".to_string(),
        }
    }
}

impl SalvageConfig {
    /// Parse a config from TOML text. Absent keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded salvage config");
        Ok(config)
    }
}

/// Substitute `{created}`, `{total}` and `{failed}` in a verdict template.
pub(crate) fn fill(template: &str, created: u64, total: u64, failed: u64) -> String {
    template
        .replace("{created}", &created.to_string())
        .replace("{total}", &total.to_string())
        .replace("{failed}", &failed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_is_default() {
        let config = SalvageConfig::from_toml_str("").unwrap();
        assert_eq!(config, SalvageConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = SalvageConfig::from_toml_str(
            r#"
            unnamed_lead = "Unnamed lead"

            [verdict]
            completed_title = "Import complete!"
            "#,
        )
        .unwrap();
        assert_eq!(config.unnamed_lead, "Unnamed lead");
        assert_eq!(config.verdict.completed_title, "Import complete!");
        assert_eq!(
            config.verdict.failure_title,
            VerdictTexts::default().failure_title
        );
        assert_eq!(
            config.generic_record_error,
            SalvageConfig::default().generic_record_error
        );
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = SalvageConfig::from_toml_str("unnamed_lead = [").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "plain_text_heading = \"Error details:\"").unwrap();
        let config = SalvageConfig::load(file.path()).unwrap();
        assert_eq!(config.plain_text_heading, "Error details:");
    }

    #[test]
    fn load_missing_file() {
        let err = SalvageConfig::load(Path::new("/nonexistent/leadsalvage.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn fill_substitutes_all_placeholders() {
        assert_eq!(
            fill("{created}/{total} ok, {failed} failed", 7, 10, 3),
            "7/10 ok, 3 failed"
        );
    }
}
