use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};

use crate::types::*;

fn default_true() -> bool {
    true
}

// Which checks Phenopacket::validate_with() and Family::validate_with() do.
// Missing fields in a config file take their default value.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ValidationConfig {
    #[serde(default="default_true")]
    pub check_namespaces: bool,
    #[serde(default="default_true")]
    pub check_references: bool,
    #[serde(default="default_true")]
    pub check_pedigree: bool,
    // accept "UBERON_0001256" as well as "UBERON:0001256"
    #[serde(default="default_true")]
    pub allow_obo_style_curies: bool,
    // an excluded phenotype with no evidence is a violation, not just a warning
    #[serde(default)]
    pub require_negated_evidence: bool,
    // prefixes that count as declared even with no Resource in the metadata
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    pub implicit_namespaces: Vec<NamespacePrefix>,
}

impl Default for ValidationConfig {
    fn default() -> ValidationConfig {
        ValidationConfig {
            check_namespaces: true,
            check_references: true,
            check_pedigree: true,
            allow_obo_style_curies: true,
            require_negated_evidence: false,
            implicit_namespaces: vec![],
        }
    }
}

impl ValidationConfig {
    pub fn read(config_file_name: &str) -> Result<ValidationConfig> {
        let file = File::open(config_file_name)
            .with_context(|| format!("failed to read {}", config_file_name))?;
        let reader = BufReader::new(file);

        let config: ValidationConfig = serde_json::from_reader(reader)
            .with_context(|| format!("failed to parse {}", config_file_name))?;

        tracing::debug!("read validation config from {}", config_file_name);

        Ok(config)
    }

    pub fn with_implicit_namespace(mut self, prefix: impl Into<NamespacePrefix>) -> ValidationConfig {
        self.implicit_namespaces.push(prefix.into());
        self
    }
}

#[test]
fn test_partial_config() {
    let config: ValidationConfig =
        serde_json::from_str(r#"{"check_pedigree": false, "implicit_namespaces": ["UBERON"]}"#)
        .unwrap();

    assert!(!config.check_pedigree);
    assert!(config.check_namespaces);
    assert!(config.allow_obo_style_curies);
    assert!(!config.require_negated_evidence);
    assert_eq!(config.implicit_namespaces.len(), 1);

    let empty: ValidationConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, ValidationConfig::default());
}
