use crate::core::code_generator::{DigestMode, DEFAULT_CODE_LENGTH, SINGLE_BLOCK_MAX_LENGTH};
use crate::core::numeric::MAX_FIB_TERMS;
use crate::core::ratio_planner::PLAN_FIB_TERMS;
use crate::utils::error::{LoreError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub product: ProductConfig,
    pub repository: RepositoryConfig,
    pub native: NativeConfig,
    pub ratios: RatioConfig,
    pub quantum: QuantumConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    pub name: String,
    pub price_usd: f64,
    /// Golden-step barcode printed next to the seeded one.
    pub barcode_fixed: String,
    pub code_length: usize,
    pub digest_extension: bool,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            name: "Sparsity Rock".to_string(),
            price_usd: 1.00,
            barcode_fixed: "1123581347".to_string(),
            code_length: DEFAULT_CODE_LENGTH,
            digest_extension: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub enabled: bool,
    pub api_url: String,
    pub timeout_seconds: u64,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: "https://api.github.com/repos/L11-21/L11-21".to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeConfig {
    pub enabled: bool,
    pub library_dir: String,
    pub windows_name: String,
    pub unix_name: String,
    pub cosmos_value: i32,
    pub aeration: i32,
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            library_dir: ".".to_string(),
            windows_name: "Viable.dll".to_string(),
            unix_name: "Viable.so".to_string(),
            cosmos_value: 3,
            aeration: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatioConfig {
    pub base_unit: f64,
    pub snap_query: f64,
    pub fib_terms: usize,
}

impl Default for RatioConfig {
    fn default() -> Self {
        Self {
            base_unit: 1.0,
            snap_query: 3.2,
            fib_terms: PLAN_FIB_TERMS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantumConfig {
    pub enabled: bool,
    pub fib_terms: usize,
    pub shots: u32,
}

impl Default for QuantumConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            fib_terms: 10,
            shots: crate::adapters::quantum::DEFAULT_SHOTS,
        }
    }
}

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LoreError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LoreError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value. Unset variables are left
    /// in place and rejected by validation if they land in a field in use.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LoreError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn digest_mode(&self) -> DigestMode {
        if self.product.digest_extension {
            DigestMode::Extended
        } else {
            DigestMode::Single
        }
    }

    pub fn repository_timeout(&self) -> Duration {
        Duration::from_secs(self.repository.timeout_seconds)
    }

    pub fn validate_config(&self) -> Result<()> {
        self.check_placeholders_resolved()?;

        validation::validate_non_empty_string("product.name", &self.product.name)?;
        validation::validate_digits("product.barcode_fixed", &self.product.barcode_fixed)?;
        if !self.product.price_usd.is_finite() || self.product.price_usd < 0.0 {
            return Err(LoreError::InvalidConfigValueError {
                field: "product.price_usd".to_string(),
                value: self.product.price_usd.to_string(),
                reason: "Price must be a finite, non-negative amount".to_string(),
            });
        }

        // one SHA-256 block covers 32 digits
        if self.product.digest_extension {
            validation::validate_positive_number("product.code_length", self.product.code_length, 1)?;
        } else {
            validation::validate_range(
                "product.code_length",
                self.product.code_length,
                1,
                SINGLE_BLOCK_MAX_LENGTH,
            )?;
        }

        if self.repository.enabled {
            validation::validate_url("repository.api_url", &self.repository.api_url)?;
            validation::validate_range(
                "repository.timeout_seconds",
                self.repository.timeout_seconds,
                1,
                300,
            )?;
        }

        if self.native.enabled {
            validation::validate_path("native.library_dir", &self.native.library_dir)?;
            validation::validate_non_empty_string("native.windows_name", &self.native.windows_name)?;
            validation::validate_non_empty_string("native.unix_name", &self.native.unix_name)?;
        }

        validation::validate_positive_real("ratios.base_unit", self.ratios.base_unit)?;
        if !self.ratios.snap_query.is_finite() {
            return Err(LoreError::InvalidConfigValueError {
                field: "ratios.snap_query".to_string(),
                value: self.ratios.snap_query.to_string(),
                reason: "Snap query must be a finite number".to_string(),
            });
        }
        validation::validate_range("ratios.fib_terms", self.ratios.fib_terms, 1, MAX_FIB_TERMS)?;

        if self.quantum.enabled {
            validation::validate_range("quantum.fib_terms", self.quantum.fib_terms, 0, MAX_FIB_TERMS)?;
            validation::validate_positive_number("quantum.shots", self.quantum.shots as usize, 1)?;
        }

        Ok(())
    }

    fn check_placeholders_resolved(&self) -> Result<()> {
        validation::validate_resolved("product.name", &self.product.name)?;
        validation::validate_resolved("product.barcode_fixed", &self.product.barcode_fixed)?;
        if self.repository.enabled {
            validation::validate_resolved("repository.api_url", &self.repository.api_url)?;
        }
        if self.native.enabled {
            validation::validate_resolved("native.library_dir", &self.native.library_dir)?;
            validation::validate_resolved("native.windows_name", &self.native.windows_name)?;
            validation::validate_resolved("native.unix_name", &self.native.unix_name)?;
        }
        Ok(())
    }
}

impl Validate for NodeConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").unwrap();
        assert_eq!(config, NodeConfig::default());
        assert_eq!(config.product.name, "Sparsity Rock");
        assert_eq!(config.product.barcode_fixed, "1123581347");
        assert_eq!(config.native.cosmos_value, 3);
        assert_eq!(config.native.aeration, 5);
        assert_eq!(config.ratios.snap_query, 3.2);
        assert!(!config.quantum.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[product]
name = "Bus of Inheritance"
code_length = 12

[ratios]
base_unit = 0.5

[quantum]
enabled = true
shots = 1024
"#;

        let config = NodeConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.product.name, "Bus of Inheritance");
        assert_eq!(config.product.code_length, 12);
        assert_eq!(config.product.price_usd, 1.00);
        assert_eq!(config.ratios.base_unit, 0.5);
        assert_eq!(config.quantum.shots, 1024);
        assert_eq!(config.quantum.fib_terms, 10);
        assert_eq!(config.digest_mode(), DigestMode::Single);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GOLDEN_STEP_TEST_REPO_URL", "https://example.com/repos/a/b");

        let toml_content = r#"
[repository]
api_url = "${GOLDEN_STEP_TEST_REPO_URL}"
"#;

        let config = NodeConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.repository.api_url, "https://example.com/repos/a/b");

        std::env::remove_var("GOLDEN_STEP_TEST_REPO_URL");
    }

    #[test]
    fn test_unset_env_var_is_missing_config() {
        std::env::remove_var("GOLDEN_STEP_TEST_UNSET_DIR");

        let toml_content = r#"
[native]
library_dir = "${GOLDEN_STEP_TEST_UNSET_DIR}/lib"
"#;

        let config = NodeConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.native.library_dir, "${GOLDEN_STEP_TEST_UNSET_DIR}/lib");

        let err = config.validate().unwrap_err();
        match &err {
            LoreError::MissingConfigError { field } => assert_eq!(field, "native.library_dir"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.recovery_suggestion().contains("environment variable"));

        let mut disabled = config.clone();
        disabled.native.enabled = false;
        assert!(disabled.validate().is_ok());
    }

    #[test]
    fn test_code_length_limits() {
        let mut config = NodeConfig::default();
        config.product.code_length = 33;
        assert!(config.validate().is_err());

        config.product.digest_extension = true;
        assert!(config.validate().is_ok());
        assert_eq!(config.digest_mode(), DigestMode::Extended);

        config.product.code_length = 0;
        assert!(config.validate().is_err());
    }

    fn assert_rejected(mutate: impl FnOnce(&mut NodeConfig)) {
        let mut config = NodeConfig::default();
        mutate(&mut config);
        assert!(config.validate().is_err(), "{:?}", config);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert_rejected(|c| c.ratios.base_unit = 0.0);
        assert_rejected(|c| c.ratios.snap_query = f64::NAN);
        assert_rejected(|c| c.ratios.fib_terms = 0);
        assert_rejected(|c| c.product.barcode_fixed = "11235-8".to_string());
        assert_rejected(|c| c.product.price_usd = -1.0);
        assert_rejected(|c| c.repository.api_url = "invalid-url".to_string());
        assert_rejected(|c| c.repository.timeout_seconds = 0);
    }

    #[test]
    fn test_disabled_repository_skips_url_check() {
        let mut config = NodeConfig::default();
        config.repository.enabled = false;
        config.repository.api_url = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_toml() {
        let err = NodeConfig::from_toml_str("[product\nname = 1").unwrap_err();
        assert!(matches!(err, LoreError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let example = include_str!("../../golden-step.example.toml");
        let config = NodeConfig::from_toml_str(example).unwrap();
        assert_eq!(config, NodeConfig::default());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[product]\nname = \"file-test\"\n")
            .unwrap();

        let config = NodeConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.product.name, "file-test");
    }
}
