use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod defaults;

use defaults::*;

use crate::errors::{ConfigError, ConfigResult};
use crate::pipeline::engines::priority_resolver::{NormalizationRule, ResolverOptions};
use crate::pipeline::stage_names;
use crate::sources::SourceFormat;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub source: SourceConfig,
    pub pipeline: PipelineConfig,
    pub channel_list: ChannelListConfig,
    pub deduplicate: DeduplicateConfig,
    pub rename_groups: RenameGroupsConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SourceConfig {
    pub format: SourceFormat,
}

/// Ordered list of transform steps
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ChannelListConfig {
    /// Cap on resolved category names per channel; unset keeps the adapter's preference
    pub max_group_titles: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeduplicateConfig {
    /// Rename group members to the suffix-stripped name (`false` keeps the
    /// best member's original name)
    pub strip_suffixes: bool,
    /// Quality suffixes, highest priority first
    pub suffix_priority: Vec<String>,
    /// Entries whose hash key ends with one of these are dropped
    pub exclusion_suffixes: Vec<String>,
    /// Applied in order to the lowercased title when computing the hash key
    pub normalization_rules: Vec<NormalizationRuleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizationRuleConfig {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
    /// Treat `pattern` as plain text instead of a regex
    #[serde(default)]
    pub literal: bool,
    #[serde(default = "default_case_insensitive")]
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenameGroupsConfig {
    pub group_name: String,
}

fn default_case_insensitive() -> bool {
    DEFAULT_NORMALIZATION_CASE_INSENSITIVE
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for DeduplicateConfig {
    fn default() -> Self {
        Self {
            strip_suffixes: DEFAULT_STRIP_SUFFIXES,
            suffix_priority: DEFAULT_SUFFIX_PRIORITY.iter().map(|s| s.to_string()).collect(),
            exclusion_suffixes: Vec::new(),
            normalization_rules: Vec::new(),
        }
    }
}

impl Default for RenameGroupsConfig {
    fn default() -> Self {
        Self {
            group_name: DEFAULT_GROUP_NAME.to_string(),
        }
    }
}

impl NormalizationRuleConfig {
    pub fn compile(&self) -> ConfigResult<NormalizationRule> {
        if self.literal {
            NormalizationRule::literal(&self.pattern, &self.replacement, self.case_insensitive)
        } else {
            NormalizationRule::regex(&self.pattern, &self.replacement, self.case_insensitive)
        }
    }
}

impl DeduplicateConfig {
    /// Build resolver options, compiling every normalization rule
    pub fn resolver_options(&self) -> ConfigResult<ResolverOptions> {
        let rules = self
            .normalization_rules
            .iter()
            .map(NormalizationRuleConfig::compile)
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(ResolverOptions {
            strip_suffixes: self.strip_suffixes,
            suffix_priority: self.suffix_priority.clone(),
            exclusion_suffixes: self.exclusion_suffixes.clone(),
            normalization_rules: rules,
        })
    }
}

impl Config {
    /// File that [`Config::load`] reads: the explicit path, else the
    /// default file name when it exists
    pub fn resolve_file(config_file: Option<&Path>) -> Option<PathBuf> {
        match config_file {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                default.exists().then(|| default.to_path_buf())
            }
        }
    }

    /// Load and validate configuration. See [`Config::load_unvalidated`].
    pub fn load(config_file: Option<&Path>) -> ConfigResult<Self> {
        let config = Self::load_unvalidated(config_file)?;
        config.validate()?;
        Ok(config)
    }

    /// Merge defaults, then the TOML file, then `M3U_TRANSFORM_*`
    /// environment variables (nested keys split on `__`).
    ///
    /// An explicitly given file must exist. Callers that apply further
    /// overrides call [`Config::validate`] afterwards.
    pub fn load_unvalidated(config_file: Option<&Path>) -> ConfigResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        match Self::resolve_file(config_file) {
            Some(path) if !path.exists() => {
                return Err(ConfigError::invalid(
                    "config",
                    format!("file not found: {}", path.display()),
                ));
            }
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => debug!("No configuration file, using defaults"),
        }

        Ok(figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?)
    }

    /// Parse configuration from a TOML string (defaults fill the gaps)
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(contents))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject unknown steps and uncompilable rules before any run
    pub fn validate(&self) -> ConfigResult<()> {
        if self.pipeline.steps.is_empty() {
            return Err(ConfigError::invalid("pipeline.steps", "at least one step is required"));
        }

        for step in &self.pipeline.steps {
            if !stage_names::ALL.contains(&step.as_str()) {
                return Err(ConfigError::UnknownStep { step: step.clone() });
            }
        }

        if self.deduplicate.suffix_priority.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::invalid(
                "deduplicate.suffix_priority",
                "suffixes must not be empty",
            ));
        }

        if self.deduplicate.exclusion_suffixes.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::invalid(
                "deduplicate.exclusion_suffixes",
                "suffixes must not be empty",
            ));
        }

        self.deduplicate.resolver_options()?;
        Ok(())
    }
}
