use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Layered configuration: `config.toml`, then `config.<env>.toml`, then
/// `APP_*` environment variables (`__` separates nested keys, e.g.
/// `APP_CHUNKING__CHUNK_SIZE=256`).
pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    /// Load a single explicit TOML file, still overridable from `APP_*` vars.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!("config file {}", path.display())).into());
        }
        let figment = Figment::new().merge(Toml::file(path)).merge(Env::prefixed("APP_").split("__"));
        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    /// Built-in defaults only; used when no config file is present.
    pub fn defaults() -> Self {
        let figment = Figment::new()
            .merge(Serialized::default("chunking", ChunkingConfig::default()))
            .merge(Serialized::default("optimization", OptimizationOptions::default()));
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// The `[chunking]` section with defaults for anything unset.
    pub fn chunking(&self) -> Result<ChunkingConfig> {
        let config: ChunkingConfig = self.section("chunking")?;
        config.validate()?;
        Ok(config)
    }

    /// The `[optimization]` section with defaults for anything unset.
    pub fn optimization(&self) -> Result<OptimizationOptions> {
        let options: OptimizationOptions = self.section("optimization")?;
        options.validate()?;
        Ok(options)
    }

    fn section<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        match self.figment.extract_inner::<T>(key) {
            Ok(value) => Ok(value),
            Err(e) if e.missing() => Ok(T::default()),
            Err(e) => Err(Error::InvalidConfig(format!("[{}]: {}", key, e))),
        }
    }

    fn validate(&self) -> Result<()> {
        self.chunking()?;
        self.optimization()?;
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

/// How a document is split into chunks.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChunkingStrategy {
    /// Fixed token windows with overlap.
    Traditional,
    /// Split on configured separators, force-split oversized sections.
    Semantic,
    /// Greedy sentence packing.
    Sentence,
    /// Boundary-aware chunks tagged with surrounding context ("late" chunking).
    #[default]
    #[serde(alias = "late")]
    Contextual,
}

impl ChunkingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkingStrategy::Traditional => "traditional",
            ChunkingStrategy::Semantic => "semantic",
            ChunkingStrategy::Sentence => "sentence",
            ChunkingStrategy::Contextual => "contextual",
        }
    }
}

impl fmt::Display for ChunkingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkingStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "traditional" => Ok(ChunkingStrategy::Traditional),
            "semantic" => Ok(ChunkingStrategy::Semantic),
            "sentence" => Ok(ChunkingStrategy::Sentence),
            "contextual" | "late" => Ok(ChunkingStrategy::Contextual),
            other => Err(Error::InvalidConfig(format!("unknown chunking strategy '{}'", other))),
        }
    }
}

/// Chunking parameters. Sizes are in tokens except `context_window_chars`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkingConfig {
    pub strategy: ChunkingStrategy,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub min_chunk_size: usize,
    pub max_chunk_size: usize,
    pub context_window_chars: usize,
    pub separators: Vec<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            strategy: ChunkingStrategy::default(),
            chunk_size: 512,
            chunk_overlap: 50,
            min_chunk_size: 100,
            max_chunk_size: 1000,
            context_window_chars: 200,
            separators: ["\n# ", "\n## ", "\n### "].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ChunkingConfig {
    pub fn with_strategy(mut self, strategy: ChunkingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_chunk_overlap(mut self, chunk_overlap: usize) -> Self {
        self.chunk_overlap = chunk_overlap;
        self
    }

    pub fn with_min_chunk_size(mut self, min_chunk_size: usize) -> Self {
        self.min_chunk_size = min_chunk_size;
        self
    }

    pub fn with_max_chunk_size(mut self, max_chunk_size: usize) -> Self {
        self.max_chunk_size = max_chunk_size;
        self
    }

    pub fn with_context_window_chars(mut self, chars: usize) -> Self {
        self.context_window_chars = chars;
        self
    }

    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be greater than 0".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.min_chunk_size > self.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "min_chunk_size ({}) must not exceed chunk_size ({})",
                self.min_chunk_size, self.chunk_size
            )));
        }
        if self.chunk_size > self.max_chunk_size {
            return Err(Error::InvalidConfig(format!(
                "chunk_size ({}) must not exceed max_chunk_size ({})",
                self.chunk_size, self.max_chunk_size
            )));
        }
        if let Some(pos) = self.separators.iter().position(|s| s.is_empty()) {
            return Err(Error::InvalidConfig(format!("separator #{} is empty and would match everywhere", pos)));
        }
        Ok(())
    }
}

/// Budget and strategy thresholds for the result optimizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OptimizationOptions {
    pub token_budget: usize,
    /// Minimum matched chunks before a document may be returned whole.
    pub full_document_threshold: usize,
    /// Number of top hits merged into a multi-hit expanded chunk.
    pub expanded_chunk_multiplier: usize,
    pub target_utilization: f64,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self { token_budget: 10_000, full_document_threshold: 3, expanded_chunk_multiplier: 3, target_utilization: 0.9 }
    }
}

impl OptimizationOptions {
    pub fn with_token_budget(mut self, token_budget: usize) -> Self {
        self.token_budget = token_budget;
        self
    }

    pub fn with_full_document_threshold(mut self, threshold: usize) -> Self {
        self.full_document_threshold = threshold;
        self
    }

    pub fn with_expanded_chunk_multiplier(mut self, multiplier: usize) -> Self {
        self.expanded_chunk_multiplier = multiplier;
        self
    }

    pub fn with_target_utilization(mut self, target: f64) -> Self {
        self.target_utilization = target;
        self
    }

    /// Token ceiling actually packed: `floor(token_budget * target_utilization)`.
    pub fn max_tokens(&self) -> usize {
        (self.token_budget as f64 * self.target_utilization + 1e-9).floor() as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.token_budget == 0 {
            return Err(Error::InvalidConfig("token_budget must be greater than 0".into()));
        }
        if !(self.target_utilization > 0.0 && self.target_utilization <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "target_utilization must be in (0, 1], got {}",
                self.target_utilization
            )));
        }
        if self.full_document_threshold == 0 {
            return Err(Error::InvalidConfig("full_document_threshold must be at least 1".into()));
        }
        if self.expanded_chunk_multiplier == 0 {
            return Err(Error::InvalidConfig("expanded_chunk_multiplier must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_names_parse() {
        assert_eq!("semantic".parse::<ChunkingStrategy>().unwrap(), ChunkingStrategy::Semantic);
        assert_eq!("Late".parse::<ChunkingStrategy>().unwrap(), ChunkingStrategy::Contextual);
        assert!(matches!("recursive".parse::<ChunkingStrategy>(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn max_tokens_floors() {
        let options = OptimizationOptions::default().with_token_budget(1000).with_target_utilization(0.9);
        assert_eq!(options.max_tokens(), 900);
    }
}
