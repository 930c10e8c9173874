//! Diagnostic catalog - static domain configuration and prerequisite graph.
//!
//! A catalog is built once at process start (from the reference data or a
//! YAML file), validated eagerly, and then shared read-only by every request.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::dependency_graph::DependencyGraph;

/// Key performance indicator with its target, as shown in detail templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpi {
    pub nombre: String,
    pub meta: String,
}

impl Kpi {
    pub fn new(nombre: impl Into<String>, meta: impl Into<String>) -> Self {
        Self {
            nombre: nombre.into(),
            meta: meta.into(),
        }
    }
}

/// Configuration of one functional area of the questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Unique domain identifier.
    pub key: String,
    /// Human-readable name.
    pub label: String,
    /// Questions answered on the 1..5 scale, in scoring order.
    #[serde(default)]
    pub likert_fields: Vec<String>,
    /// Free-text questions used for evidence and keyword signals.
    #[serde(default)]
    pub text_fields: Vec<String>,
    /// Phrases that flag a risk condition when found in a text answer.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// KPIs used by the local detail template; generic KPIs when empty.
    #[serde(default)]
    pub template_kpis: Vec<Kpi>,
    /// Accept `A`..`E` letter answers on Likert questions.
    #[serde(default)]
    pub letter_codes: bool,
}

impl DomainConfig {
    /// Creates a domain with no questions configured.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            likert_fields: Vec::new(),
            text_fields: Vec::new(),
            keywords: Vec::new(),
            template_kpis: Vec::new(),
            letter_codes: false,
        }
    }

    pub fn with_likert_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.likert_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_text_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_template_kpis(mut self, kpis: Vec<Kpi>) -> Self {
        self.template_kpis = kpis;
        self
    }

    pub fn with_letter_codes(mut self, enabled: bool) -> Self {
        self.letter_codes = enabled;
        self
    }
}

/// Errors raised while building or loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no domains")]
    NoDomains,

    #[error("domain key cannot be empty")]
    EmptyKey,

    #[error("duplicate domain key: {0}")]
    DuplicateDomain(String),

    #[error("dependency graph references unknown domain: {0}")]
    UnknownDomain(String),

    #[error("domain '{domain}' depends on unknown domain '{dependency}'")]
    UnknownDependency { domain: String, dependency: String },

    #[error("dependency cycle: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },

    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Validated set of domains in enumeration order plus their prerequisites.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticCatalog {
    domains: Vec<DomainConfig>,
    dependencies: DependencyGraph,
}

#[derive(Deserialize)]
struct CatalogFile {
    domains: Vec<DomainConfig>,
    #[serde(default)]
    dependencies: DependencyGraph,
}

impl DiagnosticCatalog {
    /// Builds a catalog, rejecting duplicate keys, dangling references and cycles.
    pub fn new(
        domains: Vec<DomainConfig>,
        dependencies: DependencyGraph,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            domains,
            dependencies,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Builds a catalog without validation.
    ///
    /// The roadmap builder tolerates cycles and dangling references, so this is
    /// safe to use; it simply gives up the ordering guarantee.
    pub fn new_unchecked(domains: Vec<DomainConfig>, dependencies: DependencyGraph) -> Self {
        Self {
            domains,
            dependencies,
        }
    }

    /// Parses a catalog from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::new(file.domains, file.dependencies)
    }

    /// Reads and parses a YAML catalog file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Checks structural soundness of the catalog.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.domains.is_empty() {
            return Err(CatalogError::NoDomains);
        }

        let mut keys = HashSet::new();
        for domain in &self.domains {
            if domain.key.trim().is_empty() {
                return Err(CatalogError::EmptyKey);
            }
            if !keys.insert(domain.key.as_str()) {
                return Err(CatalogError::DuplicateDomain(domain.key.clone()));
            }
        }

        for (domain, deps) in self.dependencies.entries() {
            if !keys.contains(domain) {
                return Err(CatalogError::UnknownDomain(domain.to_string()));
            }
            if let Some(missing) = deps.iter().find(|d| !keys.contains(d.as_str())) {
                return Err(CatalogError::UnknownDependency {
                    domain: domain.to_string(),
                    dependency: missing.clone(),
                });
            }
        }

        if let Some(path) = self.dependencies.find_cycle() {
            return Err(CatalogError::Cycle { path });
        }

        Ok(())
    }

    /// Domains in their fixed enumeration order.
    pub fn domains(&self) -> &[DomainConfig] {
        &self.domains
    }

    /// Prerequisite graph.
    pub fn dependencies(&self) -> &DependencyGraph {
        &self.dependencies
    }

    /// Looks up a domain by key.
    pub fn domain(&self, key: &str) -> Option<&DomainConfig> {
        self.domains.iter().find(|d| d.key == key)
    }

    /// Enumeration position of a domain.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.domains.iter().position(|d| d.key == key)
    }

    /// Domain keys in enumeration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(|d| d.key.as_str())
    }

    /// Number of configured domains.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// True if no domains are configured.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
