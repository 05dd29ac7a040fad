use anyhow::{bail, Context, Result};
use cohort_ingest::IngestConfig;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Study layout and display preferences, loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CohortConfig {
    /// Table layout
    pub ingest: IngestConfig,

    /// Population name -> subject column, in chart order
    pub populations: IndexMap<String, String>,

    /// Factor label -> preferred display order of its outcomes
    pub factor_orders: IndexMap<String, Vec<String>>,
}

impl Default for CohortConfig {
    fn default() -> Self {
        let populations = [
            ("math", "math score"),
            ("reading", "reading score"),
            ("writing", "writing score"),
        ]
        .into_iter()
        .map(|(name, subject)| (name.to_string(), subject.to_string()))
        .collect();

        let factor_orders = [
            ("gender", &["male", "female"][..]),
            (
                "race/ethnicity",
                &["group A", "group B", "group C", "group D", "group E"][..],
            ),
            (
                "parental level of education",
                &[
                    "some high school",
                    "high school",
                    "some college",
                    "associate's degree",
                    "bachelor's degree",
                    "master's degree",
                ][..],
            ),
            ("lunch", &["free/reduced", "standard"][..]),
            ("test preparation course", &["none", "completed"][..]),
        ]
        .into_iter()
        .map(|(factor, order)| {
            (
                factor.to_string(),
                order.iter().map(|value| value.to_string()).collect(),
            )
        })
        .collect();

        Self {
            ingest: IngestConfig::default(),
            populations,
            factor_orders,
        }
    }
}

impl CohortConfig {
    /// Load from `path`, or the built-in defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config.validate()?;
        log::debug!(
            "Loaded config {} ({} populations, {} factor orders)",
            path.display(),
            config.populations.len(),
            config.factor_orders.len()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.ingest.validate()?;
        if self.populations.is_empty() {
            bail!("at least one population must be configured");
        }
        if let Some((name, _)) = self.populations.iter().find(|(_, subject)| subject.is_empty()) {
            bail!("population '{name}' has an empty subject column");
        }
        Ok(())
    }

    /// Display order for `factor`; empty when none is configured
    pub fn order_for(&self, factor: &str) -> Vec<String> {
        self.factor_orders.get(factor).cloned().unwrap_or_default()
    }
}
