use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use cohort_factor_tree::{Entity, Factor, FactorTree, UNKNOWN_SCORE};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A study table read into memory: factor labels, subject names and raw rows
#[derive(Debug, Clone)]
pub struct SubjectTable {
    factor_labels: Vec<String>,
    subjects: Vec<String>,
    rows: Vec<StringRecord>,
}

impl SubjectTable {
    /// Read a study table from a file on disk
    pub fn open(path: impl AsRef<Path>, config: &IngestConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file, config)?;
        log::debug!(
            "Read {} rows from {} ({} factors, {} subjects)",
            table.len(),
            path.display(),
            table.factor_labels.len(),
            table.subjects.len()
        );
        Ok(table)
    }

    /// Read a study table from any byte source
    pub fn from_reader<R: Read>(source: R, config: &IngestConfig) -> Result<Self> {
        config.validate()?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(config.delimiter_byte())
            .from_reader(source);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(IngestError::MissingHeader);
        }
        if headers.len() <= config.factor_columns {
            return Err(IngestError::invalid_header(format!(
                "expected {} factor columns followed by at least one subject, found {} columns",
                config.factor_columns,
                headers.len()
            )));
        }

        let factor_labels: Vec<String> = headers
            .iter()
            .take(config.factor_columns)
            .map(str::to_string)
            .collect();
        if let Some(idx) = factor_labels.iter().position(|label| label.is_empty()) {
            return Err(IngestError::invalid_header(format!(
                "factor column {} has an empty name",
                idx + 1
            )));
        }
        let subjects = headers
            .iter()
            .skip(config.factor_columns)
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?);
        }

        Ok(Self {
            factor_labels,
            subjects,
            rows,
        })
    }

    /// Factor names in branching order
    pub fn factor_labels(&self) -> &[String] {
        &self.factor_labels
    }

    /// Names of the numeric outcome columns
    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn subject_column(&self, subject: &str) -> Result<usize> {
        self.subjects
            .iter()
            .position(|name| name == subject)
            .map(|offset| self.factor_labels.len() + offset)
            .ok_or_else(|| IngestError::SubjectNotFound {
                subject: subject.to_string(),
                available: self.subjects.clone(),
            })
    }

    /// One entity per data row, scored by `subject`
    pub fn entities(&self, subject: &str) -> Result<Vec<Entity>> {
        let column = self.subject_column(subject)?;

        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let factors = self
                    .factor_labels
                    .iter()
                    .zip(row.iter())
                    .map(|(label, value)| Factor::new(label.as_str(), value))
                    .collect();
                let raw = row.get(column).unwrap_or_default();
                let score = parse_score(raw).ok_or_else(|| IngestError::InvalidScore {
                    row: idx + 1,
                    column: subject.to_string(),
                    value: raw.to_string(),
                })?;
                Ok(Entity::new(factors, score))
            })
            .collect()
    }

    /// Factor tree of every row, scored by `subject`
    pub fn build_tree(&self, subject: &str) -> Result<FactorTree> {
        let tree = FactorTree::from_entities(self.entities(subject)?)?;
        log::info!(
            "Built factor tree for '{}': {} entities",
            subject,
            tree.entity_count()
        );
        Ok(tree)
    }
}

fn parse_score(raw: &str) -> Option<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|score| *score >= UNKNOWN_SCORE)
}

/// Read `path` and return one entity per row, scored by `subject`
pub fn load_entities(
    path: impl AsRef<Path>,
    subject: &str,
    config: &IngestConfig,
) -> Result<Vec<Entity>> {
    SubjectTable::open(path, config)?.entities(subject)
}

/// Read `path` and build a factor tree scored by `subject`
pub fn load_tree(path: impl AsRef<Path>, subject: &str, config: &IngestConfig) -> Result<FactorTree> {
    SubjectTable::open(path, config)?.build_tree(subject)
}
