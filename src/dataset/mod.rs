//! Benchmark dataset loading.
//!
//! A dataset is a set of [`ModelResult`] records decoded from the JSON files a
//! watermarking benchmark produces. Files come in three layouts: an array of
//! model records, a single model record, or an object of model records keyed
//! by model id. A directory of `result_<model>.json` files is also accepted.
//!
//! Decoding is lenient below the top level: missing sections, non-numeric
//! values and unexpected shapes become "no data" rather than errors.

mod measurement;
mod record;

pub use measurement::Measurement;
pub use record::{
    AttackRecord, DetectionSource, EXTRACT_ACCURACY, FactorSample, FidRecord, ModelResult,
    ModelType, NO_ATTACK, PSNR, VISUAL_QUALITY_KEY, VisualQualityEntry, is_tpr_key,
};

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};

/// An immutable collection of model results.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    models: Vec<ModelResult>,
}

impl Dataset {
    /// Create a dataset from already decoded records.
    #[must_use]
    pub fn new(models: Vec<ModelResult>) -> Self {
        Self { models }
    }

    /// Parse a dataset from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Decode a dataset from a parsed JSON value.
    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(Self::new(decode_models(value, None)?))
    }

    /// Load a dataset from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        let models = decode_models(&value, model_id_from_path(path).as_deref())?;
        log::debug!("Loaded {} model(s) from {}", models.len(), path.display());
        Ok(Self::new(models))
    }

    /// Load every `*.json` file in a directory, in file-name order.
    ///
    /// Files that cannot be read or parsed are logged and skipped.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::DatasetLoad {
                path: dir.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        let mut files: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
            })
            .collect();
        files.sort();

        let mut models = Vec::new();
        for path in &files {
            match Self::load(path) {
                Ok(dataset) => models.extend(dataset.models),
                Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        log::debug!(
            "Loaded {} model(s) from {} file(s) in {}",
            models.len(),
            files.len(),
            dir.display()
        );
        Ok(Self::new(models))
    }

    /// Load a file or a directory of files.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::DatasetLoad {
                path: path.to_path_buf(),
                reason: "path does not exist".to_string(),
            });
        }
        if path.is_dir() {
            Self::load_dir(path)
        } else {
            Self::load(path)
        }
    }

    /// All model records in load order.
    #[must_use]
    pub fn models(&self) -> &[ModelResult] {
        &self.models
    }

    /// Number of models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the dataset holds no models.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Find a model by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModelResult> {
        self.models.iter().find(|m| m.model_name == name)
    }

    /// Model names in load order.
    #[must_use]
    pub fn model_names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.model_name.as_str()).collect()
    }

    /// Sorted union of attack names across models, excluding the baseline.
    #[must_use]
    pub fn attack_names(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self
            .models
            .iter()
            .flat_map(|m| m.attacks().map(|(name, _)| name))
            .collect();
        names.into_iter().collect()
    }
}

/// Decode the model records in a top-level JSON value.
fn decode_models(value: &Value, fallback_name: Option<&str>) -> Result<Vec<ModelResult>> {
    match value {
        Value::Array(items) => Ok(items
            .iter()
            .filter_map(|item| {
                if item.is_object() {
                    Some(ModelResult::from_json(item, None))
                } else {
                    log::warn!("Ignoring non-object entry in model array");
                    None
                }
            })
            .collect()),
        Value::Object(obj) if is_model_record(obj) => {
            Ok(vec![ModelResult::from_json(value, fallback_name)])
        }
        Value::Object(obj) => Ok(obj
            .iter()
            .filter_map(|(id, item)| {
                if item.is_object() {
                    Some(ModelResult::from_json(item, Some(id)))
                } else {
                    log::warn!("Ignoring non-object entry '{id}' in model map");
                    None
                }
            })
            .collect()),
        other => Err(Error::DatasetFormat(format!(
            "expected an object or array of model records, got {}",
            json_kind(other)
        ))),
    }
}

fn is_model_record(obj: &serde_json::Map<String, Value>) -> bool {
    ["modelname", "robustnessresult", "visualqualityresult"]
        .iter()
        .any(|key| obj.contains_key(*key))
}

/// `result_StegaStamp.json` -> `StegaStamp`.
fn model_id_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    Some(stem.strip_prefix("result_").unwrap_or(stem).to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
