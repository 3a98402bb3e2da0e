//! Per-model benchmark records.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::measurement::{Measurement, parse_number};

/// Attack key that holds the undistorted baseline.
pub const NO_ATTACK: &str = "No Attacking";

/// Reserved key holding distortion-quality metrics inside a factor sample.
pub const VISUAL_QUALITY_KEY: &str = "visualquality";

/// Watermark extraction accuracy, stored as a percentage.
pub const EXTRACT_ACCURACY: &str = "Extract Accuracy";

/// Visual-quality metric used for the robustness x-axis.
pub const PSNR: &str = "PSNR";

/// Whether a metric key is a `TPR@N%FPR` detection rate.
#[must_use]
pub fn is_tpr_key(key: &str) -> bool {
    key.starts_with("TPR@") && key.ends_with("%FPR")
}

/// Where a factor sample's detection value comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectionSource<'a> {
    /// A `TPR@N%FPR` key (the first one in document order).
    Tpr(&'a Measurement),
    /// The `Extract Accuracy` key, a percentage.
    ExtractAccuracy(&'a Measurement),
}

impl DetectionSource<'_> {
    /// Detection value on the unit interval.
    ///
    /// TPR is used as-is; Extract Accuracy is divided by 100.
    #[must_use]
    pub fn unit_value(&self) -> Option<f64> {
        match self {
            Self::Tpr(m) => m.mean(),
            Self::ExtractAccuracy(m) => m.mean().map(|v| v / 100.0),
        }
    }
}

/// One distortion-strength operating point of an attack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactorSample {
    /// Detection and other metrics, in document order.
    pub metrics: Vec<(String, Measurement)>,
    /// Distortion-quality metrics from the nested `visualquality` object.
    pub visual_quality: Vec<(String, Measurement)>,
}

impl FactorSample {
    /// Decode a factor sample. Non-object values give an empty sample.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let mut sample = Self::default();
        let Some(obj) = value.as_object() else {
            return sample;
        };
        for (key, value) in obj {
            if key == VISUAL_QUALITY_KEY {
                if let Some(vq) = value.as_object() {
                    sample.visual_quality = vq
                        .iter()
                        .map(|(k, v)| (k.clone(), Measurement::from_json(v)))
                        .collect();
                }
            } else {
                sample.metrics.push((key.clone(), Measurement::from_json(value)));
            }
        }
        sample
    }

    /// Look up a metric by exact name.
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<&Measurement> {
        self.metrics.iter().find(|(k, _)| k == name).map(|(_, m)| m)
    }

    /// The first `TPR@N%FPR` metric.
    #[must_use]
    pub fn tpr_metric(&self) -> Option<(&str, &Measurement)> {
        self.metrics
            .iter()
            .find(|(k, _)| is_tpr_key(k))
            .map(|(k, m)| (k.as_str(), m))
    }

    /// Look up a distortion-quality metric by name.
    #[must_use]
    pub fn visual_quality(&self, name: &str) -> Option<&Measurement> {
        self.visual_quality
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, m)| m)
    }

    /// Mean PSNR of the distorted images, if recorded.
    #[must_use]
    pub fn psnr(&self) -> Option<f64> {
        self.visual_quality(PSNR).and_then(Measurement::mean)
    }

    /// The detection metric this sample reports.
    ///
    /// A TPR key wins over Extract Accuracy even when its value is unusable.
    #[must_use]
    pub fn detection_source(&self) -> Option<DetectionSource<'_>> {
        if let Some((_, m)) = self.tpr_metric() {
            return Some(DetectionSource::Tpr(m));
        }
        self.metric(EXTRACT_ACCURACY).map(DetectionSource::ExtractAccuracy)
    }

    /// Detection value on the unit interval.
    #[must_use]
    pub fn detection(&self) -> Option<f64> {
        self.detection_source().and_then(|s| s.unit_value())
    }

    /// Accuracy as used by the R/E quality-loss scores.
    ///
    /// TPR is treated as lying in [-1, 1] and remapped with `(v + 1) / 2`;
    /// Extract Accuracy is taken as-is. Unlike [`Self::detection`], a TPR key
    /// without a usable value falls back to Extract Accuracy.
    #[must_use]
    pub fn quality_loss_accuracy(&self) -> Option<f64> {
        self.tpr_metric()
            .and_then(|(_, m)| m.mean())
            .map(|v| (v + 1.0) / 2.0)
            .or_else(|| self.metric(EXTRACT_ACCURACY).and_then(Measurement::mean))
    }
}

/// Results for one attack type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackRecord {
    /// Label for the strength axis.
    pub factor_symbol: Option<String>,
    /// Display name of the attack.
    pub noise_name: Option<String>,
    /// Whether a larger factor means a weaker attack.
    pub factor_inversely_related: bool,
    /// Factor samples keyed by factor value, in document order.
    pub factors: Vec<(String, FactorSample)>,
}

impl AttackRecord {
    /// Decode an attack record. Non-object values give an empty record.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        let factors = obj
            .get("factors")
            .and_then(Value::as_object)
            .map(|factors| {
                factors
                    .iter()
                    .filter(|(k, _)| k.as_str() != VISUAL_QUALITY_KEY)
                    .map(|(k, v)| (k.clone(), FactorSample::from_json(v)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            factor_symbol: str_field(obj, "factorsymbol"),
            noise_name: str_field(obj, "noisename"),
            factor_inversely_related: obj
                .get("factor_inversely_related")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            factors,
        }
    }

    /// Iterate factor samples in document order.
    pub fn samples(&self) -> impl Iterator<Item = &FactorSample> {
        self.factors.iter().map(|(_, s)| s)
    }
}

/// Watermarking model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelType {
    /// Post-generation watermarking (PGW).
    #[serde(rename = "PGW")]
    PostGeneration,
    /// In-generation watermarking (IGW).
    #[serde(rename = "IGW")]
    InGeneration,
    /// Label missing or not recognized.
    #[default]
    Unknown,
}

impl ModelType {
    /// Classify a free-form `modeltype` label.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label.contains("Post-Generation") {
            Self::PostGeneration
        } else if label.contains("In-Generation") {
            Self::InGeneration
        } else {
            Self::Unknown
        }
    }

    /// Short label used in tables.
    #[must_use]
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::PostGeneration => "PGW",
            Self::InGeneration => "IGW",
            Self::Unknown => "Unknown",
        }
    }
}

/// Structured FID record from `visualqualityresult.FID`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FidRecord {
    /// Reference dataset the FID was computed against.
    pub dataset_name: Option<String>,
    /// FID of watermarked images.
    pub stego: Option<f64>,
    /// FID of the unwatermarked images.
    pub clean: Option<f64>,
}

/// One entry of `visualqualityresult`.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualQualityEntry {
    /// Per-image samples of a metric.
    Samples(Measurement),
    /// Structured FID record.
    Fid(FidRecord),
}

impl VisualQualityEntry {
    /// Decode an entry. Objects with an `FID` member are FID records.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value.as_object() {
            Some(obj) if obj.contains_key("FID") => {
                let values = obj.get("FID").and_then(Value::as_object);
                let field = |name: &str| values.and_then(|v| v.get(name)).and_then(parse_number);
                Self::Fid(FidRecord {
                    dataset_name: str_field(obj, "datasetname"),
                    stego: field("stego"),
                    clean: field("clean"),
                })
            }
            _ => Self::Samples(Measurement::from_json(value)),
        }
    }
}

/// One model's full benchmark record. Read-only after loading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelResult {
    /// Model name.
    pub model_name: String,
    /// Model family.
    pub model_type: ModelType,
    /// Free-text description.
    pub description: Option<String>,
    /// Image side length used in the benchmark.
    pub image_size: Option<f64>,
    /// Watermark payload in bits.
    pub payload: Option<f64>,
    /// Dataset the benchmark ran on.
    pub test_dataset: Option<String>,
    /// Visual-quality metrics the benchmark reports, in order.
    pub tested_visual_quality_metrics: Vec<String>,
    /// Robustness metrics the benchmark reports, in order.
    pub tested_robustness_metrics: Vec<String>,
    /// Attack results keyed by attack name, in document order.
    pub robustness_result: Vec<(String, AttackRecord)>,
    /// Visual-quality results keyed by metric name, in document order.
    pub visual_quality_result: Vec<(String, VisualQualityEntry)>,
    /// Whether the record has a `robustnessresult` object, even an empty one.
    pub robustness_reported: bool,
}

impl ModelResult {
    /// Decode a model record. `fallback_name` is used when `modelname` is absent.
    #[must_use]
    pub fn from_json(value: &Value, fallback_name: Option<&str>) -> Self {
        let Some(obj) = value.as_object() else {
            return Self {
                model_name: fallback_name.unwrap_or("Unknown").to_string(),
                ..Self::default()
            };
        };

        let model_name = str_field(obj, "modelname")
            .or_else(|| fallback_name.map(String::from))
            .unwrap_or_else(|| "Unknown".to_string());

        let robustness = obj.get("robustnessresult").and_then(Value::as_object);
        let robustness_result = robustness
            .map(|attacks| {
                attacks
                    .iter()
                    .map(|(k, v)| (k.clone(), AttackRecord::from_json(v)))
                    .collect()
            })
            .unwrap_or_default();

        let visual_quality_result = obj
            .get("visualqualityresult")
            .and_then(Value::as_object)
            .map(|metrics| {
                metrics
                    .iter()
                    .map(|(k, v)| (k.clone(), VisualQualityEntry::from_json(v)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            model_name,
            model_type: obj
                .get("modeltype")
                .and_then(Value::as_str)
                .map(ModelType::from_label)
                .unwrap_or_default(),
            description: str_field(obj, "description"),
            image_size: obj.get("imagesize").and_then(parse_number),
            payload: obj.get("payload").and_then(parse_number),
            test_dataset: str_field(obj, "testdataset"),
            tested_visual_quality_metrics: string_list(obj, "testvisualqualitymetrics"),
            tested_robustness_metrics: string_list(obj, "testrobustnessmetrics"),
            robustness_result,
            visual_quality_result,
            robustness_reported: robustness.is_some(),
        }
    }

    /// Attack records excluding the no-attack baseline.
    pub fn attacks(&self) -> impl Iterator<Item = (&str, &AttackRecord)> {
        self.robustness_result
            .iter()
            .filter(|(name, _)| name != NO_ATTACK)
            .map(|(name, record)| (name.as_str(), record))
    }

    /// Look up an attack record by name.
    #[must_use]
    pub fn attack(&self, name: &str) -> Option<&AttackRecord> {
        self.robustness_result
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, r)| r)
    }

    /// The no-attack baseline record.
    #[must_use]
    pub fn baseline(&self) -> Option<&AttackRecord> {
        self.attack(NO_ATTACK)
    }

    /// Look up a visual-quality result by metric name.
    #[must_use]
    pub fn visual_quality(&self, metric: &str) -> Option<&VisualQualityEntry> {
        self.visual_quality_result
            .iter()
            .find(|(k, _)| k == metric)
            .map(|(_, e)| e)
    }

    /// Whether the record reports robustness results, possibly none.
    #[must_use]
    pub fn has_robustness(&self) -> bool {
        self.robustness_reported
    }
}

impl<'de> Deserialize<'de> for ModelResult {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value, None))
    }
}

fn str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(String::from)
}

fn string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tpr_key_pattern() {
        assert!(is_tpr_key("TPR@1%FPR"));
        assert!(is_tpr_key("TPR@0.1%FPR"));
        assert!(!is_tpr_key("TPR@1%"));
        assert!(!is_tpr_key("Extract Accuracy"));
    }

    #[test]
    fn test_factor_sample_keeps_document_order() {
        let sample = FactorSample::from_json(&json!({
            "TPR@10%FPR": 0.8,
            "TPR@1%FPR": 0.5,
            "visualquality": {"PSNR": [30.0, 32.0], "SSIM": 0.9}
        }));
        let (key, m) = sample.tpr_metric().unwrap();
        assert_eq!(key, "TPR@10%FPR");
        assert_eq!(m.mean(), Some(0.8));
        assert_eq!(sample.psnr(), Some(31.0));
        assert_eq!(sample.metrics.len(), 2);
    }

    #[test]
    fn test_detection_fallback_to_extract_accuracy() {
        let sample = FactorSample::from_json(&json!({"Extract Accuracy": [90, 100]}));
        assert_eq!(sample.detection(), Some(0.95));
    }

    #[test]
    fn test_invalid_tpr_does_not_fall_back() {
        let sample = FactorSample::from_json(&json!({"TPR@1%FPR": "N/A", "Extract Accuracy": 90}));
        assert!(matches!(sample.detection_source(), Some(DetectionSource::Tpr(_))));
        assert_eq!(sample.detection(), None);
    }

    #[test]
    fn test_quality_loss_accuracy() {
        let tpr = FactorSample::from_json(&json!({"TPR@1%FPR": 0.5, "Extract Accuracy": 0.9}));
        assert_eq!(tpr.quality_loss_accuracy(), Some(0.75));

        let ea = FactorSample::from_json(&json!({"Extract Accuracy": 0.5}));
        assert_eq!(ea.quality_loss_accuracy(), Some(0.5));
        assert_eq!(ea.detection(), Some(0.005));

        assert_eq!(FactorSample::from_json(&json!({"PSNR": 30})).quality_loss_accuracy(), None);
    }

    #[test]
    fn test_quality_loss_accuracy_falls_back_on_invalid_tpr() {
        let sample = FactorSample::from_json(&json!({"TPR@1%FPR": "N/A", "Extract Accuracy": 0.8}));
        assert_eq!(sample.quality_loss_accuracy(), Some(0.8));
        assert_eq!(sample.detection(), None);

        let empty = FactorSample::from_json(&json!({"TPR@1%FPR": [], "Extract Accuracy": [0.4, 0.6]}));
        assert_eq!(empty.quality_loss_accuracy(), Some(0.5));
    }

    #[test]
    fn test_model_type() {
        assert_eq!(ModelType::from_label("Post-Generation Watermarking"), ModelType::PostGeneration);
        assert_eq!(ModelType::from_label("In-Generation"), ModelType::InGeneration);
        assert_eq!(ModelType::from_label("other"), ModelType::Unknown);
    }

    #[test]
    fn test_model_result_decoding() {
        let model = ModelResult::from_json(
            &json!({
                "modelname": "StegaStamp",
                "modeltype": "Post-Generation",
                "payload": 100,
                "testvisualqualitymetrics": ["PSNR", "SSIM"],
                "robustnessresult": {
                    "No Attacking": {"factors": {"0": {"TPR@1%FPR": 1.0}}},
                    "Blur": {
                        "factorsymbol": "k",
                        "factors": {
                            "3": {"TPR@1%FPR": 0.9, "visualquality": {"PSNR": 35}},
                            "visualquality": {"PSNR": 1}
                        }
                    }
                },
                "visualqualityresult": {
                    "PSNR": [40.0, 41.0],
                    "FID": {"datasetname": "COCO", "FID": {"stego": "12.5", "clean": "N/A"}}
                }
            }),
            None,
        );

        assert_eq!(model.model_name, "StegaStamp");
        assert_eq!(model.model_type, ModelType::PostGeneration);
        assert_eq!(model.payload, Some(100.0));
        assert_eq!(model.tested_visual_quality_metrics, vec!["PSNR", "SSIM"]);
        assert_eq!(model.attacks().count(), 1);
        let blur = model.attack("Blur").unwrap();
        assert_eq!(blur.factor_symbol.as_deref(), Some("k"));
        assert_eq!(blur.factors.len(), 1);
        assert!(model.baseline().is_some());

        match model.visual_quality("FID") {
            Some(VisualQualityEntry::Fid(fid)) => {
                assert_eq!(fid.dataset_name.as_deref(), Some("COCO"));
                assert_eq!(fid.stego, Some(12.5));
                assert_eq!(fid.clean, None);
            }
            other => panic!("expected FID record, got {other:?}"),
        }
    }

    #[test]
    fn test_model_name_fallback() {
        let model = ModelResult::from_json(&json!({}), Some("rivaGAN"));
        assert_eq!(model.model_name, "rivaGAN");
        let model = ModelResult::from_json(&json!({}), None);
        assert_eq!(model.model_name, "Unknown");
        assert!(!model.has_robustness());
    }

    #[test]
    fn test_empty_robustness_section_is_reported() {
        let model = ModelResult::from_json(&json!({"modelname": "A", "robustnessresult": {}}), None);
        assert!(model.has_robustness());
        assert_eq!(model.attacks().count(), 0);

        let model = ModelResult::from_json(&json!({"modelname": "A", "robustnessresult": "n/a"}), None);
        assert!(!model.has_robustness());
    }
}
