use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// Top-level keys of the result document.
pub const VIDEO_SECTION: &str = "rekognition";
pub const SENTIMENT_SECTION: &str = "comprehend";
pub const TRANSCRIPT_SECTION: &str = "transcribe";

/// State of one independently arriving analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum SubResult<T> {
    /// Key absent: the backend has not written this section yet.
    Pending,
    /// `exists: false`: the analysis was skipped or could not run.
    NotApplicable,
    Ready(T),
}

impl<T> SubResult<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubResult::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            SubResult::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoMetadata {
    pub duration_millis: u64,
    pub frame_width: u32,
    pub frame_height: u32,
    pub frame_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl VideoMetadata {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_millis)
    }

    pub fn resolution(&self) -> String {
        format!("{}x{}", self.frame_width, self.frame_height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedLabel {
    pub name: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
}

/// Labels detected at one point of the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    pub timestamp_seconds: f64,
    #[serde(default)]
    pub detected_labels: Vec<DetectedLabel>,
}

impl LabelFrame {
    /// Labels ordered by descending confidence.
    pub fn sorted_labels(&self) -> Vec<&DetectedLabel> {
        let mut labels: Vec<&DetectedLabel> = self.detected_labels.iter().collect();
        labels.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        labels
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub video_metadata: VideoMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_timestamp: Option<String>,
    #[serde(default)]
    pub labels: Vec<LabelFrame>,
}

/// Overall sentiment class. Unknown values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Mixed,
    Other(String),
}

impl From<String> for Sentiment {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "POSITIVE" => Sentiment::Positive,
            "NEGATIVE" => Sentiment::Negative,
            "NEUTRAL" => Sentiment::Neutral,
            "MIXED" => Sentiment::Mixed,
            _ => Sentiment::Other(value),
        }
    }
}

impl From<Sentiment> for String {
    fn from(value: Sentiment) -> Self {
        value.to_string()
    }
}

impl Display for Sentiment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Sentiment::Positive => write!(f, "POSITIVE"),
            Sentiment::Negative => write!(f, "NEGATIVE"),
            Sentiment::Neutral => write!(f, "NEUTRAL"),
            Sentiment::Mixed => write!(f, "MIXED"),
            Sentiment::Other(value) => write!(f, "{}", value),
        }
    }
}

const SCORE_ORDER: [&str; 4] = ["Positive", "Negative", "Neutral", "Mixed"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    #[serde(rename = "Sentiment")]
    pub sentiment: Sentiment,
    /// Probability in [0, 1] per sentiment class.
    #[serde(rename = "SentimentScore", default)]
    pub sentiment_score: BTreeMap<String, f64>,
}

impl SentimentAnalysis {
    /// Scores as percentages: the four standard classes first, then any others by name.
    pub fn percentages(&self) -> Vec<(&str, f64)> {
        let known = SCORE_ORDER
            .iter()
            .filter_map(|class| self.sentiment_score.get_key_value(*class));
        let others = self
            .sentiment_score
            .iter()
            .filter(|(class, _)| !SCORE_ORDER.contains(&class.as_str()));

        known
            .chain(others)
            .map(|(class, score)| (class.as_str(), (score * 100.0).clamp(0.0, 100.0)))
            .collect()
    }
}

/// The result document for one upload.
///
/// The decoded JSON is kept verbatim in `raw`; the typed sections are derived from it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct AnalysisResult {
    pub raw: Value,
    /// Original display name, written by the gateway at upload time.
    pub name: Option<String>,
    pub video: SubResult<VideoAnalysis>,
    pub sentiment: SubResult<SentimentAnalysis>,
    pub transcript: SubResult<String>,
}

impl AnalysisResult {
    pub fn from_value(raw: Value) -> Result<Self, CoreError> {
        let doc = raw.as_object().ok_or_else(|| {
            CoreError::MalformedDocument(format!("expected a JSON object, got {}", kind(&raw)))
        })?;

        let name = doc.get("name").and_then(Value::as_str).map(str::to_string);
        let video = decode_section(doc, VIDEO_SECTION)?;
        let sentiment = decode_section(doc, SENTIMENT_SECTION)?;
        let transcript = decode_section(doc, TRANSCRIPT_SECTION)?;

        Ok(Self {
            raw,
            name,
            video,
            sentiment,
            transcript,
        })
    }

    /// True once no section is still pending.
    pub fn is_complete(&self) -> bool {
        self.pending_sections().is_empty()
    }

    pub fn pending_sections(&self) -> Vec<&'static str> {
        let mut pending = Vec::new();
        if self.video.is_pending() {
            pending.push(VIDEO_SECTION);
        }
        if self.sentiment.is_pending() {
            pending.push(SENTIMENT_SECTION);
        }
        if self.transcript.is_pending() {
            pending.push(TRANSCRIPT_SECTION);
        }
        pending
    }
}

impl TryFrom<Value> for AnalysisResult {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        AnalysisResult::from_value(value)
    }
}

impl Serialize for AnalysisResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

fn decode_section<T: DeserializeOwned>(
    doc: &Map<String, Value>,
    section: &'static str,
) -> Result<SubResult<T>, CoreError> {
    let value = match doc.get(section) {
        None | Some(Value::Null) => return Ok(SubResult::Pending),
        Some(value) => value,
    };

    let payload = match value.get("exists").and_then(Value::as_bool) {
        Some(false) => return Ok(SubResult::NotApplicable),
        Some(true) => value.get("data").cloned().ok_or_else(|| {
            CoreError::MalformedDocument(format!("{} has exists=true but no data", section))
        })?,
        // Bare payload without the exists/data envelope.
        None => value.clone(),
    };

    serde_json::from_value(payload)
        .map(SubResult::Ready)
        .map_err(|source| CoreError::MalformedSection { section, source })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
