use serde::{Deserialize, Serialize};

/// The five rendered caption payloads attached to a successful job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionOutputs {
    pub text: String,
    pub vtt: String,
    pub srt: String,
    pub words: String,
    pub json: String,
}

impl CaptionOutputs {
    /// Look up an output by its download key; `txt` aliases `text`.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "txt" | "text" => Some(&self.text),
            "vtt" => Some(&self.vtt),
            "srt" => Some(&self.srt),
            "words" => Some(&self.words),
            "json" => Some(&self.json),
            _ => None,
        }
    }
}

/// The structured result payload attached to a terminal job.
///
/// `Error` is a content-level failure on a job that still *finished*:
/// the pipeline caught an error and reported it as a result, distinct
/// from a registry-level worker fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResultEnvelope {
    Done {
        filename: String,
        outputs: CaptionOutputs,
        #[serde(skip_serializing_if = "Option::is_none")]
        webhook_error: Option<String>,
    },
    Error {
        error: String,
        filename: String,
    },
}

impl ResultEnvelope {
    pub fn filename(&self) -> &str {
        match self {
            ResultEnvelope::Done { filename, .. } => filename,
            ResultEnvelope::Error { filename, .. } => filename,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResultEnvelope::Error { .. })
    }
}
