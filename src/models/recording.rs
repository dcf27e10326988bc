use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub uuid: String,
    pub id: u64,
    pub topic: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub share_url: Option<String>,
    #[serde(default)]
    pub recording_files: Vec<RecordingFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingFile {
    pub id: String,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub recording_type: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

// The recordings listing nests recordings under "meetings" on the wire.
#[derive(Debug, Deserialize)]
pub struct RecordingList {
    #[serde(default, rename = "meetings")]
    pub recordings: Vec<Recording>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub speaker: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptResponse {
    #[serde(default, rename = "recording_transcripts")]
    pub segments: Vec<TranscriptSegment>,
}
