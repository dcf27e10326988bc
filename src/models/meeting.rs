use serde::{Deserialize, Serialize};

/// A meeting as the remote service reports it. `user_email` / `user_name`
/// are not wire fields; the client fills them in when aggregating meetings
/// across users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: u64,
    pub topic: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub agenda: Option<String>,
    #[serde(default)]
    pub join_url: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MeetingList {
    #[serde(default)]
    pub meetings: Vec<Meeting>,
}

/// Body for creating a scheduled meeting. Type 2 is the remote service's
/// "scheduled meeting".
#[derive(Debug, Clone, Serialize)]
pub struct MeetingDraft {
    pub topic: String,
    #[serde(rename = "type")]
    pub meeting_type: u8,
    pub start_time: String,
    pub duration: u32,
    pub timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agenda: Option<String>,
}

impl MeetingDraft {
    pub fn scheduled(topic: String, start_time: String, duration: u32, timezone: String) -> Self {
        Self {
            topic,
            meeting_type: 2,
            start_time,
            duration,
            timezone,
            agenda: None,
        }
    }
}

/// PATCH body for updating a meeting; only the set fields go on the wire.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MeetingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agenda: Option<String>,
}

/// Listing filters for a user's meetings.
#[derive(Debug, Clone)]
pub struct MeetingListQuery {
    pub meeting_type: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub page_size: u32,
}

impl Default for MeetingListQuery {
    fn default() -> Self {
        // "upcoming" rather than "scheduled" so recurring meetings show up.
        Self {
            meeting_type: "upcoming".to_string(),
            from: None,
            to: None,
            page_size: 300,
        }
    }
}
