use async_trait::async_trait;
use reqwest::StatusCode;

use crate::clients::auth::ZoomAuth;
use crate::models::meeting::{Meeting, MeetingDraft, MeetingList, MeetingListQuery, MeetingUpdate};
use crate::models::recording::{Recording, RecordingList, TranscriptResponse, TranscriptSegment};
use crate::models::user::{User, UserList};

pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

const API_BASE: &str = "https://api.zoom.us/v2";

/// The scheduling operations the service layer needs. A trait so tests can
/// script the remote side without any network.
#[async_trait]
pub trait MeetingOps: Send + Sync {
    async fn list_meetings(
        &self,
        user_id: &str,
        query: &MeetingListQuery,
    ) -> Result<Vec<Meeting>, ClientError>;

    async fn get_meeting(&self, meeting_id: u64) -> Result<Meeting, ClientError>;

    async fn create_meeting(
        &self,
        user_id: &str,
        draft: &MeetingDraft,
    ) -> Result<Meeting, ClientError>;

    async fn update_meeting(
        &self,
        meeting_id: u64,
        update: &MeetingUpdate,
    ) -> Result<(), ClientError>;

    async fn delete_meeting(&self, meeting_id: u64) -> Result<(), ClientError>;
}

/// The account-wide operations the HTTP surface needs on top of the meeting
/// CRUD. Kept behind a trait for the same reason as [`MeetingOps`].
#[async_trait]
pub trait ZoomOps: MeetingOps {
    async fn list_users(&self, status: &str) -> Result<Vec<User>, ClientError>;

    async fn get_user(&self, user_id: &str) -> Result<User, ClientError>;

    async fn meetings_on(
        &self,
        date: &str,
        user_id: Option<&str>,
    ) -> Result<Vec<Meeting>, ClientError>;

    async fn list_recordings(
        &self,
        user_id: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<Recording>, ClientError>;

    async fn recording_transcript(
        &self,
        recording_id: &str,
    ) -> Result<Vec<TranscriptSegment>, ClientError>;

    async fn past_meeting(&self, meeting_id: u64) -> Result<serde_json::Value, ClientError>;

    async fn meeting_summary(
        &self,
        meeting_id: u64,
    ) -> Result<Option<serde_json::Value>, ClientError>;
}

pub struct ZoomClient {
    auth: ZoomAuth,
    http: reqwest::Client,
}

impl ZoomClient {
    pub fn new(auth: ZoomAuth) -> Self {
        Self {
            auth,
            http: reqwest::Client::new(),
        }
    }

    async fn bearer(&self) -> Result<String, ClientError> {
        let token = self.auth.access_token().await?;
        Ok(format!("Bearer {}", token))
    }
}

#[async_trait]
impl ZoomOps for ZoomClient {
    async fn list_users(&self, status: &str) -> Result<Vec<User>, ClientError> {
        let response = self
            .http
            .get(format!("{}/users", API_BASE))
            .header("Authorization", self.bearer().await?)
            .query(&[("status", status), ("page_size", "300")])
            .send()
            .await?;
        let list: UserList = read_json(response, "list users").await?;
        Ok(list.users)
    }

    async fn get_user(&self, user_id: &str) -> Result<User, ClientError> {
        let response = self
            .http
            .get(format!("{}/users/{}", API_BASE, user_id))
            .header("Authorization", self.bearer().await?)
            .send()
            .await?;
        read_json(response, "get user").await
    }

    /// All meetings on one calendar date. With no user filter this walks
    /// every user in the account and aggregates, tagging each meeting with
    /// its owner's email and name.
    async fn meetings_on(
        &self,
        date: &str,
        user_id: Option<&str>,
    ) -> Result<Vec<Meeting>, ClientError> {
        let query = MeetingListQuery {
            from: Some(date.to_string()),
            to: Some(date.to_string()),
            ..MeetingListQuery::default()
        };

        if let Some(user_id) = user_id {
            return self.list_meetings(user_id, &query).await;
        }

        let mut all = Vec::new();
        for user in self.list_users("active").await? {
            let mut meetings = self.list_meetings(&user.id, &query).await?;
            for meeting in &mut meetings {
                meeting.user_email = Some(user.email.clone());
                meeting.user_name = Some(user.display_name());
            }
            all.extend(meetings);
        }
        Ok(all)
    }

    /// Details of the last past instance of a meeting. Recurring meetings
    /// expose the UUIDs of their finished occurrences here.
    async fn past_meeting(&self, meeting_id: u64) -> Result<serde_json::Value, ClientError> {
        let response = self
            .http
            .get(format!("{}/past_meetings/{}", API_BASE, meeting_id))
            .header("Authorization", self.bearer().await?)
            .send()
            .await?;
        read_json(response, "get past meeting").await
    }

    /// AI companion summary for a finished meeting, or `None` while the
    /// remote still answers 404 because the summary has not been generated.
    async fn meeting_summary(
        &self,
        meeting_id: u64,
    ) -> Result<Option<serde_json::Value>, ClientError> {
        let response = self
            .http
            .get(format!("{}/meetings/{}/meeting_summary", API_BASE, meeting_id))
            .header("Authorization", self.bearer().await?)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let summary = read_json(response, "get meeting summary").await?;
        Ok(Some(summary))
    }

    async fn list_recordings(
        &self,
        user_id: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<Recording>, ClientError> {
        let mut query: Vec<(&str, String)> = vec![("page_size", "300".to_string())];
        if let Some(from) = from {
            query.push(("from", from.to_string()));
        }
        if let Some(to) = to {
            query.push(("to", to.to_string()));
        }
        let response = self
            .http
            .get(format!("{}/users/{}/recordings", API_BASE, user_id))
            .header("Authorization", self.bearer().await?)
            .query(&query)
            .send()
            .await?;
        let list: RecordingList = read_json(response, "list recordings").await?;
        Ok(list.recordings)
    }

    async fn recording_transcript(
        &self,
        recording_id: &str,
    ) -> Result<Vec<TranscriptSegment>, ClientError> {
        let response = self
            .http
            .get(format!("{}/recordings/{}/transcript", API_BASE, recording_id))
            .header("Authorization", self.bearer().await?)
            .send()
            .await?;
        let transcript: TranscriptResponse = read_json(response, "get transcript").await?;
        Ok(transcript.segments)
    }
}

#[async_trait]
impl MeetingOps for ZoomClient {
    async fn list_meetings(
        &self,
        user_id: &str,
        query: &MeetingListQuery,
    ) -> Result<Vec<Meeting>, ClientError> {
        let mut params: Vec<(&str, String)> = vec![
            ("type", query.meeting_type.clone()),
            ("page_size", query.page_size.to_string()),
        ];
        if let Some(from) = &query.from {
            params.push(("from", from.clone()));
        }
        if let Some(to) = &query.to {
            params.push(("to", to.clone()));
        }

        let response = self
            .http
            .get(format!("{}/users/{}/meetings", API_BASE, user_id))
            .header("Authorization", self.bearer().await?)
            .query(&params)
            .send()
            .await?;
        let list: MeetingList = read_json(response, "list meetings").await?;
        Ok(list.meetings)
    }

    async fn get_meeting(&self, meeting_id: u64) -> Result<Meeting, ClientError> {
        let response = self
            .http
            .get(format!("{}/meetings/{}", API_BASE, meeting_id))
            .header("Authorization", self.bearer().await?)
            .send()
            .await?;
        read_json(response, "get meeting").await
    }

    async fn create_meeting(
        &self,
        user_id: &str,
        draft: &MeetingDraft,
    ) -> Result<Meeting, ClientError> {
        let response = self
            .http
            .post(format!("{}/users/{}/meetings", API_BASE, user_id))
            .header("Authorization", self.bearer().await?)
            .json(draft)
            .send()
            .await?;
        read_json(response, "create meeting").await
    }

    async fn update_meeting(
        &self,
        meeting_id: u64,
        update: &MeetingUpdate,
    ) -> Result<(), ClientError> {
        let response = self
            .http
            .patch(format!("{}/meetings/{}", API_BASE, meeting_id))
            .header("Authorization", self.bearer().await?)
            .json(update)
            .send()
            .await?;
        expect_no_content(response, "update meeting").await
    }

    async fn delete_meeting(&self, meeting_id: u64) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(format!("{}/meetings/{}", API_BASE, meeting_id))
            .header("Authorization", self.bearer().await?)
            .send()
            .await?;
        expect_no_content(response, "delete meeting").await
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    action: &str,
) -> Result<T, ClientError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(format!("Failed to {}: {} - {}", action, status, text).into());
    }
    Ok(serde_json::from_str(&text)?)
}

// The remote service answers mutations with 204 No Content.
async fn expect_no_content(response: reqwest::Response, action: &str) -> Result<(), ClientError> {
    let status = response.status();
    if status != StatusCode::NO_CONTENT && !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(format!("Failed to {}: {} - {}", action, status, text).into());
    }
    Ok(())
}
