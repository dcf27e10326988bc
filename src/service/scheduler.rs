use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::clients::zoom::MeetingOps;
use crate::models::meeting::{Meeting, MeetingDraft, MeetingListQuery, MeetingUpdate};
use crate::resolver::compose::{compose, ComposeRequest, Rosters, ScheduleRequest};
use crate::resolver::datetime::resolve_datetime;
use crate::resolver::error::ResolveError;
use crate::resolver::matcher::{rank, FieldWeights};
use crate::service::roster;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("contact roster unavailable: {0}")]
    Roster(String),

    #[error("remote service call failed: {0}")]
    Remote(String),
}

/// One scheduling request as the caller states it. `reference` pins the
/// "now" used for relative-date math; `None` means the actual wall clock.
#[derive(Debug, Clone, Default)]
pub struct ScheduleInput {
    pub phrase: String,
    pub duration_text: Option<String>,
    pub contact_query: Option<String>,
    pub timezone: Option<String>,
    pub reference: Option<DateTime<Utc>>,
}

/// The booked meeting together with the resolved parameters that produced it.
#[derive(Debug)]
pub struct ScheduleOutcome {
    pub meeting: Meeting,
    pub request: ScheduleRequest,
}

/// Orchestrates the resolvers against the live meeting service. Resolution
/// failures surface before any remote call, so a failed request never leaves
/// a half-created meeting behind.
pub struct SchedulerService {
    ops: Arc<dyn MeetingOps>,
    contacts_file: String,
    default_timezone: String,
}

impl SchedulerService {
    pub fn new(ops: Arc<dyn MeetingOps>, contacts_file: String, default_timezone: String) -> Self {
        Self {
            ops,
            contacts_file,
            default_timezone,
        }
    }

    /// Book a meeting from a natural-language phrase, optionally with a
    /// contact looked up by fuzzy name query.
    pub async fn schedule(&self, input: &ScheduleInput) -> Result<ScheduleOutcome, SchedulerError> {
        let timezone = input
            .timezone
            .as_deref()
            .unwrap_or(&self.default_timezone)
            .to_string();
        let contacts = roster::contact_candidates(
            &roster::load_contacts(&self.contacts_file)
                .map_err(|err| SchedulerError::Roster(err.to_string()))?,
        );

        let request = compose(
            &ComposeRequest {
                phrase: &input.phrase,
                duration_text: input.duration_text.as_deref(),
                timezone: &timezone,
                contact_query: input.contact_query.as_deref(),
                meeting_query: None,
                reference: input.reference.unwrap_or_else(Utc::now),
                default_time: None,
            },
            &Rosters {
                contacts: &contacts,
                meetings: &[],
            },
        )?;

        let topic = match request
            .matched_contact
            .as_ref()
            .and_then(|contact| contact.field("name"))
        {
            Some(name) => format!("Meeting with {}", name),
            None => "Scheduled meeting".to_string(),
        };
        let mut draft = MeetingDraft::scheduled(
            topic,
            format_start(&request),
            request.duration_minutes,
            timezone,
        );
        if let Some(email) = request
            .matched_contact
            .as_ref()
            .and_then(|contact| contact.field("email"))
        {
            draft.agenda = Some(format!("Invitee: {}", email));
        }

        let meeting = self
            .ops
            .create_meeting("me", &draft)
            .await
            .map_err(|err| SchedulerError::Remote(err.to_string()))?;

        Ok(ScheduleOutcome { meeting, request })
    }

    /// Fuzzy search upcoming meetings by topic/agenda. Zero matches is a
    /// normal empty result.
    pub async fn find_meetings(&self, query: &str) -> Result<Vec<Meeting>, SchedulerError> {
        let meetings = self.upcoming_meetings().await?;
        let candidates = roster::meeting_candidates(&meetings);
        let ranked = rank(query, &candidates, &FieldWeights::meetings());

        let mut found = Vec::new();
        for matched in ranked {
            let Some(id) = matched.record.field("id").and_then(|id| id.parse::<u64>().ok()) else {
                continue;
            };
            if let Some(meeting) = meetings.iter().find(|meeting| meeting.id == id) {
                found.push(meeting.clone());
            }
        }
        Ok(found)
    }

    /// Move the closest-matching meeting to a newly resolved time. Returns
    /// `None` when no meeting matched; nothing is modified in that case.
    pub async fn reschedule(
        &self,
        meeting_query: &str,
        phrase: &str,
        timezone: Option<&str>,
        reference: Option<DateTime<Utc>>,
    ) -> Result<Option<Meeting>, SchedulerError> {
        let Some(meeting) = self.find_meetings(meeting_query).await?.into_iter().next() else {
            return Ok(None);
        };

        let tz = timezone.unwrap_or(&self.default_timezone);
        let moment = resolve_datetime(phrase, tz, reference.unwrap_or_else(Utc::now), None)?;

        let update = MeetingUpdate {
            start_time: Some(moment.utc.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
            ..MeetingUpdate::default()
        };
        self.ops
            .update_meeting(meeting.id, &update)
            .await
            .map_err(|err| SchedulerError::Remote(err.to_string()))?;
        Ok(Some(meeting))
    }

    /// Cancel the closest-matching meeting. Returns `None` (and deletes
    /// nothing) when no meeting matched.
    pub async fn cancel(&self, meeting_query: &str) -> Result<Option<Meeting>, SchedulerError> {
        let Some(meeting) = self.find_meetings(meeting_query).await?.into_iter().next() else {
            return Ok(None);
        };
        self.ops
            .delete_meeting(meeting.id)
            .await
            .map_err(|err| SchedulerError::Remote(err.to_string()))?;
        Ok(Some(meeting))
    }

    async fn upcoming_meetings(&self) -> Result<Vec<Meeting>, SchedulerError> {
        self.ops
            .list_meetings("me", &MeetingListQuery::default())
            .await
            .map_err(|err| SchedulerError::Remote(err.to_string()))
    }
}

fn format_start(request: &ScheduleRequest) -> String {
    request.start.utc.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
