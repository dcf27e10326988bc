use chrono::{DateTime, NaiveTime, Utc};

use crate::resolver::datetime::{resolve_datetime, ResolvedMoment};
use crate::resolver::duration::{resolve_duration, DEFAULT_DURATION_MINUTES};
use crate::resolver::error::ResolveError;
use crate::resolver::matcher::{rank, CandidateRecord, FieldWeights};

/// Everything the caller knows about one scheduling request, before
/// resolution. The reference instant keeps the composition deterministic.
#[derive(Debug, Clone)]
pub struct ComposeRequest<'a> {
    pub phrase: &'a str,
    pub duration_text: Option<&'a str>,
    pub timezone: &'a str,
    pub contact_query: Option<&'a str>,
    pub meeting_query: Option<&'a str>,
    pub reference: DateTime<Utc>,
    pub default_time: Option<NaiveTime>,
}

/// Per-call snapshots of the externally-owned rosters. The composer never
/// fetches or caches these itself.
#[derive(Debug, Clone, Copy)]
pub struct Rosters<'a> {
    pub contacts: &'a [CandidateRecord],
    pub meetings: &'a [CandidateRecord],
}

impl Rosters<'_> {
    pub fn empty() -> Rosters<'static> {
        Rosters {
            contacts: &[],
            meetings: &[],
        }
    }
}

/// The structured output handed to the scheduling collaborator.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub start: ResolvedMoment,
    pub duration_minutes: u32,
    pub matched_contact: Option<CandidateRecord>,
    pub matched_meeting: Option<CandidateRecord>,
}

impl ScheduleRequest {
    /// Human-readable rendering of the resolved start and duration, in the
    /// timezone the phrase was resolved in.
    pub fn describe(&self) -> String {
        let local = self.start.local();
        let mut text = format!(
            "{} for {} minutes",
            local.format("%A %Y-%m-%d at %H:%M (%Z)"),
            self.duration_minutes
        );
        if let Some(name) = self
            .matched_contact
            .as_ref()
            .and_then(|contact| contact.field("name"))
        {
            text.push_str(&format!(" with {}", name));
        }
        text
    }
}

/// Sequence the three resolvers into one `ScheduleRequest`.
///
/// An unreadable duration falls back to the documented default rather than
/// aborting. A contact query with no match above threshold is a hard error,
/// since the caller explicitly asked to book with someone; a meeting query
/// with no match is a normal empty outcome. Nothing is partially committed:
/// any required failure fails the whole composition.
pub fn compose(
    request: &ComposeRequest,
    rosters: &Rosters,
) -> Result<ScheduleRequest, ResolveError> {
    let start = resolve_datetime(
        request.phrase,
        request.timezone,
        request.reference,
        request.default_time,
    )?;

    let duration_minutes = match request.duration_text {
        Some(text) => resolve_duration(text).unwrap_or(DEFAULT_DURATION_MINUTES),
        None => DEFAULT_DURATION_MINUTES,
    };

    let matched_contact = match request.contact_query {
        Some(query) => {
            let ranked = rank(query, rosters.contacts, &FieldWeights::contacts());
            match ranked.into_iter().next() {
                Some(top) => Some(top.record),
                None => return Err(ResolveError::ContactNotFound(query.to_string())),
            }
        }
        None => None,
    };

    let matched_meeting = request.meeting_query.and_then(|query| {
        rank(query, rosters.meetings, &FieldWeights::meetings())
            .into_iter()
            .next()
            .map(|top| top.record)
    });

    Ok(ScheduleRequest {
        start,
        duration_minutes,
        matched_contact,
        matched_meeting,
    })
}
