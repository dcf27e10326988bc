use std::convert::Infallible;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::json;
use warp::http::StatusCode;
use warp::{Filter, Reply};

use crate::clients::zoom::{MeetingOps, ZoomOps};
use crate::resolver::error::ResolveError;
use crate::service::scheduler::{ScheduleInput, SchedulerError, SchedulerService};

pub struct AppState {
    pub zoom: Arc<dyn ZoomOps>,
    pub scheduler: Arc<SchedulerService>,
    pub default_tz: Tz,
}

#[derive(Debug, Deserialize)]
struct TodayQuery {
    date: Option<String>,
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsersQuery {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordingsQuery {
    from_date: Option<String>,
    to_date: Option<String>,
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScheduleBody {
    phrase: String,
    duration: Option<String>,
    contact: Option<String>,
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FindBody {
    query: String,
}

pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| {
            warp::reply::json(&json!({
                "status": "healthy",
                "timestamp": Utc::now().to_rfc3339(),
            }))
        });

    let today = warp::path!("api" / "meetings" / "today")
        .and(warp::get())
        .and(warp::query::<TodayQuery>())
        .and(with_state(state.clone()))
        .and_then(handle_today);

    let meeting = warp::path!("api" / "meetings" / u64)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handle_meeting);

    let past_meeting = warp::path!("api" / "meetings" / u64 / "past")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handle_past_meeting);

    let summary = warp::path!("api" / "meetings" / u64 / "summary")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handle_summary);

    let find = warp::path!("api" / "meetings" / "find")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handle_find);

    let schedule = warp::path!("api" / "schedule")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handle_schedule);

    let users = warp::path!("api" / "users")
        .and(warp::get())
        .and(warp::query::<UsersQuery>())
        .and(with_state(state.clone()))
        .and_then(handle_users);

    let user = warp::path!("api" / "users" / String)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handle_user);

    let recordings = warp::path!("api" / "recordings")
        .and(warp::get())
        .and(warp::query::<RecordingsQuery>())
        .and(with_state(state.clone()))
        .and_then(handle_recordings);

    let transcript = warp::path!("api" / "recordings" / String / "transcript")
        .and(warp::get())
        .and(with_state(state))
        .and_then(handle_transcript);

    health
        .or(today)
        .or(find)
        .or(meeting)
        .or(past_meeting)
        .or(summary)
        .or(schedule)
        .or(users)
        .or(user)
        .or(recordings)
        .or(transcript)
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

type JsonReply = warp::reply::WithStatus<warp::reply::Json>;

async fn handle_today(
    query: TodayQuery,
    state: Arc<AppState>,
) -> Result<JsonReply, Infallible> {
    let date = match &query.date {
        Some(date) => {
            if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                return Ok(error_reply(
                    StatusCode::BAD_REQUEST,
                    "Invalid date format. Use YYYY-MM-DD",
                ));
            }
            date.clone()
        }
        None => Utc::now()
            .with_timezone(&state.default_tz)
            .format("%Y-%m-%d")
            .to_string(),
    };

    match state.zoom.meetings_on(&date, query.user_id.as_deref()).await {
        Ok(meetings) => Ok(ok_reply(&json!({
            "date": date,
            "total_meetings": meetings.len(),
            "meetings": meetings,
        }))),
        Err(err) => Ok(error_reply(StatusCode::BAD_GATEWAY, &err.to_string())),
    }
}

async fn handle_meeting(meeting_id: u64, state: Arc<AppState>) -> Result<JsonReply, Infallible> {
    match state.zoom.get_meeting(meeting_id).await {
        Ok(meeting) => Ok(ok_reply(&json!(meeting))),
        Err(err) => Ok(error_reply(StatusCode::BAD_GATEWAY, &err.to_string())),
    }
}

async fn handle_past_meeting(
    meeting_id: u64,
    state: Arc<AppState>,
) -> Result<JsonReply, Infallible> {
    match state.zoom.past_meeting(meeting_id).await {
        Ok(details) => Ok(ok_reply(&details)),
        Err(err) => Ok(error_reply(StatusCode::BAD_GATEWAY, &err.to_string())),
    }
}

async fn handle_summary(meeting_id: u64, state: Arc<AppState>) -> Result<JsonReply, Infallible> {
    match state.zoom.meeting_summary(meeting_id).await {
        Ok(Some(summary)) => Ok(ok_reply(&json!({
            "meeting_id": meeting_id,
            "summary_available": true,
            "summary": summary,
        }))),
        // Summaries only appear some time after the meeting ends.
        Ok(None) => Ok(ok_reply(&json!({
            "meeting_id": meeting_id,
            "summary_available": false,
        }))),
        Err(err) => Ok(error_reply(StatusCode::BAD_GATEWAY, &err.to_string())),
    }
}

async fn handle_find(body: FindBody, state: Arc<AppState>) -> Result<JsonReply, Infallible> {
    match state.scheduler.find_meetings(&body.query).await {
        // Zero matches is an ordinary empty listing.
        Ok(meetings) => Ok(ok_reply(&json!({
            "query": body.query,
            "total_matches": meetings.len(),
            "meetings": meetings,
        }))),
        Err(err) => Ok(scheduler_error_reply(err)),
    }
}

async fn handle_schedule(body: ScheduleBody, state: Arc<AppState>) -> Result<JsonReply, Infallible> {
    let input = ScheduleInput {
        phrase: body.phrase,
        duration_text: body.duration,
        contact_query: body.contact,
        timezone: body.timezone,
        reference: None,
    };
    match state.scheduler.schedule(&input).await {
        Ok(outcome) => Ok(ok_reply(&json!({
            "meeting": outcome.meeting,
            "resolved": {
                "start": outcome.request.start.utc.to_rfc3339(),
                "timezone": outcome.request.start.tz.name(),
                "duration_minutes": outcome.request.duration_minutes,
                "contact": outcome.request.matched_contact,
                "summary": outcome.request.describe(),
            },
        }))),
        Err(err) => Ok(scheduler_error_reply(err)),
    }
}

async fn handle_users(query: UsersQuery, state: Arc<AppState>) -> Result<JsonReply, Infallible> {
    let status = query.status.as_deref().unwrap_or("active");
    match state.zoom.list_users(status).await {
        Ok(users) => Ok(ok_reply(&json!({
            "total_users": users.len(),
            "users": users,
        }))),
        Err(err) => Ok(error_reply(StatusCode::BAD_GATEWAY, &err.to_string())),
    }
}

async fn handle_user(user_id: String, state: Arc<AppState>) -> Result<JsonReply, Infallible> {
    match state.zoom.get_user(&user_id).await {
        Ok(user) => Ok(ok_reply(&json!(user))),
        Err(err) => Ok(error_reply(StatusCode::BAD_GATEWAY, &err.to_string())),
    }
}

async fn handle_transcript(
    recording_id: String,
    state: Arc<AppState>,
) -> Result<JsonReply, Infallible> {
    match state.zoom.recording_transcript(&recording_id).await {
        Ok(segments) => Ok(ok_reply(&json!({
            "recording_id": recording_id,
            "total_segments": segments.len(),
            "segments": segments,
        }))),
        Err(err) => Ok(error_reply(StatusCode::BAD_GATEWAY, &err.to_string())),
    }
}

async fn handle_recordings(
    query: RecordingsQuery,
    state: Arc<AppState>,
) -> Result<JsonReply, Infallible> {
    let user_id = query.user_id.as_deref().unwrap_or("me");
    let result = state
        .zoom
        .list_recordings(user_id, query.from_date.as_deref(), query.to_date.as_deref())
        .await;
    match result {
        Ok(recordings) => Ok(ok_reply(&json!({
            "total_recordings": recordings.len(),
            "recordings": recordings,
        }))),
        Err(err) => Ok(error_reply(StatusCode::BAD_GATEWAY, &err.to_string())),
    }
}

fn ok_reply(value: &serde_json::Value) -> JsonReply {
    warp::reply::with_status(warp::reply::json(value), StatusCode::OK)
}

fn error_reply(status: StatusCode, message: &str) -> JsonReply {
    warp::reply::with_status(warp::reply::json(&json!({ "error": message })), status)
}

fn scheduler_error_reply(err: SchedulerError) -> JsonReply {
    let status = match &err {
        SchedulerError::Resolve(ResolveError::ContactNotFound(_)) => StatusCode::NOT_FOUND,
        SchedulerError::Resolve(_) => StatusCode::BAD_REQUEST,
        SchedulerError::Roster(_) => StatusCode::INTERNAL_SERVER_ERROR,
        SchedulerError::Remote(_) => StatusCode::BAD_GATEWAY,
    };
    error_reply(status, &err.to_string())
}
