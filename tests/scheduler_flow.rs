use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use zoomBridge::clients::zoom::{ClientError, MeetingOps};
use zoomBridge::models::meeting::{Meeting, MeetingDraft, MeetingListQuery, MeetingUpdate};
use zoomBridge::service::scheduler::{ScheduleInput, SchedulerError, SchedulerService};

fn meeting(id: u64, topic: &str) -> Meeting {
    Meeting {
        id,
        topic: topic.to_string(),
        start_time: Some("2025-10-20T09:00:00Z".to_string()),
        duration: Some(30),
        timezone: None,
        agenda: None,
        join_url: None,
        user_email: None,
        user_name: None,
    }
}

/// Scripted remote side: serves a fixed meeting list and records every
/// mutation instead of calling any network.
struct ScriptedOps {
    upcoming: Vec<Meeting>,
    created: Mutex<Vec<MeetingDraft>>,
    updated: Mutex<Vec<(u64, MeetingUpdate)>>,
    deleted: Mutex<Vec<u64>>,
}

impl ScriptedOps {
    fn new(upcoming: Vec<Meeting>) -> Self {
        Self {
            upcoming,
            created: Mutex::new(Vec::new()),
            updated: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MeetingOps for ScriptedOps {
    async fn list_meetings(
        &self,
        _user_id: &str,
        _query: &MeetingListQuery,
    ) -> Result<Vec<Meeting>, ClientError> {
        Ok(self.upcoming.clone())
    }

    async fn get_meeting(&self, meeting_id: u64) -> Result<Meeting, ClientError> {
        self.upcoming
            .iter()
            .find(|m| m.id == meeting_id)
            .cloned()
            .ok_or_else(|| "meeting not found".into())
    }

    async fn create_meeting(
        &self,
        _user_id: &str,
        draft: &MeetingDraft,
    ) -> Result<Meeting, ClientError> {
        self.created.lock().unwrap().push(draft.clone());
        let mut booked = meeting(999, &draft.topic);
        booked.start_time = Some(draft.start_time.clone());
        booked.duration = Some(draft.duration);
        Ok(booked)
    }

    async fn update_meeting(
        &self,
        meeting_id: u64,
        update: &MeetingUpdate,
    ) -> Result<(), ClientError> {
        self.updated.lock().unwrap().push((meeting_id, update.clone()));
        Ok(())
    }

    async fn delete_meeting(&self, meeting_id: u64) -> Result<(), ClientError> {
        self.deleted.lock().unwrap().push(meeting_id);
        Ok(())
    }
}

fn contacts_csv() -> String {
    let dir = std::env::temp_dir().join("zoom_bridge_scheduler_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("contacts.csv");
    std::fs::write(
        &path,
        "name,email,phone,company\n\
         Sarah Johnson,sarah.johnson@acme.com,555-0100,Acme\n\
         John Smith,john.smith@globex.com,,Globex\n",
    )
    .unwrap();
    path.to_str().unwrap().to_string()
}

fn service(ops: Arc<ScriptedOps>) -> SchedulerService {
    SchedulerService::new(ops, contacts_csv(), "UTC".to_string())
}

fn reference() -> chrono::DateTime<Utc> {
    // Thursday.
    Utc.with_ymd_and_hms(2025, 10, 16, 0, 0, 0).unwrap()
}

#[tokio::test]
async fn schedules_a_meeting_with_a_matched_contact() {
    let ops = Arc::new(ScriptedOps::new(vec![]));
    let scheduler = service(ops.clone());

    let outcome = scheduler
        .schedule(&ScheduleInput {
            phrase: "Friday at 1:30pm".to_string(),
            duration_text: Some("45 minutes".to_string()),
            contact_query: Some("sarah".to_string()),
            timezone: None,
            reference: Some(reference()),
        })
        .await
        .unwrap();

    let created = ops.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].topic, "Meeting with Sarah Johnson");
    assert_eq!(created[0].start_time, "2025-10-17T13:30:00Z");
    assert_eq!(created[0].duration, 45);
    assert_eq!(
        created[0].agenda.as_deref(),
        Some("Invitee: sarah.johnson@acme.com")
    );
    assert_eq!(outcome.meeting.id, 999);
}

#[tokio::test]
async fn unknown_contact_books_nothing() {
    let ops = Arc::new(ScriptedOps::new(vec![]));
    let scheduler = service(ops.clone());

    let err = scheduler
        .schedule(&ScheduleInput {
            phrase: "tomorrow at 10am".to_string(),
            contact_query: Some("zzz".to_string()),
            reference: Some(reference()),
            ..ScheduleInput::default()
        })
        .await;

    assert!(matches!(err, Err(SchedulerError::Resolve(_))));
    assert!(ops.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unresolvable_phrase_books_nothing() {
    let ops = Arc::new(ScriptedOps::new(vec![]));
    let scheduler = service(ops.clone());

    let err = scheduler
        .schedule(&ScheduleInput {
            phrase: "next Friday".to_string(),
            reference: Some(reference()),
            ..ScheduleInput::default()
        })
        .await;

    assert!(matches!(err, Err(SchedulerError::Resolve(_))));
    assert!(ops.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn finds_meetings_by_topic_fragment() {
    let ops = Arc::new(ScriptedOps::new(vec![
        meeting(1, "Team Standup"),
        meeting(2, "Think Tank Meeting"),
    ]));
    let scheduler = service(ops);

    let found = scheduler.find_meetings("think tank").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 2);
}

#[tokio::test]
async fn no_meeting_match_is_empty_not_an_error() {
    let ops = Arc::new(ScriptedOps::new(vec![meeting(1, "Team Standup")]));
    let scheduler = service(ops);

    let found = scheduler.find_meetings("budget review").await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn reschedule_moves_the_matched_meeting() {
    let ops = Arc::new(ScriptedOps::new(vec![meeting(2, "Think Tank Meeting")]));
    let scheduler = service(ops.clone());

    let moved = scheduler
        .reschedule("think tank", "tomorrow at 10am", None, Some(reference()))
        .await
        .unwrap();

    assert_eq!(moved.map(|m| m.id), Some(2));
    let updated = ops.updated.lock().unwrap();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].0, 2);
    assert_eq!(
        updated[0].1.start_time.as_deref(),
        Some("2025-10-17T10:00:00Z")
    );
}

#[tokio::test]
async fn cancel_without_a_match_deletes_nothing() {
    let ops = Arc::new(ScriptedOps::new(vec![meeting(1, "Team Standup")]));
    let scheduler = service(ops.clone());

    let cancelled = scheduler.cancel("budget review").await.unwrap();
    assert!(cancelled.is_none());
    assert!(ops.deleted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn cancel_deletes_the_matched_meeting() {
    let ops = Arc::new(ScriptedOps::new(vec![meeting(2, "Think Tank Meeting")]));
    let scheduler = service(ops.clone());

    let cancelled = scheduler.cancel("think tank").await.unwrap();
    assert_eq!(cancelled.map(|m| m.id), Some(2));
    assert_eq!(*ops.deleted.lock().unwrap(), vec![2]);
}
