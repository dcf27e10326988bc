use std::fs;
use std::io;

use crate::models::meeting::Meeting;
use crate::resolver::matcher::CandidateRecord;

/// One row of the personal contact roster, loaded from a flat CSV file with a
/// `name,email,phone,company` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
}

/// Load the contact roster. A missing file is an empty roster, not an error;
/// rows without a name or email are skipped.
pub fn load_contacts(path: &str) -> io::Result<Vec<Contact>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };
    Ok(parse_contacts(&content))
}

fn parse_contacts(content: &str) -> Vec<Contact> {
    let mut lines = content.lines();
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let columns: Vec<String> = header
        .split(',')
        .map(|col| col.trim().to_lowercase())
        .collect();
    let index_of = |name: &str| columns.iter().position(|col| col == name);
    let (Some(name_idx), Some(email_idx)) = (index_of("name"), index_of("email")) else {
        return Vec::new();
    };
    let phone_idx = index_of("phone");
    let company_idx = index_of("company");

    let mut contacts = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').map(|cell| cell.trim()).collect();
        let cell = |idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| cells.get(i))
                .map(|value| unquote(value))
                .filter(|value| !value.is_empty())
        };
        let (Some(name), Some(email)) = (cell(Some(name_idx)), cell(Some(email_idx))) else {
            continue;
        };
        contacts.push(Contact {
            name,
            email,
            phone: cell(phone_idx),
            company: cell(company_idx),
        });
    }
    contacts
}

fn unquote(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Snapshot the contact roster as matcher candidates.
pub fn contact_candidates(contacts: &[Contact]) -> Vec<CandidateRecord> {
    contacts
        .iter()
        .map(|contact| {
            let mut record = CandidateRecord::new()
                .with_field("name", &contact.name)
                .with_field("email", &contact.email);
            if let Some(phone) = &contact.phone {
                record = record.with_field("phone", phone);
            }
            if let Some(company) = &contact.company {
                record = record.with_field("company", company);
            }
            record
        })
        .collect()
}

/// Snapshot a meeting listing as matcher candidates. The id and start time
/// ride along so a match can be traced back to the live meeting.
pub fn meeting_candidates(meetings: &[Meeting]) -> Vec<CandidateRecord> {
    meetings
        .iter()
        .map(|meeting| {
            let mut record = CandidateRecord::new()
                .with_field("topic", &meeting.topic)
                .with_field("id", &meeting.id.to_string());
            if let Some(agenda) = &meeting.agenda {
                record = record.with_field("agenda", agenda);
            }
            if let Some(start) = &meeting.start_time {
                record = record.with_field("start_time", start);
            }
            record
        })
        .collect()
}
