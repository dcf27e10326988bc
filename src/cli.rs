use clap::{Parser, Subcommand};
use inquire::Text;

use crate::clients::zoom::ZoomOps;
use crate::handlers::http::AppState;
use crate::service::scheduler::ScheduleInput;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Book a meeting from a natural-language phrase
    Schedule {
        /// e.g. "next Friday at 2pm"; prompted for interactively when omitted
        phrase: Option<String>,
        /// e.g. "45 minutes" or "1.5 hours"
        #[arg(long)]
        duration: Option<String>,
        /// Fuzzy contact query, e.g. a first name
        #[arg(long = "with")]
        contact: Option<String>,
        #[arg(long)]
        timezone: Option<String>,
    },
    /// Fuzzy-search upcoming meetings by topic
    Find { query: String },
    /// Cancel the closest-matching upcoming meeting
    Cancel { query: String },
    /// List meetings for a date (default today)
    Meetings {
        #[arg(long)]
        date: Option<String>,
    },
}

pub async fn cli(state: &AppState) {
    // Fine to panic here
    let cli = Cli::parse();
    match cli.command {
        Commands::Schedule {
            phrase,
            duration,
            contact,
            timezone,
        } => {
            let phrase = match phrase {
                Some(phrase) => phrase,
                None => match Text::new("When should the meeting be?").prompt() {
                    Ok(phrase) => phrase,
                    Err(_) => {
                        println!("No scheduling phrase supplied");
                        return;
                    }
                },
            };
            let input = ScheduleInput {
                phrase,
                duration_text: duration,
                contact_query: contact,
                timezone,
                reference: None,
            };
            match state.scheduler.schedule(&input).await {
                Ok(outcome) => {
                    println!("Booked: {}", outcome.request.describe());
                    if let Some(url) = outcome.meeting.join_url {
                        println!("Join URL: {}", url);
                    }
                }
                Err(e) => println!("Failed to schedule meeting: {}", e),
            }
        }
        Commands::Find { query } => match state.scheduler.find_meetings(&query).await {
            Ok(meetings) if meetings.is_empty() => println!("No meetings matched \"{}\"", query),
            Ok(meetings) => {
                for meeting in meetings {
                    println!(
                        "{}  {}  {}",
                        meeting.id,
                        meeting.start_time.as_deref().unwrap_or("-"),
                        meeting.topic
                    );
                }
            }
            Err(e) => println!("Failed to search meetings: {}", e),
        },
        Commands::Cancel { query } => match state.scheduler.cancel(&query).await {
            Ok(Some(meeting)) => println!("Cancelled \"{}\" ({})", meeting.topic, meeting.id),
            Ok(None) => println!("No meeting matched \"{}\"; nothing cancelled", query),
            Err(e) => println!("Failed to cancel meeting: {}", e),
        },
        Commands::Meetings { date } => {
            let date = date.unwrap_or_else(|| {
                chrono::Utc::now()
                    .with_timezone(&state.default_tz)
                    .format("%Y-%m-%d")
                    .to_string()
            });
            match state.zoom.meetings_on(&date, None).await {
                Ok(meetings) if meetings.is_empty() => println!("No meetings on {}", date),
                Ok(meetings) => {
                    for meeting in meetings {
                        println!(
                            "{}  {}  {}",
                            meeting.id,
                            meeting.start_time.as_deref().unwrap_or("-"),
                            meeting.topic
                        );
                    }
                }
                Err(e) => println!("Failed to list meetings: {}", e),
            }
        }
    }
}
