pub mod compose;
pub mod datetime;
pub mod duration;
pub mod error;
pub mod matcher;

pub use compose::{compose, ComposeRequest, Rosters, ScheduleRequest};
pub use datetime::{resolve_datetime, ResolvedMoment};
pub use duration::{resolve_duration, DEFAULT_DURATION_MINUTES};
pub use error::ResolveError;
pub use matcher::{rank, CandidateRecord, FieldWeights, Match, MatchResult, MATCH_THRESHOLD};
