pub mod meeting;
pub mod recording;
pub mod user;
