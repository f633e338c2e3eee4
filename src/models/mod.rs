pub mod submission;

pub use submission::{Document, Submission, UpsertAck};
