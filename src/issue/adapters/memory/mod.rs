//! In-memory adapters for issue triage.

mod issue;

pub use issue::InMemoryIssueRepository;
