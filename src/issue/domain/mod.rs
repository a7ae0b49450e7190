//! Domain model for issue triage.
//!
//! The issue domain models identifiers, the lifecycle state machine, typed
//! links between issues, and validated construction while keeping all
//! persistence concerns outside of the domain boundary.

mod builder;
mod command;
mod comment;
mod error;
mod ids;
mod issue;
mod link;
mod state;
mod user;
mod view;

pub use builder::IssueBuilder;
pub use command::{CommandKind, StateChangeCommand};
pub use comment::{Comment, MAX_COMMENT_LENGTH};
pub use error::{IssueDomainError, ParseIssueIdentifierError, ParseIssueStateError};
pub use ids::{ConcurrencyToken, IssueIdentifier, IssueNumber, ProjectCode};
pub use issue::{
    Issue, IssueType, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH, PersistedIssueData, Priority,
    link_issues,
};
pub use link::{IssueLink, LinkType};
pub use state::{ClosureReason, IssueState};
pub use user::{Maintainer, TriageUser};
pub use view::{IssueView, UserView};
