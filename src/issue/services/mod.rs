//! Application services for issue triage orchestration.

mod commands;
mod config;

pub use commands::{
    AddCommentRequest, ChangeIssueStateRequest, CreateIssueRequest, IssueCommandService,
    IssueServiceError, IssueServiceResult, LinkIssuesRequest,
};
pub use config::IssueServiceConfig;
