//! # syncwright-release
//!
//! Release housekeeping: pruning old version tags and generating a
//! changelog from the hosting service's revision history.

pub mod changelog;
pub mod error;
pub mod git;
pub mod history;
pub mod tags;

pub use changelog::{build_changelog, render_markdown, write_changelog, Release};
pub use error::ReleaseError;
pub use git::{GitRepo, TagStore};
pub use history::{GithubClient, PullRequest, RevisionHistory};
pub use tags::{delete_tags, plan_retention, DeletionOutcome, RetentionPlan, Tag, TagDeletion};
