//! # Specchio (Identity Provider Mirror)
//!
//! `specchio` is a small HTTP gateway in front of a managed identity
//! provider (an AWS Cognito user pool). It forwards registration,
//! confirmation, login and deletion requests to the provider and mirrors a
//! subset of user state (username, email, confirmation time) in one local
//! Postgres table.
//!
//! ## Registration flow
//!
//! Registration is the only multi-step operation: a local uniqueness check
//! by email, then the provider `SignUp` call, then the local insert — in
//! that order. The two writes are not transactional: if the local insert
//! fails after a successful `SignUp`, the remote account is not rolled
//! back. The gap is documented, surfaced to callers, and never repaired in
//! the background.
//!
//! ## Deletion asymmetry
//!
//! `DELETE /delete-user/:username` removes only the local mirror row. The
//! remote account stays intact and remains authenticable.

pub mod cli;
pub mod error;
pub mod idp;
pub mod registration;
pub mod specchio;
pub mod users;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
