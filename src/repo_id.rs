use crate::error::UpdateError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl RepoSlug {
    /// Parse a repository from various formats:
    /// - "owner/repo"
    /// - "github.com/owner/repo"
    /// - "https://github.com/owner/repo"
    ///
    /// Only the last two path segments are used.
    pub fn parse(input: &str) -> Result<Self, UpdateError> {
        let invalid = |reason: &str| UpdateError::InvalidRepo {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(invalid("repository cannot be empty"));
        }

        if trimmed.starts_with('-') {
            return Err(invalid("it looks like a CLI flag"));
        }

        let parts: Vec<&str> = trimmed.split('/').collect();
        if parts.len() < 2 {
            return Err(invalid("expected 'owner/repo'"));
        }

        let owner = parts[parts.len() - 2];
        let repo = parts[parts.len() - 1].trim_end_matches(".git");
        if owner.is_empty() || repo.is_empty() {
            return Err(invalid("owner and repo must both be non-empty"));
        }

        Ok(RepoSlug {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Get: full repository string (owner/repo)
    pub fn full_repo(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
