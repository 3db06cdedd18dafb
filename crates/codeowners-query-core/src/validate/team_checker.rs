//! Team-existence checker abstraction.
//!
//! The core never talks to GitHub itself. Callers inject an implementation
//! of [`TeamChecker`] (the CLI uses octocrab; tests use fakes).

use crate::error::TeamCheckError;
use async_trait::async_trait;

/// Answers whether a team exists within an organization.
///
/// # Example
///
/// ```rust,ignore
/// use codeowners_query_core::validate::TeamChecker;
/// use codeowners_query_core::error::TeamCheckError;
///
/// struct KnownTeams(Vec<(String, String)>);
///
/// #[async_trait::async_trait]
/// impl TeamChecker for KnownTeams {
///     async fn team_exists(&self, org: &str, team: &str) -> Result<bool, TeamCheckError> {
///         Ok(self.0.iter().any(|(o, t)| o == org && t == team))
///     }
/// }
/// ```
#[async_trait]
pub trait TeamChecker: Send + Sync {
    /// Checks if `@org/team` exists.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The team exists
    /// * `Ok(false)` - The team was not found
    /// * `Err(TeamCheckError)` - Existence could not be determined
    async fn team_exists(&self, org: &str, team: &str) -> Result<bool, TeamCheckError>;
}
