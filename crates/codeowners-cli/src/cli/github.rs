//! Team-existence checks backed by the GitHub REST API.
//!
//! Provides the octocrab-based implementation of the core's `TeamChecker`
//! trait, plus a stand-in used when no credentials are configured.

use async_trait::async_trait;
use codeowners_query_core::{TeamCheckError, TeamChecker};
use http::StatusCode;

/// A wrapper around `octocrab::Octocrab` that implements `TeamChecker`.
///
/// Needed because of the orphan rule: neither the trait nor the client
/// type is local to this crate.
pub struct OctocrabTeamChecker(pub octocrab::Octocrab);

impl OctocrabTeamChecker {
    /// Creates a new checker from an Octocrab instance.
    pub fn new(client: octocrab::Octocrab) -> Self {
        Self(client)
    }
}

/// Extracts the HTTP status code from an octocrab error.
fn extract_status_code(error: &octocrab::Error) -> Option<StatusCode> {
    match error {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code),
        _ => None,
    }
}

#[async_trait]
impl TeamChecker for OctocrabTeamChecker {
    async fn team_exists(&self, org: &str, team: &str) -> Result<bool, TeamCheckError> {
        match self.0.teams(org).get(team).await {
            Ok(_) => Ok(true),
            Err(e) => match extract_status_code(&e) {
                Some(StatusCode::NOT_FOUND) => Ok(false),
                Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                    Err(TeamCheckError::AuthError(e.to_string()))
                }
                Some(_) => Err(TeamCheckError::ApiError(e.to_string())),
                None => Err(TeamCheckError::NetworkError(e.to_string())),
            },
        }
    }
}

/// Checker used without GitHub credentials; every lookup is inconclusive.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnauthenticatedTeamChecker;

#[async_trait]
impl TeamChecker for UnauthenticatedTeamChecker {
    async fn team_exists(&self, _org: &str, _team: &str) -> Result<bool, TeamCheckError> {
        Err(TeamCheckError::Unavailable(
            "no GitHub credentials configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_octocrab(base_uri: &str) -> octocrab::Octocrab {
        octocrab::Octocrab::builder()
            .base_uri(base_uri)
            .unwrap()
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn team_exists() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/orgs/myorg/teams/myteam"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "myteam",
                "id": 12345,
                "node_id": "MDQ6VGVhbTEyMzQ1",
                "slug": "myteam",
                "description": "Test team",
                "privacy": "closed",
                "permission": "pull",
                "url": "https://api.github.com/orgs/myorg/teams/myteam",
                "html_url": "https://github.com/orgs/myorg/teams/myteam",
                "members_url": "https://api.github.com/orgs/myorg/teams/myteam/members{/member}",
                "repositories_url": "https://api.github.com/orgs/myorg/teams/myteam/repos"
            })))
            .mount(&mock_server)
            .await;

        let checker = OctocrabTeamChecker::new(create_octocrab(&mock_server.uri()));
        assert!(checker.team_exists("myorg", "myteam").await.unwrap());
    }

    #[tokio::test]
    async fn team_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/orgs/myorg/teams/ghostteam"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&mock_server)
            .await;

        let checker = OctocrabTeamChecker::new(create_octocrab(&mock_server.uri()));
        assert!(!checker.team_exists("myorg", "ghostteam").await.unwrap());
    }

    #[tokio::test]
    async fn insufficient_authorization() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/orgs/myorg/teams/secret"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "message": "Resource not accessible by integration",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&mock_server)
            .await;

        let checker = OctocrabTeamChecker::new(create_octocrab(&mock_server.uri()));
        let err = checker.team_exists("myorg", "secret").await.unwrap_err();
        assert!(matches!(err, TeamCheckError::AuthError(_)));
    }

    #[tokio::test]
    async fn server_error_is_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/orgs/myorg/teams/flaky"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "message": "Server Error",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&mock_server)
            .await;

        let checker = OctocrabTeamChecker::new(create_octocrab(&mock_server.uri()));
        let err = checker.team_exists("myorg", "flaky").await.unwrap_err();
        assert!(matches!(err, TeamCheckError::ApiError(_)));
    }

    #[tokio::test]
    async fn unauthenticated_checker_is_inconclusive() {
        let err = UnauthenticatedTeamChecker
            .team_exists("myorg", "myteam")
            .await
            .unwrap_err();
        assert!(matches!(err, TeamCheckError::Unavailable(_)));
    }
}
