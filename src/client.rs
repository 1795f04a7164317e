use log::debug;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::models::{Profile, RecommendationBundle};

/// Shown to the user for every failed recommendation fetch, whatever the cause.
pub const FETCH_FAILED_NOTICE: &str = "Make sure the recommendation service is running!";

/// Why a call to the recommendation service failed. The cause is kept for the
/// diagnostic log only.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// The remote recommendation service, as seen by the client.
pub trait RecommendationService: Send + Sync {
    fn recommend(&self, profile: &Profile) -> Result<RecommendationBundle, FetchError>;

    /// The service's welcome message, used as a liveness probe.
    fn health(&self) -> Result<String, FetchError>;
}

#[derive(Deserialize, Debug)]
struct WelcomeMessage {
    message: String,
}

pub struct HttpRecommendationService {
    client: Client,
    config: ClientConfig,
}

impl HttpRecommendationService {
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        // The blocking client defaults to a 30s timeout; only set one when configured.
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

impl RecommendationService for HttpRecommendationService {
    fn recommend(&self, profile: &Profile) -> Result<RecommendationBundle, FetchError> {
        let url = self.config.endpoint("recommend");
        debug!("POST {} {:?}", url, profile);

        let response = self
            .client
            .post(&url)
            .json(profile)
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        response
            .json::<RecommendationBundle>()
            .map_err(|source| FetchError::Decode { url, source })
    }

    fn health(&self) -> Result<String, FetchError> {
        let url = self.config.endpoint("");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        response
            .json::<WelcomeMessage>()
            .map(|welcome| welcome.message)
            .map_err(|source| FetchError::Decode { url, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Goal;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn scenario_profile() -> Profile {
        Profile {
            difficulty: 4,
            duration: 45,
            intensity: 2,
            goal: Goal::MuscleGain,
        }
    }

    async fn call_recommend(base_url: String) -> Result<RecommendationBundle, FetchError> {
        // The blocking client must not run on the async runtime's threads.
        tokio::task::spawn_blocking(move || {
            let service = HttpRecommendationService::new(&ClientConfig::with_base_url(base_url))?;
            service.recommend(&scenario_profile())
        })
        .await
        .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn posts_profile_once_and_decodes_bundle() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recommend"))
            .and(body_json(json!({"difficulty": 4, "duration": 45, "intensity": 2, "goal": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "workouts": [{"name": "HIIT Blast", "description": "...", "difficulty": 4, "duration": 45}],
                "nutrition": [{"name": "Protein Bowl", "description": "...", "calories": 550, "protein": 40}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let bundle = call_recommend(server.uri()).await.unwrap();
        assert_eq!(bundle.workouts[0].name, "HIIT Blast");
        assert_eq!(bundle.nutrition[0].calories, 550);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn server_error_maps_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recommend"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = call_recommend(server.uri()).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn malformed_body_maps_to_decode() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recommend"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"workouts": "nope"})))
            .mount(&server)
            .await;

        let err = call_recommend(server.uri()).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn health_reads_welcome_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Welcome to the Personalized Workout and Nutrition API"
            })))
            .mount(&server)
            .await;

        let base_url = server.uri();
        let message = tokio::task::spawn_blocking(move || {
            HttpRecommendationService::new(&ClientConfig::with_base_url(base_url))?.health()
        })
        .await
        .unwrap()
        .unwrap();
        assert!(message.starts_with("Welcome"));
    }

    #[test]
    fn unreachable_service_maps_to_transport() {
        let service =
            HttpRecommendationService::new(&ClientConfig::with_base_url("http://127.0.0.1:9")).unwrap();
        let err = service.recommend(&scenario_profile()).unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
