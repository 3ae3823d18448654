use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::protocol::{SolveRequest, SolveResponse};
use tracing::debug;
use url::Url;

use crate::{parse_solution_line, ExternalSolver, SolveFailure};

/// Posts the facelet string to `<base>/solve` and expects a [`SolveResponse`] body.
pub struct HttpSolver {
    http: Client,
    endpoint: Url,
}

impl HttpSolver {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base_url.trim())?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http,
            endpoint: base.join("solve")?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn classify_transport_error(err: reqwest::Error) -> SolveFailure {
    if err.is_connect() || err.is_timeout() {
        SolveFailure::Unavailable(err.to_string())
    } else {
        SolveFailure::Other(err.to_string())
    }
}

#[async_trait]
impl ExternalSolver for HttpSolver {
    async fn solve(&self, facelets: &str) -> Result<Vec<String>, SolveFailure> {
        debug!(endpoint = %self.endpoint, "posting cube to http solver");
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(&SolveRequest {
                facelets: facelets.to_string(),
            })
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = res.status();
        if matches!(
            status,
            StatusCode::NOT_FOUND | StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE
        ) {
            return Err(SolveFailure::Unavailable(format!(
                "solver endpoint answered {status}"
            )));
        }

        let body: Option<SolveResponse> = res.json().await.ok();
        match (status.is_success(), body) {
            (true, Some(response)) => response
                .into_tokens()
                .map(|tokens| parse_solution_line(&tokens.join(" ")))
                .map_err(|err| SolveFailure::Rejected(err.message)),
            (true, None) => Err(SolveFailure::Other(
                "solver returned an unreadable response body".to_string(),
            )),
            (false, Some(SolveResponse::Error(err))) if status.is_client_error() => {
                Err(SolveFailure::Rejected(err.message))
            }
            (false, _) if status.is_client_error() => Err(SolveFailure::Rejected(format!(
                "solver endpoint answered {status}"
            ))),
            (false, _) => Err(SolveFailure::Other(format!(
                "solver endpoint answered {status}"
            ))),
        }
    }

    fn backend_name(&self) -> &str {
        "http"
    }
}
