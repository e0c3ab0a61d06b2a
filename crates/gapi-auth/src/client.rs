//! HTTP client that attaches bearer tokens to every request.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder};

use crate::error::AuthError;
use crate::token::TokenSource;

/// A `reqwest::Client` paired with a token source.
///
/// Cheap to clone; the calendar and sheets services each keep their own copy.
#[derive(Clone)]
pub struct AuthorizedClient {
    client: reqwest::Client,
    tokens: Arc<dyn TokenSource>,
}

impl AuthorizedClient {
    pub fn new(tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            client: reqwest::Client::new(),
            tokens,
        }
    }

    /// Start a request with a fresh `Authorization: Bearer` header.
    pub async fn request(&self, method: Method, url: &str) -> Result<RequestBuilder, AuthError> {
        let token = self.tokens.access_token().await?;
        Ok(self.client.request(method, url).bearer_auth(token))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::token::StaticToken;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_request_carries_bearer_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("Authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = AuthorizedClient::new(Arc::new(StaticToken::new("test_token")));
        let response = client
            .request(Method::GET, &format!("{}/ping", mock_server.uri()))
            .await
            .unwrap()
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 204);
    }
}
