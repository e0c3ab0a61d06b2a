//! Mapping of Calendar API responses onto `CalendarError`.

use serde::de::DeserializeOwned;

use crate::error::CalendarError;

pub(crate) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, CalendarError> {
    let response = check_status(response).await?;
    response
        .json()
        .await
        .map_err(|e| CalendarError::ApiError(format!("JSON parse error: {}", e)))
}

/// For endpoints that answer with an empty body (e.g. 204 on delete).
pub(crate) async fn handle_empty(response: reqwest::Response) -> Result<(), CalendarError> {
    check_status(response).await.map(|_| ())
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CalendarError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        401 => Err(CalendarError::TokenExpired),
        403 => Err(CalendarError::AuthRequired),
        404 | 410 => {
            let text = response.text().await.unwrap_or_default();
            Err(CalendarError::NotFound(text))
        }
        409 | 412 => Err(CalendarError::Conflict),
        429 => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(CalendarError::RateLimited(retry_after))
        }
        _ => {
            let text = response.text().await.unwrap_or_default();
            Err(CalendarError::ApiError(format!("{}: {}", status, text)))
        }
    }
}
