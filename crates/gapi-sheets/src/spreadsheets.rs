//! Spreadsheet metadata and cell values.

use gapi_auth::AuthorizedClient;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::SheetsError;
use crate::types::*;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

#[derive(Clone)]
pub struct SpreadsheetsService {
    client: AuthorizedClient,
    base_url: String,
}

impl SpreadsheetsService {
    pub fn new(client: AuthorizedClient) -> Self {
        Self {
            client,
            base_url: SHEETS_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn spreadsheet_url(&self, spreadsheet_id: &str) -> String {
        format!(
            "{}/spreadsheets/{}",
            self.base_url,
            urlencoding::encode(spreadsheet_id),
        )
    }

    async fn get_spreadsheet(
        &self,
        spreadsheet_id: &str,
        fields: &str,
    ) -> Result<ApiSpreadsheet, SheetsError> {
        let response = self
            .client
            .request(Method::GET, &self.spreadsheet_url(spreadsheet_id))
            .await?
            .query(&[("fields", fields)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Title of the spreadsheet.
    #[instrument(skip(self), level = "info")]
    pub async fn title(&self, spreadsheet_id: &str) -> Result<String, SheetsError> {
        let spreadsheet = self.get_spreadsheet(spreadsheet_id, "properties.title").await?;
        Ok(spreadsheet
            .properties
            .map(|p| p.title)
            .unwrap_or_default())
    }

    /// Titles of the sheets (tabs), in display order.
    #[instrument(skip(self), level = "info")]
    pub async fn sheet_titles(&self, spreadsheet_id: &str) -> Result<Vec<String>, SheetsError> {
        let spreadsheet = self.get_spreadsheet(spreadsheet_id, "sheets.properties").await?;
        Ok(spreadsheet
            .sheets
            .into_iter()
            .filter_map(|sheet| sheet.properties)
            .map(|p| p.title)
            .collect())
    }

    /// Values of `ranges` (A1 notation, e.g. `"Sheet!A1:H9"`) as displayed.
    pub async fn values_formatted(
        &self,
        spreadsheet_id: &str,
        ranges: &[&str],
    ) -> Result<Vec<Row>, SheetsError> {
        self.batch_get(spreadsheet_id, ranges, ValueRenderOption::FormattedValue)
            .await
    }

    /// Values of `ranges` without formatting applied.
    pub async fn values_unformatted(
        &self,
        spreadsheet_id: &str,
        ranges: &[&str],
    ) -> Result<Vec<Row>, SheetsError> {
        self.batch_get(spreadsheet_id, ranges, ValueRenderOption::UnformattedValue)
            .await
    }

    /// Rows of every requested range, concatenated in request order.
    #[instrument(skip(self), level = "info")]
    pub async fn batch_get(
        &self,
        spreadsheet_id: &str,
        ranges: &[&str],
        render: ValueRenderOption,
    ) -> Result<Vec<Row>, SheetsError> {
        let url = format!("{}/values:batchGet", self.spreadsheet_url(spreadsheet_id));

        let mut query: Vec<(&str, &str)> = ranges.iter().map(|r| ("ranges", *r)).collect();
        query.push(("valueRenderOption", render.as_api_str()));

        let response = self
            .client
            .request(Method::GET, &url)
            .await?
            .query(&query)
            .send()
            .await?;

        let batch: BatchGetValuesResponse = self.handle_response(response).await?;
        let rows = batch.into_rows();
        tracing::debug!(rows = rows.len(), "Fetched values");
        Ok(rows)
    }

    /// Values matched by one A1-range data filter per entry of `a1_ranges`.
    #[instrument(skip(self), level = "info")]
    pub async fn values_by_data_filter(
        &self,
        spreadsheet_id: &str,
        a1_ranges: &[&str],
    ) -> Result<Vec<Row>, SheetsError> {
        let url = format!(
            "{}/values:batchGetByDataFilter",
            self.spreadsheet_url(spreadsheet_id)
        );

        let body = BatchGetByDataFilterRequest {
            data_filters: a1_ranges
                .iter()
                .map(|a1_range| DataFilter { a1_range: *a1_range })
                .collect(),
            value_render_option: ValueRenderOption::FormattedValue,
        };

        let response = self
            .client
            .request(Method::POST, &url)
            .await?
            .json(&body)
            .send()
            .await?;

        let batch: BatchGetByDataFilterResponse = self.handle_response(response).await?;
        Ok(batch.into_rows())
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, SheetsError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| SheetsError::ApiError(format!("JSON parse error: {}", e)))
        } else if status.as_u16() == 400 {
            let text = response.text().await.unwrap_or_default();
            Err(SheetsError::BadRequest(text))
        } else if status.as_u16() == 401 {
            Err(SheetsError::TokenExpired)
        } else if status.as_u16() == 403 {
            Err(SheetsError::AuthRequired)
        } else if status.as_u16() == 404 {
            let text = response.text().await.unwrap_or_default();
            Err(SheetsError::SpreadsheetNotFound(text))
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(SheetsError::RateLimited(retry_after))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(SheetsError::ApiError(format!("{}: {}", status, text)))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use gapi_auth::StaticToken;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> SpreadsheetsService {
        let client = AuthorizedClient::new(Arc::new(StaticToken::new("test_token")));
        SpreadsheetsService::new(client).with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_title() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/spreadsheets/ss1"))
            .and(header("Authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "properties": {"title": "test-spreadsheet"}
            })))
            .mount(&mock_server)
            .await;

        let title = service(&mock_server).title("ss1").await.unwrap();
        assert_eq!(title, "test-spreadsheet");
    }

    #[tokio::test]
    async fn test_title_of_unknown_spreadsheet() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/spreadsheets/fakeSpreadsheetId"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string("Requested entity was not found."),
            )
            .mount(&mock_server)
            .await;

        let result = service(&mock_server).title("fakeSpreadsheetId").await;
        assert!(matches!(result, Err(SheetsError::SpreadsheetNotFound(_))));
    }

    #[tokio::test]
    async fn test_sheet_titles() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/spreadsheets/ss1"))
            .and(query_param("fields", "sheets.properties"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sheets": [
                    {"properties": {"sheetId": 0, "title": "Sheet1"}},
                    {"properties": {"sheetId": 1, "title": "Sheet 2"}}
                ]
            })))
            .mount(&mock_server)
            .await;

        let titles = service(&mock_server).sheet_titles("ss1").await.unwrap();
        assert_eq!(titles, vec!["Sheet1", "Sheet 2"]);
    }

    #[tokio::test]
    async fn test_values_formatted_flattens_ranges() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/spreadsheets/ss1/values:batchGet"))
            .and(query_param("valueRenderOption", "FORMATTED_VALUE"))
            .and(query_param("ranges", "'Sheet 2'!A1:D2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "spreadsheetId": "ss1",
                "valueRanges": [
                    {
                        "range": "'Sheet 2'!A1:D2",
                        "values": [["a", "b", "c", "d"], ["1", "2", "3", "4"]]
                    },
                    {"range": "Sheet1!A5:D5", "values": [["x", "y", "z", "w"]]}
                ]
            })))
            .mount(&mock_server)
            .await;

        let rows = service(&mock_server)
            .values_formatted("ss1", &["'Sheet 2'!A1:D2", "A5:D5"])
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2][0], "x");
    }

    #[tokio::test]
    async fn test_values_unformatted() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/spreadsheets/ss1/values:batchGet"))
            .and(query_param("valueRenderOption", "UNFORMATTED_VALUE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "valueRanges": [{"range": "Sheet1!A1:B1", "values": [[1.5, true]]}]
            })))
            .mount(&mock_server)
            .await;

        let rows = service(&mock_server)
            .values_unformatted("ss1", &["A1:B1"])
            .await
            .unwrap();
        assert_eq!(rows, vec![vec![serde_json::json!(1.5), serde_json::json!(true)]]);
    }

    #[tokio::test]
    async fn test_bad_range() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/spreadsheets/ss1/values:batchGet"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Unable to parse range: Nope"))
            .mount(&mock_server)
            .await;

        let result = service(&mock_server).values_formatted("ss1", &["Nope!"]).await;
        assert!(matches!(result, Err(SheetsError::BadRequest(msg)) if msg.contains("parse range")));
    }

    #[tokio::test]
    async fn test_values_by_data_filter() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/spreadsheets/ss1/values:batchGetByDataFilter"))
            .and(body_json(serde_json::json!({
                "dataFilters": [{"a1Range": "Title"}],
                "valueRenderOption": "FORMATTED_VALUE"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "valueRanges": [
                    {"valueRange": {"range": "Sheet1!A1:A2", "values": [["Title"], ["Hamlet"]]},
                     "dataFilters": [{"a1Range": "Title"}]}
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let rows = service(&mock_server)
            .values_by_data_filter("ss1", &["Title"])
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "Hamlet");
    }
}
