//! Sheets API types.

use serde::{Deserialize, Serialize};

/// One row of cell values as returned by the API.
pub type Row = Vec<serde_json::Value>;

/// How cell values are rendered in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueRenderOption {
    /// Values as displayed in the UI (formatted numbers, dates, currency).
    FormattedValue,
    /// Raw values (numbers stay numbers).
    UnformattedValue,
}

impl ValueRenderOption {
    pub fn as_api_str(self) -> &'static str {
        match self {
            Self::FormattedValue => "FORMATTED_VALUE",
            Self::UnformattedValue => "UNFORMATTED_VALUE",
        }
    }
}

// API Response Types

#[derive(Debug, Deserialize)]
pub struct ApiSpreadsheet {
    pub properties: Option<ApiSpreadsheetProperties>,
    #[serde(default)]
    pub sheets: Vec<ApiSheet>,
}

#[derive(Debug, Deserialize)]
pub struct ApiSpreadsheetProperties {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiSheet {
    pub properties: Option<ApiSheetProperties>,
}

#[derive(Debug, Deserialize)]
pub struct ApiSheetProperties {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub values: Vec<Row>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGetValuesResponse {
    #[serde(default)]
    pub value_ranges: Vec<ValueRange>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedValueRange {
    pub value_range: Option<ValueRange>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGetByDataFilterResponse {
    #[serde(default)]
    pub value_ranges: Vec<MatchedValueRange>,
}

// API Request Types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DataFilter<'a> {
    pub a1_range: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchGetByDataFilterRequest<'a> {
    pub data_filters: Vec<DataFilter<'a>>,
    pub value_render_option: ValueRenderOption,
}

impl BatchGetValuesResponse {
    /// Rows of every returned range, in order.
    pub fn into_rows(self) -> Vec<Row> {
        self.value_ranges
            .into_iter()
            .flat_map(|range| range.values)
            .collect()
    }
}

impl BatchGetByDataFilterResponse {
    pub fn into_rows(self) -> Vec<Row> {
        self.value_ranges
            .into_iter()
            .filter_map(|matched| matched.value_range)
            .flat_map(|range| range.values)
            .collect()
    }
}
