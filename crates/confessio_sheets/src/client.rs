//! Sheets v4 REST client.

use async_trait::async_trait;
use chrono::NaiveDate;
use confessio_core::{Confession, ConfessionStatus, SheetToken};
use confessio_error::{ConfessioResult, SheetError, SheetErrorKind};
use confessio_interface::ConfessionStore;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use crate::layout::{
    COUNT_CELL, DATA_RANGE, FIRST_DATA_ROW, STATUS_COLUMN, TOKEN_RANGE, parse_unprocessed_tail,
};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A block of cell values in the Sheets v4 wire format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ValueRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<String>,
    #[serde(rename = "majorDimension", skip_serializing_if = "Option::is_none")]
    major_dimension: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    values: Vec<Vec<String>>,
}

/// Google Sheets client for the confession sheet.
///
/// Authenticates with a pre-issued bearer token supplied through
/// configuration; the pipeline never mints credentials itself.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    bearer_token: String,
}

impl SheetsClient {
    /// Create a client for one spreadsheet.
    pub fn new(spreadsheet_id: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        debug!("Creating new Sheets client");
        Self {
            client: Client::new(),
            base_url: SHEETS_API_BASE.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            bearer_token: bearer_token.into(),
        }
    }

    /// Point the client at a different API host. Test hook.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn values_url(&self, range: &str) -> String {
        format!("{}/{}/values/{}", self.base_url, self.spreadsheet_id, range)
    }

    /// Fetch one A1-notation range.
    #[instrument(skip(self))]
    async fn get_range(&self, range: &str) -> ConfessioResult<ValueRange> {
        let response = self
            .client
            .get(self.values_url(range))
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, range, "Failed to fetch sheet range");
                SheetError::new(SheetErrorKind::RangeFetch {
                    range: range.to_string(),
                    message: e.to_string(),
                })
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, range, "Sheets API returned error");
            return Err(SheetError::new(SheetErrorKind::Api {
                status_code: status.as_u16(),
                message: body,
            }))?;
        }

        let values: ValueRange = response.json().await.map_err(|e| {
            error!(error = ?e, range, "Failed to parse sheet response");
            SheetError::new(SheetErrorKind::RangeFetch {
                range: range.to_string(),
                message: format!("Failed to parse response: {}", e),
            })
        })?;

        Ok(values)
    }

    /// Overwrite one A1-notation range with raw values.
    #[instrument(skip(self, values))]
    async fn put_range(&self, range: &str, values: Vec<Vec<String>>) -> ConfessioResult<()> {
        let body = ValueRange {
            range: Some(range.to_string()),
            major_dimension: Some("ROWS".to_string()),
            values,
        };

        let response = self
            .client
            .put(self.values_url(range))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.bearer_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, range, "Failed to update sheet range");
                SheetError::new(SheetErrorKind::RangeUpdate {
                    range: range.to_string(),
                    message: e.to_string(),
                })
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, range, "Sheets API rejected update");
            return Err(SheetError::new(SheetErrorKind::Api {
                status_code: status.as_u16(),
                message: body,
            }))?;
        }

        Ok(())
    }

    fn first_cell(values: &ValueRange) -> &str {
        values
            .values
            .first()
            .and_then(|row| row.first())
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[async_trait]
impl ConfessionStore for SheetsClient {
    #[instrument(skip(self))]
    async fn fetch_unprocessed(&self) -> ConfessioResult<Vec<Confession>> {
        let values = self.get_range(DATA_RANGE).await?;
        let tail = parse_unprocessed_tail(&values.values, FIRST_DATA_ROW);
        debug!(count = tail.len(), "Fetched unprocessed confessions");
        Ok(tail)
    }

    #[instrument(skip(self))]
    async fn mark(&self, row: usize, status: ConfessionStatus) -> ConfessioResult<()> {
        let range = format!("{}{}", STATUS_COLUMN, row);
        self.put_range(&range, vec![vec![status.as_cell().to_string()]])
            .await?;
        debug!(row, status = %status, "Marked confession row");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn post_count(&self) -> ConfessioResult<u64> {
        let values = self.get_range(COUNT_CELL).await?;
        let cell = Self::first_cell(&values).trim();
        if cell.is_empty() {
            return Ok(0);
        }
        cell.parse().map_err(|e| {
            SheetError::new(SheetErrorKind::MalformedCell {
                cell: COUNT_CELL.to_string(),
                message: format!("{}: {:?}", e, cell),
            })
            .into()
        })
    }

    #[instrument(skip(self))]
    async fn increment_post_count(&self) -> ConfessioResult<()> {
        let count = self.post_count().await?;
        self.put_range(COUNT_CELL, vec![vec![(count + 1).to_string()]])
            .await
    }

    #[instrument(skip(self))]
    async fn read_token(&self) -> ConfessioResult<SheetToken> {
        let values = self.get_range(TOKEN_RANGE).await?;
        let row = values.values.first().cloned().unwrap_or_default();
        let value = row.first().cloned().unwrap_or_default();
        let refreshed_at = match row.get(1).map(String::as_str).unwrap_or("").trim() {
            "" => None,
            text => match NaiveDate::parse_from_str(text, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(e) => {
                    // A garbled date cell forces an early refresh instead
                    // of failing the run.
                    warn!(error = %e, cell = text, "Unreadable token refresh date");
                    None
                }
            },
        };
        Ok(SheetToken {
            value,
            refreshed_at,
        })
    }

    #[instrument(skip(self, token))]
    async fn write_token(&self, token: &SheetToken) -> ConfessioResult<()> {
        let date = token
            .refreshed_at
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        self.put_range(TOKEN_RANGE, vec![vec![token.value.clone(), date]])
            .await?;
        debug!("Access token cell pair updated");
        Ok(())
    }
}
