//! Implements the `Sheet` trait using the Google Sheets REST API (v4 `values` endpoints),
//! authenticated with an API key.

use crate::api::{Range, Sheet};
use crate::config::Credentials;
use crate::{Config, Error, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::trace;
use url::Url;

/// Implements the `Sheet` trait against a single Google spreadsheet. Every call fails with
/// `Error::Config` when no credentials were configured.
pub struct GoogleSheet {
    client: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl GoogleSheet {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: config.sheets_base_url().clone(),
            credentials: config.credentials().cloned(),
        })
    }

    fn credentials(&self) -> Result<&Credentials> {
        self.credentials.as_ref().ok_or_else(Error::not_configured)
    }

    /// Builds `{base}/{spreadsheet_id}/values/{range}{suffix}?key={api_key}`.
    fn values_url(&self, range: &Range, suffix: &str) -> Result<Url> {
        let credentials = self.credentials()?;
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Google Sheets base URL cannot have a path"))?
            .pop_if_empty()
            .push(credentials.spreadsheet_id())
            .push("values")
            .push(&format!("{range}{suffix}"));
        url.query_pairs_mut()
            .append_pair("key", credentials.api_key());
        Ok(url)
    }
}

#[async_trait::async_trait]
impl Sheet for GoogleSheet {
    fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    async fn read(&self, range: &Range) -> Result<Vec<Vec<String>>> {
        trace!("read {range}");
        let mut url = self.values_url(range, "")?;
        url.query_pairs_mut()
            .append_pair("majorDimension", "ROWS")
            .append_pair("valueRenderOption", "FORMATTED_VALUE");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to read {range} from Google Sheets"))?;
        let response = check_status(response).await?;
        let body: ValueRange = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to parse Google Sheets response for {range}"))?;
        Ok(body.values)
    }

    async fn append(&self, range: &Range, rows: &[Vec<String>]) -> Result<()> {
        trace!("append {} row(s) to {range}", rows.len());
        let mut url = self.values_url(range, ":append")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let body = ValueRange {
            range: Some(range.to_string()),
            major_dimension: Some("ROWS".to_string()),
            values: rows.to_vec(),
        };
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to append to {range} in Google Sheets"))?;
        check_status(response).await?;
        Ok(())
    }
}

/// The `ValueRange` resource of the Sheets API. `values` is omitted by the API when the range is
/// empty.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    major_dimension: Option<String>,
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Turns a non-success response into `Error::Remote` carrying the status and the response body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read response body".to_string());
    Err(Error::Remote {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    const KEY: &str = "test-key";
    const SPREADSHEET: &str = "sheet-123";

    type Grids = Arc<Mutex<HashMap<String, Vec<Vec<String>>>>>;

    /// Serves the subset of the Sheets API that `GoogleSheet` uses on a random local port and
    /// returns its base URL.
    async fn fake_sheets_api(grids: Grids) -> String {
        let app = Router::new()
            .route(
                "/v4/spreadsheets/:id/values/:range",
                get(fake_read).post(fake_append),
            )
            .with_state(grids);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v4/spreadsheets")
    }

    fn sheet_name(range: &str) -> String {
        let name = range.split('!').next().unwrap_or_default();
        name.trim_matches('\'').to_string()
    }

    fn api_error(status: StatusCode, message: String) -> (StatusCode, Json<Value>) {
        let body = json!({"error": {"code": status.as_u16(), "message": message}});
        (status, Json(body))
    }

    async fn fake_read(
        State(grids): State<Grids>,
        Path((id, range)): Path<(String, String)>,
        Query(params): Query<HashMap<String, String>>,
    ) -> (StatusCode, Json<Value>) {
        if params.get("key").map(String::as_str) != Some(KEY) || id != SPREADSHEET {
            return api_error(StatusCode::FORBIDDEN, "The caller does not have permission".into());
        }
        let grids = grids.lock().await;
        let Some(grid) = grids.get(&sheet_name(&range)) else {
            return api_error(
                StatusCode::BAD_REQUEST,
                format!("Unable to parse range: {range}"),
            );
        };
        let values: Vec<Vec<String>> = if range.contains('!') {
            grid.iter().take(1).cloned().collect()
        } else {
            grid.clone()
        };
        if values.is_empty() {
            return (StatusCode::OK, Json(json!({"range": range, "majorDimension": "ROWS"})));
        }
        (
            StatusCode::OK,
            Json(json!({"range": range, "majorDimension": "ROWS", "values": values})),
        )
    }

    async fn fake_append(
        State(grids): State<Grids>,
        Path((id, range)): Path<(String, String)>,
        Query(params): Query<HashMap<String, String>>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if params.get("key").map(String::as_str) != Some(KEY) || id != SPREADSHEET {
            return api_error(StatusCode::FORBIDDEN, "The caller does not have permission".into());
        }
        if params.get("valueInputOption").map(String::as_str) != Some("USER_ENTERED") {
            return api_error(StatusCode::BAD_REQUEST, "valueInputOption is required".into());
        }
        let Some(range) = range.strip_suffix(":append") else {
            return api_error(StatusCode::NOT_FOUND, "Not found".into());
        };
        let rows: Vec<Vec<String>> = serde_json::from_value(body["values"].clone()).unwrap();
        let mut grids = grids.lock().await;
        let Some(grid) = grids.get_mut(&sheet_name(range)) else {
            return api_error(
                StatusCode::BAD_REQUEST,
                format!("Unable to parse range: {range}"),
            );
        };
        grid.extend(rows);
        (StatusCode::OK, Json(json!({"spreadsheetId": id})))
    }

    async fn google_sheet(grids: Grids, key: &str) -> GoogleSheet {
        let base = fake_sheets_api(grids).await;
        let config = Config::new(Some(key), Some(SPREADSHEET), Some(&base)).unwrap();
        GoogleSheet::new(&config).unwrap()
    }

    fn grids(entries: &[(&str, Vec<Vec<&str>>)]) -> Grids {
        let map = entries
            .iter()
            .map(|(name, rows)| {
                let rows = rows
                    .iter()
                    .map(|r| r.iter().map(|c| c.to_string()).collect())
                    .collect();
                (name.to_string(), rows)
            })
            .collect();
        Arc::new(Mutex::new(map))
    }

    #[tokio::test]
    async fn test_read_whole_sheet() {
        let data = grids(&[(
            "Expenses",
            vec![
                vec!["Date", "Description"],
                vec!["2025-10-01", "Coffee"],
            ],
        )]);
        let sheet = google_sheet(data, KEY).await;
        let grid = sheet.read(&Range::sheet("Expenses")).await.unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1][1], "Coffee");
    }

    #[tokio::test]
    async fn test_read_header_row_of_empty_sheet() {
        let data = grids(&[("Debts", vec![])]);
        let sheet = google_sheet(data, KEY).await;
        let grid = sheet.read(&Range::header_row("Debts", 10)).await.unwrap();
        assert!(grid.is_empty());
    }

    #[tokio::test]
    async fn test_read_missing_sheet_is_remote_error() {
        let sheet = google_sheet(grids(&[]), KEY).await;
        let err = sheet.read(&Range::sheet("Expenses")).await.unwrap_err();
        match err {
            Error::Remote { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("Unable to parse range"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wrong_key_is_remote_error() {
        let sheet = google_sheet(grids(&[("Expenses", vec![])]), "wrong").await;
        let err = sheet.read(&Range::sheet("Expenses")).await.unwrap_err();
        assert!(matches!(err, Error::Remote { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_append_then_read() {
        let data = grids(&[("Expenses", vec![vec!["Date", "Description"]])]);
        let sheet = google_sheet(data.clone(), KEY).await;
        let rows = vec![vec!["2025-10-02".to_string(), "Lunch".to_string()]];
        sheet.append(&Range::sheet("Expenses"), &rows).await.unwrap();

        let grid = sheet.read(&Range::sheet("Expenses")).await.unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1], rows[0]);
        assert_eq!(data.lock().await["Expenses"].len(), 2);
    }

    #[tokio::test]
    async fn test_not_configured() {
        let config = Config::new(None, None, None).unwrap();
        let sheet = GoogleSheet::new(&config).unwrap();
        assert!(!sheet.is_configured());
        let err = sheet.read(&Range::sheet("Expenses")).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        let err = sheet.append(&Range::sheet("Expenses"), &[]).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_values_url() {
        let config = Config::new(Some("k"), Some("abc"), None).unwrap();
        let sheet = GoogleSheet::new(&config).unwrap();
        let url = sheet
            .values_url(&Range::header_row("Expenses", 6), "")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc/values/Expenses!A1:F1?key=k"
        );
        let url = sheet.values_url(&Range::sheet("Debts"), ":append").unwrap();
        assert_eq!(url.path(), "/v4/spreadsheets/abc/values/Debts:append");
    }
}
