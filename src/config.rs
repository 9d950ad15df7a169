//! Configuration for reaching the spreadsheet.
//!
//! The API key and spreadsheet identifier are resolved once at startup, from command line flags or
//! their environment variables (`GOOGLE_SHEETS_API_KEY`, `SPREADSHEET_ID`). Missing credentials are
//! not a startup failure: the app runs "not configured", reads return empty data and writes are
//! rejected.

use crate::args::Common;
use crate::Result;
use anyhow::Context;
use std::fmt::{Debug, Formatter};
use url::Url;

pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// The `Config` object holds everything needed to construct a spreadsheet client.
#[derive(Debug, Clone)]
pub struct Config {
    credentials: Option<Credentials>,
    sheets_base_url: Url,
}

impl Config {
    /// Creates a `Config`. Credentials are only present when both `api_key` and `spreadsheet` are
    /// given and non-empty. `spreadsheet` may be a bare spreadsheet ID or the URL of the sheet.
    ///
    /// # Errors
    /// - Returns an error if `spreadsheet` looks like a URL but has no spreadsheet ID in it.
    /// - Returns an error if `sheets_base_url` cannot be parsed.
    pub fn new(
        api_key: Option<&str>,
        spreadsheet: Option<&str>,
        sheets_base_url: Option<&str>,
    ) -> Result<Self> {
        let api_key = api_key.map(str::trim).filter(|s| !s.is_empty());
        let spreadsheet = spreadsheet.map(str::trim).filter(|s| !s.is_empty());
        let credentials = match (api_key, spreadsheet) {
            (Some(api_key), Some(spreadsheet)) => {
                let spreadsheet_id = extract_spreadsheet_id(spreadsheet)
                    .context("Failed to extract spreadsheet ID")?;
                Some(Credentials::new(api_key, spreadsheet_id))
            }
            _ => None,
        };

        let base = sheets_base_url.unwrap_or(DEFAULT_SHEETS_BASE_URL);
        let sheets_base_url =
            Url::parse(base).with_context(|| format!("Invalid Google Sheets base URL '{base}'"))?;

        Ok(Self {
            credentials,
            sheets_base_url,
        })
    }

    /// Resolves the configuration from the command line arguments common to all commands.
    pub fn from_args(common: &Common) -> Result<Self> {
        Self::new(
            common.api_key(),
            common.spreadsheet_id(),
            common.sheets_base_url(),
        )
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn sheets_base_url(&self) -> &Url {
        &self.sheets_base_url
    }
}

/// The API key and spreadsheet ID used for every request. The key is redacted from `Debug` output.
#[derive(Clone, Eq, PartialEq)]
pub struct Credentials {
    api_key: String,
    spreadsheet_id: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .finish()
    }
}

/// Extracts the spreadsheet ID from a Google Sheets URL, or returns the input unchanged if it is
/// already a bare ID.
///
/// # Arguments
/// * `s` - A spreadsheet ID, or a URL like "https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/..."
fn extract_spreadsheet_id(s: &str) -> anyhow::Result<&str> {
    if !s.contains('/') {
        return Ok(s);
    }

    // URL format: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/...
    // or: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID?foo=bar
    let parts: Vec<&str> = s.split('/').collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "d" && i + 1 < parts.len() {
            // Remove any query parameters or fragments
            let id_part = parts[i + 1];
            let id = id_part
                .split(['?', '#'])
                .next()
                .unwrap_or(id_part);
            if !id.is_empty() {
                return Ok(id);
            }
        }
    }
    Err(anyhow::anyhow!(
        "Invalid Google Sheets URL format. Expected: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured() {
        let config = Config::new(Some("key-123"), Some("abc"), None).unwrap();
        let creds = config.credentials().unwrap();
        assert_eq!(creds.api_key(), "key-123");
        assert_eq!(creds.spreadsheet_id(), "abc");
        assert_eq!(config.sheets_base_url().as_str(), DEFAULT_SHEETS_BASE_URL);
    }

    #[test]
    fn test_not_configured() {
        assert!(!Config::new(None, None, None).unwrap().is_configured());
        assert!(!Config::new(Some("key"), None, None).unwrap().is_configured());
        assert!(!Config::new(None, Some("abc"), None).unwrap().is_configured());
        assert!(!Config::new(Some("  "), Some("abc"), None)
            .unwrap()
            .is_configured());
    }

    #[test]
    fn test_sheet_url_as_spreadsheet() {
        let url = "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL/edit#gid=0";
        let config = Config::new(Some("key"), Some(url), None).unwrap();
        assert_eq!(
            config.credentials().unwrap().spreadsheet_id(),
            "7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL"
        );
    }

    #[test]
    fn test_bad_base_url() {
        assert!(Config::new(None, None, Some("not a url")).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let creds = Credentials::new("super-secret", "abc");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("abc"));
    }

    #[test]
    fn test_extract_spreadsheet_id() {
        let url = "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL?foo=bar";
        let id = extract_spreadsheet_id(url).unwrap();
        assert_eq!(id, "7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL");

        let url2 = "https://docs.google.com/spreadsheets/d/ABC123";
        assert_eq!(extract_spreadsheet_id(url2).unwrap(), "ABC123");

        assert_eq!(extract_spreadsheet_id("ABC123").unwrap(), "ABC123");

        let invalid = "https://example.com/invalid";
        assert!(extract_spreadsheet_id(invalid).is_err());
    }
}
