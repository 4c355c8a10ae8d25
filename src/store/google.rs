//! Google Sheets v4 REST backend.

use std::time::Duration;

use anyhow::{Context, bail};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use super::service_account::{ServiceAccount, ServiceAccountKey};
use super::{Record, SheetStore, StoreError, Table, records_from_rows};
use crate::config::Config;
use crate::model::attendance::ATTENDANCE_HEADER;
use crate::model::registration::REGISTRATION_HEADER;

/// Grid size of a freshly created Attendance sheet.
const NEW_SHEET_ROWS: u32 = 100;
const NEW_SHEET_COLS: u32 = 5;

#[derive(Debug, Clone, Copy)]
enum Dimension {
    Rows,
    Columns,
}

impl Dimension {
    fn as_param(self) -> &'static str {
        match self {
            Dimension::Rows => "ROWS",
            Dimension::Columns => "COLUMNS",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// Thin client over the spreadsheet endpoints the connector needs.
struct SheetsApi {
    http: Client,
    auth: ServiceAccount,
    base: Url,
    spreadsheet_id: String,
}

impl SheetsApi {
    /// `{base}/spreadsheets/{id}{suffix}` followed by `extra` path segments.
    fn url(&self, suffix: &str, extra: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::Config(format!("bad api base {}", self.base)))?;
            segments.pop_if_empty();
            segments.push("spreadsheets");
            segments.push(&format!("{}{suffix}", self.spreadsheet_id));
            segments.extend(extra);
        }
        Ok(url)
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            body,
        })
    }

    async fn sheet_titles(&self) -> Result<Vec<String>, StoreError> {
        let url = self.url("", &[])?;
        let response = self
            .http
            .get(url)
            .query(&[("fields", "sheets.properties.title")])
            .bearer_auth(self.auth.bearer().await?)
            .send()
            .await?;

        let meta: SpreadsheetMeta = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(format!("spreadsheet metadata: {e}")))?;

        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    async fn add_sheet(&self, title: &str, rows: u32, cols: u32) -> Result<(), StoreError> {
        let url = self.url(":batchUpdate", &[])?;
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": rows, "columnCount": cols }
                    }
                }
            }]
        });

        let response = self
            .http
            .post(url)
            .bearer_auth(self.auth.bearer().await?)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn get_values(
        &self,
        range: &str,
        dimension: Dimension,
    ) -> Result<Vec<Vec<String>>, StoreError> {
        let url = self.url("", &["values", range])?;
        let response = self
            .http
            .get(url)
            .query(&[("majorDimension", dimension.as_param())])
            .bearer_auth(self.auth.bearer().await?)
            .send()
            .await?;

        let values: ValueRange = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(format!("value range {range}: {e}")))?;

        Ok(values
            .values
            .into_iter()
            .map(|line| line.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn append(&self, range: &str, row: Vec<String>) -> Result<(), StoreError> {
        let url = self.url("", &["values", &format!("{range}:append")])?;
        let response = self
            .http
            .post(url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(self.auth.bearer().await?)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

/// The attendance document, with both sheet titles resolved at connect time.
pub struct GoogleSheets {
    api: SheetsApi,
    registrations: String,
    attendance: String,
}

impl GoogleSheets {
    /// Authenticates, resolves both sheets (creating Attendance if missing)
    /// and writes header rows into empty sheets.
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        if config.spreadsheet_id.trim().is_empty() {
            bail!("SPREADSHEET_ID is not set");
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .context("building http client")?;

        let key = ServiceAccountKey::from_file(&config.credentials_file)?;
        let auth = ServiceAccount::new(key, http.clone())?;
        info!(client_email = auth.client_email(), "Loaded service account");

        let base = Url::parse(&config.sheets_api_base)
            .with_context(|| format!("invalid SHEETS_API_BASE {}", config.sheets_api_base))?;

        let api = SheetsApi {
            http,
            auth,
            base,
            spreadsheet_id: config.spreadsheet_id.trim().to_string(),
        };

        let titles = api
            .sheet_titles()
            .await
            .with_context(|| format!("opening spreadsheet {}", api.spreadsheet_id))?;

        let registrations = titles
            .first()
            .cloned()
            .context("spreadsheet has no sheets")?;

        let attendance = config.attendance_sheet_name.clone();
        if !titles.contains(&attendance) {
            warn!(sheet = %attendance, "Attendance sheet missing, creating it");
            api.add_sheet(&attendance, NEW_SHEET_ROWS, NEW_SHEET_COLS)
                .await
                .with_context(|| format!("creating sheet {attendance}"))?;
        }

        let sheets = Self {
            api,
            registrations,
            attendance,
        };
        sheets
            .ensure_header(Table::Registrations, &REGISTRATION_HEADER)
            .await?;
        sheets
            .ensure_header(Table::Attendance, &ATTENDANCE_HEADER)
            .await?;

        info!(
            registrations = %sheets.registrations,
            attendance = %sheets.attendance,
            "Connected to spreadsheet"
        );
        Ok(sheets)
    }

    async fn ensure_header(&self, table: Table, header: &[&str]) -> anyhow::Result<()> {
        let first = self
            .read_row(table, 0)
            .await
            .with_context(|| format!("reading header of {table}"))?;

        if first.iter().all(|cell| cell.is_empty()) {
            info!(%table, "Writing header row");
            self.append_row(table, header.iter().map(|h| h.to_string()).collect())
                .await
                .with_context(|| format!("writing header of {table}"))?;
        }
        Ok(())
    }

    fn title(&self, table: Table) -> &str {
        match table {
            Table::Registrations => &self.registrations,
            Table::Attendance => &self.attendance,
        }
    }
}

#[async_trait]
impl SheetStore for GoogleSheets {
    async fn read_column(&self, table: Table, column: usize) -> Result<Vec<String>, StoreError> {
        let letter = column_letter(column);
        let range = format!("{}!{letter}:{letter}", quote_title(self.title(table)));
        let mut columns = self.api.get_values(&range, Dimension::Columns).await?;
        Ok(if columns.is_empty() {
            Vec::new()
        } else {
            columns.swap_remove(0)
        })
    }

    async fn read_row(&self, table: Table, row: usize) -> Result<Vec<String>, StoreError> {
        let n = row + 1;
        let range = format!("{}!{n}:{n}", quote_title(self.title(table)));
        let mut rows = self.api.get_values(&range, Dimension::Rows).await?;
        Ok(if rows.is_empty() {
            Vec::new()
        } else {
            rows.swap_remove(0)
        })
    }

    async fn read_all_records(&self, table: Table) -> Result<Vec<Record>, StoreError> {
        let range = quote_title(self.title(table));
        let rows = self.api.get_values(&range, Dimension::Rows).await?;
        Ok(records_from_rows(rows))
    }

    async fn append_row(&self, table: Table, row: Vec<String>) -> Result<(), StoreError> {
        self.api.append(&quote_title(self.title(table)), row).await
    }
}

/// A1 sheet reference, e.g. `'Attendance'` or `'Bob''s sheet'`.
fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Zero-based column index to its A1 letters: 0 → A, 25 → Z, 26 → AA.
fn column_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Formatted cells come back as strings; anything else is rendered as JSON text.
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
