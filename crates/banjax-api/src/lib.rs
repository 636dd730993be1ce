// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use banjax_app::{MatterId, MatterRecord, StageCount, TeamCount};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use url::Url;

/// Blocking client for the three read-only report endpoints. One request
/// per call, no batching, no retry.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn team_unresolved_counts(&self) -> Result<Vec<TeamCount>> {
        let url = self.endpoint("report/team-unresolved-counts", &[])?;
        let rows: Vec<TeamCountRow> = self.fetch_json(url)?;
        Ok(rows
            .into_iter()
            .map(|row| TeamCount {
                name: row.name,
                count: row.count,
            })
            .collect())
    }

    pub fn team_stage_breakdown(&self, team_name: &str) -> Result<Vec<StageCount>> {
        let url = self.endpoint("report/team-stage-breakdown", &[("team", team_name)])?;
        let rows: Vec<StageCountRow> = self.fetch_json(url)?;
        Ok(rows
            .into_iter()
            .map(|row| StageCount {
                stage_name: row.stage_name,
                count: row.count,
            })
            .collect())
    }

    pub fn stage_matters(&self, team_name: &str, stage_name: &str) -> Result<Vec<MatterRecord>> {
        let url = self.endpoint(
            "report/stage-matters",
            &[("team", team_name), ("stage", stage_name)],
        )?;
        let rows: Vec<MatterRow> = self.fetch_json(url)?;
        Ok(rows.into_iter().map(MatterRow::into_record).collect())
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{path}", self.base_url))
            .with_context(|| format!("invalid endpoint URL for {path}"))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response
            .json()
            .with_context(|| format!("decode response from {}", url.path()))
    }
}

/// Record page URL for the host system, with the fixed `view` action.
pub fn record_url(record_base: &str, id: &MatterId) -> String {
    format!("{}/{}/view", record_base.trim_end_matches('/'), id.as_str())
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach report API at {} -- check api.base_url and that the service is up ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<StructuredErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.message.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), error.message);
    }

    if let Ok(parsed) = serde_json::from_str::<PlainErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), error);
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct TeamCountRow {
    name: String,
    count: i64,
}

#[derive(Debug, Deserialize)]
struct StageCountRow {
    #[serde(rename = "stageName")]
    stage_name: String,
    count: i64,
}

#[derive(Debug, Deserialize)]
struct MatterRow {
    #[serde(rename = "matterId")]
    matter_id: String,
    #[serde(rename = "matterName")]
    matter_name: String,
    #[serde(rename = "matterStatus")]
    matter_status: String,
    #[serde(rename = "clientName")]
    client_name: String,
    #[serde(rename = "unresolvedCount")]
    unresolved_count: i64,
    #[serde(rename = "lastMessageDate")]
    last_message_date: Option<String>,
}

impl MatterRow {
    fn into_record(self) -> MatterRecord {
        MatterRecord {
            matter_id: MatterId::new(self.matter_id),
            matter_name: self.matter_name,
            matter_status: self.matter_status,
            client_name: self.client_name,
            unresolved_count: self.unresolved_count,
            last_message_date: parse_message_date(self.last_message_date.as_deref()),
        }
    }
}

// A malformed timestamp on one row should not sink the whole fetch; it
// degrades to the display placeholder instead.
fn parse_message_date(raw: Option<&str>) -> Option<OffsetDateTime> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    OffsetDateTime::parse(raw, &Rfc3339).ok()
}

#[derive(Debug, Deserialize)]
struct StructuredErrorEnvelope {
    error: Option<StructuredErrorBody>,
}

#[derive(Debug, Deserialize)]
struct StructuredErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct PlainErrorEnvelope {
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{clean_error_response, parse_message_date, record_url};
    use banjax_app::MatterId;
    use reqwest::StatusCode;
    use time::macros::datetime;

    #[test]
    fn parse_message_date_accepts_rfc3339() {
        assert_eq!(
            parse_message_date(Some("2026-01-09T08:30:00Z")),
            Some(datetime!(2026-01-09 08:30 UTC)),
        );
    }

    #[test]
    fn parse_message_date_degrades_on_bad_input() {
        assert_eq!(parse_message_date(None), None);
        assert_eq!(parse_message_date(Some("")), None);
        assert_eq!(parse_message_date(Some("yesterday")), None);
    }

    #[test]
    fn record_url_joins_id_and_view_action() {
        let url = record_url("https://host.example/records/", &MatterId::new("a0X9"));
        assert_eq!(url, "https://host.example/records/a0X9/view");
    }

    #[test]
    fn clean_error_response_prefers_structured_envelope() {
        let error = clean_error_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"message":"unknown team"}}"#,
        );
        assert_eq!(error.to_string(), "server error (400): unknown team");
    }

    #[test]
    fn clean_error_response_handles_plain_envelope_and_text() {
        let error = clean_error_response(StatusCode::NOT_FOUND, r#"{"error":"no such stage"}"#);
        assert_eq!(error.to_string(), "server error (404): no such stage");

        let error = clean_error_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(error.to_string(), "server error (502): upstream down");

        let error = clean_error_response(StatusCode::INTERNAL_SERVER_ERROR, "{\"odd\":1}");
        assert_eq!(error.to_string(), "server returned 500");
    }
}
