// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Host record identifier for a matter (opaque, assigned by the platform
/// that owns the records).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatterId(String);

impl MatterId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MatterId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamCount {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCount {
    pub stage_name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatterRecord {
    pub matter_id: MatterId,
    pub matter_name: String,
    pub matter_status: String,
    pub client_name: String,
    pub unresolved_count: i64,
    pub last_message_date: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Moderate,
    Good,
}

impl Severity {
    pub const ALL: [Self; 4] = [Self::Critical, Self::High, Self::Moderate, Self::Good];

    /// Fixed unresolved-count thresholds: >200 critical, 100-200 high,
    /// 25-99 moderate, <25 good.
    pub const fn for_count(count: i64) -> Self {
        if count > 200 {
            Self::Critical
        } else if count >= 100 {
            Self::High
        } else if count >= 25 {
            Self::Moderate
        } else {
            Self::Good
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Good => "good",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TeamBuckets {
    pub critical: Vec<TeamCount>,
    pub high: Vec<TeamCount>,
    pub moderate: Vec<TeamCount>,
    pub good: Vec<TeamCount>,
}

impl TeamBuckets {
    pub fn tier(&self, severity: Severity) -> &[TeamCount] {
        match severity {
            Severity::Critical => &self.critical,
            Severity::High => &self.high,
            Severity::Moderate => &self.moderate,
            Severity::Good => &self.good,
        }
    }

    pub fn total_teams(&self) -> usize {
        self.critical.len() + self.high.len() + self.moderate.len() + self.good.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_teams() == 0
    }
}

/// Per-stage display row for the team detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRow {
    pub name: String,
    pub count: i64,
    pub percentage: u8,
    pub icon: &'static str,
    pub bar_width: u8,
}

/// Per-matter display row for the matters detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatterRow {
    pub id: MatterId,
    pub name: String,
    pub status: String,
    pub client_name: String,
    pub unresolved_count: i64,
    pub last_message: String,
}
