// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use banjax_api::{Client, record_url};
use banjax_app::{MatterId, MatterRecord, StageCount, TeamCount};
use banjax_testkit::DemoData;
use banjax_tui::AppRuntime;
use std::process::{Command, Stdio};

/// Live runtime backed by the report API. Record navigation hands the
/// record URL to the platform opener.
pub struct ApiRuntime {
    client: Client,
    record_base: String,
}

impl ApiRuntime {
    pub fn new(client: Client, record_base: &str) -> Self {
        Self {
            client,
            record_base: record_base.to_owned(),
        }
    }
}

impl AppRuntime for ApiRuntime {
    fn load_team_counts(&mut self) -> Result<Vec<TeamCount>> {
        self.client.team_unresolved_counts()
    }

    fn load_stage_breakdown(&mut self, team_name: &str) -> Result<Vec<StageCount>> {
        self.client.team_stage_breakdown(team_name)
    }

    fn load_stage_matters(
        &mut self,
        team_name: &str,
        stage_name: &str,
    ) -> Result<Vec<MatterRecord>> {
        self.client.stage_matters(team_name, stage_name)
    }

    fn open_matter_record(&mut self, id: &MatterId) -> Result<String> {
        let url = record_url(&self.record_base, id);
        open_in_host(&url)?;
        Ok(format!("opened {url}"))
    }
}

fn open_in_host(url: &str) -> Result<()> {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    Command::new(opener)
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("launch {opener} for {url}"))?;
    Ok(())
}

/// Offline runtime over the seeded demo dataset. Record navigation only
/// reports where it would have gone.
pub struct DemoRuntime {
    data: DemoData,
}

impl DemoRuntime {
    pub fn new(data: DemoData) -> Self {
        Self { data }
    }
}

impl AppRuntime for DemoRuntime {
    fn load_team_counts(&mut self) -> Result<Vec<TeamCount>> {
        Ok(self.data.teams().to_vec())
    }

    fn load_stage_breakdown(&mut self, team_name: &str) -> Result<Vec<StageCount>> {
        Ok(self.data.stage_breakdown(team_name))
    }

    fn load_stage_matters(
        &mut self,
        team_name: &str,
        stage_name: &str,
    ) -> Result<Vec<MatterRecord>> {
        Ok(self.data.stage_matters(team_name, stage_name))
    }

    fn open_matter_record(&mut self, id: &MatterId) -> Result<String> {
        Ok(format!("demo mode: would open record {}", id.as_str()))
    }
}
