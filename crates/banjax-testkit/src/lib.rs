// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use banjax_app::{MatterId, MatterRecord, StageCount, TeamCount};
use std::collections::BTreeMap;
use time::{Date, Duration, Month, OffsetDateTime, Time};

const TEAM_FOCUS: [&str; 8] = [
    "Intake",
    "Recovery",
    "Settlement",
    "Negotiation",
    "Litigation",
    "Collections",
    "Review",
    "Escalations",
];
const TEAM_REGIONS: [&str; 6] = ["North", "South", "East", "West", "Central", "Metro"];

const STAGE_NAMES: [&str; 9] = [
    "Treatment",
    "Verification",
    "Negotiation",
    "Settlement",
    "Money Received",
    "Litigation",
    "Closed",
    "DSB Ready",
    "Closed - Rejected",
];

const MATTER_STATUSES: [&str; 4] = ["Active", "On Hold", "Pending Review", "Escalated"];

const CLIENT_SURNAMES: [&str; 16] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris",
];
const OPPOSING_PARTIES: [&str; 10] = [
    "Acme Insurance",
    "Northline Freight",
    "Harbor Medical",
    "Summit Holdings",
    "Crestway Motors",
    "Pinnacle Retail",
    "Lakeshore Transit",
    "Ironworks Ltd",
    "Fairfield Group",
    "Bluepeak Energy",
];

// Counts for the first four teams are pinned so every severity tier is
// populated regardless of seed.
const TIER_ANCHOR_COUNTS: [i64; 4] = [250, 150, 50, 10];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as u64;
        min + (self.next_u64() % span) as i64
    }
}

fn reference_now() -> OffsetDateTime {
    let date = Date::from_calendar_date(2026, Month::June, 15).unwrap_or(Date::MIN);
    OffsetDateTime::new_utc(date, Time::MIDNIGHT)
}

/// Deterministic offline dataset covering the whole drill-down: teams in
/// all four severity tiers, stage breakdowns that sum to each team total,
/// and matters with a mix of present and absent last-message dates.
#[derive(Debug, Clone)]
pub struct DemoData {
    teams: Vec<TeamCount>,
    stages: BTreeMap<String, Vec<StageCount>>,
    matters: BTreeMap<(String, String), Vec<MatterRecord>>,
}

impl DemoData {
    pub fn generate(seed: u64) -> Self {
        let mut rng = DeterministicRng::new(if seed == 0 { 1 } else { seed });

        let mut teams = Vec::new();
        let mut used_names = Vec::new();
        let team_total = TIER_ANCHOR_COUNTS.len() + 4;
        for index in 0..team_total {
            let name = loop {
                let candidate = format!(
                    "{} {}",
                    TEAM_FOCUS[rng.int_n(TEAM_FOCUS.len())],
                    TEAM_REGIONS[rng.int_n(TEAM_REGIONS.len())],
                );
                if !used_names.contains(&candidate) {
                    break candidate;
                }
            };
            used_names.push(name.clone());

            let count = match TIER_ANCHOR_COUNTS.get(index) {
                Some(anchor) => *anchor,
                None => rng.int_range_i64(0, 320),
            };
            teams.push(TeamCount { name, count });
        }

        let mut stages = BTreeMap::new();
        let mut matters = BTreeMap::new();
        for team in &teams {
            let breakdown = Self::stage_breakdown_for(&mut rng, team.count);
            for stage in &breakdown {
                let rows = Self::matters_for(&mut rng, team, stage);
                matters.insert((team.name.clone(), stage.stage_name.clone()), rows);
            }
            stages.insert(team.name.clone(), breakdown);
        }

        Self {
            teams,
            stages,
            matters,
        }
    }

    fn stage_breakdown_for(rng: &mut DeterministicRng, team_total: i64) -> Vec<StageCount> {
        let stage_count = 3 + rng.int_n(4);
        let mut picked = Vec::new();
        while picked.len() < stage_count {
            let name = STAGE_NAMES[rng.int_n(STAGE_NAMES.len())];
            if !picked.contains(&name) {
                picked.push(name);
            }
        }

        let mut remaining = team_total;
        let mut breakdown = Vec::new();
        for (index, name) in picked.iter().enumerate() {
            let count = if index + 1 == picked.len() {
                remaining
            } else {
                let share = rng.int_range_i64(0, remaining);
                remaining -= share;
                share
            };
            breakdown.push(StageCount {
                stage_name: (*name).to_owned(),
                count,
            });
        }
        breakdown
    }

    fn matters_for(
        rng: &mut DeterministicRng,
        team: &TeamCount,
        stage: &StageCount,
    ) -> Vec<MatterRecord> {
        let row_count = stage.count.clamp(0, 8) as usize;
        let mut rows = Vec::with_capacity(row_count);
        for index in 0..row_count {
            let client = CLIENT_SURNAMES[rng.int_n(CLIENT_SURNAMES.len())];
            let opposing = OPPOSING_PARTIES[rng.int_n(OPPOSING_PARTIES.len())];
            let last_message_date = if index % 3 == 2 {
                None
            } else {
                let days_ago = rng.int_range_i64(0, 180);
                Some(reference_now() - Duration::days(days_ago))
            };

            rows.push(MatterRecord {
                matter_id: MatterId::new(format!(
                    "demo-{}-{}-{index}",
                    slug(&team.name),
                    slug(&stage.stage_name),
                )),
                matter_name: format!("{client} v. {opposing}"),
                matter_status: MATTER_STATUSES[rng.int_n(MATTER_STATUSES.len())].to_owned(),
                client_name: client.to_owned(),
                unresolved_count: rng.int_range_i64(0, 40),
                last_message_date,
            });
        }
        rows
    }

    pub fn teams(&self) -> &[TeamCount] {
        &self.teams
    }

    pub fn stage_breakdown(&self, team_name: &str) -> Vec<StageCount> {
        self.stages.get(team_name).cloned().unwrap_or_default()
    }

    pub fn stage_matters(&self, team_name: &str, stage_name: &str) -> Vec<MatterRecord> {
        self.matters
            .get(&(team_name.to_owned(), stage_name.to_owned()))
            .cloned()
            .unwrap_or_default()
    }
}

fn slug(value: &str) -> String {
    value
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}
