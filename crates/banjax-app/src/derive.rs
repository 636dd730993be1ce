// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::OffsetDateTime;
use time::macros::format_description;

use crate::model::{
    MatterRecord, MatterRow, Severity, StageCount, StageRow, TeamBuckets, TeamCount,
};

pub const DATE_PLACEHOLDER: &str = "N/A";
pub const DEFAULT_STAGE_ICON: &str = "📊";

/// Partitions teams into the four severity tiers. Wholesale recompute;
/// input order is preserved within each tier.
pub fn bucket_teams(teams: &[TeamCount]) -> TeamBuckets {
    let mut buckets = TeamBuckets::default();
    for team in teams {
        let tier = match Severity::for_count(team.count) {
            Severity::Critical => &mut buckets.critical,
            Severity::High => &mut buckets.high,
            Severity::Moderate => &mut buckets.moderate,
            Severity::Good => &mut buckets.good,
        };
        tier.push(team.clone());
    }
    buckets
}

/// Share of the team total held by one stage, rounded to whole percent.
/// A zero or negative total yields 0 rather than dividing by it.
pub fn stage_percentage(count: i64, team_total: i64) -> u8 {
    if team_total <= 0 {
        return 0;
    }
    let percent = (count as f64 / team_total as f64 * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

pub fn stage_icon(stage_name: &str) -> &'static str {
    match stage_name {
        "Treatment" => "🚨",
        "Verification" => "📊",
        "Negotiation" => "🤝",
        "Settlement" => "💰",
        "Money Received" => "✅",
        "Litigation" => "⚖️",
        "Closed" => "📁",
        "DSB Ready" => "📋",
        "Closed - Rejected" => "❌",
        _ => DEFAULT_STAGE_ICON,
    }
}

/// Absent timestamps render as a placeholder; present ones as
/// `MM/DD/YYYY HH:MM`.
pub fn format_message_date(date: Option<OffsetDateTime>) -> String {
    let Some(date) = date else {
        return DATE_PLACEHOLDER.to_owned();
    };
    date.format(&format_description!(
        "[month]/[day]/[year] [hour]:[minute]"
    ))
    .unwrap_or_else(|_| DATE_PLACEHOLDER.to_owned())
}

pub fn build_stage_rows(stages: &[StageCount], team_total: i64) -> Vec<StageRow> {
    stages
        .iter()
        .map(|stage| {
            let percentage = stage_percentage(stage.count, team_total);
            StageRow {
                name: stage.stage_name.clone(),
                count: stage.count,
                percentage,
                icon: stage_icon(&stage.stage_name),
                bar_width: percentage,
            }
        })
        .collect()
}

pub fn build_matter_rows(matters: &[MatterRecord]) -> Vec<MatterRow> {
    matters
        .iter()
        .map(|matter| MatterRow {
            id: matter.matter_id.clone(),
            name: matter.matter_name.clone(),
            status: matter.matter_status.clone(),
            client_name: matter.client_name.clone(),
            unresolved_count: matter.unresolved_count,
            last_message: format_message_date(matter.last_message_date),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        DATE_PLACEHOLDER, DEFAULT_STAGE_ICON, bucket_teams, build_matter_rows, build_stage_rows,
        format_message_date, stage_icon, stage_percentage,
    };
    use crate::model::{MatterId, MatterRecord, StageCount, TeamCount};
    use anyhow::Result;
    use time::macros::datetime;

    fn team(name: &str, count: i64) -> TeamCount {
        TeamCount {
            name: name.to_owned(),
            count,
        }
    }

    #[test]
    fn bucket_teams_places_one_team_per_tier() {
        let buckets = bucket_teams(&[
            team("Alpha", 250),
            team("Bravo", 150),
            team("Charlie", 50),
            team("Delta", 10),
        ]);

        assert_eq!(buckets.critical, vec![team("Alpha", 250)]);
        assert_eq!(buckets.high, vec![team("Bravo", 150)]);
        assert_eq!(buckets.moderate, vec![team("Charlie", 50)]);
        assert_eq!(buckets.good, vec![team("Delta", 10)]);
    }

    #[test]
    fn bucket_teams_partitions_without_overlap() {
        let teams: Vec<TeamCount> = (0..300)
            .map(|index| team(&format!("T{index}"), index * 3))
            .collect();
        let buckets = bucket_teams(&teams);

        assert_eq!(buckets.total_teams(), teams.len());
        for tier in [
            &buckets.critical,
            &buckets.high,
            &buckets.moderate,
            &buckets.good,
        ] {
            for entry in tier {
                assert!(teams.contains(entry));
            }
        }
    }

    #[test]
    fn bucket_teams_handles_empty_input() {
        assert!(bucket_teams(&[]).is_empty());
    }

    #[test]
    fn stage_percentage_rounds_to_whole_percent() {
        assert_eq!(stage_percentage(30, 120), 25);
        assert_eq!(stage_percentage(1, 3), 33);
        assert_eq!(stage_percentage(2, 3), 67);
        assert_eq!(stage_percentage(120, 120), 100);
    }

    #[test]
    fn stage_percentage_guards_zero_total() {
        assert_eq!(stage_percentage(30, 0), 0);
        assert_eq!(stage_percentage(0, 0), 0);
    }

    #[test]
    fn stage_icon_matches_known_stages_and_defaults() {
        assert_eq!(stage_icon("Litigation"), "⚖️");
        assert_eq!(stage_icon("Settlement"), "💰");
        assert_eq!(stage_icon("Closed - Rejected"), "❌");
        assert_eq!(stage_icon("Discovery"), DEFAULT_STAGE_ICON);
        assert_eq!(stage_icon(""), DEFAULT_STAGE_ICON);
    }

    #[test]
    fn format_message_date_uses_placeholder_for_absent() {
        assert_eq!(format_message_date(None), DATE_PLACEHOLDER);
    }

    #[test]
    fn format_message_date_renders_date_and_time() {
        let formatted = format_message_date(Some(datetime!(2026-03-07 14:05 UTC)));
        assert_eq!(formatted, "03/07/2026 14:05");
    }

    #[test]
    fn build_stage_rows_derives_percentage_icon_and_bar() {
        let rows = build_stage_rows(
            &[
                StageCount {
                    stage_name: "Treatment".to_owned(),
                    count: 30,
                },
                StageCount {
                    stage_name: "Mystery".to_owned(),
                    count: 90,
                },
            ],
            120,
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].percentage, 25);
        assert_eq!(rows[0].bar_width, 25);
        assert_eq!(rows[0].icon, "🚨");
        assert_eq!(rows[1].percentage, 75);
        assert_eq!(rows[1].icon, DEFAULT_STAGE_ICON);
    }

    #[test]
    fn build_matter_rows_formats_dates_per_row() -> Result<()> {
        let rows = build_matter_rows(&[
            MatterRecord {
                matter_id: MatterId::new("a0X1"),
                matter_name: "Smith v. Acme".to_owned(),
                matter_status: "Active".to_owned(),
                client_name: "Smith".to_owned(),
                unresolved_count: 4,
                last_message_date: Some(datetime!(2026-01-09 08:30 UTC)),
            },
            MatterRecord {
                matter_id: MatterId::new("a0X2"),
                matter_name: "Doe v. Roe".to_owned(),
                matter_status: "On Hold".to_owned(),
                client_name: "Doe".to_owned(),
                unresolved_count: 0,
                last_message_date: None,
            },
        ]);

        assert_eq!(rows[0].last_message, "01/09/2026 08:30");
        assert_eq!(rows[1].last_message, DATE_PLACEHOLDER);
        assert_eq!(rows[0].id, MatterId::new("a0X1"));
        Ok(())
    }
}
