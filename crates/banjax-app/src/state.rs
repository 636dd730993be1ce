// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// The single active drill-down view. One variant at a time, which is the
/// whole invariant the old three-boolean scheme had to maintain by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Overview,
    TeamDetail,
    MattersDetail,
}

impl ViewState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "teams",
            Self::TeamDetail => "stages",
            Self::MattersDetail => "matters",
        }
    }
}

/// Drill-down context. Overwritten on each descent, cleared on the way
/// back up.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub team_name: String,
    pub team_total: i64,
    pub stage_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub view: ViewState,
    pub selection: Selection,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: ViewState::Overview,
            selection: Selection::default(),
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavCommand {
    OpenTeam { name: String, total: i64 },
    OpenStage { name: String },
    BackToStages,
    BackToOverview,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    ViewChanged(ViewState),
    TeamSelected(String),
    StageSelected(String),
    StageCleared,
    SelectionCleared,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    /// Applies a navigation command. Commands that do not apply to the
    /// current view are ignored and produce no events.
    pub fn dispatch(&mut self, command: NavCommand) -> Vec<NavEvent> {
        match command {
            NavCommand::OpenTeam { name, total } => {
                if self.view != ViewState::Overview {
                    return Vec::new();
                }
                self.selection = Selection {
                    team_name: name.clone(),
                    team_total: total,
                    stage_name: String::new(),
                };
                self.view = ViewState::TeamDetail;
                vec![
                    NavEvent::TeamSelected(name),
                    NavEvent::ViewChanged(self.view),
                ]
            }
            NavCommand::OpenStage { name } => {
                if self.view != ViewState::TeamDetail {
                    return Vec::new();
                }
                self.selection.stage_name = name.clone();
                self.view = ViewState::MattersDetail;
                vec![
                    NavEvent::StageSelected(name),
                    NavEvent::ViewChanged(self.view),
                ]
            }
            NavCommand::BackToStages => {
                if self.view != ViewState::MattersDetail {
                    return Vec::new();
                }
                self.selection.stage_name.clear();
                self.view = ViewState::TeamDetail;
                vec![NavEvent::StageCleared, NavEvent::ViewChanged(self.view)]
            }
            NavCommand::BackToOverview => {
                if self.view == ViewState::Overview {
                    return Vec::new();
                }
                self.selection = Selection::default();
                self.view = ViewState::Overview;
                vec![NavEvent::SelectionCleared, NavEvent::ViewChanged(self.view)]
            }
            NavCommand::SetStatus(message) => {
                self.status_line = Some(message.clone());
                vec![NavEvent::StatusUpdated(message)]
            }
            NavCommand::ClearStatus => {
                self.status_line = None;
                vec![NavEvent::StatusCleared]
            }
        }
    }

    /// One step up the drill-down path, if there is one.
    pub fn back_command(&self) -> Option<NavCommand> {
        match self.view {
            ViewState::Overview => None,
            ViewState::TeamDetail => Some(NavCommand::BackToOverview),
            ViewState::MattersDetail => Some(NavCommand::BackToStages),
        }
    }
}
