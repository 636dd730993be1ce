// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use banjax_app::{
    AppState, MatterId, MatterRecord, MatterRow, NavCommand, Severity, StageCount, StageRow,
    TeamBuckets, TeamCount, ViewState, bucket_teams, build_matter_rows, build_stage_rows,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const BAR_CELLS: u16 = 24;
const DIAGNOSTICS_KEPT: usize = 200;

/// Seam between the UI and whatever serves the report data. The default
/// `spawn_*` methods run the fetch and post the reply as an internal
/// event, so replies always flow through the same channel the event loop
/// drains.
pub trait AppRuntime {
    fn load_team_counts(&mut self) -> Result<Vec<TeamCount>>;
    fn load_stage_breakdown(&mut self, team_name: &str) -> Result<Vec<StageCount>>;
    fn load_stage_matters(&mut self, team_name: &str, stage_name: &str)
    -> Result<Vec<MatterRecord>>;
    /// Hands the record off to the host navigation facility. Returns a
    /// short human description of where it went.
    fn open_matter_record(&mut self, id: &MatterId) -> Result<String>;

    fn spawn_team_counts(&mut self, request_id: u64, tx: Sender<InternalEvent>) -> Result<()> {
        let event = match self.load_team_counts() {
            Ok(teams) => FetchEvent::TeamsLoaded { request_id, teams },
            Err(error) => FetchEvent::Failed {
                request_id,
                operation: "team counts",
                error: format!("{error:#}"),
            },
        };
        send_fetch(&tx, event)
    }

    fn spawn_stage_breakdown(
        &mut self,
        request_id: u64,
        team_name: &str,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let event = match self.load_stage_breakdown(team_name) {
            Ok(stages) => FetchEvent::StagesLoaded {
                request_id,
                team_name: team_name.to_owned(),
                stages,
            },
            Err(error) => FetchEvent::Failed {
                request_id,
                operation: "stage breakdown",
                error: format!("{error:#}"),
            },
        };
        send_fetch(&tx, event)
    }

    fn spawn_stage_matters(
        &mut self,
        request_id: u64,
        team_name: &str,
        stage_name: &str,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let event = match self.load_stage_matters(team_name, stage_name) {
            Ok(matters) => FetchEvent::MattersLoaded {
                request_id,
                team_name: team_name.to_owned(),
                stage_name: stage_name.to_owned(),
                matters,
            },
            Err(error) => FetchEvent::Failed {
                request_id,
                operation: "stage matters",
                error: format!("{error:#}"),
            },
        };
        send_fetch(&tx, event)
    }
}

fn send_fetch(tx: &Sender<InternalEvent>, event: FetchEvent) -> Result<()> {
    tx.send(InternalEvent::Fetch(event))
        .map_err(|_| anyhow::anyhow!("fetch event channel closed"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    Fetch(FetchEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    TeamsLoaded {
        request_id: u64,
        teams: Vec<TeamCount>,
    },
    StagesLoaded {
        request_id: u64,
        team_name: String,
        stages: Vec<StageCount>,
    },
    MattersLoaded {
        request_id: u64,
        team_name: String,
        stage_name: String,
        matters: Vec<MatterRecord>,
    },
    Failed {
        request_id: u64,
        operation: &'static str,
        error: String,
    },
}

impl FetchEvent {
    const fn request_id(&self) -> u64 {
        match self {
            Self::TeamsLoaded { request_id, .. }
            | Self::StagesLoaded { request_id, .. }
            | Self::MattersLoaded { request_id, .. }
            | Self::Failed { request_id, .. } => *request_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    buckets: TeamBuckets,
    // Flattened tier order, the list the overview cursor walks.
    overview_teams: Vec<(Severity, TeamCount)>,
    stage_rows: Vec<StageRow>,
    matter_rows: Vec<MatterRow>,
    overview_cursor: usize,
    stage_cursor: usize,
    matter_cursor: usize,
    diagnostics: Vec<String>,
    diagnostics_visible: bool,
    help_visible: bool,
    show_empty_tiers: bool,
    status_token: u64,
    next_request_id: u64,
    in_flight: Option<u64>,
}

impl ViewData {
    fn issue_request_id(&mut self) -> u64 {
        self.next_request_id = self.next_request_id.wrapping_add(1);
        self.in_flight = Some(self.next_request_id);
        self.next_request_id
    }

    fn apply_teams(&mut self, teams: &[TeamCount]) {
        self.buckets = bucket_teams(teams);
        self.overview_teams = Severity::ALL
            .iter()
            .flat_map(|severity| {
                self.buckets
                    .tier(*severity)
                    .iter()
                    .map(|team| (*severity, team.clone()))
            })
            .collect();
        if self.overview_cursor >= self.overview_teams.len() {
            self.overview_cursor = self.overview_teams.len().saturating_sub(1);
        }
    }

    fn log_diagnostic(&mut self, operation: &str, error: &str) {
        self.diagnostics.push(format!("{operation}: {error}"));
        if self.diagnostics.len() > DIAGNOSTICS_KEPT {
            let excess = self.diagnostics.len() - DIAGNOSTICS_KEPT;
            self.diagnostics.drain(..excess);
        }
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    run_app_with_options(state, runtime, true)
}

pub fn run_app_with_options<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    show_empty_tiers: bool,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        show_empty_tiers,
        ..ViewData::default()
    };
    let (internal_tx, internal_rx) = mpsc::channel();

    request_team_counts(runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(state: &mut AppState, view_data: &mut ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(NavCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Fetch(event) => {
                handle_fetch_event(state, view_data, event);
            }
        }
    }
}

fn handle_fetch_event(state: &mut AppState, view_data: &mut ViewData, event: FetchEvent) {
    // Only the newest in-flight request may touch the view; replies from
    // superseded requests are dropped, not canceled.
    if view_data.in_flight != Some(event.request_id()) {
        return;
    }
    view_data.in_flight = None;

    match event {
        FetchEvent::TeamsLoaded { teams, .. } => {
            if state.view == ViewState::Overview {
                view_data.apply_teams(&teams);
            }
        }
        FetchEvent::StagesLoaded {
            team_name, stages, ..
        } => {
            if state.view == ViewState::TeamDetail && state.selection.team_name == team_name {
                view_data.stage_rows = build_stage_rows(&stages, state.selection.team_total);
                view_data.stage_cursor = 0;
            }
        }
        FetchEvent::MattersLoaded {
            team_name,
            stage_name,
            matters,
            ..
        } => {
            if state.view == ViewState::MattersDetail
                && state.selection.team_name == team_name
                && state.selection.stage_name == stage_name
            {
                view_data.matter_rows = build_matter_rows(&matters);
                view_data.matter_cursor = 0;
            }
        }
        FetchEvent::Failed {
            operation, error, ..
        } => {
            // Log-and-ignore: the view stays where it is.
            view_data.log_diagnostic(operation, &error);
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(NavCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.wrapping_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn request_team_counts<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let request_id = view_data.issue_request_id();
    if let Err(error) = runtime.spawn_team_counts(request_id, internal_tx.clone()) {
        view_data.log_diagnostic("team counts", &format!("{error:#}"));
    }
}

fn request_stage_breakdown<R: AppRuntime>(
    runtime: &mut R,
    state: &AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let request_id = view_data.issue_request_id();
    let team = state.selection.team_name.clone();
    if let Err(error) = runtime.spawn_stage_breakdown(request_id, &team, internal_tx.clone()) {
        view_data.log_diagnostic("stage breakdown", &format!("{error:#}"));
    }
}

fn request_stage_matters<R: AppRuntime>(
    runtime: &mut R,
    state: &AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let request_id = view_data.issue_request_id();
    let team = state.selection.team_name.clone();
    let stage = state.selection.stage_name.clone();
    if let Err(error) = runtime.spawn_stage_matters(request_id, &team, &stage, internal_tx.clone())
    {
        view_data.log_diagnostic("stage matters", &format!("{error:#}"));
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q')
        && (key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers == KeyModifiers::NONE)
    {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return false;
    }

    if view_data.diagnostics_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('d')) {
            view_data.diagnostics_visible = false;
        }
        return false;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('?'), _) => {
            view_data.help_visible = true;
        }
        (KeyCode::Char('d'), KeyModifiers::NONE) => {
            view_data.diagnostics_visible = true;
        }
        (KeyCode::Down | KeyCode::Char('j'), _) => move_cursor(state, view_data, 1),
        (KeyCode::Up | KeyCode::Char('k'), _) => move_cursor(state, view_data, -1),
        (KeyCode::Enter, _) => {
            activate_selection(state, runtime, view_data, internal_tx);
        }
        (KeyCode::Esc | KeyCode::Backspace, _) => {
            go_back(state, runtime, view_data, internal_tx);
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => {
            refresh_current_view(state, runtime, view_data, internal_tx);
            emit_status(state, view_data, internal_tx, "refreshing");
        }
        _ => {}
    }

    false
}

fn current_row_count(state: &AppState, view_data: &ViewData) -> usize {
    match state.view {
        ViewState::Overview => view_data.overview_teams.len(),
        ViewState::TeamDetail => view_data.stage_rows.len(),
        ViewState::MattersDetail => view_data.matter_rows.len(),
    }
}

fn move_cursor(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let len = current_row_count(state, view_data);
    if len == 0 {
        return;
    }
    let cursor = match state.view {
        ViewState::Overview => &mut view_data.overview_cursor,
        ViewState::TeamDetail => &mut view_data.stage_cursor,
        ViewState::MattersDetail => &mut view_data.matter_cursor,
    };
    let next = (*cursor as isize + delta).rem_euclid(len as isize) as usize;
    *cursor = next;
}

fn activate_selection<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    match state.view {
        ViewState::Overview => {
            let Some((_, team)) = view_data.overview_teams.get(view_data.overview_cursor).cloned()
            else {
                return;
            };
            state.dispatch(NavCommand::OpenTeam {
                name: team.name,
                total: team.count,
            });
            view_data.stage_rows.clear();
            view_data.stage_cursor = 0;
            request_stage_breakdown(runtime, state, view_data, internal_tx);
        }
        ViewState::TeamDetail => {
            let Some(stage) = view_data.stage_rows.get(view_data.stage_cursor).cloned() else {
                return;
            };
            state.dispatch(NavCommand::OpenStage { name: stage.name });
            view_data.matter_rows.clear();
            view_data.matter_cursor = 0;
            request_stage_matters(runtime, state, view_data, internal_tx);
        }
        ViewState::MattersDetail => {
            let Some(matter) = view_data.matter_rows.get(view_data.matter_cursor) else {
                return;
            };
            // Leaves local state untouched; the record opens in the host
            // system.
            match runtime.open_matter_record(&matter.id) {
                Ok(destination) => emit_status(state, view_data, internal_tx, destination),
                Err(error) => view_data.log_diagnostic("open record", &format!("{error:#}")),
            }
        }
    }
}

fn go_back<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(command) = state.back_command() else {
        return;
    };
    let leaving = state.view;
    state.dispatch(command);
    match leaving {
        ViewState::MattersDetail => {
            view_data.matter_rows.clear();
            view_data.matter_cursor = 0;
        }
        ViewState::TeamDetail => {
            view_data.stage_rows.clear();
            view_data.stage_cursor = 0;
        }
        ViewState::Overview => {}
    }
    // Anything still in flight belongs to the abandoned level.
    view_data.in_flight = None;
    if state.view == ViewState::TeamDetail && view_data.stage_rows.is_empty() {
        request_stage_breakdown(runtime, state, view_data, internal_tx);
    }
}

fn refresh_current_view<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    match state.view {
        ViewState::Overview => request_team_counts(runtime, view_data, internal_tx),
        ViewState::TeamDetail => request_stage_breakdown(runtime, state, view_data, internal_tx),
        ViewState::MattersDetail => request_stage_matters(runtime, state, view_data, internal_tx),
    }
}

const fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => Color::Red,
        Severity::High => Color::LightRed,
        Severity::Moderate => Color::Yellow,
        Severity::Good => Color::Green,
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(Paragraph::new(breadcrumb_text(state)), chunks[0]);

    match state.view {
        ViewState::Overview => render_overview(frame, view_data, chunks[1]),
        ViewState::TeamDetail => render_team_detail(frame, state, view_data, chunks[1]),
        ViewState::MattersDetail => render_matters_detail(frame, view_data, chunks[1]),
    }

    let status = state.status_line.clone().unwrap_or_default();
    frame.render_widget(
        Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM)),
        chunks[2],
    );

    if view_data.help_visible {
        render_overlay(frame, "help", &help_text());
    } else if view_data.diagnostics_visible {
        render_overlay(frame, "diagnostics", &diagnostics_text(view_data));
    }
}

fn breadcrumb_text(state: &AppState) -> String {
    match state.view {
        ViewState::Overview => "teams".to_owned(),
        ViewState::TeamDetail => format!("teams › {}", state.selection.team_name),
        ViewState::MattersDetail => format!(
            "teams › {} › {}",
            state.selection.team_name, state.selection.stage_name
        ),
    }
}

fn render_overview(frame: &mut ratatui::Frame<'_>, view_data: &ViewData, area: Rect) {
    let mut lines: Vec<Line<'_>> = Vec::new();
    let mut flat_index = 0_usize;

    for severity in Severity::ALL {
        let tier = view_data.buckets.tier(severity);
        if tier.is_empty() && !view_data.show_empty_tiers {
            continue;
        }

        lines.push(Line::from(Span::styled(
            format!("{} ({})", severity.label(), tier.len()),
            Style::default()
                .fg(severity_color(severity))
                .add_modifier(Modifier::BOLD),
        )));
        for team in tier {
            let selected = flat_index == view_data.overview_cursor;
            let style = if selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(
                format!("  {:<32} {:>6}", team.name, team.count),
                style,
            )));
            flat_index += 1;
        }
        lines.push(Line::default());
    }

    if view_data.overview_teams.is_empty() {
        lines.push(Line::from("no team data"));
    }

    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("unresolved")),
        area,
    );
}

fn render_team_detail(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    view_data: &ViewData,
    area: Rect,
) {
    let mut lines: Vec<Line<'_>> = Vec::new();
    for (index, row) in view_data.stage_rows.iter().enumerate() {
        let filled = (u16::from(row.bar_width) * BAR_CELLS / 100).min(BAR_CELLS) as usize;
        let bar = format!(
            "{}{}",
            "█".repeat(filled),
            "░".repeat(BAR_CELLS as usize - filled)
        );
        let style = if index == view_data.stage_cursor {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!(
                "{} {:<20} {:>5}  {:>3}%  {bar}",
                row.icon, row.name, row.count, row.percentage
            ),
            style,
        )));
    }

    if view_data.stage_rows.is_empty() {
        lines.push(Line::from("no stage data"));
    }

    let title = format!(
        "{} — {} unresolved",
        state.selection.team_name, state.selection.team_total
    );
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn render_matters_detail(frame: &mut ratatui::Frame<'_>, view_data: &ViewData, area: Rect) {
    let header = Row::new(["matter", "status", "client", "unresolved", "last message"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row<'_>> = view_data
        .matter_rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let style = if index == view_data.matter_cursor {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Row::new([
                Cell::from(row.name.clone()),
                Cell::from(row.status.clone()),
                Cell::from(row.client_name.clone()),
                Cell::from(row.unresolved_count.to_string()),
                Cell::from(row.last_message.clone()),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(24),
            Constraint::Length(14),
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("matters"));

    frame.render_widget(table, area);
}

fn help_text() -> String {
    [
        "j/k or arrows  move",
        "enter          drill down / open record",
        "esc            back",
        "r              refresh",
        "d              diagnostics",
        "?              help",
        "q              quit",
    ]
    .join("\n")
}

fn diagnostics_text(view_data: &ViewData) -> String {
    if view_data.diagnostics.is_empty() {
        return "no diagnostics".to_owned();
    }
    view_data.diagnostics.join("\n")
}

fn render_overlay(frame: &mut ratatui::Frame<'_>, title: &str, text: &str) {
    let area = centered_rect(frame.area(), 70, 60);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text.to_owned())
            .block(Block::default().borders(Borders::ALL).title(title.to_owned())),
        area,
    );
}

fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
