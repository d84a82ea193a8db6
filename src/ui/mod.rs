// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal UI for the recorder.
//!
//! Provides a ratatui-based terminal interface with the current position,
//! the known control addresses and their names, the most recent recorded
//! messages and, while paused, a chart of the recent control values.

mod controls;
mod position;

pub use controls::ControlsWidget;
pub use position::PositionWidget;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};
use tracing::warn;

use crate::config::ControlNameStore;
use crate::midi::{list_inputs, list_outputs, DeviceInfo};
use crate::recorder::Recorder;
use crate::recording::{ChartSeries, ControlAddress, ControlRegistry};
use crate::session::RecordingSession;

const SERIES_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Red,
    Color::Blue,
];

/// A control name being typed in
#[derive(Debug, Clone, PartialEq)]
pub struct NameEdit {
    pub address: ControlAddress,
    pub text: String,
}

/// UI-only state
#[derive(Debug, Clone)]
pub struct UiState {
    /// Inputs available for recording and control
    pub inputs: Vec<DeviceInfo>,
    /// Outputs available
    pub outputs: Vec<DeviceInfo>,
    /// Control picked with Up/Down
    pub selected: Option<ControlAddress>,
    /// Number of recent messages shown
    pub display_limit: usize,
    /// Rename in progress
    pub editing: Option<NameEdit>,
    /// Help text visible
    pub show_help: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            outputs: Vec::new(),
            selected: None,
            display_limit: 20,
            editing: None,
            show_help: false,
            status_message: None,
            status_time: None,
        }
    }
}

impl UiState {
    /// Set a status message that will be displayed temporarily
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_time = Some(Instant::now());
    }

    /// Clear expired status message
    pub fn clear_expired_status(&mut self) {
        if let Some(time) = self.status_time {
            if time.elapsed() > Duration::from_secs(3) {
                self.status_message = None;
                self.status_time = None;
            }
        }
    }
}

/// Selected device for each role, as shown on screen
#[derive(Debug, Clone, Default)]
pub struct DeviceRoles<'a> {
    pub recording: Option<&'a DeviceInfo>,
    pub control_input: Option<String>,
    pub output: Option<String>,
}

impl<'a> DeviceRoles<'a> {
    pub fn of<S: ControlNameStore>(recorder: &'a Recorder<S>, state: &UiState) -> Self {
        Self {
            recording: recorder.recording_input(),
            control_input: recorder.control_input().map(|id| role_label(&state.inputs, id)),
            output: recorder.output().map(|id| role_label(&state.outputs, id)),
        }
    }
}

/// Device name for a saved id, or the id itself when it is not connected
fn role_label(devices: &[DeviceInfo], id: &str) -> String {
    match devices.iter().find(|d| d.id == id) {
        Some(device) => device.name.clone(),
        None => format!("{} (missing)", id),
    }
}

/// Step through `None` followed by each device in turn
fn next_role(devices: &[DeviceInfo], current: Option<&str>) -> Option<DeviceInfo> {
    let index = match current {
        None => 0,
        Some(id) => match devices.iter().position(|d| d.id == id) {
            Some(i) => i + 1,
            None => 0,
        },
    };
    devices.get(index).cloned()
}

/// Move the control selection, wrapping at either end
fn step_selection(
    registry: &ControlRegistry,
    current: Option<&ControlAddress>,
    forward: bool,
) -> Option<ControlAddress> {
    let known: Vec<&ControlAddress> = registry.known().iter().collect();
    if known.is_empty() {
        return None;
    }
    let len = known.len();
    let index = match (current.and_then(|c| known.iter().position(|k| *k == c)), forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
    };
    Some(known[index].clone())
}

/// Selected control if still known, otherwise the most recent one
fn rename_target(registry: &ControlRegistry, selected: Option<&ControlAddress>) -> Option<ControlAddress> {
    selected
        .filter(|address| registry.known().contains(*address))
        .or_else(|| registry.most_recent())
        .cloned()
}

/// Report saved control input and output ids that match no connected device
pub fn check_device_roles<S: ControlNameStore>(recorder: &Recorder<S>, state: &mut UiState) {
    let mut missing = Vec::new();
    if let Some(id) = recorder.control_input() {
        if !state.inputs.iter().any(|d| d.id == id) {
            missing.push(format!("control input '{}'", id));
        }
    }
    if let Some(id) = recorder.output() {
        if !state.outputs.iter().any(|d| d.id == id) {
            missing.push(format!("output '{}'", id));
        }
    }
    if !missing.is_empty() {
        warn!(missing = ?missing, "Saved MIDI devices not found");
        state.set_status(format!("Not found: {}", missing.join(", ")));
    }
}

/// Key event result
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    /// No action needed
    None,
    /// Quit the application
    Quit,
    /// Pause or resume recording
    TogglePause,
    /// Reset position to zero
    ResetPosition,
    /// Drop the recorded messages
    ClearRecording,
    /// Toggle recording of clock messages
    ToggleClock,
    /// Re-scan MIDI inputs
    RefreshDevices,
    /// Record from the next input
    NextInput,
    /// Cycle the control input
    NextControlInput,
    /// Cycle the output
    NextOutput,
    /// Move the control selection
    SelectPrevious,
    SelectNext,
    /// Start naming the selected (or most recent) control
    RenameControl,
    /// Write the CSV export
    Export,
    /// Toggle help
    ToggleHelp,
    /// Text entry while renaming
    EditInput(char),
    EditBackspace,
    EditCommit,
    EditCancel,
}

/// Map a key press to an action
pub fn key_action(code: KeyCode, modifiers: KeyModifiers, editing: bool) -> KeyAction {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (code, modifiers) {
        return KeyAction::Quit;
    }

    if editing {
        return match code {
            KeyCode::Enter => KeyAction::EditCommit,
            KeyCode::Esc => KeyAction::EditCancel,
            KeyCode::Backspace => KeyAction::EditBackspace,
            KeyCode::Char(c) => KeyAction::EditInput(c),
            _ => KeyAction::None,
        };
    }

    match (code, modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char(' '), KeyModifiers::NONE) => KeyAction::TogglePause,
        (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::ResetPosition,
        (KeyCode::Char('c'), KeyModifiers::NONE) => KeyAction::ClearRecording,
        (KeyCode::Char('t'), KeyModifiers::NONE) => KeyAction::ToggleClock,
        (KeyCode::Char('d'), KeyModifiers::NONE) => KeyAction::RefreshDevices,
        (KeyCode::Char('i'), KeyModifiers::NONE) => KeyAction::NextInput,
        (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::NextControlInput,
        (KeyCode::Char('o'), KeyModifiers::NONE) => KeyAction::NextOutput,
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::SelectPrevious,
        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::SelectNext,
        (KeyCode::Char('n'), KeyModifiers::NONE) => KeyAction::RenameControl,
        (KeyCode::Char('e'), KeyModifiers::NONE) => KeyAction::Export,
        (KeyCode::Char('?'), _) | (KeyCode::Char('h'), KeyModifiers::NONE) => KeyAction::ToggleHelp,
        _ => KeyAction::None,
    }
}

/// Apply an action to the recorder. Returns false once the UI should exit.
pub fn apply_action<S: ControlNameStore>(
    action: KeyAction,
    recorder: &mut Recorder<S>,
    state: &mut UiState,
) -> bool {
    match action {
        KeyAction::None => {}
        KeyAction::Quit => return false,
        KeyAction::TogglePause => {
            let recording = recorder.session_mut().toggle_recording();
            state.set_status(if recording { "Recording resumed" } else { "Recording paused" });
        }
        KeyAction::ResetPosition => {
            recorder.session_mut().reset_position();
            state.set_status("Position reset");
        }
        KeyAction::ClearRecording => {
            recorder.session_mut().clear_recording();
            state.set_status("Recording cleared");
        }
        KeyAction::ToggleClock => {
            let include = recorder.toggle_include_transport();
            state.set_status(if include { "Recording clock" } else { "Filtering clock" });
        }
        KeyAction::RefreshDevices => {
            state.inputs = list_inputs();
            state.outputs = list_outputs();
            state.set_status(format!(
                "{} MIDI inputs, {} outputs",
                state.inputs.len(),
                state.outputs.len()
            ));
        }
        KeyAction::NextInput => select_next_input(recorder, state),
        KeyAction::NextControlInput => {
            if state.inputs.is_empty() {
                state.inputs = list_inputs();
            }
            let next = next_role(&state.inputs, recorder.control_input());
            recorder.select_control_input(next.as_ref());
            let name = next.map(|d| d.name).unwrap_or_else(|| "none".to_string());
            state.set_status(format!("Control input: {}", name));
        }
        KeyAction::NextOutput => {
            if state.outputs.is_empty() {
                state.outputs = list_outputs();
            }
            let next = next_role(&state.outputs, recorder.output());
            recorder.select_output(next.as_ref());
            let name = next.map(|d| d.name).unwrap_or_else(|| "none".to_string());
            state.set_status(format!("Output: {}", name));
        }
        KeyAction::SelectPrevious | KeyAction::SelectNext => {
            let forward = action == KeyAction::SelectNext;
            state.selected = step_selection(recorder.session().registry(), state.selected.as_ref(), forward);
        }
        KeyAction::RenameControl => {
            match rename_target(recorder.session().registry(), state.selected.as_ref()) {
                Some(address) => {
                    let text = recorder.session().registry().names().get(&address).cloned().unwrap_or_default();
                    state.editing = Some(NameEdit { address, text });
                }
                None => state.set_status("No control to name yet"),
            }
        }
        KeyAction::Export => match recorder.export() {
            Ok(path) => state.set_status(format!("Exported {}", path.display())),
            Err(e) => state.set_status(format!("Export failed: {}", e)),
        },
        KeyAction::ToggleHelp => state.show_help = !state.show_help,
        KeyAction::EditInput(c) => {
            if let Some(edit) = state.editing.as_mut() {
                edit.text.push(c);
            }
        }
        KeyAction::EditBackspace => {
            if let Some(edit) = state.editing.as_mut() {
                edit.text.pop();
            }
        }
        KeyAction::EditCommit => {
            if let Some(edit) = state.editing.take() {
                if let Err(e) = recorder.rename_control(edit.address, &edit.text) {
                    warn!(error = %e, "Failed to save control names");
                    state.set_status(format!("Could not save names: {}", e));
                }
            }
        }
        KeyAction::EditCancel => state.editing = None,
    }
    true
}

fn select_next_input<S: ControlNameStore>(recorder: &mut Recorder<S>, state: &mut UiState) {
    if state.inputs.is_empty() {
        state.inputs = list_inputs();
    }
    if state.inputs.is_empty() {
        state.set_status("No MIDI inputs available");
        return;
    }

    let current = recorder
        .recording_input()
        .and_then(|active| state.inputs.iter().position(|d| d.id == active.id));
    let next = current.map(|i| (i + 1) % state.inputs.len()).unwrap_or(0);
    let device = state.inputs[next].clone();

    match recorder.select_recording_input(&device) {
        Ok(()) => state.set_status(format!("Recording from {}", device.name)),
        Err(e) => state.set_status(format!("Cannot open {}: {}", device.name, e)),
    }
}

/// Terminal UI application
pub struct App {
    /// Terminal handle
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Target frame rate
    frame_rate: u32,
}

impl App {
    /// Set up the terminal
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            frame_rate: 30,
        })
    }

    /// Poll for events with timeout
    pub fn poll_event(&self) -> io::Result<Option<Event>> {
        let timeout = Duration::from_millis(1000 / self.frame_rate as u64);
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    /// Draw the UI
    pub fn draw<S: ControlNameStore>(&mut self, recorder: &Recorder<S>, state: &UiState) -> io::Result<()> {
        let roles = DeviceRoles::of(recorder, state);
        self.terminal
            .draw(|frame| render(frame, recorder.session(), &roles, state))?;
        Ok(())
    }

    /// Run until the user quits
    pub fn run<S: ControlNameStore>(&mut self, recorder: &mut Recorder<S>, state: &mut UiState) -> io::Result<()> {
        loop {
            recorder.pump();
            state.clear_expired_status();
            self.draw(recorder, state)?;

            if let Some(Event::Key(key)) = self.poll_event()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = key_action(key.code, key.modifiers, state.editing.is_some());
                if !apply_action(action, recorder, state) {
                    return Ok(());
                }
            }
        }
    }

    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Render the whole screen
pub fn render(frame: &mut Frame, session: &RecordingSession, roles: &DeviceRoles, state: &UiState) {
    let device = roles.recording;
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Position and devices
            Constraint::Min(8),    // Controls + messages
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let position = PositionWidget::new(session.position())
        .recording(session.is_recording())
        .include_transport(session.include_transport())
        .recorded(session.buffer().len())
        .device(device.map(|d| d.name.as_str()))
        .control_input(roles.control_input.as_deref())
        .output(roles.output.as_deref())
        .block(Block::default().borders(Borders::ALL).title(" Position "));
    frame.render_widget(position, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    let title = match device {
        Some(d) => format!(" Control names for {} ", d.name),
        None => " Controls ".to_string(),
    };
    let controls = ControlsWidget::new(session.registry())
        .editing(state.editing.as_ref())
        .selected(state.selected.as_ref())
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(controls, body[0]);

    if session.is_recording() {
        render_messages(frame, body[1], session, state.display_limit);
    } else {
        render_chart(frame, body[1], session.summary());
    }

    render_status_bar(frame, chunks[2], state);

    if state.show_help {
        render_help_overlay(frame, area);
    }
}

/// Render the most recent recorded messages
fn render_messages(frame: &mut Frame, area: Rect, session: &RecordingSession, limit: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Recorded messages ({}) ", session.buffer().len()));

    let lines: Vec<Line> = session
        .buffer()
        .recent(limit)
        .map(|event| {
            Line::from(vec![
                Span::styled(format!("{:>8} ", event.ticks()), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:<10} ", event.position_label()), Style::default().fg(Color::Cyan)),
                Span::raw(event.text().to_string()),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render the paused chart of recent control values
fn render_chart(frame: &mut Frame, area: Rect, series: &[ChartSeries]) {
    let block = Block::default().borders(Borders::ALL).title(" Recent values ");

    if series.is_empty() {
        let empty = Paragraph::new("Nothing recorded")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let points: Vec<Vec<(f64, f64)>> = series
        .iter()
        .map(|s| s.points.iter().map(|&(t, v)| (t as f64, v as f64)).collect())
        .collect();

    let (min_tick, max_tick) = series
        .iter()
        .filter_map(ChartSeries::tick_range)
        .fold((u64::MAX, 0), |(lo, hi), (a, b)| (lo.min(a), hi.max(b)));
    let max_tick = max_tick.max(min_tick + 1);

    let datasets: Vec<Dataset> = series
        .iter()
        .zip(points.iter())
        .enumerate()
        .map(|(i, (s, data))| {
            Dataset::default()
                .name(s.label.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]))
                .data(data)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("ticks")
                .bounds([min_tick as f64, max_tick as f64])
                .labels(vec![Span::raw(min_tick.to_string()), Span::raw(max_tick.to_string())]),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, 127.0])
                .labels(vec![Span::raw("0"), Span::raw("127")]),
        );
    frame.render_widget(chart, area);
}

/// Render status bar
fn render_status_bar(frame: &mut Frame, area: Rect, state: &UiState) {
    let text = if let Some(ref msg) = state.status_message {
        Span::styled(msg.as_str(), Style::default().fg(Color::Yellow))
    } else if state.editing.is_some() {
        Span::styled(
            " Type a name | Enter: Save | Esc: Cancel",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::styled(
            " Space: Pause | r: Reset | c: Clear | t: Clock | i/k/o: Devices | Up/Down+n: Name | e: Export | h: Help | q: Quit",
            Style::default().fg(Color::DarkGray),
        )
    };

    frame.render_widget(Paragraph::new(text), area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 50.min(area.width.saturating_sub(4));
    let height = 21.min(area.height.saturating_sub(4));
    let x = (area.width - width) / 2;
    let y = (area.height - height) / 2;
    let help_area = Rect::new(x, y, width, height);

    frame.render_widget(
        Block::default().style(Style::default().bg(Color::Black)),
        help_area,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let help_text = vec![
        Line::from(Span::styled("Recording", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  Space       Pause/Resume"),
        Line::from("  r           Reset position"),
        Line::from("  c           Clear recording"),
        Line::from("  t           Record/filter clock"),
        Line::from("  e           Export CSV"),
        Line::from(""),
        Line::from(Span::styled("Devices", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  d           Refresh MIDI inputs"),
        Line::from("  i           Next recording input"),
        Line::from("  k           Next control input"),
        Line::from("  o           Next output"),
        Line::from("  Up/Down     Select control"),
        Line::from("  n           Name selected control"),
        Line::from(""),
        Line::from(Span::styled("Other", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  h/?         Toggle help"),
        Line::from("  q/Ctrl+c    Quit"),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}
