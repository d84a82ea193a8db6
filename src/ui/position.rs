// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Position and recording state display widget.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::timing::Position;

/// Widget showing recording state, position and input device
pub struct PositionWidget<'a> {
    position: Position,
    recording: bool,
    include_transport: bool,
    recorded: usize,
    device: Option<&'a str>,
    control_input: Option<&'a str>,
    output: Option<&'a str>,
    block: Option<Block<'a>>,
}

impl<'a> PositionWidget<'a> {
    /// Create a new position widget
    pub fn new(position: Position) -> Self {
        Self {
            position,
            recording: true,
            include_transport: false,
            recorded: 0,
            device: None,
            control_input: None,
            output: None,
            block: None,
        }
    }

    pub fn recording(mut self, recording: bool) -> Self {
        self.recording = recording;
        self
    }

    pub fn include_transport(mut self, include: bool) -> Self {
        self.include_transport = include;
        self
    }

    /// Number of recorded messages
    pub fn recorded(mut self, count: usize) -> Self {
        self.recorded = count;
        self
    }

    /// Name of the recording input
    pub fn device(mut self, name: Option<&'a str>) -> Self {
        self.device = name;
        self
    }

    /// Name of the control input
    pub fn control_input(mut self, name: Option<&'a str>) -> Self {
        self.control_input = name;
        self
    }

    /// Name of the output
    pub fn output(mut self, name: Option<&'a str>) -> Self {
        self.output = name;
        self
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for PositionWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(10), // Record/pause indicator
                Constraint::Length(2),
                Constraint::Length(22), // Position
                Constraint::Length(2),
                Constraint::Length(16), // Clock recording
                Constraint::Length(2),
                Constraint::Length(12), // Message count
                Constraint::Min(0),     // Device
            ])
            .split(rows[0]);

        let (indicator, style) = if self.recording {
            ("● REC", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        } else {
            ("‖ PAUSED", Style::default().fg(Color::Yellow))
        };
        Paragraph::new(indicator).style(style).render(chunks[0], buf);

        Paragraph::new(self.position.to_string())
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .render(chunks[2], buf);

        let clock = if self.include_transport {
            "clock: recorded"
        } else {
            "clock: filtered"
        };
        Paragraph::new(clock)
            .style(Style::default().fg(Color::Magenta))
            .render(chunks[4], buf);

        Paragraph::new(format!("{} msgs", self.recorded))
            .style(Style::default().fg(Color::White))
            .render(chunks[6], buf);

        let device = self.device.unwrap_or("No device selected");
        Paragraph::new(device)
            .style(Style::default().fg(Color::Green))
            .render(chunks[7], buf);

        if rows[1].height > 0 {
            let roles = Line::from(vec![
                Span::styled("Control in: ", Style::default().fg(Color::DarkGray)),
                Span::raw(self.control_input.unwrap_or("none")),
                Span::styled("   Output: ", Style::default().fg(Color::DarkGray)),
                Span::raw(self.output.unwrap_or("none")),
            ]);
            Paragraph::new(roles).render(rows[1], buf);
        }
    }
}
