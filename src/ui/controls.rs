// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Known control addresses and their names.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use super::NameEdit;
use crate::recording::{ControlAddress, ControlRegistry};

/// Widget listing the control addresses seen on the recording device
pub struct ControlsWidget<'a> {
    registry: &'a ControlRegistry,
    editing: Option<&'a NameEdit>,
    selected: Option<&'a ControlAddress>,
    block: Option<Block<'a>>,
}

impl<'a> ControlsWidget<'a> {
    pub fn new(registry: &'a ControlRegistry) -> Self {
        Self {
            registry,
            editing: None,
            selected: None,
            block: None,
        }
    }

    /// Show an in-progress rename
    pub fn editing(mut self, edit: Option<&'a NameEdit>) -> Self {
        self.editing = edit;
        self
    }

    /// Highlight the control picked for renaming
    pub fn selected(mut self, address: Option<&'a ControlAddress>) -> Self {
        self.selected = address;
        self
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for ControlsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if self.registry.known().is_empty() {
            Paragraph::new("No controls seen yet")
                .style(Style::default().fg(Color::DarkGray))
                .render(area, buf);
            return;
        }

        let most_recent = self.registry.most_recent();
        let lines: Vec<Line> = self
            .registry
            .known()
            .iter()
            .map(|address| {
                let address_style = if Some(address) == most_recent {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };

                let name = match self.editing {
                    Some(edit) if &edit.address == address => Span::styled(
                        format!("{}_", edit.text),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::UNDERLINED),
                    ),
                    _ => Span::styled(
                        self.registry.name_for(address).to_string(),
                        Style::default().fg(Color::Cyan),
                    ),
                };

                let marker = if Some(address) == self.selected { "> " } else { "  " };
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Yellow)),
                    Span::styled(format!("{:<12}", address.as_str()), address_style),
                    name,
                ])
            })
            .collect();

        Paragraph::new(lines).render(area, buf);
    }
}
