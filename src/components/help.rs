use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, BorderType, Borders, Clear, Padding, Row, Table, Widget},
};

use crate::{
    action::ActionState,
    config::{key_event_to_string, PageKeyBindings},
};

const COLUMN_SPACING: u16 = 3;
const PADDING_HORIZONTAL: u16 = 2;
const PADDING_VERTICAL: u16 = 1;

/// Keybinding overlay, one bordered table per group.
#[derive(Debug)]
pub struct Help {
    groups: Vec<(String, Vec<(String, String)>)>,
}

impl Help {
    pub fn new(groups: Vec<(String, PageKeyBindings)>) -> Self {
        let groups = groups
            .into_iter()
            .map(|(name, keybindings)| {
                let mut rows: Vec<(String, String)> = keybindings
                    .0
                    .into_iter()
                    .filter(|(_, action)| action.state == ActionState::Start)
                    .map(|(event, action)| (key_event_to_string(&event), action.command.label()))
                    .collect();
                rows.sort();
                (name, rows)
            })
            .collect();

        Self { groups }
    }

    pub fn groups(&self) -> &[(String, Vec<(String, String)>)] {
        &self.groups
    }

    fn column_widths(&self) -> (u16, u16) {
        let rows = || self.groups.iter().flat_map(|(_, rows)| rows.iter());
        let key = rows().map(|(key, _)| key.len()).chain(["Key".len()]).max().unwrap_or(0);
        let command = rows().map(|(_, command)| command.len()).chain(["Command".len()]).max().unwrap_or(0);
        (key as u16, command as u16)
    }

    fn render_group(&self, area: Rect, buf: &mut Buffer, name: &str, rows: &[(String, String)], widths: (u16, u16)) {
        let (key, command) = widths;
        let rows = rows.iter().map(|(k, c)| Row::new(vec![k.clone(), c.clone()]));
        let table = Table::new(rows, [Constraint::Length(key), Constraint::Min(command)])
            .column_spacing(COLUMN_SPACING)
            .header(Row::new(vec!["Key", "Command"]).style(Style::new().bold()).bottom_margin(1))
            .block(
                Block::new()
                    .title(name.to_string())
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::new().bold().fg(Color::Cyan))
                    .padding(Padding::symmetric(PADDING_HORIZONTAL, PADDING_VERTICAL)),
            );

        Clear.render(area, buf);
        table.render(area, buf);
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let widths = self.column_widths();

        // columns + spacing + padding + border
        let width = widths.0 + widths.1 + COLUMN_SPACING + PADDING_HORIZONTAL * 2 + 2;
        // rows + header + padding + border
        let heights =
            self.groups.iter().map(|(_, rows)| Constraint::Length(rows.len() as u16 + 2 + PADDING_VERTICAL * 2 + 2));

        let [area] = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center).areas(area);
        let areas = Layout::vertical(heights).flex(Flex::Center).split(area);

        for ((name, rows), area) in self.groups.iter().zip(areas.iter()) {
            self.render_group(*area, buf, name, rows, widths);
        }
    }
}
