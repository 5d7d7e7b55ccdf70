use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::layout::LineKind;

pub struct DocumentViewWidget;

impl DocumentViewWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let current = app.current_step().map(|step| step.index());

        let lines: Vec<Line> = app
            .layout()
            .visible(app.scroll(), area.height)
            .iter()
            .map(|line| {
                let style = match line.kind {
                    LineKind::Heading if Some(line.step) == current => Style::default()
                        .fg(theme.current)
                        .add_modifier(Modifier::BOLD),
                    LineKind::Heading => Style::default()
                        .fg(theme.heading)
                        .add_modifier(Modifier::BOLD),
                    LineKind::Body => Style::default().fg(theme.fg0),
                    LineKind::Padding => Style::default().fg(theme.grey1),
                };
                Line::styled(line.text.as_str(), style)
            })
            .collect();

        let paragraph = Paragraph::new(lines).style(Style::default().bg(theme.bg0));
        frame.render_widget(paragraph, area);
    }
}
