use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::input::{HitArea, HitTarget};

pub struct StatusBarWidget;

impl StatusBarWidget {
    /// Draw the bar and return the clickable areas it drew
    pub fn render(frame: &mut Frame, area: Rect, app: &App) -> Vec<HitArea> {
        let (line, hits) = Self::build(area, app);
        let paragraph = Paragraph::new(line).style(Style::default().bg(app.theme.bg2));
        frame.render_widget(paragraph, area);
        hits
    }

    pub fn build(area: Rect, app: &App) -> (Line<'static>, Vec<HitArea>) {
        let theme = &app.theme;
        let mut bar = Bar::new(area);

        if app.config.ui.show_trigger_buttons {
            let button = Style::default().fg(theme.bg0).bg(theme.aqua);
            // The next trigger moves toward earlier steps, so it points up
            bar.push(" ▲ ", button, Some(HitTarget::NextTrigger));
            bar.push(" ", Style::default(), None);
            bar.push(" ▼ ", button, Some(HitTarget::PrevTrigger));
        }

        let registry = app.navigator().registry();
        let current = app.current_step();
        let position = match current {
            Some(step) => format!(" {}/{} {} ", step.index() + 1, registry.len(), step.id()),
            None => format!(" -/{} ", registry.len()),
        };
        bar.push(position, Style::default().fg(theme.fg0).add_modifier(Modifier::BOLD), None);

        for step in registry.iter() {
            let style = if current.is_some_and(|c| c.index() == step.index()) {
                Style::default().fg(theme.bg0).bg(theme.current)
            } else {
                Style::default().fg(theme.grey2)
            };
            bar.push(format!(" {} ", step.index() + 1), style, Some(HitTarget::Step(step.index())));
        }

        let status = match &app.status_message {
            Some(message) => Span::styled(format!("  {}", message), Style::default().fg(theme.notice)),
            None if app.navigator().is_transitioning() => {
                Span::styled("  …", Style::default().fg(theme.grey1))
            }
            None => Span::raw(""),
        };
        bar.spans.push(status);

        (Line::from(bar.spans), bar.hits)
    }
}

/// Left-to-right span builder that remembers where clickable spans landed
struct Bar {
    area: Rect,
    x: u16,
    spans: Vec<Span<'static>>,
    hits: Vec<HitArea>,
}

impl Bar {
    fn new(area: Rect) -> Self {
        Self {
            area,
            x: area.x,
            spans: Vec::new(),
            hits: Vec::new(),
        }
    }

    fn push(&mut self, text: impl Into<String>, style: Style, target: Option<HitTarget>) {
        let text = text.into();
        let width = text.width() as u16;
        let right = self.area.x.saturating_add(self.area.width);

        if let Some(target) = target {
            let visible = width.min(right.saturating_sub(self.x));
            if visible > 0 {
                self.hits.push(HitArea {
                    area: Rect::new(self.x, self.area.y, visible, 1),
                    target,
                });
            }
        }
        self.x = self.x.saturating_add(width);
        self.spans.push(Span::styled(text, style));
    }
}
