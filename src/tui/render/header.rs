use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, EditTarget};

pub const HEADING: &str = "Project 300";
const DOT: &str = "\u{25CF}";

/// Heading, page indicator dots and the current page title
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;

    let heading = Line::from(Span::styled(
        HEADING,
        Style::default()
            .fg(app.theme.text)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ));

    let mut dots: Vec<Span> = Vec::new();
    for (i, active) in app.nav.indicator().into_iter().enumerate() {
        if i > 0 {
            dots.push(Span::styled(" ", Style::default().bg(bg)));
        }
        let color = if active {
            app.theme.indicator_active
        } else {
            app.theme.indicator
        };
        dots.push(Span::styled(DOT, Style::default().fg(color).bg(bg)));
    }

    let title = if app.edit_target == Some(EditTarget::Title) {
        let style = Style::default().fg(app.theme.text).bg(app.theme.input_bg);
        Line::from(super::edit_spans(&app.edit_buffer, app.edit_cursor, style))
    } else {
        Line::from(Span::styled(
            app.current_page().title().to_string(),
            Style::default()
                .fg(app.theme.text)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let lines = vec![heading, Line::from(dots), title];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn shows_heading_dots_and_title() {
        let (_dir, mut app) = test_app();
        app.next_page();
        let out = render_to_string(TERM_W, 4, |frame, area| {
            render_header(frame, &app, area);
        });
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains(HEADING));
        assert!(lines[1].contains("\u{25CF} \u{25CF} \u{25CF}"));
        assert!(lines[2].contains("Page 2"));
    }

    #[test]
    fn shows_title_edit_buffer() {
        let (_dir, mut app) = test_app();
        app.begin_title_edit();
        app.edit_buffer = "Languages".into();
        app.edit_cursor = 0;
        let out = render_to_string(TERM_W, 4, |frame, area| {
            render_header(frame, &app, area);
        });
        assert!(out.contains("Languages"));
        assert!(!out.contains("Page 1"));
    }
}
