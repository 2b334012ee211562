use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Scrollable view of a rendered markdown document.
pub struct Viewer {
    pub lines: Vec<Line<'static>>,
    pub scroll: usize,
    pub title: String,
}

impl Viewer {
    pub fn new(markdown: &str, title: String) -> Self {
        Self {
            lines: markdown_lines(markdown),
            scroll: 0,
            title,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, area_height: u16) -> bool {
        let page_size = (area_height as usize).saturating_sub(2).max(1);
        let max_scroll = self.lines.len().saturating_sub(page_size);

        match key.code {
            KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                self.scroll = (self.scroll + 1).min(max_scroll);
                true
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(page_size);
                true
            }
            KeyCode::PageDown => {
                self.scroll = (self.scroll + page_size).min(max_scroll);
                true
            }
            KeyCode::Home => {
                self.scroll = 0;
                true
            }
            KeyCode::End => {
                self.scroll = max_scroll;
                true
            }
            _ => false,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(3);
                true
            }
            MouseEventKind::ScrollDown => {
                self.scroll = (self.scroll + 3).min(self.lines.len().saturating_sub(1));
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let total_lines = self.lines.len();
        let visible_lines = area.height.saturating_sub(2) as usize;
        let scroll_info = if total_lines > visible_lines {
            format!(
                " (lines {}-{} of {})",
                self.scroll + 1,
                (self.scroll + visible_lines).min(total_lines),
                total_lines
            )
        } else {
            String::new()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{}{scroll_info}", self.title));

        let paragraph = Paragraph::new(self.lines.clone())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll.min(u16::MAX as usize) as u16, 0));

        f.render_widget(paragraph, area);
    }
}

/// Converts markdown into styled terminal lines.
pub fn markdown_lines(markdown: &str) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut styles = vec![Style::default()];
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut in_image = false;

    let flush = |lines: &mut Vec<Line<'static>>, current: &mut Vec<Span<'static>>| {
        if !current.is_empty() {
            lines.push(Line::from(std::mem::take(current)));
        }
    };

    for event in Parser::new(markdown) {
        let style = styles.last().copied().unwrap_or_default();

        match event {
            Event::Start(tag) => match tag {
                Tag::Heading { .. } => styles.push(
                    style
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                ),
                Tag::Strong => styles.push(style.add_modifier(Modifier::BOLD)),
                Tag::Emphasis => styles.push(style.add_modifier(Modifier::ITALIC)),
                Tag::List(start) => lists.push(start),
                Tag::Item => {
                    let indent = "  ".repeat(lists.len().saturating_sub(1));
                    let marker = match lists.last_mut() {
                        Some(Some(n)) => {
                            let marker = format!("{n}. ");
                            *n += 1;
                            marker
                        }
                        _ => "• ".to_string(),
                    };
                    current.push(Span::styled(
                        format!("{indent}{marker}"),
                        Style::default().fg(Color::Green),
                    ));
                }
                Tag::Image { dest_url, .. } => {
                    in_image = true;
                    current.push(Span::styled(
                        format!("[image: {dest_url}]"),
                        Style::default().fg(Color::Cyan),
                    ));
                }
                _ => {}
            },
            Event::End(tag) => match tag {
                TagEnd::Heading(_) => {
                    styles.pop();
                    flush(&mut lines, &mut current);
                    lines.push(Line::default());
                }
                TagEnd::Strong | TagEnd::Emphasis => {
                    styles.pop();
                }
                TagEnd::Paragraph => {
                    flush(&mut lines, &mut current);
                    if lists.is_empty() {
                        lines.push(Line::default());
                    }
                }
                TagEnd::Item => flush(&mut lines, &mut current),
                TagEnd::List(_) => {
                    lists.pop();
                    if lists.is_empty() {
                        lines.push(Line::default());
                    }
                }
                TagEnd::Image => in_image = false,
                _ => {}
            },
            Event::Text(text) if !in_image => {
                current.push(Span::styled(text.into_string(), style));
            }
            Event::Code(code) => {
                current.push(Span::styled(
                    code.into_string(),
                    Style::default().fg(Color::Magenta),
                ));
            }
            Event::SoftBreak => current.push(Span::raw(" ")),
            Event::HardBreak => flush(&mut lines, &mut current),
            Event::Rule => {
                flush(&mut lines, &mut current);
                lines.push(Line::styled(
                    "─".repeat(40),
                    Style::default().fg(Color::DarkGray),
                ));
                lines.push(Line::default());
            }
            _ => {}
        }
    }
    flush(&mut lines, &mut current);

    while lines.last().is_some_and(|l| l.spans.is_empty()) {
        lines.pop();
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn renders_headings_lists_and_rules() {
        let md = "# Title\n\n![thumbnail](https://img/x.jpg)\n\n## Executive Summary\n\n- one\n- two\n\n**0:00:00 - 0:05:00**\n\nBody text\nwrapped.\n\n---\n";

        let lines: Vec<String> = markdown_lines(md).iter().map(plain).collect();

        assert_eq!(lines[0], "Title");
        assert!(lines.contains(&"[image: https://img/x.jpg]".to_string()));
        assert!(lines.contains(&"• one".to_string()));
        assert!(lines.contains(&"• two".to_string()));
        assert!(lines.contains(&"0:00:00 - 0:05:00".to_string()));
        assert!(lines.contains(&"Body text wrapped.".to_string()));
        assert_eq!(lines.last().unwrap(), &"─".repeat(40));
    }

    #[test]
    fn numbers_ordered_lists() {
        let lines: Vec<String> = markdown_lines("3. c\n4. d\n").iter().map(plain).collect();
        assert_eq!(lines, vec!["3. c", "4. d"]);
    }

    #[test]
    fn headings_are_styled() {
        let lines = markdown_lines("## Section-wise Summary");
        let span = &lines[0].spans[0];
        assert_eq!(span.style.fg, Some(Color::Yellow));
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn scrolling_stays_in_bounds() {
        let md = (0..30).map(|i| format!("line {i}\n\n")).collect::<String>();
        let mut viewer = Viewer::new(&md, "report".into());
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);

        viewer.handle_key(key(KeyCode::Up), 12);
        assert_eq!(viewer.scroll, 0);

        viewer.handle_key(key(KeyCode::End), 12);
        let bottom = viewer.scroll;
        assert_eq!(bottom, viewer.lines.len() - 10);

        viewer.handle_key(key(KeyCode::PageDown), 12);
        assert_eq!(viewer.scroll, bottom);

        viewer.handle_key(key(KeyCode::Home), 12);
        assert_eq!(viewer.scroll, 0);
    }
}
