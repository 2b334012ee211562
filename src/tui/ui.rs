use crate::tui::app::{App, AppState};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn draw(f: &mut Frame, app: &mut App) {
    match &app.state {
        AppState::Home => draw_home(f, app),
        AppState::Loading { video_id } => {
            let video_id = video_id.clone();
            draw_progress(f, app, "Fetching video...", &video_id);
        }
        AppState::Preview => draw_preview(f, app),
        AppState::Processing { video_id } => {
            let video_id = video_id.clone();
            draw_progress(f, app, "Generating summary...", &video_id);
        }
        AppState::Viewer => draw_viewer(f, app),
    }
}

fn title_bar(f: &mut Frame, area: Rect, title: &str) {
    let title = Paragraph::new(title.to_string())
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn help_bar(f: &mut Frame, area: Rect, help: &str) {
    let help = Paragraph::new(help.to_string())
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

fn status_line(f: &mut Frame, area: Rect, status: Option<&str>) {
    if let Some(status) = status {
        let paragraph = Paragraph::new(status.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }
}

fn draw_home(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // URL input
            Constraint::Min(1),    // Status
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    title_bar(f, chunks[0], "YouTube Video Summarizer");
    app.url_input.render(f, chunks[1]);
    status_line(f, chunks[2], app.status.as_deref());
    help_bar(f, chunks[3], "[Enter] Fetch video  [Esc] Exit");
}

fn draw_progress(f: &mut Frame, app: &App, title: &str, video_id: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(1),    // Progress area
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    title_bar(f, chunks[0], title);
    app.progress_bar.render(f, chunks[1], video_id);
    help_bar(f, chunks[2], "[Esc] Cancel");
}

fn draw_preview(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(6), // Metadata
            Constraint::Min(3),    // Sections
            Constraint::Length(1), // Status
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    title_bar(f, chunks[0], "Video");

    let label = Style::default().fg(Color::Gray);
    let details: Vec<Line> = match app.prepared.as_ref() {
        Some(video) => match &video.metadata {
            Some(metadata) => vec![
                Line::from(Span::styled(
                    metadata.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(vec![
                    Span::styled("Channel: ", label),
                    Span::raw(metadata.channel.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Published: ", label),
                    Span::raw(metadata.published.format("%Y-%m-%d").to_string()),
                ]),
                Line::from(vec![
                    Span::styled("Thumbnail: ", label),
                    Span::raw(metadata.thumbnail_url.clone().unwrap_or_default()),
                ]),
            ],
            None => vec![
                Line::from(Span::styled(
                    format!("Video {}", video.video_id),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "No metadata (YOUTUBE_API_KEY not set)",
                    label,
                )),
            ],
        },
        None => Vec::new(),
    };
    let details = Paragraph::new(details)
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(Wrap { trim: true });
    f.render_widget(details, chunks[1]);

    let sections_title = format!("Sections ({})", app.chunk_list.items.len());
    app.chunk_list.render(f, chunks[2], &sections_title);

    status_line(f, chunks[3], app.status.as_deref());
    help_bar(
        f,
        chunks[4],
        "[g] Generate summary  [↑↓] Browse sections  [Esc] Back",
    );
}

fn draw_viewer(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(f.area());

    if let Some(viewer) = &app.content_viewer {
        app.viewer_height = chunks[0].height;
        viewer.render(f, chunks[0]);
    }

    help_bar(
        f,
        chunks[1],
        "[↑↓] Scroll  [PgUp/PgDn] Page  [Home/End] Top/Bottom  [Esc] Back",
    );
}
