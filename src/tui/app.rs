use crate::core::report::render_markdown;
use crate::core::transcript::extract_video_id;
use crate::core::{PipelineEvent, PreparedVideo, SummaryService, VideoSummary};
use crate::error::{Error, Result};
use crate::tui::components::{ChunkList, InputField, ProgressBar, Viewer};
use crate::tui::events::AppEvent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Home,
    Loading { video_id: String },
    Preview,
    Processing { video_id: String },
    Viewer,
}

/// Results sent back by background tasks. `request` ties each message to
/// the run that produced it so results of abandoned runs are dropped.
pub enum AppMessage {
    Prepared {
        request: u64,
        result: Result<PreparedVideo>,
    },
    Progress {
        request: u64,
        event: PipelineEvent,
    },
    Summarized {
        request: u64,
        result: Result<VideoSummary>,
    },
}

pub struct App {
    pub state: AppState,
    pub should_quit: bool,

    // Home screen
    pub url_input: InputField,
    pub status: Option<String>,

    // Preview screen
    pub prepared: Option<PreparedVideo>,
    pub chunk_list: ChunkList,

    // Loading / processing screens
    pub progress_bar: ProgressBar,
    completed_steps: usize,

    // Viewer screen
    pub content_viewer: Option<Viewer>,
    pub viewer_height: u16,

    pub service: SummaryService,
    request: u64,

    // Async communication
    pub processing_tx: Option<mpsc::UnboundedSender<AppMessage>>,
    pub processing_rx: Option<mpsc::UnboundedReceiver<AppMessage>>,
}

impl App {
    pub fn new(service: SummaryService) -> Self {
        let mut url_input = InputField::new("Video URL", "https://www.youtube.com/watch?v=...");
        url_input.focused = true;

        Self {
            state: AppState::Home,
            should_quit: false,

            url_input,
            status: None,

            prepared: None,
            chunk_list: ChunkList::new(Vec::new()),

            progress_bar: ProgressBar::new(),
            completed_steps: 0,

            content_viewer: None,
            viewer_height: 0,

            service,
            request: 0,

            processing_tx: None,
            processing_rx: None,
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Mouse(mouse) => self.handle_mouse(mouse),
            AppEvent::Tick => self.handle_tick(),
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match &self.state {
            AppState::Home => self.handle_home_key(key),
            AppState::Loading { .. } => {
                if key.code == KeyCode::Esc {
                    self.abandon_run(AppState::Home);
                }
            }
            AppState::Preview => self.handle_preview_key(key),
            AppState::Processing { .. } => {
                if key.code == KeyCode::Esc {
                    self.abandon_run(AppState::Preview);
                }
            }
            AppState::Viewer => self.handle_viewer_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => self.start_prepare(),
            _ => {
                self.url_input.handle_key(key);
            }
        }
    }

    fn handle_preview_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.status = None;
                self.state = AppState::Home;
            }
            KeyCode::Enter | KeyCode::Char('g') => self.start_summary(),
            _ => {
                self.chunk_list.handle_key(key);
            }
        }
    }

    fn handle_viewer_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state = AppState::Preview,
            _ => {
                if let Some(viewer) = &mut self.content_viewer {
                    viewer.handle_key(key, self.viewer_height);
                }
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match self.state {
            AppState::Preview => {
                self.chunk_list.handle_mouse(mouse);
            }
            AppState::Viewer => {
                if let Some(viewer) = &mut self.content_viewer {
                    viewer.handle_mouse(mouse);
                }
            }
            _ => {}
        }
    }

    fn handle_tick(&mut self) {
        let mut messages = Vec::new();
        if let Some(rx) = &mut self.processing_rx {
            while let Ok(message) = rx.try_recv() {
                messages.push(message);
            }
        }

        for message in messages {
            self.handle_message(message);
        }
    }

    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::Prepared { request, result } if request == self.request => {
                self.progress_bar.reset();
                match result {
                    Ok(video) => {
                        self.chunk_list = ChunkList::new(video.chunks.clone());
                        self.prepared = Some(video);
                        self.status = None;
                        self.state = AppState::Preview;
                    }
                    Err(e) => {
                        self.status = Some(format!("Error: {e}"));
                        self.state = AppState::Home;
                    }
                }
            }
            AppMessage::Progress { request, event } if request == self.request => {
                self.apply_progress(event);
            }
            AppMessage::Summarized { request, result } if request == self.request => {
                self.progress_bar.reset();
                match result {
                    Ok(summary) => {
                        let title = summary
                            .metadata
                            .as_ref()
                            .map(|m| m.title.clone())
                            .unwrap_or_else(|| summary.video_id.clone());
                        self.content_viewer = Some(Viewer::new(&render_markdown(&summary), title));
                        self.status = None;
                        self.state = AppState::Viewer;
                    }
                    Err(e) => {
                        self.status = Some(format!("Error: {e}"));
                        self.state = AppState::Preview;
                    }
                }
            }
            // Stale message from an abandoned run
            _ => {}
        }
    }

    fn apply_progress(&mut self, event: PipelineEvent) {
        if !matches!(self.state, AppState::Processing { .. }) {
            return;
        }

        match event {
            PipelineEvent::ExecutiveStarted => {
                self.progress_bar.set_message("Generating executive summary...");
                self.progress_bar.add_log("Generating executive summary...");
            }
            PipelineEvent::ExecutiveFinished => {
                self.completed_steps += 1;
                self.progress_bar.add_log("Executive summary done");
            }
            PipelineEvent::SectionStarted { index, total } => {
                let message = format!("Summarizing section {}/{total}...", index + 1);
                self.progress_bar.set_message(message.as_str());
                self.progress_bar.add_log(message);
            }
            PipelineEvent::SectionFinished { index, total } => {
                self.completed_steps += 1;
                self.progress_bar
                    .add_log(format!("Section {}/{total} done", index + 1));
            }
        }

        let total_steps = self
            .prepared
            .as_ref()
            .map(|v| v.chunks.len() + 1)
            .unwrap_or(1);
        self.progress_bar
            .set_progress(self.completed_steps as f64 / total_steps as f64);
    }

    fn abandon_run(&mut self, back_to: AppState) {
        self.request += 1;
        self.progress_bar.reset();
        self.state = back_to;
    }

    fn start_prepare(&mut self) {
        if !self.url_input.is_valid() {
            return;
        }

        let url = self.url_input.value.trim().to_string();
        let Some(video_id) = extract_video_id(&url) else {
            self.status = Some(format!("Error: {}", Error::InvalidUrl(url)));
            return;
        };

        self.request += 1;
        self.status = None;
        self.state = AppState::Loading {
            video_id: video_id.clone(),
        };
        self.progress_bar.reset();
        self.progress_bar.set_progress(0.1);
        self.progress_bar
            .set_message("Fetching metadata and transcript...");
        self.progress_bar
            .add_log(format!("Looking up video {video_id}"));

        let Some(tx) = self.processing_tx.clone() else {
            return;
        };
        let service = self.service.clone();
        let request = self.request;

        tokio::spawn(async move {
            let result = service.prepare(&url).await;
            let _ = tx.send(AppMessage::Prepared { request, result });
        });
    }

    fn start_summary(&mut self) {
        let Some(video) = self.prepared.clone() else {
            return;
        };

        self.request += 1;
        self.status = None;
        self.completed_steps = 0;
        self.state = AppState::Processing {
            video_id: video.video_id.clone(),
        };
        self.progress_bar.reset();
        self.progress_bar.set_message("Starting...");
        self.progress_bar
            .add_log(format!("Summarizing {} sections", video.chunks.len()));

        let Some(tx) = self.processing_tx.clone() else {
            return;
        };
        let service = self.service.clone();
        let request = self.request;

        tokio::spawn(async move {
            let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();

            let forward_tx = tx.clone();
            tokio::spawn(async move {
                while let Some(event) = progress_rx.recv().await {
                    let _ = forward_tx.send(AppMessage::Progress { request, event });
                }
            });

            let result = service.summarize(video, Some(&progress_tx)).await;
            drop(progress_tx);
            let _ = tx.send(AppMessage::Summarized { request, result });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::chunker::Chunk;
    use crate::core::pipeline::{SectionSummary, SummaryResult};
    use crossterm::event::KeyEvent;

    fn app() -> App {
        App::new(SummaryService::new(&Config::default()).unwrap())
    }

    fn prepared() -> PreparedVideo {
        PreparedVideo {
            video_id: "dQw4w9WgXcQ".into(),
            metadata: None,
            chunks: vec![
                Chunk {
                    text: "a b c".into(),
                    start: 0.0,
                    end: 5.0,
                },
                Chunk {
                    text: "d".into(),
                    start: 10.0,
                    end: 10.0,
                },
            ],
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[test]
    fn invalid_url_stays_home_with_message() {
        let mut app = app();
        type_text(&mut app, "https://example.com/nothing");
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(app.state, AppState::Home);
        assert!(app.status.as_deref().unwrap().contains("check the URL"));
    }

    #[test]
    fn prepared_video_opens_preview() {
        let mut app = app();
        app.handle_message(AppMessage::Prepared {
            request: 0,
            result: Ok(prepared()),
        });

        assert_eq!(app.state, AppState::Preview);
        assert_eq!(app.chunk_list.items.len(), 2);
    }

    #[test]
    fn stale_results_are_ignored() {
        let mut app = app();
        app.handle_message(AppMessage::Prepared {
            request: 7,
            result: Ok(prepared()),
        });

        assert_eq!(app.state, AppState::Home);
        assert!(app.prepared.is_none());
    }

    #[test]
    fn lookup_failure_returns_home() {
        let mut app = app();
        app.handle_message(AppMessage::Prepared {
            request: 0,
            result: Err(Error::VideoNotFound("dQw4w9WgXcQ".into())),
        });

        assert_eq!(app.state, AppState::Home);
        assert!(app.status.as_deref().unwrap().contains("No video found"));
    }

    #[test]
    fn progress_and_summary_flow() {
        let mut app = app();
        app.prepared = Some(prepared());
        app.state = AppState::Processing {
            video_id: "dQw4w9WgXcQ".into(),
        };

        app.handle_message(AppMessage::Progress {
            request: 0,
            event: PipelineEvent::ExecutiveFinished,
        });
        assert!((app.progress_bar.progress - 1.0 / 3.0).abs() < 1e-9);

        app.handle_message(AppMessage::Progress {
            request: 0,
            event: PipelineEvent::SectionFinished { index: 0, total: 2 },
        });
        assert!((app.progress_bar.progress - 2.0 / 3.0).abs() < 1e-9);

        let video = prepared();
        app.handle_message(AppMessage::Summarized {
            request: 0,
            result: Ok(VideoSummary {
                video_id: video.video_id,
                metadata: None,
                result: SummaryResult {
                    executive: "- point".into(),
                    sections: video
                        .chunks
                        .into_iter()
                        .map(|chunk| SectionSummary {
                            chunk,
                            summary: "summary".into(),
                        })
                        .collect(),
                },
            }),
        });

        assert_eq!(app.state, AppState::Viewer);
        let viewer = app.content_viewer.as_ref().unwrap();
        assert_eq!(viewer.title, "dQw4w9WgXcQ");
    }

    #[test]
    fn escape_abandons_processing() {
        let mut app = app();
        app.prepared = Some(prepared());
        app.state = AppState::Processing {
            video_id: "dQw4w9WgXcQ".into(),
        };

        app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(app.state, AppState::Preview);

        app.handle_message(AppMessage::Summarized {
            request: 0,
            result: Err(Error::EmptyCompletion),
        });
        assert_eq!(app.state, AppState::Preview);
        assert!(app.status.is_none());
    }
}
