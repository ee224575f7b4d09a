//! Application state and main event loop.

use std::io::Stdout;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use ktspec_core::{
    CommandLine, Config, FileWatcher, Project, ProjectIndex, RunMode, RunRequest, SpecDiscovery,
    TestExplorer,
};

use super::event::{Event, EventHandler};
use super::ui;

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Open files, standing in for editor tabs
    Files,
    #[default]
    Tree,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Self::Files => Self::Tree,
            Self::Tree => Self::Files,
        }
    }
}

/// Main application state.
pub struct App {
    /// The explorer model
    pub explorer: TestExplorer,
    /// Files offered for selection
    pub open_files: Vec<PathBuf>,
    /// Cursor in `open_files`
    pub file_cursor: usize,
    /// Focused pane
    pub focus: Focus,
    /// Last run request and its command line
    pub last_request: Option<(RunRequest, CommandLine)>,
    /// Status message
    pub status_message: Option<String>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Configuration
    pub config: Config,
    watcher: FileWatcher,
    since_poll: Duration,
}

impl App {
    /// Create a new app instance.
    pub fn new(config: Config, project: Project, open_files: Vec<PathBuf>) -> Self {
        let discovery = SpecDiscovery::from_config(&config.discovery);
        let explorer = TestExplorer::new(project, discovery, &config.explorer);

        let mut watcher = FileWatcher::new();
        for file in &open_files {
            watcher.watch(file.clone());
        }

        Self {
            explorer,
            open_files,
            file_cursor: 0,
            focus: Focus::Tree,
            last_request: None,
            status_message: None,
            should_quit: false,
            config,
            watcher,
            since_poll: Duration::ZERO,
        }
    }

    /// Run the main event loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let tick_rate = Duration::from_millis(self.config.explorer.tick_rate_ms);
        let mut events = EventHandler::new(tick_rate);

        self.start_indexing(events.sender());
        if !self.open_files.is_empty() {
            self.select_file(0);
        }

        loop {
            // Draw UI
            terminal.draw(|frame| ui::render(self, frame))?;

            // Handle events
            if let Some(event) = events.next().await {
                match event {
                    Event::Key(key) => self.handle_key_event(key),
                    Event::Tick => self.handle_tick(tick_rate),
                    Event::IndexingFinished(index) => self.handle_indexing_finished(*index),
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Scan the project on a blocking task; refreshes wait until it reports back.
    fn start_indexing(&mut self, event_tx: mpsc::UnboundedSender<Event>) {
        self.explorer.begin_indexing();
        self.status_message = Some("Indexing project...".to_string());

        let project = self.explorer.project().clone();
        let config = self.config.discovery.clone();
        tokio::spawn(async move {
            let index = tokio::task::spawn_blocking(move || {
                project.index(&SpecDiscovery::from_config(&config))
            })
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "project scan failed");
                ProjectIndex::default()
            });
            let _ = event_tx.send(Event::IndexingFinished(Box::new(index)));
        });
    }

    fn handle_indexing_finished(&mut self, index: ProjectIndex) {
        self.status_message = Some(format!(
            "Indexed {} files: {} specs, {} tests",
            index.files_scanned,
            index.spec_count(),
            index.test_count()
        ));

        if self.open_files.is_empty() {
            self.open_files = index.files.iter().map(|f| f.path.clone()).collect();
            for file in &self.open_files {
                if !self.watcher.is_watching(file) {
                    self.watcher.watch(file.clone());
                }
            }
            if !self.open_files.is_empty() {
                self.select_file(0);
            }
        }

        self.explorer.indexing_finished();
    }

    fn handle_tick(&mut self, tick_rate: Duration) {
        self.since_poll += tick_rate;
        if self.since_poll.as_millis() < u128::from(self.config.explorer.poll_interval_ms) {
            return;
        }
        self.since_poll = Duration::ZERO;

        let changed = self.watcher.poll();
        if changed.is_empty() {
            return;
        }
        debug!(count = changed.len(), "files changed");

        // Deleted files leave the list; the explorer still refreshes to empty.
        for gone in changed.iter().filter(|path| !path.exists()) {
            self.watcher.unwatch(gone);
            self.open_files.retain(|file| file != gone);
        }
        self.file_cursor = self.file_cursor.min(self.open_files.len().saturating_sub(1));

        self.explorer.files_changed(&changed);
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Tab | KeyCode::BackTab => self.focus = self.focus.toggle(),
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),
            KeyCode::Enter | KeyCode::Char(' ') => match self.focus {
                Focus::Files => self.select_file(self.file_cursor),
                Focus::Tree => self.explorer.tree_mut().toggle_selected(),
            },
            KeyCode::Char('r') => self.run_selected(RunMode::Run),
            KeyCode::Char('d') => self.run_selected(RunMode::Debug),
            KeyCode::Char('c') => self.run_selected(RunMode::Coverage),
            KeyCode::Char('e') => self.explorer.tree_mut().expand_all(),
            KeyCode::Char('x') => self.explorer.tree_mut().collapse_all(),
            KeyCode::Char('R') => {
                self.explorer.refresh_content();
                self.status_message = Some("Refreshed".to_string());
            }
            _ => {}
        }
    }

    fn move_down(&mut self) {
        match self.focus {
            Focus::Files => {
                if self.file_cursor + 1 < self.open_files.len() {
                    self.file_cursor += 1;
                }
            }
            Focus::Tree => self.explorer.tree_mut().select_next(),
        }
    }

    fn move_up(&mut self) {
        match self.focus {
            Focus::Files => self.file_cursor = self.file_cursor.saturating_sub(1),
            Focus::Tree => self.explorer.tree_mut().select_previous(),
        }
    }

    /// Equivalent of switching editor tabs.
    fn select_file(&mut self, index: usize) {
        let Some(file) = self.open_files.get(index).cloned() else {
            return;
        };
        self.file_cursor = index;
        self.explorer.selection_changed(Some(file));
    }

    fn run_selected(&mut self, mode: RunMode) {
        match self.explorer.run_selected(mode) {
            Some(request) => {
                let command = request.command_line(&self.config.run);
                self.status_message = Some(format!("{}: {}", mode, request.name()));
                self.last_request = Some((request, command));
            }
            None => {
                let action = mode.name().to_lowercase();
                self.status_message = Some(format!("Select a spec or test to {}", action));
            }
        }
    }

    /// Label of the file at `index`, relative to the project root.
    pub fn file_label(&self, index: usize) -> String {
        let Some(path) = self.open_files.get(index) else {
            return String::new();
        };
        path.strip_prefix(self.explorer.project().root())
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
