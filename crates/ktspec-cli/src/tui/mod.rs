//! Terminal test explorer.
//!
//! Provides an interactive terminal UI with:
//! - A list of open files standing in for editor tabs
//! - The spec/test tree of the selected file
//! - Run / Debug / Coverage actions on the selected node

mod app;
mod components;
mod event;
mod ui;

use std::io::{stdout, Stdout};
use std::path::PathBuf;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use app::App;
use ktspec_core::{Config, Project};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Run the explorer until the user quits.
pub async fn run(
    config: Config,
    project: Project,
    open_files: Vec<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = enter()?;

    // A panic inside the loop must not leave the terminal in raw mode.
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = leave();
        hook(info);
    }));

    let mut app = App::new(config, project, open_files);
    let result = app.run(&mut terminal).await;

    leave()?;
    terminal.show_cursor()?;
    result
}

fn enter() -> std::io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn leave() -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)
}
