//! Interactive terminal viewer.

mod app;
mod ui;

use std::io::{self, stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lens_core::{ResultSet, Viewer, ViewerSettings};
use ratatui::prelude::*;

pub use app::App;

/// How often the loop wakes up without input to release the page lock.
const TICK_RATE: Duration = Duration::from_millis(50);

pub fn run(settings: ViewerSettings, results: Option<ResultSet>) -> anyhow::Result<()> {
    let mut viewer = Viewer::new(settings);
    viewer.load_results(results);
    let mut app = App::new(viewer);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result.map_err(Into::into)
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(TICK_RATE)? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key, Instant::now()),
                Event::Mouse(mouse) => app.handle_mouse(mouse, Instant::now()),
                _ => {}
            }
        }
        app.tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}
