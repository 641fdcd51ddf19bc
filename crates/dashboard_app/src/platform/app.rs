use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use dashboard_core::{update, AppState, Msg, ProjectId};
use dashboard_engine::{EngineHandle, TokenStore};
use dashboard_logging::{dashboard_info, dashboard_warn};
use url::Url;

use super::effects::EffectRunner;
use super::ui;
use super::ui::commands::{self, Command, CommandError};

const TICK: Duration = Duration::from_millis(75);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run_app(
    engine: EngineHandle,
    tokens: Arc<TokenStore>,
    base_url: Url,
) -> io::Result<()> {
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(engine, base_url, msg_tx);
    let input_rx = spawn_input_reader();

    let stdout = io::stdout();
    let mut dashboard = Dashboard::new(runner, tokens, stdout.lock());
    dashboard.say(ui::constants::BANNER)?;
    dashboard.dispatch(Msg::Activated)?;

    'session: loop {
        loop {
            match input_rx.try_recv() {
                Ok(line) => {
                    if dashboard.handle_line(&line)? == Flow::Quit {
                        break 'session;
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break 'session,
            }
        }
        while let Ok(msg) = msg_rx.try_recv() {
            dashboard.dispatch(msg)?;
        }
        thread::sleep(TICK);
    }

    dashboard.dispatch(Msg::Deactivated)?;
    dashboard_info!("Dashboard session ended");
    Ok(())
}

fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    dashboard_warn!("Stopped reading input: {}", err);
                    break;
                }
            }
        }
    });
    rx
}

/// Owns the session state; every `Msg` goes through `dispatch`.
struct Dashboard<W: Write> {
    state: AppState,
    runner: EffectRunner,
    tokens: Arc<TokenStore>,
    pending_delete: Option<ProjectId>,
    out: W,
    prompt_shown: bool,
}

impl<W: Write> Dashboard<W> {
    fn new(runner: EffectRunner, tokens: Arc<TokenStore>, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            tokens,
            pending_delete: None,
            out,
            prompt_shown: false,
        }
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        for url in self.runner.enqueue(effects) {
            dashboard_info!("Opening editor at {}", url);
            self.say(&format!("Open in editor: {url}"))?;
        }

        if self.state.consume_dirty() {
            let view = self.state.view();
            for line in ui::render::render(&view) {
                self.say(&line)?;
            }
        }
        self.prompt()
    }

    fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        self.prompt_shown = false;

        if let Some(project_id) = self.pending_delete.take() {
            if commands::is_confirmation(line) {
                self.dispatch(Msg::DeleteConfirmed(project_id))?;
            } else {
                self.say("Delete cancelled.")?;
            }
            self.prompt()?;
            return Ok(Flow::Continue);
        }

        let command = match commands::parse(line) {
            Ok(command) => command,
            Err(CommandError::Empty) => {
                self.prompt()?;
                return Ok(Flow::Continue);
            }
            Err(err) => {
                self.say(&err.to_string())?;
                self.prompt()?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::Search(text) => self.dispatch(Msg::QueryChanged(text))?,
            Command::Sort(key) => self.dispatch(Msg::SortChanged(key))?,
            Command::Open(id) => self.dispatch(Msg::OpenRequested(id))?,
            Command::Download(id) => self.dispatch(Msg::DownloadRequested(id))?,
            Command::Duplicate(id) => self.dispatch(Msg::DuplicateRequested(id))?,
            Command::Delete(id) => {
                let view = self.state.view();
                let card = view.cards.iter().find(|card| card.project_id == id);
                self.say(&ui::render::delete_prompt(card, &id))?;
                self.pending_delete = Some(id);
            }
            Command::Upload(path) => self.dispatch(Msg::UploadRequested(path))?,
            Command::Reload => self.dispatch(Msg::LoadRequested)?,
            Command::Retry => self.dispatch(Msg::RetryClicked)?,
            Command::Dismiss => self.dispatch(Msg::NoticeDismissed)?,
            Command::Help => {
                for line in ui::constants::HELP_LINES {
                    self.say(line)?;
                }
            }
            Command::Logout => {
                if let Err(err) = self.tokens.logout() {
                    dashboard_warn!("Could not clear stored credentials: {}", err);
                }
                self.say("Signed out.")?;
                return Ok(Flow::Quit);
            }
            Command::Quit => return Ok(Flow::Quit),
        }

        self.prompt()?;
        Ok(Flow::Continue)
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        if self.prompt_shown {
            writeln!(self.out)?;
            self.prompt_shown = false;
        }
        writeln!(self.out, "{text}")
    }

    fn prompt(&mut self) -> io::Result<()> {
        if !self.prompt_shown {
            write!(self.out, "{}", ui::constants::PROMPT)?;
            self.out.flush()?;
            self.prompt_shown = true;
        }
        Ok(())
    }
}
