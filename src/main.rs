mod app;
mod draw;
mod keys;
mod ui;

use crate::app::App;
use crossterm::event::{self as crossterm_event, Event, KeyEventKind};
use crossterm::{cursor, execute, terminal};
use log::{info, warn};
use sportsdb_api::{AuthApi, SportsApi};
use sportszone::state::app_settings::AppSettings;
use sportszone::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use sportszone::state::network::{LoadingState, NetworkWorker};
use sportszone::state::persistence::Persister;
use sportszone::state::storage::{FileStore, KeyValueStore, MemoryStore};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    let settings = AppSettings::load();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(settings.log_level)?;

    // Persistence thread
    let persister = Persister::spawn(open_storage(&settings));

    let sports_api = SportsApi::with_base_url(settings.sports_api_url.clone());
    let auth_api = AuthApi::with_base_url(settings.auth_api_url.clone());

    let mut app = App::new(settings, persister.clone());
    app.state.hydrate().await;
    let app = Arc::new(Mutex::new(app));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let _input_handler = tokio::task::spawn_blocking({
        let ui_events = ui_event_tx.clone();
        move || input_handler_task(ui_events)
    });

    // Network thread
    let network_worker = NetworkWorker::new(sports_api, auth_api, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    // Queued writes (favorites, theme, session) land before exit.
    persister.flush().await;

    network_task.abort();
    cleanup_terminal();
    // The input reader blocks on the terminal and would hold runtime shutdown.
    std::process::exit(0);
}

/// File storage in the data directory, or memory-only storage for this run
/// when the directory cannot be created.
fn open_storage(settings: &AppSettings) -> Box<dyn KeyValueStore> {
    match std::fs::create_dir_all(&settings.data_dir) {
        Ok(()) => {
            info!("storing data in {}", settings.data_dir.display());
            Box::new(FileStore::new(settings.data_dir.clone()))
        }
        Err(e) => {
            warn!(
                "cannot use {} ({e}); favorites and settings will not be saved",
                settings.data_dir.display()
            );
            Box::new(MemoryStore::new())
        }
    }
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("sportszone {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "sportszone - browse teams, players and fixtures from TheSportsDB

Usage:
  sportszone
  sportszone --help
  sportszone --version

Environment:
  SPORTSZONE_DATA_DIR     Directory for favorites, theme and session (default ~/.config/sportszone)
  SPORTSZONE_SPORTS_API   Sports API base URL (default https://www.thesportsdb.com/api/v1/json/3)
  SPORTSZONE_AUTH_API     Auth API base URL (default https://dummyjson.com)
  SPORTSZONE_LEAGUE       League shown on startup (default English Premier League)
  SPORTSZONE_USERNAME     Username used by the log in key
  SPORTSZONE_PASSWORD     Password used by the log in key
  SPORTSZONE_EMAIL        Email used when creating an account
  SPORTSZONE_LOG          Log level: error, warn, info, debug, trace (default info)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let Some(should_redraw) = handle_ui_event(ui_event, &app, &network_requests).await else {
                    return;
                };
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                handle_network_response(response, &app, &mut loading).await;
                let mut app_guard = app.lock().await;
                draw::draw(&mut terminal, &mut app_guard, loading);
            }

            else => return,
        }
    }
}

/// `None` means the user asked to quit.
async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> Option<bool> {
    match ui_event {
        UiEvent::AppStarted => {
            let requests = {
                let mut guard = app.lock().await;
                [guard.load_league(), guard.request_leagues()]
            };
            for request in requests {
                let _ = network_requests.send(request).await;
            }
            Some(true)
        }
        UiEvent::KeyPressed(key_event) => {
            let quit = keys::handle_key_bindings(key_event, app, network_requests).await;
            (!quit).then_some(true)
        }
        UiEvent::Resize => Some(true),
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) {
    let mut guard = app.lock().await;
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => *loading = loading_state,
        NetworkResponse::TeamsLoaded { result } => guard.on_teams_loaded(result),
        NetworkResponse::PlayersLoaded { result } => guard.on_players_loaded(result),
        NetworkResponse::MatchesLoaded { result } => guard.on_matches_loaded(result),
        NetworkResponse::LeaguesLoaded { result } => guard.on_leagues_loaded(result),
        NetworkResponse::TeamDetailsLoaded { team_id, team, next, last } => {
            guard.on_team_details_loaded(&team_id, team, next, last)
        }
        NetworkResponse::PlayerDetailsLoaded { player_id, result } => {
            guard.on_player_details_loaded(&player_id, result)
        }
        NetworkResponse::SessionLoaded { result } => guard.on_session_loaded(result),
    }
}

fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        match crossterm_event::read() {
            Ok(event) => {
                let ui_event = match event {
                    Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                        Some(UiEvent::KeyPressed(key_event))
                    }
                    Event::Resize(_, _) => Some(UiEvent::Resize),
                    _ => None,
                };

                if let Some(ui_event) = ui_event
                    && ui_events.blocking_send(ui_event).is_err()
                {
                    break;
                }
            }
            Err(e) => {
                warn!("failed to read terminal event: {e}");
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    // Best effort: the terminal may already be gone.
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
