use crate::app::App;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sportszone::state::app_state::MenuItem;
use sportszone::state::messages::NetworkRequest;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// Apply one key press. Returns `true` when the user asked to quit.
pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    let mut guard = app.lock().await;
    let mut requests: Vec<NetworkRequest> = Vec::new();

    if guard.is_searching() {
        match key_event.code {
            KeyCode::Esc => guard.cancel_search(),
            KeyCode::Enter => requests.extend(guard.submit_search()),
            KeyCode::Backspace => guard.pop_search_char(),
            Char(c) => guard.push_search_char(c),
            _ => {}
        }
        drop(guard);
        send_all(requests, network_requests).await;
        return false;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => return true,

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Home),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Players),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Favorites),
        (_, Char('4'), _) => guard.update_tab(MenuItem::Profile),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Lists
        (_, Char('j') | KeyCode::Down, _) => guard.move_down(),
        (_, Char('k') | KeyCode::Up, _) => guard.move_up(),
        (MenuItem::Home, KeyCode::Tab | Char('h') | Char('l') | KeyCode::Left | KeyCode::Right, _) => {
            guard.switch_home_focus()
        }
        (MenuItem::Home | MenuItem::Players | MenuItem::Favorites, KeyCode::Enter, _) => {
            requests.extend(guard.open_detail())
        }
        (MenuItem::Home | MenuItem::Detail, Char('p'), _) => requests.extend(guard.select_team()),
        (MenuItem::Players, KeyCode::Esc, _) => guard.update_tab(MenuItem::Home),
        (MenuItem::Detail, KeyCode::Esc, _) => guard.close_detail(),
        (MenuItem::Favorites, Char('d') | KeyCode::Delete, _) => guard.remove_selected_favorite(),
        (MenuItem::Favorites, KeyCode::Tab | Char('l') | KeyCode::Right, _) => guard.next_favorites_filter(),
        (MenuItem::Favorites, KeyCode::BackTab | Char('h') | KeyCode::Left, _) => {
            guard.previous_favorites_filter()
        }

        // Data
        (_, Char('f'), _) => guard.toggle_favorite(),
        (MenuItem::Home, Char('s'), _) => requests.extend(guard.cycle_sport()),
        (MenuItem::Home, Char('g'), _) => requests.extend(guard.cycle_league()),
        (_, Char('/'), _) => guard.open_search(),
        (_, Char('r'), _) => requests.extend(guard.retry()),
        (_, Char('x'), _) => guard.clear_errors(),

        // Account
        (MenuItem::Profile, Char('l'), _) => requests.extend(guard.login()),
        (MenuItem::Profile, Char('n'), _) => requests.extend(guard.register()),
        (MenuItem::Profile, Char('o'), _) => guard.logout(),

        // Global
        (_, Char('t'), _) => guard.toggle_theme(),
        (_, Char('F'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    drop(guard);
    send_all(requests, network_requests).await;
    false
}

async fn send_all(requests: Vec<NetworkRequest>, network_requests: &mpsc::Sender<NetworkRequest>) {
    for request in requests {
        let _ = network_requests.send(request).await;
    }
}
