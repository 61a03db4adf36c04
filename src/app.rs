use log::info;
use sportszone::state::app_settings::AppSettings;
use sportszone::state::app_state::{AppState, HomeFocus, MenuItem};
use sportszone::state::detail::{DetailTarget, DetailView};
use sportszone::state::favorites::FavoriteFilter;
use sportszone::state::messages::NetworkRequest;
use sportszone::state::persistence::Persister;
use sportszone::state::sports::SliceKind;
use sportsdb_api::{ApiError, ApiResult, League, Match, Player, Registration, Session, Team};

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    /// Last login or registration sent, resent by retry after a failure.
    last_auth: Option<NetworkRequest>,
}

impl App {
    pub fn new(settings: AppSettings, persister: Persister) -> Self {
        log::set_max_level(settings.log_level);
        tui_logger::set_default_level(settings.log_level);

        Self {
            state: AppState::new(persister, &settings.default_league),
            settings,
            last_auth: None,
        }
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_teams_loaded(&mut self, result: ApiResult<Vec<Team>>) {
        self.state.sports.apply_teams(result);
        self.state.clamp_cursors();
    }

    pub fn on_players_loaded(&mut self, result: ApiResult<Vec<Player>>) {
        self.state.sports.apply_players(result);
        self.state.clamp_cursors();
    }

    pub fn on_matches_loaded(&mut self, result: ApiResult<Vec<Match>>) {
        self.state.sports.apply_matches(result);
        self.state.clamp_cursors();
    }

    pub fn on_leagues_loaded(&mut self, result: ApiResult<Vec<League>>) {
        self.state.sports.apply_leagues(result);
    }

    pub fn on_team_details_loaded(
        &mut self,
        team_id: &str,
        team: ApiResult<Team>,
        next: ApiResult<Vec<Match>>,
        last: ApiResult<Vec<Match>>,
    ) {
        if let Some(view) = self.state.detail.as_mut()
            && !view.apply_team(team_id, team, next, last)
        {
            info!("dropped details for team {team_id}, no longer shown");
        }
    }

    pub fn on_player_details_loaded(&mut self, player_id: &str, result: ApiResult<Player>) {
        if let Some(view) = self.state.detail.as_mut()
            && !view.apply_player(player_id, result)
        {
            info!("dropped details for player {player_id}, no longer shown");
        }
    }

    pub fn on_session_loaded(&mut self, result: ApiResult<Session>) {
        self.state.auth.apply_login(result);
    }

    // -----------------------------------------------------------------------
    // Requests. Each marks its slices as loading before the request leaves.
    // -----------------------------------------------------------------------

    pub fn load_league(&mut self) -> NetworkRequest {
        self.state.sports.begin(SliceKind::Teams);
        self.state.sports.begin(SliceKind::Matches);
        NetworkRequest::LoadLeague { league: self.state.sports.selected_league().to_string() }
    }

    /// Move to the next sport. Teams are cleared right away and refetched
    /// from the new sport's primary league, together with its fixtures.
    pub fn cycle_sport(&mut self) -> Vec<NetworkRequest> {
        let sport = self.state.sports.current_sport().next();
        self.state.sports.set_current_sport(sport);
        self.state.sports.set_selected_league(sport.primary_league());
        self.state.teams_cursor.reset();
        self.state.matches_cursor.reset();
        info!("switched to {sport}");

        self.state.sports.begin(SliceKind::Teams);
        self.state.sports.begin(SliceKind::Matches);
        vec![
            NetworkRequest::TeamsBySport { sport },
            NetworkRequest::MatchesByLeague { league: sport.primary_league().to_string() },
        ]
    }

    /// Select the next league of the current sport and reload it.
    pub fn cycle_league(&mut self) -> Option<NetworkRequest> {
        let league = self.state.next_league()?;
        info!("selected league {league}");
        self.state.sports.set_selected_league(league);
        self.state.teams_cursor.reset();
        self.state.matches_cursor.reset();
        Some(self.load_league())
    }

    pub fn request_leagues(&mut self) -> NetworkRequest {
        self.state.sports.begin(SliceKind::Leagues);
        NetworkRequest::Leagues
    }

    // Team search prompt

    pub fn open_search(&mut self) {
        self.update_tab(MenuItem::Home);
        self.state.home_focus = HomeFocus::Teams;
        self.state.search_input = Some(String::new());
    }

    pub fn is_searching(&self) -> bool {
        self.state.search_input.is_some()
    }

    pub fn push_search_char(&mut self, c: char) {
        if let Some(input) = self.state.search_input.as_mut() {
            input.push(c);
        }
    }

    pub fn pop_search_char(&mut self) {
        if let Some(input) = self.state.search_input.as_mut() {
            input.pop();
        }
    }

    pub fn cancel_search(&mut self) {
        self.state.search_input = None;
    }

    pub fn submit_search(&mut self) -> Option<NetworkRequest> {
        let query = self.state.search_input.take()?.trim().to_string();
        if query.is_empty() {
            return None;
        }
        self.state.teams_cursor.reset();
        self.state.sports.begin(SliceKind::Teams);
        Some(NetworkRequest::SearchTeams { query })
    }

    /// Open the Players tab for the team under the cursor, or the team on
    /// the Detail screen.
    pub fn select_team(&mut self) -> Option<NetworkRequest> {
        let team = match (self.state.active_tab, self.state.detail.as_ref()) {
            (MenuItem::Detail, Some(view)) => match view.target() {
                DetailTarget::Team(team) => team.name.clone(),
                _ => return None,
            },
            (MenuItem::Detail, None) => return None,
            _ => self.state.sports.teams().items().get(self.state.teams_cursor.selected)?.name.clone(),
        };
        self.state.players_team = Some(team.clone());
        self.state.players_cursor.reset();
        self.update_tab(MenuItem::Players);
        self.state.sports.begin(SliceKind::Players);
        Some(NetworkRequest::PlayersByTeam { team_name: team })
    }

    // Detail screen

    /// Show the full record under the cursor. Teams and players are looked
    /// up again; a team also loads its next and last fixtures.
    pub fn open_detail(&mut self) -> Option<NetworkRequest> {
        let target = self.state.selected_detail_target()?;
        info!("opening details for {}", target.name());
        self.state.detail = Some(DetailView::new(target));
        self.update_tab(MenuItem::Detail);
        self.refresh_detail()
    }

    pub fn close_detail(&mut self) {
        if self.state.active_tab == MenuItem::Detail {
            self.state.active_tab = self.state.previous_tab;
            self.state.detail = None;
        }
    }

    fn refresh_detail(&mut self) -> Option<NetworkRequest> {
        let view = self.state.detail.as_mut()?;
        if !view.begin() {
            return None;
        }
        match view.target() {
            DetailTarget::Team(team) => Some(NetworkRequest::TeamDetails { team_id: team.id.clone() }),
            DetailTarget::Player(player) => Some(NetworkRequest::PlayerDetails { player_id: player.id.clone() }),
            DetailTarget::Match(_) => None,
        }
    }

    /// Manual retry for the current tab.
    pub fn retry(&mut self) -> Vec<NetworkRequest> {
        self.state.sports.clear_error();
        match self.state.active_tab {
            MenuItem::Players => {
                let Some(team_name) = self.state.players_team.clone() else {
                    return Vec::new();
                };
                self.state.sports.begin(SliceKind::Players);
                vec![NetworkRequest::PlayersByTeam { team_name }]
            }
            MenuItem::Profile => {
                let mut requests = vec![self.request_leagues()];
                if self.state.auth.error().is_some() {
                    requests.extend(self.retry_auth());
                }
                requests
            }
            MenuItem::Detail => self.refresh_detail().into_iter().collect(),
            _ => vec![self.load_league()],
        }
    }

    pub fn login(&mut self) -> Option<NetworkRequest> {
        let Some(credentials) = self.settings.credentials.clone() else {
            self.missing_credentials();
            return None;
        };
        self.send_auth(NetworkRequest::Login {
            username: credentials.username,
            password: credentials.password,
        })
    }

    pub fn register(&mut self) -> Option<NetworkRequest> {
        let Some(credentials) = self.settings.credentials.clone() else {
            self.missing_credentials();
            return None;
        };
        let email = credentials
            .email
            .clone()
            .unwrap_or_else(|| format!("{}@example.com", credentials.username));
        self.send_auth(NetworkRequest::Register {
            registration: Registration {
                first_name: credentials.username.clone(),
                last_name: String::new(),
                username: credentials.username,
                email,
                password: credentials.password,
            },
        })
    }

    /// Resend the last login or registration; a log in when there was none.
    fn retry_auth(&mut self) -> Option<NetworkRequest> {
        match self.last_auth.clone() {
            Some(request) => self.send_auth(request),
            None => self.login(),
        }
    }

    fn send_auth(&mut self, request: NetworkRequest) -> Option<NetworkRequest> {
        self.state.auth.begin();
        self.last_auth = Some(request.clone());
        Some(request)
    }

    fn missing_credentials(&mut self) {
        self.state.auth.apply_login(Err(ApiError::NotFound(
            "credentials (set SPORTSZONE_USERNAME and SPORTSZONE_PASSWORD)".into(),
        )));
    }

    pub fn logout(&mut self) {
        self.state.auth.logout();
    }

    // -----------------------------------------------------------------------
    // Local state changes
    // -----------------------------------------------------------------------

    pub fn toggle_favorite(&mut self) {
        if let Some(item) = self.state.selected_favorite_candidate() {
            let name = item.name.clone();
            let now_favorite = self.state.favorites.toggle(item);
            info!("{} {name}", if now_favorite { "favorited" } else { "unfavorited" });
            self.state.clamp_cursors();
        }
    }

    pub fn remove_selected_favorite(&mut self) {
        if let Some(id) = self.state.selected_favorite().map(|f| f.id.clone()) {
            self.state.favorites.remove(&id);
            self.state.clamp_cursors();
        }
    }

    pub fn next_favorites_filter(&mut self) {
        self.set_favorites_filter(self.state.favorites_filter.next());
    }

    pub fn previous_favorites_filter(&mut self) {
        self.set_favorites_filter(self.state.favorites_filter.previous());
    }

    fn set_favorites_filter(&mut self, filter: FavoriteFilter) {
        self.state.favorites_filter = filter;
        self.state.favorites_cursor.reset();
    }

    pub fn toggle_theme(&mut self) {
        self.state.theme.toggle();
    }

    pub fn clear_errors(&mut self) {
        self.state.sports.clear_error();
        self.state.auth.clear_error();
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn switch_home_focus(&mut self) {
        self.state.home_focus = self.state.home_focus.other();
    }

    pub fn move_down(&mut self) {
        let state = &mut self.state;
        match state.active_tab {
            MenuItem::Home => match state.home_focus {
                HomeFocus::Teams => state.teams_cursor.down(state.sports.teams().items().len()),
                HomeFocus::Matches => state.matches_cursor.down(state.sports.matches().items().len()),
            },
            MenuItem::Players => state.players_cursor.down(state.sports.players().items().len()),
            MenuItem::Favorites => {
                let len = state.visible_favorites().len();
                state.favorites_cursor.down(len);
            }
            MenuItem::Profile | MenuItem::Help | MenuItem::Detail => {}
        }
    }

    pub fn move_up(&mut self) {
        let state = &mut self.state;
        match state.active_tab {
            MenuItem::Home => match state.home_focus {
                HomeFocus::Teams => state.teams_cursor.up(),
                HomeFocus::Matches => state.matches_cursor.up(),
            },
            MenuItem::Players => state.players_cursor.up(),
            MenuItem::Favorites => state.favorites_cursor.up(),
            MenuItem::Profile | MenuItem::Help | MenuItem::Detail => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sportsdb_api::Sport;
    use sportszone::state::app_settings::Credentials;
    use sportszone::state::favorites::{FavoriteItem, FavoriteKind};
    use sportszone::state::persistence::Persister;
    use sportszone::state::storage::MemoryStore;

    fn app() -> App {
        App::new(AppSettings::default(), Persister::spawn(MemoryStore::new()))
    }

    #[tokio::test]
    async fn cycle_sport_clears_teams_and_requests_new_league() {
        let mut app = app();
        app.on_teams_loaded(Ok(vec![Team { id: "1".into(), name: "Arsenal".into(), ..Default::default() }]));

        let requests = app.cycle_sport();

        assert_eq!(app.state.sports.current_sport(), Sport::Basketball);
        assert_eq!(app.state.sports.selected_league(), "NBA");
        assert!(app.state.sports.teams().items().is_empty());
        assert!(app.state.sports.teams().is_loading());
        assert!(matches!(
            requests.as_slice(),
            [NetworkRequest::TeamsBySport { sport: Sport::Basketball }, NetworkRequest::MatchesByLeague { league }]
                if league == "NBA"
        ));
    }

    #[tokio::test]
    async fn select_team_opens_players() {
        let mut app = app();
        assert!(app.select_team().is_none());

        app.on_teams_loaded(Ok(vec![Team { id: "1".into(), name: "Arsenal".into(), ..Default::default() }]));
        let request = app.select_team();

        assert_eq!(app.state.active_tab, MenuItem::Players);
        assert_eq!(app.state.players_team.as_deref(), Some("Arsenal"));
        assert!(matches!(request, Some(NetworkRequest::PlayersByTeam { team_name }) if team_name == "Arsenal"));
    }

    #[tokio::test]
    async fn search_prompt_submits_trimmed_query() {
        let mut app = app();
        app.open_search();
        assert!(app.is_searching());
        for c in " ars".chars() {
            app.push_search_char(c);
        }
        app.push_search_char('x');
        app.pop_search_char();

        let request = app.submit_search();
        assert!(!app.is_searching());
        assert!(matches!(request, Some(NetworkRequest::SearchTeams { query }) if query == "ars"));

        app.open_search();
        assert!(app.submit_search().is_none());
    }

    #[tokio::test]
    async fn favorite_toggle_follows_selection() {
        let mut app = app();
        app.on_teams_loaded(Ok(vec![Team { id: "1".into(), name: "Arsenal".into(), ..Default::default() }]));

        app.toggle_favorite();
        assert!(app.state.favorites.contains("1"));

        app.update_tab(MenuItem::Favorites);
        app.remove_selected_favorite();
        assert!(app.state.favorites.is_empty());
    }

    #[tokio::test]
    async fn login_and_register_without_credentials_report_error() {
        let mut app = app();
        assert!(app.login().is_none());
        assert!(app.state.auth.error().is_some());

        app.clear_errors();
        assert!(app.register().is_none());
        assert!(app.state.auth.error().is_some_and(|e| e.contains("SPORTSZONE_USERNAME")));
    }

    #[tokio::test]
    async fn profile_retry_resends_failed_sign_in() {
        let settings = AppSettings {
            credentials: Some(Credentials {
                username: "emilys".into(),
                password: "emilyspass".into(),
                email: None,
            }),
            ..Default::default()
        };
        let mut app = App::new(settings, Persister::spawn(MemoryStore::new()));
        app.update_tab(MenuItem::Profile);

        // Nothing failed: retry only refetches leagues.
        assert!(matches!(app.retry().as_slice(), [NetworkRequest::Leagues]));

        assert!(matches!(app.register(), Some(NetworkRequest::Register { .. })));
        app.on_session_loaded(Err(ApiError::NotFound("users/add".into())));
        assert!(app.state.auth.error().is_some());

        let requests = app.retry();
        assert!(matches!(
            requests.as_slice(),
            [NetworkRequest::Leagues, NetworkRequest::Register { registration }]
                if registration.username == "emilys"
        ));
        assert!(app.state.auth.is_loading());
        assert!(app.state.auth.error().is_none());
    }

    #[tokio::test]
    async fn favorites_filter_narrows_cursor_and_delete() {
        let mut app = app();
        app.state.favorites.add(FavoriteItem::new("t1", FavoriteKind::Team, "Arsenal"));
        app.state.favorites.add(FavoriteItem::new("p1", FavoriteKind::Player, "Saka"));
        app.state.favorites.add(FavoriteItem::new("m1", FavoriteKind::Match, "Arsenal vs Chelsea"));
        app.state.favorites.add(FavoriteItem::new("p2", FavoriteKind::Player, "Rice"));
        app.update_tab(MenuItem::Favorites);
        app.move_down();

        app.next_favorites_filter();
        assert_eq!(app.state.favorites_filter, FavoriteFilter::Teams);
        app.next_favorites_filter();
        assert_eq!(app.state.favorites_filter, FavoriteFilter::Players);
        assert_eq!(app.state.favorites_cursor.selected, 0);

        // The cursor stops at the end of the filtered list, not the full one.
        app.move_down();
        app.move_down();
        assert_eq!(app.state.favorites_cursor.selected, 1);

        app.remove_selected_favorite();
        assert!(!app.state.favorites.contains("p2"));
        assert_eq!(app.state.favorites.len(), 3);
        assert_eq!(app.state.favorites_cursor.selected, 0);

        app.previous_favorites_filter();
        app.previous_favorites_filter();
        assert_eq!(app.state.favorites_filter, FavoriteFilter::All);
        assert_eq!(app.state.visible_favorites().len(), 3);
    }

    #[tokio::test]
    async fn enter_opens_team_details_and_fixtures() {
        let mut app = app();
        let arsenal = Team {
            id: "133604".into(),
            name: "Arsenal".into(),
            stadium: Some("Emirates Stadium".into()),
            ..Default::default()
        };
        app.on_teams_loaded(Ok(vec![arsenal.clone()]));

        let request = app.open_detail();
        assert_eq!(app.state.active_tab, MenuItem::Detail);
        assert!(matches!(request, Some(NetworkRequest::TeamDetails { team_id }) if team_id == "133604"));
        assert!(app.state.detail.as_ref().is_some_and(|view| view.is_loading()));

        let fixture = Match { id: "e1".into(), title: "Arsenal vs Chelsea".into(), ..Default::default() };
        let described = Team { description: Some("North London club".into()), ..arsenal };
        app.on_team_details_loaded("133604", Ok(described.clone()), Ok(vec![fixture]), Ok(vec![]));
        let view = app.state.detail.as_ref().unwrap();
        assert_eq!(view.target(), &DetailTarget::Team(described));
        assert_eq!(view.next_events().items().len(), 1);

        app.toggle_favorite();
        assert!(app.state.favorites.contains("133604"));
        app.toggle_favorite();
        assert!(!app.state.favorites.contains("133604"));

        assert!(matches!(app.select_team(), Some(NetworkRequest::PlayersByTeam { team_name }) if team_name == "Arsenal"));
        assert_eq!(app.state.active_tab, MenuItem::Players);
    }

    #[tokio::test]
    async fn match_and_favorite_details_open_without_lookup() {
        let mut app = app();
        app.on_matches_loaded(Ok(vec![Match {
            id: "e1".into(),
            title: "Arsenal vs Chelsea".into(),
            home_score: Some("2".into()),
            away_score: Some("1".into()),
            status: Some("Match Finished".into()),
            ..Default::default()
        }]));
        app.switch_home_focus();

        assert!(app.open_detail().is_none());
        assert_eq!(app.state.detail.as_ref().map(|v| v.target().name()), Some("Arsenal vs Chelsea"));
        app.close_detail();
        assert_eq!(app.state.active_tab, MenuItem::Home);
        assert!(app.state.detail.is_none());

        app.state.favorites.add(FavoriteItem::new("p1", FavoriteKind::Player, "Saka"));
        app.update_tab(MenuItem::Favorites);
        let request = app.open_detail();
        assert!(matches!(request, Some(NetworkRequest::PlayerDetails { player_id }) if player_id == "p1"));

        app.on_player_details_loaded(
            "p1",
            Ok(Player { id: "p1".into(), name: "Bukayo Saka".into(), height: Some("1.78 m".into()), ..Default::default() }),
        );
        let Some(DetailTarget::Player(player)) = app.state.detail.as_ref().map(|v| v.target().clone()) else {
            panic!("expected player details");
        };
        assert_eq!(player.height.as_deref(), Some("1.78 m"));

        app.close_detail();
        assert_eq!(app.state.active_tab, MenuItem::Favorites);
    }

    #[tokio::test]
    async fn help_returns_to_previous_tab() {
        let mut app = app();
        app.update_tab(MenuItem::Favorites);
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::Favorites);
    }
}
