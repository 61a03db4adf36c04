use log::{debug, warn};
use sportsdb_api::client::MAX_EVENTS;
use sportsdb_api::{ApiResult, League, Match, Player, SportsApi, Sport, Team};

pub const DEFAULT_LEAGUE: &str = "English Premier League";

/// One fetched list with its own loading and error flags.
#[derive(Debug, Clone)]
pub struct Slice<T> {
    items: Vec<T>,
    is_loading: bool,
    error: Option<String>,
}

impl<T> Default for Slice<T> {
    fn default() -> Self {
        Self { items: Vec::new(), is_loading: false, error: None }
    }
}

impl<T> Slice<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn begin(&mut self) {
        self.is_loading = true;
    }

    /// Success replaces the list wholesale; failure keeps the stale list.
    pub(crate) fn apply(&mut self, result: ApiResult<Vec<T>>) {
        self.is_loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceKind {
    Teams,
    Players,
    Matches,
    Leagues,
}

/// Latest teams, players, matches and leagues for the current selection.
///
/// Responses are applied in arrival order with no cancellation, so when two
/// fetches for the same slice overlap the later response wins.
#[derive(Debug)]
pub struct SportsStore {
    teams: Slice<Team>,
    players: Slice<Player>,
    matches: Slice<Match>,
    leagues: Slice<League>,
    selected_league: String,
    current_sport: Sport,
}

impl Default for SportsStore {
    fn default() -> Self {
        Self::new(DEFAULT_LEAGUE)
    }
}

impl SportsStore {
    pub fn new(league: impl Into<String>) -> Self {
        Self {
            teams: Slice::default(),
            players: Slice::default(),
            matches: Slice::default(),
            leagues: Slice::default(),
            selected_league: league.into(),
            current_sport: Sport::default(),
        }
    }

    pub fn teams(&self) -> &Slice<Team> {
        &self.teams
    }

    pub fn players(&self) -> &Slice<Player> {
        &self.players
    }

    pub fn matches(&self) -> &Slice<Match> {
        &self.matches
    }

    pub fn leagues(&self) -> &Slice<League> {
        &self.leagues
    }

    pub fn selected_league(&self) -> &str {
        &self.selected_league
    }

    pub fn current_sport(&self) -> Sport {
        self.current_sport
    }

    pub fn is_loading(&self) -> bool {
        self.teams.is_loading
            || self.players.is_loading
            || self.matches.is_loading
            || self.leagues.is_loading
    }

    /// First error across slices, in display order.
    pub fn error(&self) -> Option<&str> {
        self.teams
            .error()
            .or_else(|| self.matches.error())
            .or_else(|| self.players.error())
            .or_else(|| self.leagues.error())
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Switch sport and drop the current teams at once, so the previous
    /// sport's teams are never shown while the new ones load. The caller
    /// issues the follow-up fetch.
    pub fn set_current_sport(&mut self, sport: Sport) {
        debug!("sport changed to {sport}, clearing {} teams", self.teams.items.len());
        self.current_sport = sport;
        self.teams.items.clear();
    }

    pub fn set_selected_league(&mut self, league: impl Into<String>) {
        self.selected_league = league.into();
    }

    pub fn clear_error(&mut self) {
        self.teams.error = None;
        self.players.error = None;
        self.matches.error = None;
        self.leagues.error = None;
    }

    // -----------------------------------------------------------------------
    // Split transitions, used when the request runs elsewhere (network worker)
    // -----------------------------------------------------------------------

    pub fn begin(&mut self, slice: SliceKind) {
        match slice {
            SliceKind::Teams => self.teams.begin(),
            SliceKind::Players => self.players.begin(),
            SliceKind::Matches => self.matches.begin(),
            SliceKind::Leagues => self.leagues.begin(),
        }
    }

    pub fn apply_teams(&mut self, result: ApiResult<Vec<Team>>) {
        log_failure("teams", &result);
        self.teams.apply(result);
    }

    pub fn apply_players(&mut self, result: ApiResult<Vec<Player>>) {
        log_failure("players", &result);
        self.players.apply(result);
    }

    pub fn apply_matches(&mut self, result: ApiResult<Vec<Match>>) {
        log_failure("matches", &result);
        self.matches.apply(result.map(|mut events| {
            events.truncate(MAX_EVENTS);
            events
        }));
    }

    pub fn apply_leagues(&mut self, result: ApiResult<Vec<League>>) {
        log_failure("leagues", &result);
        self.leagues.apply(result);
    }

    // -----------------------------------------------------------------------
    // Fetch-and-replace
    // -----------------------------------------------------------------------

    pub async fn fetch_teams_by_league(&mut self, api: &SportsApi, league: &str) {
        self.begin(SliceKind::Teams);
        let result = api.search_all_teams(league).await;
        self.apply_teams(result);
    }

    /// Teams of the sport's primary league, tagged with the sport.
    pub async fn fetch_teams_by_sport(&mut self, api: &SportsApi, sport: Sport) {
        self.begin(SliceKind::Teams);
        let result = api.teams_by_sport(sport).await;
        self.apply_teams(result);
    }

    pub async fn search_teams(&mut self, api: &SportsApi, query: &str) {
        self.begin(SliceKind::Teams);
        let result = api.search_teams(query).await;
        self.apply_teams(result);
    }

    pub async fn fetch_players_by_team(&mut self, api: &SportsApi, team_name: &str) {
        self.begin(SliceKind::Players);
        let result = api.search_players(team_name).await;
        self.apply_players(result);
    }

    pub async fn fetch_matches_by_league(&mut self, api: &SportsApi, league: &str) {
        self.begin(SliceKind::Matches);
        let result = api.league_events(league).await;
        self.apply_matches(result);
    }

    pub async fn fetch_leagues(&mut self, api: &SportsApi) {
        self.begin(SliceKind::Leagues);
        let result = api.all_leagues().await;
        self.apply_leagues(result);
    }

    /// Teams and matches for a league, requested together. Either may fail
    /// without affecting the other.
    pub async fn load_league(&mut self, api: &SportsApi, league: &str) {
        self.begin(SliceKind::Teams);
        self.begin(SliceKind::Matches);
        let (teams, matches) = tokio::join!(api.search_all_teams(league), api.league_events(league));
        self.apply_teams(teams);
        self.apply_matches(matches);
    }
}

fn log_failure<T>(what: &str, result: &ApiResult<T>) {
    if let Err(e) = result {
        warn!("failed to fetch {what}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use sportsdb_api::ApiError;

    const EPL_TEAMS: &str = r#"{"teams":[
        {"idTeam":"133604","strTeam":"Arsenal","strLeague":"English Premier League"},
        {"idTeam":"133610","strTeam":"Chelsea","strLeague":"English Premier League"}
    ]}"#;

    fn team(id: &str, name: &str) -> Team {
        Team { id: id.into(), name: name.into(), ..Default::default() }
    }

    fn names(teams: &[Team]) -> Vec<&str> {
        teams.iter().map(|t| t.name.as_str()).collect()
    }

    async fn teams_mock(server: &mut Server, league: &str, status: usize, body: &str) -> mockito::Mock {
        server
            .mock("GET", "/search_all_teams.php")
            .match_query(Matcher::UrlEncoded("l".into(), league.into()))
            .with_status(status)
            .with_body(body)
            .create_async()
            .await
    }

    #[test]
    fn failed_apply_keeps_stale_teams() {
        let mut store = SportsStore::default();
        store.apply_teams(Ok(vec![team("1", "Arsenal")]));
        store.begin(SliceKind::Teams);
        assert!(store.teams().is_loading());

        store.apply_teams(Err(ApiError::NotFound("league".into())));
        assert!(!store.teams().is_loading());
        assert_eq!(names(store.teams().items()), ["Arsenal"]);
        assert_eq!(store.teams().error(), Some("Not found: league"));
    }

    #[test]
    fn set_current_sport_empties_teams_immediately() {
        let mut store = SportsStore::default();
        store.apply_teams(Ok(vec![team("1", "Arsenal"), team("2", "Chelsea")]));
        store.apply_players(Ok(vec![Player { id: "p".into(), name: "Saka".into(), ..Default::default() }]));

        store.set_current_sport("basketball".parse().unwrap());

        assert_eq!(store.current_sport(), Sport::Basketball);
        assert!(store.teams().items().is_empty());
        assert_eq!(store.players().items().len(), 1);
    }

    #[test]
    fn slices_track_loading_independently() {
        let mut store = SportsStore::default();
        store.begin(SliceKind::Teams);
        store.begin(SliceKind::Matches);
        store.apply_matches(Ok(Vec::new()));
        assert!(store.teams().is_loading());
        assert!(!store.matches().is_loading());
        assert!(store.is_loading());
    }

    #[test]
    fn later_response_wins() {
        let mut store = SportsStore::default();
        store.begin(SliceKind::Teams);
        store.begin(SliceKind::Teams);
        store.apply_teams(Ok(vec![team("2", "NBA team")]));
        store.apply_teams(Ok(vec![team("1", "EPL team")]));
        assert_eq!(names(store.teams().items()), ["EPL team"]);
    }

    #[test]
    fn applied_matches_are_capped() {
        let mut store = SportsStore::default();
        let events = (0..25)
            .map(|i| Match { id: i.to_string(), ..Default::default() })
            .collect();
        store.apply_matches(Ok(events));
        assert_eq!(store.matches().items().len(), MAX_EVENTS);
    }

    #[test]
    fn selection_setters_and_clear_error() {
        let mut store = SportsStore::default();
        assert_eq!(store.selected_league(), DEFAULT_LEAGUE);
        store.set_selected_league("NBA");
        assert_eq!(store.selected_league(), "NBA");

        store.apply_players(Err(ApiError::NotFound("x".into())));
        store.apply_leagues(Err(ApiError::NotFound("y".into())));
        assert_eq!(store.error(), Some("Not found: x"));
        store.clear_error();
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn failed_fetch_then_success_replaces_and_clears_error() {
        let mut server = Server::new_async().await;
        let api = SportsApi::with_base_url(server.url());
        let mut store = SportsStore::default();
        store.apply_teams(Ok(vec![team("0", "Stale FC")]));

        let failing = teams_mock(&mut server, DEFAULT_LEAGUE, 500, "").await;
        store.fetch_teams_by_league(&api, DEFAULT_LEAGUE).await;
        failing.assert_async().await;
        assert_eq!(names(store.teams().items()), ["Stale FC"]);
        assert!(store.teams().error().is_some_and(|e| !e.is_empty()));
        failing.remove_async().await;

        teams_mock(&mut server, DEFAULT_LEAGUE, 200, EPL_TEAMS).await;
        store.fetch_teams_by_league(&api, DEFAULT_LEAGUE).await;
        assert_eq!(store.teams().error(), None);
        assert_eq!(names(store.teams().items()), ["Arsenal", "Chelsea"]);
        assert!(!store.teams().is_loading());
    }

    #[tokio::test]
    async fn fetch_teams_by_sport_uses_primary_league_and_tags() {
        let mut server = Server::new_async().await;
        teams_mock(
            &mut server,
            "NBA",
            200,
            r#"{"teams":[{"idTeam":"134860","strTeam":"Boston Celtics"},{"idTeam":"134867","strTeam":"Los Angeles Lakers"}]}"#,
        )
        .await;
        let api = SportsApi::with_base_url(server.url());

        let mut store = SportsStore::default();
        store.set_current_sport(Sport::Basketball);
        store.fetch_teams_by_sport(&api, Sport::Basketball).await;

        let teams = store.teams().items();
        assert_eq!(teams.len(), 2);
        assert!(teams.iter().all(|t| t.sport.as_deref() == Some("Basketball")));
    }

    #[tokio::test]
    async fn fetch_players_replaces_wholesale() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/searchplayers.php")
            .match_query(Matcher::UrlEncoded("t".into(), "Arsenal".into()))
            .with_status(200)
            .with_body(r#"{"player":[{"idPlayer":"34145937","strPlayer":"Bukayo Saka","strPosition":"Right Winger"}]}"#)
            .create_async()
            .await;
        let api = SportsApi::with_base_url(server.url());

        let mut store = SportsStore::default();
        store.apply_players(Ok(vec![
            Player { id: "a".into(), name: "Old A".into(), ..Default::default() },
            Player { id: "b".into(), name: "Old B".into(), ..Default::default() },
        ]));
        store.fetch_players_by_team(&api, "Arsenal").await;

        let players = store.players().items();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].position.as_deref(), Some("Right Winger"));
    }

    #[tokio::test]
    async fn load_league_allows_partial_failure() {
        let mut server = Server::new_async().await;
        teams_mock(&mut server, DEFAULT_LEAGUE, 200, EPL_TEAMS).await;
        server
            .mock("GET", "/eventsseason.php")
            .match_query(Matcher::Any)
            .with_status(502)
            .create_async()
            .await;
        let api = SportsApi::with_base_url(server.url());

        let mut store = SportsStore::default();
        store.load_league(&api, DEFAULT_LEAGUE).await;

        assert_eq!(store.teams().items().len(), 2);
        assert_eq!(store.teams().error(), None);
        assert!(store.matches().items().is_empty());
        assert!(store.matches().error().is_some());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn fetch_matches_by_league_resolves_league_id() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/eventsseason.php")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("id".into(), "4387".into()),
                Matcher::UrlEncoded("s".into(), "2023-2024".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"events":[{"idEvent":"1","strEvent":"Lakers vs Celtics","strHomeTeam":"Los Angeles Lakers","strAwayTeam":"Boston Celtics","intHomeScore":"110","intAwayScore":"102"}]}"#,
            )
            .create_async()
            .await;
        let api = SportsApi::with_base_url(server.url());

        let mut store = SportsStore::new("NBA");
        store.fetch_matches_by_league(&api, "NBA").await;
        let matches = store.matches().items();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].score_line().as_deref(), Some("110 - 102"));
    }

    #[tokio::test]
    async fn search_and_leagues_fill_their_slices() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/searchteams.php")
            .match_query(Matcher::UrlEncoded("t".into(), "Arsenal".into()))
            .with_status(200)
            .with_body(r#"{"teams":[{"idTeam":"133604","strTeam":"Arsenal"}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/all_leagues.php")
            .with_status(200)
            .with_body(r#"{"leagues":[{"idLeague":"4328","strLeague":"English Premier League","strSport":"Soccer"}]}"#)
            .create_async()
            .await;
        let api = SportsApi::with_base_url(server.url());

        let mut store = SportsStore::default();
        store.search_teams(&api, "Arsenal").await;
        store.fetch_leagues(&api).await;
        assert_eq!(names(store.teams().items()), ["Arsenal"]);
        assert_eq!(store.leagues().items()[0].id, "4328");
    }
}
