use crate::thesportsdb::{
    EventsResponse, LeaguesResponse, PlayersResponse, SportsDbEvent, SportsDbLeague,
    SportsDbPlayer, SportsDbTeam, TeamsResponse,
};
use crate::{League, Match, Player, Sport, Team};
use log::debug;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const SPORTS_DB_BASE: &str = "https://www.thesportsdb.com/api/v1/json/3";
const USER_AGENT: &str = "sportszone/0.1 (terminal sports browser)";

/// Every call gives up after this long.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Season listings are trimmed to this many events.
pub const MAX_EVENTS: usize = 10;

const DEFAULT_SEASON: &str = "2023-2024";

/// Primary leagues resolved without a round-trip: (name, league id, season).
const KNOWN_LEAGUES: &[(&str, &str, &str)] = &[
    ("English Premier League", "4328", "2023-2024"),
    ("NBA", "4387", "2023-2024"),
    ("NFL", "4391", "2023"),
    ("NHL", "4380", "2023-2024"),
    ("MLB", "4424", "2023"),
];

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request URL: {0}")]
    Url(String),
    #[error("Request to {url} timed out")]
    Timeout { url: String },
    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },
    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("Parse error for {url}: {source}")]
    Parsing { url: String, source: reqwest::Error },
    #[error("Not found: {0}")]
    NotFound(String),
}

// ---------------------------------------------------------------------------
// Shared HTTP plumbing
// ---------------------------------------------------------------------------

/// reqwest client plus the fixed per-request timeout. Shared by every API
/// client in this crate; no retries happen at this layer.
#[derive(Debug, Clone)]
pub(crate) struct Http {
    client: Client,
    timeout: Duration,
}

impl Default for Http {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl Http {
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        debug!("GET {url}");
        let request = self.client.get(url.clone()).timeout(self.timeout);
        Self::execute(request, url).await
    }

    pub(crate) async fn post<B, T>(&self, url: Url, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {url}");
        let request = self.client.post(url.clone()).json(body).timeout(self.timeout);
        Self::execute(request, url).await
    }

    async fn execute<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
        url: Url,
    ) -> ApiResult<T> {
        let url = url.to_string();
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout { url: url.clone() }
            } else {
                ApiError::Network { url: url.clone(), source: e }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { url, status });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout { url: url.clone() }
            } else {
                ApiError::Parsing { url, source: e }
            }
        })
    }
}

/// Join `base` and `path`, percent-encoding any query parameters.
pub(crate) fn endpoint(base: &str, path: &str, params: &[(&str, &str)]) -> ApiResult<Url> {
    let raw = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    let parsed = if params.is_empty() {
        Url::parse(&raw)
    } else {
        Url::parse_with_params(&raw, params)
    };
    parsed.map_err(|e| ApiError::Url(format!("{raw}: {e}")))
}

// ---------------------------------------------------------------------------
// TheSportsDB client
// ---------------------------------------------------------------------------

/// TheSportsDB v1 client. One method per endpoint; every list result keeps
/// the API's ordering.
#[derive(Debug, Clone)]
pub struct SportsApi {
    http: Http,
    base_url: String,
}

impl Default for SportsApi {
    fn default() -> Self {
        Self::with_base_url(SPORTS_DB_BASE)
    }
}

impl SportsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at another deployment (or a mock server in tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { http: Http::default(), base_url: base_url.into() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// All teams in a league, e.g. "English Premier League".
    pub async fn search_all_teams(&self, league: &str) -> ApiResult<Vec<Team>> {
        let url = endpoint(&self.base_url, "search_all_teams.php", &[("l", league)])?;
        let raw: TeamsResponse = self.http.get(url).await?;
        Ok(map_teams(raw.teams))
    }

    /// Teams of the sport's primary league, each tagged with the sport.
    pub async fn teams_by_sport(&self, sport: Sport) -> ApiResult<Vec<Team>> {
        let mut teams = self.search_all_teams(sport.primary_league()).await?;
        for team in &mut teams {
            team.sport = Some(sport.api_tag().to_string());
        }
        Ok(teams)
    }

    /// Free-text team search by name.
    pub async fn search_teams(&self, query: &str) -> ApiResult<Vec<Team>> {
        let url = endpoint(&self.base_url, "searchteams.php", &[("t", query)])?;
        let raw: TeamsResponse = self.http.get(url).await?;
        Ok(map_teams(raw.teams))
    }

    pub async fn search_players(&self, team_name: &str) -> ApiResult<Vec<Player>> {
        let url = endpoint(&self.base_url, "searchplayers.php", &[("t", team_name)])?;
        let raw: PlayersResponse = self.http.get(url).await?;
        Ok(map_players(raw.player))
    }

    /// Events for a league season, trimmed to the first [`MAX_EVENTS`].
    pub async fn season_events(&self, league_id: &str, season: &str) -> ApiResult<Vec<Match>> {
        let url = endpoint(
            &self.base_url,
            "eventsseason.php",
            &[("id", league_id), ("s", season)],
        )?;
        let raw: EventsResponse = self.http.get(url).await?;
        let mut events = map_events(raw.events);
        events.truncate(MAX_EVENTS);
        Ok(events)
    }

    /// Season events for a league given by name.
    pub async fn league_events(&self, league: &str) -> ApiResult<Vec<Match>> {
        let (league_id, season) = self.resolve_league(league).await?;
        self.season_events(&league_id, &season).await
    }

    /// Map a league name to (league id, season). Primary leagues come from a
    /// built-in table; anything else is looked up in `all_leagues.php`.
    pub async fn resolve_league(&self, league: &str) -> ApiResult<(String, String)> {
        if let Some(&(_, id, season)) = KNOWN_LEAGUES
            .iter()
            .find(|(name, _, _)| name.eq_ignore_ascii_case(league))
        {
            return Ok((id.to_string(), season.to_string()));
        }

        debug!("league {league} not in table, searching all leagues");
        let leagues = self.all_leagues().await?;
        leagues
            .into_iter()
            .find(|l| {
                l.name.eq_ignore_ascii_case(league)
                    || l.alternate
                        .as_deref()
                        .is_some_and(|alt| alt.split(',').any(|a| a.trim().eq_ignore_ascii_case(league)))
            })
            .map(|l| (l.id, DEFAULT_SEASON.to_string()))
            .ok_or_else(|| ApiError::NotFound(format!("league {league}")))
    }

    pub async fn lookup_team(&self, team_id: &str) -> ApiResult<Team> {
        let url = endpoint(&self.base_url, "lookupteam.php", &[("id", team_id)])?;
        let raw: TeamsResponse = self.http.get(url).await?;
        map_teams(raw.teams)
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("team {team_id}")))
    }

    pub async fn lookup_player(&self, player_id: &str) -> ApiResult<Player> {
        let url = endpoint(&self.base_url, "lookupplayer.php", &[("id", player_id)])?;
        let raw: PlayersResponse = self.http.get(url).await?;
        map_players(raw.player)
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("player {player_id}")))
    }

    pub async fn all_leagues(&self) -> ApiResult<Vec<League>> {
        let url = endpoint(&self.base_url, "all_leagues.php", &[])?;
        let raw: LeaguesResponse = self.http.get(url).await?;
        Ok(raw.leagues.unwrap_or_default().into_iter().filter_map(map_league).collect())
    }

    /// Upcoming fixtures for a team.
    pub async fn next_events(&self, team_id: &str) -> ApiResult<Vec<Match>> {
        let url = endpoint(&self.base_url, "eventsnext.php", &[("id", team_id)])?;
        let raw: EventsResponse = self.http.get(url).await?;
        Ok(map_events(raw.events))
    }

    /// Most recent results for a team.
    pub async fn last_events(&self, team_id: &str) -> ApiResult<Vec<Match>> {
        let url = endpoint(&self.base_url, "eventslast.php", &[("id", team_id)])?;
        let raw: EventsResponse = self.http.get(url).await?;
        Ok(map_events(raw.events))
    }
}

// ---------------------------------------------------------------------------
// Mapping: TheSportsDB wire types → clean domain types.
// Records without an id or name are dropped; they can't be favorited or shown.
// ---------------------------------------------------------------------------

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn map_teams(raw: Option<Vec<SportsDbTeam>>) -> Vec<Team> {
    raw.unwrap_or_default().into_iter().filter_map(map_team).collect()
}

fn map_team(t: SportsDbTeam) -> Option<Team> {
    Some(Team {
        id: non_empty(t.id_team)?,
        name: non_empty(t.str_team)?,
        badge: non_empty(t.str_badge)
            .or_else(|| non_empty(t.str_team_badge))
            .or_else(|| non_empty(t.str_logo)),
        stadium: non_empty(t.str_stadium),
        league: non_empty(t.str_league),
        sport: non_empty(t.str_sport),
        description: non_empty(t.str_description),
    })
}

fn map_players(raw: Option<Vec<SportsDbPlayer>>) -> Vec<Player> {
    raw.unwrap_or_default().into_iter().filter_map(map_player).collect()
}

fn map_player(p: SportsDbPlayer) -> Option<Player> {
    Some(Player {
        id: non_empty(p.id_player)?,
        name: non_empty(p.str_player)?,
        thumbnail: non_empty(p.str_thumb).or_else(|| non_empty(p.str_cutout)),
        position: non_empty(p.str_position),
        team: non_empty(p.str_team),
        nationality: non_empty(p.str_nationality),
        height: non_empty(p.str_height),
        weight: non_empty(p.str_weight),
    })
}

fn map_events(raw: Option<Vec<SportsDbEvent>>) -> Vec<Match> {
    raw.unwrap_or_default().into_iter().filter_map(map_event).collect()
}

fn map_event(e: SportsDbEvent) -> Option<Match> {
    let home_team = e.str_home_team.unwrap_or_default();
    let away_team = e.str_away_team.unwrap_or_default();
    let title = non_empty(e.str_event).unwrap_or_else(|| format!("{home_team} vs {away_team}"));
    Some(Match {
        id: non_empty(e.id_event)?,
        title,
        home_team,
        away_team,
        home_score: e.int_home_score,
        away_score: e.int_away_score,
        date: non_empty(e.date_event),
        time: non_empty(e.str_time),
        status: non_empty(e.str_status),
    })
}

fn map_league(l: SportsDbLeague) -> Option<League> {
    Some(League {
        id: non_empty(l.id_league)?,
        name: non_empty(l.str_league)?,
        sport: non_empty(l.str_sport),
        alternate: non_empty(l.str_league_alternate),
    })
}
