use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use sportsdb_api::{ApiResult, League, Match, Player, Registration, Session, Sport, Team};
use std::fmt;

#[derive(Clone)]
pub enum NetworkRequest {
    /// Teams and matches for a league, fetched concurrently.
    LoadLeague { league: String },
    TeamsBySport { sport: Sport },
    SearchTeams { query: String },
    PlayersByTeam { team_name: String },
    MatchesByLeague { league: String },
    Leagues,
    /// Full team record plus its upcoming and recent fixtures.
    TeamDetails { team_id: String },
    PlayerDetails { player_id: String },
    Login { username: String, password: String },
    Register { registration: Registration },
}

// Requests are logged; passwords stay out of the log pane.
impl fmt::Debug for NetworkRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadLeague { league } => f.debug_struct("LoadLeague").field("league", league).finish(),
            Self::TeamsBySport { sport } => f.debug_struct("TeamsBySport").field("sport", sport).finish(),
            Self::SearchTeams { query } => f.debug_struct("SearchTeams").field("query", query).finish(),
            Self::PlayersByTeam { team_name } => {
                f.debug_struct("PlayersByTeam").field("team_name", team_name).finish()
            }
            Self::MatchesByLeague { league } => {
                f.debug_struct("MatchesByLeague").field("league", league).finish()
            }
            Self::Leagues => f.write_str("Leagues"),
            Self::TeamDetails { team_id } => f.debug_struct("TeamDetails").field("team_id", team_id).finish(),
            Self::PlayerDetails { player_id } => {
                f.debug_struct("PlayerDetails").field("player_id", player_id).finish()
            }
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Register { registration } => {
                f.debug_struct("Register").field("registration", registration).finish()
            }
        }
    }
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    TeamsLoaded { result: ApiResult<Vec<Team>> },
    PlayersLoaded { result: ApiResult<Vec<Player>> },
    MatchesLoaded { result: ApiResult<Vec<Match>> },
    LeaguesLoaded { result: ApiResult<Vec<League>> },
    TeamDetailsLoaded {
        team_id: String,
        team: ApiResult<Team>,
        next: ApiResult<Vec<Match>>,
        last: ApiResult<Vec<Match>>,
    },
    PlayerDetailsLoaded { player_id: String, result: ApiResult<Player> },
    SessionLoaded { result: ApiResult<Session> },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logged_requests_hide_passwords() {
        let login = NetworkRequest::Login { username: "emilys".into(), password: "hunter2".into() };
        let logged = format!("network request {login:?}");
        assert!(logged.contains("emilys"));
        assert!(!logged.contains("hunter2"));

        let register = NetworkRequest::Register {
            registration: Registration {
                username: "emilys".into(),
                email: "emily@example.com".into(),
                password: "hunter2".into(),
                ..Default::default()
            },
        };
        let logged = format!("network request {register:?}");
        assert!(logged.contains("emily@example.com"));
        assert!(!logged.contains("hunter2"));
    }

    #[test]
    fn other_requests_log_their_fields() {
        let request = NetworkRequest::TeamDetails { team_id: "133604".into() };
        assert_eq!(format!("{request:?}"), r#"TeamDetails { team_id: "133604" }"#);
        assert_eq!(format!("{:?}", NetworkRequest::Leagues), "Leagues");
    }
}
