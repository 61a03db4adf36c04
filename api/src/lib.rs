pub mod auth;
pub mod client;
mod dummyjson;
mod thesportsdb;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use auth::AuthApi;
pub use client::{ApiError, ApiResult, SportsApi};

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of the TheSportsDB wire format.
// Field names serialize back to the wire names so stored snapshots stay
// recognisable to anyone who has read the API docs.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "idTeam")]
    pub id: String,
    #[serde(rename = "strTeam")]
    pub name: String,
    #[serde(rename = "strBadge", skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(rename = "strStadium", skip_serializing_if = "Option::is_none")]
    pub stadium: Option<String>,
    #[serde(rename = "strLeague", skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    #[serde(rename = "strSport", skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(rename = "strDescription", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(rename = "idPlayer")]
    pub id: String,
    #[serde(rename = "strPlayer")]
    pub name: String,
    #[serde(rename = "strThumb", skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(rename = "strPosition", skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(rename = "strTeam", skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(rename = "strNationality", skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(rename = "strHeight", skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(rename = "strWeight", skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(rename = "idEvent")]
    pub id: String,
    #[serde(rename = "strEvent")]
    pub title: String,
    #[serde(rename = "strHomeTeam")]
    pub home_team: String,
    #[serde(rename = "strAwayTeam")]
    pub away_team: String,
    /// Scores arrive as strings and stay that way; `None` until kick-off.
    #[serde(rename = "intHomeScore", skip_serializing_if = "Option::is_none")]
    pub home_score: Option<String>,
    #[serde(rename = "intAwayScore", skip_serializing_if = "Option::is_none")]
    pub away_score: Option<String>,
    #[serde(rename = "dateEvent", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "strTime", skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "strStatus", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Match {
    /// "2 - 1" once both scores are known, otherwise `None`.
    pub fn score_line(&self) -> Option<String> {
        match (&self.home_score, &self.away_score) {
            (Some(home), Some(away)) => Some(format!("{home} - {away}")),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct League {
    #[serde(rename = "idLeague")]
    pub id: String,
    #[serde(rename = "strLeague")]
    pub name: String,
    #[serde(rename = "strSport", skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(rename = "strLeagueAlternate", skip_serializing_if = "Option::is_none")]
    pub alternate: Option<String>,
}

// ---------------------------------------------------------------------------
// Sports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    #[default]
    Soccer,
    Basketball,
    AmericanFootball,
    IceHockey,
    Baseball,
}

impl Sport {
    pub const ALL: [Sport; 5] = [
        Sport::Soccer,
        Sport::Basketball,
        Sport::AmericanFootball,
        Sport::IceHockey,
        Sport::Baseball,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Sport::Soccer => "soccer",
            Sport::Basketball => "basketball",
            Sport::AmericanFootball => "american_football",
            Sport::IceHockey => "ice_hockey",
            Sport::Baseball => "baseball",
        }
    }

    /// The `strSport` value TheSportsDB uses for this sport.
    pub fn api_tag(&self) -> &'static str {
        match self {
            Sport::Soccer => "Soccer",
            Sport::Basketball => "Basketball",
            Sport::AmericanFootball => "American Football",
            Sport::IceHockey => "Ice Hockey",
            Sport::Baseball => "Baseball",
        }
    }

    pub fn primary_league(&self) -> &'static str {
        match self {
            Sport::Soccer => "English Premier League",
            Sport::Basketball => "NBA",
            Sport::AmericanFootball => "NFL",
            Sport::IceHockey => "NHL",
            Sport::Baseball => "MLB",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sport: {0}")]
pub struct UnknownSport(pub String);

impl FromStr for Sport {
    type Err = UnknownSport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Sport::ALL
            .into_iter()
            .find(|sport| sport.id() == normalized)
            .ok_or_else(|| UnknownSport(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() { self.username.clone() } else { full.to_string() }
    }
}

/// A signed-in user: profile plus the bearer token the auth API issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserProfile,
    pub token: String,
}

/// Fields accepted by the registration endpoint.
#[derive(Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sport_parses_from_id_and_tag() {
        assert_eq!("basketball".parse::<Sport>(), Ok(Sport::Basketball));
        assert_eq!("Ice Hockey".parse::<Sport>(), Ok(Sport::IceHockey));
        assert_eq!("american-football".parse::<Sport>(), Ok(Sport::AmericanFootball));
        assert!("curling".parse::<Sport>().is_err());
    }

    #[test]
    fn sport_cycle_wraps() {
        assert_eq!(Sport::Soccer.next(), Sport::Basketball);
        assert_eq!(Sport::Baseball.next(), Sport::Soccer);
    }

    #[test]
    fn team_serializes_with_wire_names() {
        let team = Team {
            id: "133604".into(),
            name: "Arsenal".into(),
            league: Some("English Premier League".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&team).unwrap();
        assert_eq!(value["idTeam"], "133604");
        assert_eq!(value["strTeam"], "Arsenal");
        assert!(value.get("strBadge").is_none());
    }

    #[test]
    fn score_line_requires_both_scores() {
        let mut m = Match { home_score: Some("2".into()), ..Default::default() };
        assert_eq!(m.score_line(), None);
        m.away_score = Some("1".into());
        assert_eq!(m.score_line().as_deref(), Some("2 - 1"));
    }

    #[test]
    fn unknown_sport_names_the_input() {
        let err = "curling".parse::<Sport>().unwrap_err();
        assert_eq!(err.to_string(), "unknown sport: curling");
    }

    #[test]
    fn registration_debug_hides_password() {
        let registration = Registration {
            username: "emilys".into(),
            password: "hunter2".into(),
            ..Default::default()
        };
        let printed = format!("{registration:?}");
        assert!(printed.contains("emilys"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let mut user = UserProfile { username: "emilys".into(), ..Default::default() };
        assert_eq!(user.display_name(), "emilys");
        user.first_name = "Emily".into();
        user.last_name = "Johnson".into();
        assert_eq!(user.display_name(), "Emily Johnson");
    }
}
