//! TheSportsDB v1 raw wire types: serde shapes for deserializing responses.
//! Every list comes back as `null` when a search matches nothing, so list
//! fields are `Option<Vec<_>>`. Mapping to domain types lives in client.rs.
use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize, Default)]
pub struct TeamsResponse {
    pub teams: Option<Vec<SportsDbTeam>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PlayersResponse {
    /// `searchplayers.php` uses "player", `lookupplayer.php` uses "players".
    #[serde(alias = "players")]
    pub player: Option<Vec<SportsDbPlayer>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EventsResponse {
    /// `eventslast.php` nests its list under "results".
    #[serde(alias = "results")]
    pub events: Option<Vec<SportsDbEvent>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct LeaguesResponse {
    pub leagues: Option<Vec<SportsDbLeague>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SportsDbTeam {
    pub id_team: Option<String>,
    pub str_team: Option<String>,
    pub str_badge: Option<String>,
    /// Older payloads; some mirrors still send both.
    pub str_team_badge: Option<String>,
    pub str_logo: Option<String>,
    pub str_stadium: Option<String>,
    pub str_league: Option<String>,
    pub str_sport: Option<String>,
    #[serde(rename = "strDescriptionEN")]
    pub str_description: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SportsDbPlayer {
    pub id_player: Option<String>,
    pub str_player: Option<String>,
    pub str_thumb: Option<String>,
    pub str_cutout: Option<String>,
    pub str_position: Option<String>,
    pub str_team: Option<String>,
    pub str_nationality: Option<String>,
    pub str_height: Option<String>,
    pub str_weight: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SportsDbEvent {
    pub id_event: Option<String>,
    pub str_event: Option<String>,
    pub str_home_team: Option<String>,
    pub str_away_team: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub int_home_score: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub int_away_score: Option<String>,
    pub date_event: Option<String>,
    pub str_time: Option<String>,
    pub str_status: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SportsDbLeague {
    pub id_league: Option<String>,
    pub str_league: Option<String>,
    pub str_sport: Option<String>,
    pub str_league_alternate: Option<String>,
}

/// Scores are usually strings but some endpoints send bare numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
