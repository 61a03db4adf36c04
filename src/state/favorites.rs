use crate::state::persistence::Persister;
use chrono::{SecondsFormat, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sportsdb_api::{Match, Player, Team};

pub const FAVORITES_KEY: &str = "favorites";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteKind {
    Team,
    Player,
    Match,
}

impl FavoriteKind {
    pub fn label(&self) -> &'static str {
        match self {
            FavoriteKind::Team => "Team",
            FavoriteKind::Player => "Player",
            FavoriteKind::Match => "Match",
        }
    }
}

/// Category tabs on the Favorites screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FavoriteFilter {
    #[default]
    All,
    Teams,
    Players,
    Matches,
}

impl FavoriteFilter {
    pub const ALL: [FavoriteFilter; 4] = [
        FavoriteFilter::All,
        FavoriteFilter::Teams,
        FavoriteFilter::Players,
        FavoriteFilter::Matches,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FavoriteFilter::All => "All",
            FavoriteFilter::Teams => "Teams",
            FavoriteFilter::Players => "Players",
            FavoriteFilter::Matches => "Matches",
        }
    }

    /// `None` for `All`.
    pub fn kind(&self) -> Option<FavoriteKind> {
        match self {
            FavoriteFilter::All => None,
            FavoriteFilter::Teams => Some(FavoriteKind::Team),
            FavoriteFilter::Players => Some(FavoriteKind::Player),
            FavoriteFilter::Matches => Some(FavoriteKind::Match),
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A user-pinned team, player or match, persisted locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FavoriteKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Snapshot of the source record when it was favorited.
    #[serde(default)]
    pub details: Map<String, Value>,
    pub date_added: String,
}

impl FavoriteItem {
    pub fn new(id: impl Into<String>, kind: FavoriteKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            image: None,
            details: Map::new(),
            date_added: now_iso8601(),
        }
    }

    pub fn from_team(team: &Team) -> Self {
        Self {
            image: team.badge.clone(),
            details: snapshot(team),
            ..Self::new(team.id.clone(), FavoriteKind::Team, team.name.clone())
        }
    }

    pub fn from_player(player: &Player) -> Self {
        Self {
            image: player.thumbnail.clone(),
            details: snapshot(player),
            ..Self::new(player.id.clone(), FavoriteKind::Player, player.name.clone())
        }
    }

    pub fn from_match(event: &Match) -> Self {
        Self {
            details: snapshot(event),
            ..Self::new(event.id.clone(), FavoriteKind::Match, event.title.clone())
        }
    }
}

fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn snapshot<T: Serialize>(record: &T) -> Map<String, Value> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// The favorites list. Ids are unique; every mutation queues a write of the
/// whole list.
#[derive(Debug)]
pub struct FavoritesStore {
    items: Vec<FavoriteItem>,
    is_loading: bool,
    persister: Persister,
}

impl FavoritesStore {
    pub fn new(persister: Persister) -> Self {
        Self { items: Vec::new(), is_loading: false, persister }
    }

    /// Replace the in-memory list with the persisted one. A missing or
    /// corrupt value loads as an empty list.
    pub async fn load(&mut self) {
        self.is_loading = true;
        let raw = self.persister.read(FAVORITES_KEY).await;
        self.items = parse_favorites(raw.as_deref());
        self.is_loading = false;
        debug!("loaded {} favorites", self.items.len());
    }

    pub fn items(&self) -> &[FavoriteItem] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn of_kind(&self, kind: FavoriteKind) -> impl Iterator<Item = &FavoriteItem> {
        self.items.iter().filter(move |item| item.kind == kind)
    }

    /// The items a filter tab shows, in list order.
    pub fn filtered(&self, filter: FavoriteFilter) -> Vec<&FavoriteItem> {
        match filter.kind() {
            Some(kind) => self.of_kind(kind).collect(),
            None => self.items.iter().collect(),
        }
    }

    /// Append unless the id is already present.
    pub fn add(&mut self, item: FavoriteItem) {
        if self.contains(&item.id) {
            return;
        }
        self.items.push(item);
        self.persist();
    }

    pub fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
        self.persist();
    }

    /// Remove the item if present, append it otherwise. Returns whether it
    /// is a favorite afterwards.
    pub fn toggle(&mut self, item: FavoriteItem) -> bool {
        let now_favorite = match self.items.iter().position(|existing| existing.id == item.id) {
            Some(idx) => {
                self.items.remove(idx);
                false
            }
            None => {
                self.items.push(item);
                true
            }
        };
        self.persist();
        now_favorite
    }

    fn persist(&self) {
        self.persister.write_json(FAVORITES_KEY, &self.items);
    }
}

fn parse_favorites(raw: Option<&str>) -> Vec<FavoriteItem> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Option<Vec<FavoriteItem>>>(raw) {
        Ok(items) => dedup_by_id(items.unwrap_or_default()),
        Err(e) => {
            warn!("ignoring unreadable favorites: {e}");
            Vec::new()
        }
    }
}

/// A hand-edited file could repeat an id; the first occurrence wins.
fn dedup_by_id(items: Vec<FavoriteItem>) -> Vec<FavoriteItem> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.id.clone())).collect()
}
