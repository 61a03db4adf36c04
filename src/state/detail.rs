use crate::state::favorites::{FavoriteItem, FavoriteKind};
use crate::state::sports::Slice;
use log::warn;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sportsdb_api::{ApiResult, Match, Player, Team};

/// The record a detail screen is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailTarget {
    Team(Team),
    Player(Player),
    Match(Match),
}

impl DetailTarget {
    pub fn id(&self) -> &str {
        match self {
            DetailTarget::Team(team) => &team.id,
            DetailTarget::Player(player) => &player.id,
            DetailTarget::Match(event) => &event.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DetailTarget::Team(team) => &team.name,
            DetailTarget::Player(player) => &player.name,
            DetailTarget::Match(event) => &event.title,
        }
    }

    pub fn favorite_item(&self) -> FavoriteItem {
        match self {
            DetailTarget::Team(team) => FavoriteItem::from_team(team),
            DetailTarget::Player(player) => FavoriteItem::from_player(player),
            DetailTarget::Match(event) => FavoriteItem::from_match(event),
        }
    }

    /// Rebuild the record from a favorite's snapshot. Favorites saved without
    /// a usable snapshot still open, showing only id and name.
    pub fn from_favorite(item: &FavoriteItem) -> Self {
        match item.kind {
            FavoriteKind::Team => DetailTarget::Team(restore(item).unwrap_or_else(|| Team {
                id: item.id.clone(),
                name: item.name.clone(),
                badge: item.image.clone(),
                ..Default::default()
            })),
            FavoriteKind::Player => DetailTarget::Player(restore(item).unwrap_or_else(|| Player {
                id: item.id.clone(),
                name: item.name.clone(),
                thumbnail: item.image.clone(),
                ..Default::default()
            })),
            FavoriteKind::Match => DetailTarget::Match(restore(item).unwrap_or_else(|| Match {
                id: item.id.clone(),
                title: item.name.clone(),
                ..Default::default()
            })),
        }
    }
}

fn restore<T: DeserializeOwned>(item: &FavoriteItem) -> Option<T> {
    if item.details.is_empty() {
        return None;
    }
    serde_json::from_value(Value::Object(item.details.clone()))
        .inspect_err(|e| warn!("favorite {} has an unreadable snapshot: {e}", item.id))
        .ok()
}

/// An open detail screen: the record, an optional refresh of it, and a
/// team's upcoming and recent fixtures.
#[derive(Debug, Clone)]
pub struct DetailView {
    target: DetailTarget,
    is_loading: bool,
    error: Option<String>,
    next_events: Slice<Match>,
    last_events: Slice<Match>,
}

impl DetailView {
    pub fn new(target: DetailTarget) -> Self {
        Self {
            target,
            is_loading: false,
            error: None,
            next_events: Slice::default(),
            last_events: Slice::default(),
        }
    }

    pub fn target(&self) -> &DetailTarget {
        &self.target
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading || self.next_events.is_loading() || self.last_events.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or_else(|| self.next_events.error())
            .or_else(|| self.last_events.error())
    }

    pub fn next_events(&self) -> &Slice<Match> {
        &self.next_events
    }

    pub fn last_events(&self) -> &Slice<Match> {
        &self.last_events
    }

    /// Mark the record (and, for a team, its fixtures) as refreshing.
    /// Matches have no lookup, so nothing starts for them.
    pub fn begin(&mut self) -> bool {
        match self.target {
            DetailTarget::Team(_) => {
                self.next_events.begin();
                self.last_events.begin();
            }
            DetailTarget::Player(_) => {}
            DetailTarget::Match(_) => return false,
        }
        self.is_loading = true;
        self.error = None;
        true
    }

    /// Apply a team lookup. Results for a team that is no longer shown are
    /// dropped; returns whether they applied.
    pub fn apply_team(
        &mut self,
        team_id: &str,
        team: ApiResult<Team>,
        next: ApiResult<Vec<Match>>,
        last: ApiResult<Vec<Match>>,
    ) -> bool {
        if !matches!(&self.target, DetailTarget::Team(t) if t.id == team_id) {
            return false;
        }
        self.apply_record(team.map(DetailTarget::Team));
        self.next_events.apply(next);
        self.last_events.apply(last);
        true
    }

    pub fn apply_player(&mut self, player_id: &str, player: ApiResult<Player>) -> bool {
        if !matches!(&self.target, DetailTarget::Player(p) if p.id == player_id) {
            return false;
        }
        self.apply_record(player.map(DetailTarget::Player));
        true
    }

    /// A failed lookup keeps the record that opened the screen.
    fn apply_record(&mut self, result: ApiResult<DetailTarget>) {
        self.is_loading = false;
        match result {
            Ok(target) => {
                self.target = target;
                self.error = None;
            }
            Err(e) => {
                warn!("{} details failed: {e}", self.target.name());
                self.error = Some(e.to_string());
            }
        }
    }
}
