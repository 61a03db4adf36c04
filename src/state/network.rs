use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error};
use sportsdb_api::{AuthApi, SportsApi};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Requests in flight since the spinner last stopped, and whether any of
/// them failed.
#[derive(Debug, Default)]
struct Batch {
    in_flight: AtomicUsize,
    failed: AtomicBool,
}

impl Batch {
    /// Count a new request. Returns `true` when it opens a new batch.
    fn start(&self) -> bool {
        let opened = self.in_flight.fetch_add(1, Ordering::SeqCst) == 0;
        if opened {
            self.failed.store(false, Ordering::SeqCst);
        }
        opened
    }

    /// Count a finished request. Returns the batch outcome when it was the
    /// last one out.
    fn finish(&self, is_ok: bool) -> Option<bool> {
        if !is_ok {
            self.failed.store(true, Ordering::SeqCst);
        }
        (self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1).then(|| !self.failed.load(Ordering::SeqCst))
    }

    fn is_idle(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) == 0
    }
}

/// Runs gateway calls off the UI loop. Each request gets its own task, so
/// fetches for different slices overlap and nothing is ever cancelled.
pub struct NetworkWorker {
    sports: SportsApi,
    auth: AuthApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    batch: Arc<Batch>,
}

impl NetworkWorker {
    pub fn new(
        sports: SportsApi,
        auth: AuthApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            sports,
            auth,
            requests,
            responses,
            batch: Arc::new(Batch::default()),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            debug!("network request {request:?}");
            if self.batch.start() {
                self.start_loading_animation().await;
            }

            let sports = self.sports.clone();
            let auth = self.auth.clone();
            let responses = self.responses.clone();
            let batch = self.batch.clone();

            tokio::spawn(async move {
                let results = handle_request(&sports, &auth, request).await;
                let is_ok = results.iter().all(is_success);

                for response in results {
                    if let Err(e) = responses.send(response).await {
                        error!("Failed to send network response: {e}");
                    }
                }

                if let Some(batch_ok) = batch.finish(is_ok) {
                    stop_loading_animation(&responses, batch_ok).await;
                }
            });
        }
    }

    async fn start_loading_animation(&self) {
        let mut loading_state = LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let batch = self.batch.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if batch.is_idle() {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }
}

async fn stop_loading_animation(responses: &mpsc::Sender<NetworkResponse>, is_ok: bool) {
    tokio::time::sleep(Duration::from_millis(15)).await;

    let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
    let _ = responses
        .send(NetworkResponse::LoadingStateChanged {
            loading_state: LoadingState { is_loading: false, spinner_char },
        })
        .await;
}

async fn handle_request(
    sports: &SportsApi,
    auth: &AuthApi,
    request: NetworkRequest,
) -> Vec<NetworkResponse> {
    match request {
        NetworkRequest::LoadLeague { league } => {
            let (teams, matches) =
                tokio::join!(sports.search_all_teams(&league), sports.league_events(&league));
            vec![
                NetworkResponse::TeamsLoaded { result: teams },
                NetworkResponse::MatchesLoaded { result: matches },
            ]
        }
        NetworkRequest::TeamsBySport { sport } => {
            vec![NetworkResponse::TeamsLoaded { result: sports.teams_by_sport(sport).await }]
        }
        NetworkRequest::SearchTeams { query } => {
            vec![NetworkResponse::TeamsLoaded { result: sports.search_teams(&query).await }]
        }
        NetworkRequest::PlayersByTeam { team_name } => {
            vec![NetworkResponse::PlayersLoaded { result: sports.search_players(&team_name).await }]
        }
        NetworkRequest::MatchesByLeague { league } => {
            vec![NetworkResponse::MatchesLoaded { result: sports.league_events(&league).await }]
        }
        NetworkRequest::Leagues => {
            vec![NetworkResponse::LeaguesLoaded { result: sports.all_leagues().await }]
        }
        NetworkRequest::TeamDetails { team_id } => {
            let (team, next, last) = tokio::join!(
                sports.lookup_team(&team_id),
                sports.next_events(&team_id),
                sports.last_events(&team_id)
            );
            vec![NetworkResponse::TeamDetailsLoaded { team_id, team, next, last }]
        }
        NetworkRequest::PlayerDetails { player_id } => {
            let result = sports.lookup_player(&player_id).await;
            vec![NetworkResponse::PlayerDetailsLoaded { player_id, result }]
        }
        NetworkRequest::Login { username, password } => {
            vec![NetworkResponse::SessionLoaded { result: auth.login(&username, &password).await }]
        }
        NetworkRequest::Register { registration } => {
            vec![NetworkResponse::SessionLoaded { result: auth.register(&registration).await }]
        }
    }
}

fn is_success(response: &NetworkResponse) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { .. } => true,
        NetworkResponse::TeamsLoaded { result } => result.is_ok(),
        NetworkResponse::PlayersLoaded { result } => result.is_ok(),
        NetworkResponse::MatchesLoaded { result } => result.is_ok(),
        NetworkResponse::LeaguesLoaded { result } => result.is_ok(),
        NetworkResponse::TeamDetailsLoaded { team, next, last, .. } => {
            team.is_ok() && next.is_ok() && last.is_ok()
        }
        NetworkResponse::PlayerDetailsLoaded { result, .. } => result.is_ok(),
        NetworkResponse::SessionLoaded { result } => result.is_ok(),
    }
}
