use crate::error::{GameError, InteractionError};
use crate::game::control::{self, EngineControl};
use crate::game::player::{PlayerDistribution, MAX_PLAYERS};
use crate::game::{
    Broadcast, GameOptions, GameResult, GameState, Interaction, Notice, PlayerId, Prompt, RemovalOutcome, RoundEngine,
};
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use futures_util::FutureExt;
use rand::Rng;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Manages all the game sessions, one game per session.
pub struct SessionManager {
    sessions: DashMap<String, SessionHandle>,
    past_games: Mutex<Vec<(String, GameResult)>>,
    opts: GameOptions,
}

pub type SessionHandle = Arc<Mutex<Session>>;

type GameTask = JoinHandle<(GameState, Result<GameResult, GameError>)>;

/// A single game session.
pub struct Session {
    /// The session ID.
    id: String,
    game: Game,
    opts: GameOptions,
    interaction: Arc<dyn Interaction>,
    broadcast: Arc<dyn Broadcast>,
    /// Timestamp of the last time this session was interacted with.
    activity: ActivityClock,
}

enum Game {
    Lobby {
        state: GameState,
    },
    Playing {
        control: EngineControl,
        /// Taken once somebody waits for the game to finish.
        task: Option<GameTask>,
        players: Vec<PlayerId>,
        admin: Option<PlayerId>,
    },
}

/// What a session looks like from the outside.
#[derive(Clone, Serialize, PartialEq, Eq, Debug)]
pub struct SessionInfo {
    pub id: String,
    pub status: SessionStatus,
    pub admin: Option<PlayerId>,
    pub players: Vec<PlayerId>,
}

#[derive(Clone, Copy, Serialize, PartialEq, Eq, Debug)]
pub enum SessionStatus {
    Lobby,
    Started,
}

/// Records when a session last saw activity from its players.
#[derive(Clone, Debug)]
pub struct ActivityClock(Arc<Mutex<Instant>>);

impl ActivityClock {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Instant::now())))
    }

    pub fn touch(&self) {
        if let Ok(mut ts) = self.0.lock() {
            *ts = Instant::now();
        }
    }

    pub fn idle(&self) -> Duration {
        self.0.lock().map(|ts| ts.elapsed()).unwrap_or_default()
    }
}

impl Default for ActivityClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps a session's interaction port, marking the session active whenever a player answers.
struct TrackedInteraction {
    inner: Arc<dyn Interaction>,
    activity: ActivityClock,
}

#[async_trait]
impl Interaction for TrackedInteraction {
    async fn choose(&self, player: &PlayerId, prompt: Prompt, options: &[String]) -> Result<usize, InteractionError> {
        let result = self.inner.choose(player, prompt, options).await;
        self.activity.touch();
        result
    }

    async fn vote(&self, player: &PlayerId, prompt: Prompt, yes_label: &str, no_label: &str) -> Result<bool, InteractionError> {
        let result = self.inner.vote(player, prompt, yes_label, no_label).await;
        self.activity.touch();
        result
    }

    async fn inform(&self, player: &PlayerId, notice: Notice) -> Result<(), InteractionError> {
        self.inner.inform(player, notice).await
    }
}

/// Locks a session, treating a poisoned lock as a defect.
pub fn lock(session: &SessionHandle) -> Result<MutexGuard<'_, Session>, GameError> {
    session
        .lock()
        .map_err(|_| GameError::InvariantViolation("session lock poisoned"))
}

impl SessionManager {
    pub fn new(opts: GameOptions) -> Self {
        Self {
            sessions: DashMap::new(),
            past_games: Mutex::new(vec![]),
            opts,
        }
    }

    /// Creates a new session with `admin` as its first player.
    pub fn create_session(
        &self,
        admin: PlayerId,
        interaction: Arc<dyn Interaction>,
        broadcast: Arc<dyn Broadcast>,
    ) -> SessionHandle {
        loop {
            let id = Self::random_id();
            let entry = self.sessions.entry(id.clone());
            if let Entry::Occupied(_) = entry {
                continue;
            }
            let mut session = Session::new(id.clone(), self.opts, interaction.clone(), broadcast.clone());
            session.join(admin.clone()).ok();
            let session = Arc::new(Mutex::new(session));
            entry.or_insert(session.clone());
            log::info!("Created session {}", id);
            break session;
        }
    }

    pub fn find_session(&self, id: &str) -> Result<SessionHandle, GameError> {
        self.sessions
            .get(id)
            .map(|session| session.clone())
            .ok_or(GameError::GameNotFound)
    }

    /// Destroys a session, cancelling its game if one is running.
    pub fn remove_session(&self, id: &str) -> Result<(), GameError> {
        let (_, session) = self.sessions.remove(id).ok_or(GameError::GameNotFound)?;
        if let Ok(session) = session.lock() {
            session.abort();
        }
        Ok(())
    }

    pub fn num_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Results of every game finished so far, with the session they were played in.
    pub fn past_games(&self) -> Vec<(String, GameResult)> {
        self.past_games.lock().map(|games| games.clone()).unwrap_or_default()
    }

    /// Waits for the session's game to end, then returns the session to its lobby.
    pub async fn finish_game(&self, id: &str) -> Result<GameResult, GameError> {
        let handle = self.find_session(id)?;
        let task = lock(&handle)?.take_task()?;

        let (state, result) = match task.await {
            Ok(output) => output,
            Err(err) => {
                log::error!("Game task for session {} failed: {}", id, err);
                let mut session = lock(&handle)?;
                session.restore_lobby(GameState::new());
                return Err(GameError::InvariantViolation("game task failed"));
            }
        };

        lock(&handle)?.restore_lobby(state);
        let result = result?;
        self.record_result(id, result.clone());
        Ok(result)
    }

    /// Removes a player from a session, dropping the session once nobody is left in it.
    pub fn leave_session(&self, id: &str, player: &PlayerId) -> Result<(), GameError> {
        let handle = self.find_session(id)?;
        let empty = {
            let mut session = lock(&handle)?;
            session.leave(player)?;
            session.is_empty()
        };
        if empty {
            log::info!("Session {} is empty", id);
            self.remove_session(id)?;
        }
        Ok(())
    }

    fn record_result(&self, id: &str, result: GameResult) {
        if let Ok(mut games) = self.past_games.lock() {
            games.push((id.to_string(), result));
        }
    }

    /// Cancels games in sessions idle for longer than `timeout`, and drops idle lobbies.
    /// A cancelled game's session is dropped by a later purge once its task has ended.
    /// Returns the IDs of the sessions affected.
    pub fn purge_inactive(&self, timeout: Duration) -> Vec<String> {
        let mut idle = vec![];
        let mut ids_to_delete = vec![];

        for entry in self.sessions.iter() {
            let id = entry.key();
            let Ok(mut session) = entry.lock() else {
                log::error!("Found poisoned session: {}", id);
                ids_to_delete.push(id.clone());
                continue;
            };
            if session.activity.idle() <= timeout {
                continue;
            }
            idle.push(id.clone());
            match &mut session.game {
                Game::Playing { task, .. } if task.as_ref().is_some_and(JoinHandle::is_finished) => {
                    if let Some(Ok((_, Ok(result)))) = task.take().and_then(|task| task.now_or_never()) {
                        self.record_result(id, result);
                    }
                    ids_to_delete.push(id.clone());
                }
                Game::Playing { control, .. } => {
                    log::info!("Cancelling inactive game in session {}", id);
                    control.cancel();
                }
                Game::Lobby { .. } => ids_to_delete.push(id.clone()),
            }
        }

        for id in ids_to_delete.into_iter() {
            log::info!("Removing inactive session {}", id);
            self.sessions.remove(&id);
        }
        idle
    }

    /// Periodically purges inactive sessions, forever.
    pub async fn watch_inactivity(&self, timeout: Duration) {
        let mut interval = tokio::time::interval(timeout.max(Duration::from_secs(1)) / 4);
        loop {
            interval.tick().await;
            self.purge_inactive(timeout);
        }
    }

    fn random_id() -> String {
        let mut rng = rand::thread_rng();
        (0..4)
            .map(|_| match rng.gen_range('A'..='Z') {
                // U and V are hard to tell apart on the board
                'U' => 'A',
                'V' => 'B',
                other => other,
            })
            .collect()
    }
}

impl Session {
    fn new(id: String, opts: GameOptions, interaction: Arc<dyn Interaction>, broadcast: Arc<dyn Broadcast>) -> Self {
        Self {
            id,
            game: Game::Lobby { state: GameState::new() },
            opts,
            interaction,
            broadcast,
            activity: ActivityClock::new(),
        }
    }

    /// Gets the unique session ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.game, Game::Playing { .. })
    }

    /// Whether every player has left.
    pub fn is_empty(&self) -> bool {
        match &self.game {
            Game::Lobby { state } => state.players().is_empty(),
            Game::Playing { players, .. } => players.is_empty(),
        }
    }

    /// Adds a player to the lobby.
    pub fn join(&mut self, player: PlayerId) -> Result<(), GameError> {
        self.heartbeat();
        let Game::Lobby { state } = &mut self.game else {
            return Err(GameError::CannotJoinStartedGame);
        };
        if state.players().contains(&player) {
            return Err(GameError::AlreadyJoined);
        }
        if state.players().len() == MAX_PLAYERS {
            return Err(GameError::TooManyPlayers);
        }
        state.add_player(player);
        Ok(())
    }

    /// Removes a player. During a game the departure is handed to the engine.
    ///
    /// A session left empty stays registered; [SessionManager::leave_session] drops it.
    pub fn leave(&mut self, player: &PlayerId) -> Result<(), GameError> {
        self.heartbeat();
        match &mut self.game {
            Game::Lobby { state } => match state.remove_player(player) {
                RemovalOutcome::NotFound => Err(GameError::PlayerNotFound),
                RemovalOutcome::Removed { new_admin, .. } => {
                    if let Some(admin) = new_admin {
                        log::info!("{} is now the admin of session {}", admin, self.id);
                    }
                    Ok(())
                }
                RemovalOutcome::RemovedAndEmpty => Ok(()),
            },
            Game::Playing { control, players, admin, .. } => {
                let Some(index) = players.iter().position(|p| p == player) else {
                    return Err(GameError::PlayerNotFound);
                };
                players.remove(index);
                if admin.as_ref() == Some(player) {
                    *admin = players.get(index % players.len().max(1)).cloned();
                }
                control.player_left(player.clone());
                Ok(())
            }
        }
    }

    /// Starts a game on a background task. Only the admin may do this.
    pub fn start(&mut self, by: &PlayerId, seed: u64) -> Result<(), GameError> {
        self.heartbeat();
        let Game::Lobby { state } = &mut self.game else {
            return Err(GameError::InvalidAction);
        };
        if state.players().admin() != Some(by) {
            return Err(GameError::NotAdmin);
        }
        PlayerDistribution::new(state.players().len())?;
        self.opts.validate()?;

        let (control, signals) = control::channel();
        let players = state.players().ids();
        let admin = state.players().admin().cloned();
        let mut state = std::mem::take(state);
        let interaction = TrackedInteraction {
            inner: self.interaction.clone(),
            activity: self.activity.clone(),
        };
        let broadcast = self.broadcast.clone();
        let opts = self.opts;
        let id = self.id.clone();

        let task = tokio::spawn(async move {
            let result = RoundEngine::new(&mut state, &interaction, broadcast.as_ref(), signals, opts, seed)
                .run()
                .await;
            log::info!("Game in session {} has ended", id);
            (state, result)
        });

        self.game = Game::Playing {
            control,
            task: Some(task),
            players,
            admin,
        };
        Ok(())
    }

    /// Stops the running game. Only the admin may do this.
    pub fn cancel(&mut self, by: &PlayerId) -> Result<(), GameError> {
        let Game::Playing { control, admin, .. } = &self.game else {
            return Err(GameError::InvalidAction);
        };
        if admin.as_ref() != Some(by) {
            return Err(GameError::NotAdmin);
        }
        control.cancel();
        Ok(())
    }

    pub fn show(&self) -> SessionInfo {
        let (status, admin, players) = match &self.game {
            Game::Lobby { state } => (SessionStatus::Lobby, state.players().admin().cloned(), state.players().ids()),
            Game::Playing { players, admin, .. } => (SessionStatus::Started, admin.clone(), players.clone()),
        };
        SessionInfo {
            id: self.id.clone(),
            status,
            admin,
            players,
        }
    }

    /// Keeps the game session alive.
    pub fn heartbeat(&mut self) {
        self.activity.touch();
    }

    pub fn idle(&self) -> Duration {
        self.activity.idle()
    }

    fn abort(&self) {
        if let Game::Playing { control, .. } = &self.game {
            control.cancel();
        }
    }

    fn take_task(&mut self) -> Result<GameTask, GameError> {
        match &mut self.game {
            Game::Playing { task, .. } => task.take().ok_or(GameError::InvalidAction),
            Game::Lobby { .. } => Err(GameError::InvalidAction),
        }
    }

    fn restore_lobby(&mut self, mut state: GameState) {
        state.reset();
        self.game = Game::Lobby { state };
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::game::test::test_utils::{RecordingBroadcast, ScriptedPlayers};

    fn manager_with_session(players: usize) -> (SessionManager, SessionHandle, Arc<ScriptedPlayers>) {
        let manager = SessionManager::new(GameOptions::default());
        let interaction = Arc::new(ScriptedPlayers::new());
        let session = manager.create_session(
            PlayerId::new("P0"),
            interaction.clone(),
            Arc::new(RecordingBroadcast::new()),
        );
        for i in 1..players {
            lock(&session).unwrap().join(PlayerId::new(format!("P{i}"))).unwrap();
        }
        (manager, session, interaction)
    }

    #[test]
    fn first_player_is_admin() {
        let (_, session, _) = manager_with_session(3);
        let info = lock(&session).unwrap().show();
        assert_eq!(info.status, SessionStatus::Lobby);
        assert_eq!(info.admin, Some(PlayerId::new("P0")));
        assert_eq!(info.players.len(), 3);
    }

    #[test]
    fn cannot_join_twice() {
        let (_, session, _) = manager_with_session(2);
        let result = lock(&session).unwrap().join(PlayerId::new("P1"));
        assert!(matches!(result, Err(GameError::AlreadyJoined)));
    }

    #[test]
    fn admin_passes_to_next_player_on_leave() {
        let (_, session, _) = manager_with_session(3);
        let mut session = lock(&session).unwrap();
        session.leave(&PlayerId::new("P0")).unwrap();
        assert_eq!(session.show().admin, Some(PlayerId::new("P1")));
        assert!(matches!(session.leave(&PlayerId::new("P9")), Err(GameError::PlayerNotFound)));
    }

    #[tokio::test]
    async fn only_admin_can_start() {
        let (_, session, _) = manager_with_session(5);
        let result = lock(&session).unwrap().start(&PlayerId::new("P1"), 7);
        assert!(matches!(result, Err(GameError::NotAdmin)));
    }

    #[tokio::test]
    async fn start_requires_five_players() {
        let (_, session, _) = manager_with_session(4);
        let result = lock(&session).unwrap().start(&PlayerId::new("P0"), 7);
        assert!(matches!(result, Err(GameError::InsufficientPlayers)));
        assert!(!lock(&session).unwrap().is_playing());
    }

    #[tokio::test]
    async fn runs_a_game_to_completion() {
        let (manager, session, _) = manager_with_session(5);
        let id = lock(&session).unwrap().id().to_string();
        lock(&session).unwrap().start(&PlayerId::new("P0"), 11).unwrap();
        assert!(matches!(
            lock(&session).unwrap().join(PlayerId::new("LATE")),
            Err(GameError::CannotJoinStartedGame)
        ));

        let result = manager.finish_game(&id).await.unwrap();
        assert_eq!(result.roles.len(), 5);
        assert_eq!(manager.past_games().len(), 1);

        let session = lock(&session).unwrap();
        assert!(!session.is_playing());
        assert_eq!(session.show().players.len(), 5);
    }

    #[tokio::test]
    async fn admin_can_cancel_a_stalled_game() {
        let (manager, session, interaction) = manager_with_session(5);
        interaction.stall_all();
        let id = lock(&session).unwrap().id().to_string();
        lock(&session).unwrap().start(&PlayerId::new("P0"), 3).unwrap();
        lock(&session).unwrap().cancel(&PlayerId::new("P0")).unwrap();

        let result = manager.finish_game(&id).await;
        assert!(matches!(result, Err(GameError::Cancelled)));
        assert!(!lock(&session).unwrap().is_playing());
    }

    #[tokio::test]
    async fn purge_cancels_idle_games() {
        let (manager, session, interaction) = manager_with_session(5);
        interaction.stall_all();
        let id = lock(&session).unwrap().id().to_string();
        lock(&session).unwrap().start(&PlayerId::new("P0"), 3).unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let purged = manager.purge_inactive(Duration::ZERO);
        assert_eq!(purged, vec![id.clone()]);
        assert!(matches!(manager.finish_game(&id).await, Err(GameError::Cancelled)));
    }

    #[tokio::test]
    async fn purge_drops_abandoned_games() {
        let (manager, session, interaction) = manager_with_session(5);
        interaction.stall_all();
        let id = lock(&session).unwrap().id().to_string();
        lock(&session).unwrap().start(&PlayerId::new("P0"), 3).unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(manager.purge_inactive(Duration::ZERO), vec![id.clone()]);
        assert_eq!(manager.num_sessions(), 1);

        // The second purge finds the cancelled game over
        tokio::time::sleep(Duration::from_millis(20)).await;
        manager.purge_inactive(Duration::ZERO);
        assert_eq!(manager.num_sessions(), 0);
        assert!(matches!(manager.find_session(&id), Err(GameError::GameNotFound)));
        assert!(manager.past_games().is_empty());
    }

    #[tokio::test]
    async fn purge_keeps_results_of_unwatched_games() {
        let (manager, session, _) = manager_with_session(5);
        let id = lock(&session).unwrap().id().to_string();
        lock(&session).unwrap().start(&PlayerId::new("P0"), 11).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        manager.purge_inactive(Duration::ZERO);
        assert_eq!(manager.num_sessions(), 0);
        let games = manager.past_games();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].0, id);
    }

    #[test]
    fn last_player_leaving_drops_session() {
        let (manager, session, _) = manager_with_session(2);
        let id = lock(&session).unwrap().id().to_string();

        manager.leave_session(&id, &PlayerId::new("P0")).unwrap();
        assert_eq!(manager.num_sessions(), 1);
        assert_eq!(lock(&session).unwrap().show().admin, Some(PlayerId::new("P1")));

        manager.leave_session(&id, &PlayerId::new("P1")).unwrap();
        assert_eq!(manager.num_sessions(), 0);
        assert!(matches!(
            manager.leave_session(&id, &PlayerId::new("P1")),
            Err(GameError::GameNotFound)
        ));
    }
}
