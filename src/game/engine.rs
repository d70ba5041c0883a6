use super::claim::{claim_from_choice, claim_labels, loyalty_claims, policy_claims, Claim};
use super::control::{CancelToken, EngineSignals};
use super::executive_power::{ExecutivePower, PowerTable};
use super::government::Government;
use super::party::Party;
use super::player::{PlayerId, Role};
use super::prompt::{ChoosePlayerKind, Interaction, Notice, Prompt, MAX_OPTIONS};
use super::update::{Announcement, Broadcast};
use super::votes::Votes;
use super::{GameOptions, GameResult, GameState, Phase, RemovalOutcome, WinCondition};
use crate::error::{ErrorKind, GameError, InteractionError};
use crate::time::iso8601;
use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::FutureExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::future::Future;
use std::time::SystemTime;
use tokio::sync::mpsc;

const VETO_LABEL: &str = "Veto";

/// Games of at most this many players let Hitler know who the fascists are.
const HITLER_KNOWS_FASCISTS: usize = 6;

/// Runs one game of Secret Hitler on a [GameState], from dealing roles to a win.
///
/// Every decision is delegated to the [Interaction] port and every public event goes out
/// through the [Broadcast] port. The engine is the only writer of the state while it runs.
pub struct RoundEngine<'a, I: ?Sized, B: ?Sized> {
    state: &'a mut GameState,
    interaction: &'a I,
    broadcast: &'a B,
    opts: GameOptions,
    powers: PowerTable,
    cancel: CancelToken,
    departures: mpsc::UnboundedReceiver<PlayerId>,
    rng: ChaCha8Rng,
    seed: u64,
    phase: Phase,
    /// Players whose departure aborts the current round.
    seats: Vec<PlayerId>,
}

/// Whether a stage of the round lets the game carry on.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) enum RoundEnd<T> {
    Continue(T),
    GameOver(WinCondition),
}

/// What the legislature decided, before any of it is applied.
struct Legislation {
    president_hand: [Party; 3],
    chancellor_hand: [Party; 2],
    enacted: Option<Party>,
    discarded: Vec<Party>,
}

enum Event<T> {
    Done(T),
    Cancelled,
    Left(PlayerId),
}

impl<'a, I, B> RoundEngine<'a, I, B>
where
    I: Interaction + ?Sized,
    B: Broadcast + ?Sized,
{
    pub fn new(
        state: &'a mut GameState,
        interaction: &'a I,
        broadcast: &'a B,
        signals: EngineSignals,
        opts: GameOptions,
        seed: u64,
    ) -> Self {
        let powers = opts.power_table(state.players.len());
        Self {
            state,
            interaction,
            broadcast,
            opts,
            powers,
            cancel: signals.cancel,
            departures: signals.departures,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            phase: Phase::Lobby,
            seats: vec![],
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Plays the game to completion.
    ///
    /// Configuration errors leave the state untouched. Any other error abandons the game
    /// between decisions, so no policy is ever half enacted.
    pub async fn run(&mut self) -> Result<GameResult, GameError> {
        if self.phase != Phase::Lobby {
            return Err(GameError::InvalidAction);
        }
        self.opts.validate()?;
        let started = SystemTime::now();
        self.state.start(&mut self.rng)?;
        // Players who leave are dropped from the directory, but their roles are still revealed
        let roles = self.state.players.role_assignment();
        log::info!("Starting game with {} players (seed {})", self.state.players.len(), self.seed);

        match self.play().await {
            Ok(outcome) => {
                self.phase = Phase::GameOver(outcome);
                log::info!("Game over: {}", outcome);
                self.broadcast
                    .announce(Announcement::GameOver {
                        outcome,
                        winner: outcome.winner(),
                        roles: roles.clone(),
                    })
                    .await;
                Ok(GameResult {
                    winner: outcome.winner(),
                    outcome,
                    roles,
                    seed: self.seed,
                    started: iso8601(started),
                    finished: iso8601(SystemTime::now()),
                })
            }
            Err(err) => {
                match err.kind() {
                    ErrorKind::Invariant => log::error!("Game abandoned: {}", err),
                    _ => log::warn!("Game abandoned: {}", err),
                }
                if !matches!(err, GameError::Cancelled) {
                    self.broadcast
                        .announce(Announcement::GameAborted { reason: err.to_string() })
                        .await;
                }
                Err(err)
            }
        }
    }

    async fn play(&mut self) -> Result<WinCondition, GameError> {
        self.announce(Announcement::GameStarted { players: self.state.players.ids() }).await?;
        self.reveal_roles().await?;

        loop {
            self.apply_pending_departures().await?;

            let government = match self.election_round().await? {
                RoundEnd::Continue(government) => government,
                RoundEnd::GameOver(outcome) => return Ok(outcome),
            };

            let enacted = match self.legislative_session(&government).await? {
                RoundEnd::Continue(enacted) => enacted,
                RoundEnd::GameOver(outcome) => return Ok(outcome),
            };

            if enacted != Some(Party::Fascist) {
                continue;
            }
            if let Some(power) = self.powers.power_at(self.state.board.fascist_cards) {
                if let RoundEnd::GameOver(outcome) = self.executive_action(power, &government).await? {
                    return Ok(outcome);
                }
            }
        }
    }

    /// Privately tells every player their role, and the fascists who their allies are.
    pub(crate) async fn reveal_roles(&mut self) -> Result<(), GameError> {
        let players = &self.state.players;
        let fascists = players.players_with_role(Role::Fascist, &[]);
        let hitler = players.hitler().cloned();
        let hitler_knows = players.len() <= HITLER_KNOWS_FASCISTS;

        let notices = players
            .iter()
            .map(|player| {
                let role = player.role.ok_or(GameError::InvariantViolation("player has no role"))?;
                let notice = match role {
                    Role::Liberal => Notice::Role { role, fascists: vec![], hitler: None },
                    Role::Fascist => Notice::Role {
                        role,
                        fascists: fascists.iter().filter(|f| **f != player.id).cloned().collect(),
                        hitler: hitler.clone(),
                    },
                    Role::Hitler => Notice::Role {
                        role,
                        fascists: if hitler_knows { fascists.clone() } else { vec![] },
                        hitler: None,
                    },
                };
                Ok((player.id.clone(), notice))
            })
            .collect::<Result<Vec<_>, GameError>>()?;

        let interaction = self.interaction;
        let requests = notices
            .iter()
            .map(|(player, notice)| (player, interaction.inform(player, notice.clone())))
            .collect();
        for (player, result) in self.gather(requests).await? {
            if let Err(source) = result {
                return Err(GameError::Interaction { player: player.clone(), source });
            }
        }
        Ok(())
    }

    /// Nominates and votes on governments until one is elected, throwing the country into
    /// chaos after too many failed elections.
    pub(crate) async fn election_round(&mut self) -> Result<RoundEnd<Government>, GameError> {
        self.enter(Phase::ElectionRound).await?;

        loop {
            self.seats.clear();
            let (president, special) = self
                .state
                .take_presidential_candidate()
                .ok_or(GameError::NoEligibleCandidates)?;
            self.seats.push(president.clone());
            log::debug!("Presidential candidate: {}", president);
            self.announce(Announcement::PresidentialCandidate { player: president.clone(), special })
                .await?;

            let candidates = self.state.eligible_chancellors(&president);
            if candidates.is_empty() {
                return Err(GameError::NoEligibleCandidates);
            }
            let choice = self
                .choose(&president, Prompt::NominateChancellor, &player_labels(&candidates))
                .await?;
            let chancellor = candidates[choice].clone();
            self.seats.push(chancellor.clone());
            self.announce(Announcement::ChancellorNominated {
                president: president.clone(),
                chancellor: chancellor.clone(),
            })
            .await?;

            let votes = self.hold_vote(&president, &chancellor).await?;
            let passed = votes.passed();
            if passed {
                self.state.reset_election_tracker();
                self.state.elect(Government {
                    president: president.clone(),
                    chancellor: chancellor.clone(),
                });
            } else {
                self.state.advance_election_tracker();
            }
            log::info!(
                "Election of {} and {} {} ({} yes of {})",
                president,
                chancellor,
                if passed { "passed" } else { "failed" },
                votes.yes(),
                self.state.players.num_alive()
            );
            self.announce(Announcement::ElectionResult {
                votes: votes.votes().to_vec(),
                passed,
                election_tracker: self.state.election_tracker,
            })
            .await?;

            if passed {
                if self.state.board.hitler_can_win() {
                    if self.state.hitler_elected() {
                        return Ok(RoundEnd::GameOver(WinCondition::HitlerChancellor));
                    }
                    self.confirm_not_hitler(&chancellor).await?;
                }
                return Ok(RoundEnd::Continue(Government { president, chancellor }));
            }

            if self.state.chaos_due() {
                self.chaos().await?;
            }
        }
    }

    /// Gathers every living player's vote on a nominated government.
    async fn hold_vote(&mut self, president: &PlayerId, chancellor: &PlayerId) -> Result<Votes, GameError> {
        let voters = self.state.players.alive_players(&[]);
        let prompt = Prompt::Vote {
            president: president.clone(),
            chancellor: chancellor.clone(),
        };

        let interaction = self.interaction;
        let requests = voters
            .iter()
            .map(|voter| (voter, interaction.vote(voter, prompt.clone(), "Ja!", "Nein")))
            .collect();
        let responses = self.gather(requests).await?;

        let mut votes = Votes::new(self.state.players.num_alive());
        for (voter, response) in responses {
            match response {
                Ok(vote) => votes.vote(voter.clone(), vote),
                Err(source) => {
                    log::warn!("{} could not vote: {}", voter, source);
                    return Err(GameError::Interaction { player: voter.clone(), source });
                }
            }
        }
        Ok(votes)
    }

    async fn confirm_not_hitler(&mut self, chancellor: &PlayerId) -> Result<(), GameError> {
        let Some(player) = self.state.players.get_mut(chancellor) else {
            return Ok(());
        };
        if player.not_hitler {
            return Ok(());
        }
        player.not_hitler = true;
        self.announce(Announcement::NotHitler { player: chancellor.clone() }).await
    }

    /// Enacts the top policy of the deck. Neither checks the policy tracks nor grants a power.
    async fn chaos(&mut self) -> Result<(), GameError> {
        self.reshuffle().await?;
        let policy = self.state.enact_top_policy()?;
        self.state.reset_term_limits();
        self.state.reset_election_tracker();
        log::info!("The country is thrown into chaos: {} policy enacted", policy);
        self.announce(Announcement::Chaos { policy }).await?;
        self.announce_policy(policy).await?;
        self.reshuffle().await
    }

    /// The president and chancellor of an elected government pass one policy, or veto both.
    pub(crate) async fn legislative_session(
        &mut self,
        government: &Government,
    ) -> Result<RoundEnd<Option<Party>>, GameError> {
        self.enter(Phase::LegislativeSession).await?;
        self.seats = vec![government.president.clone(), government.chancellor.clone()];

        self.reshuffle().await?;
        let cards = self.state.deck.draw_three()?;
        let legislation = match self.legislate(government, cards).await {
            Ok(legislation) => legislation,
            Err(err) => {
                self.state.deck.return_to_top(&cards);
                return Err(err);
            }
        };

        for card in &legislation.discarded {
            self.state.deck.discard(*card);
        }

        if let Some(policy) = legislation.enacted {
            self.state.enact_policy(policy);
            log::info!("{} and {} enacted a {} policy", government.president, government.chancellor, policy);
            self.announce_policy(policy).await?;
            if let Some(party) = self.state.board.check_tracks() {
                return Ok(RoundEnd::GameOver(WinCondition::policy_track(party)));
            }
        }

        self.offer_claims(government, legislation.president_hand, legislation.chancellor_hand)
            .await?;

        if legislation.enacted.is_none() {
            self.state.advance_election_tracker();
            if self.state.chaos_due() {
                self.chaos().await?;
            }
        }

        self.reshuffle().await?;
        self.announce_deck().await?;
        Ok(RoundEnd::Continue(legislation.enacted))
    }

    /// Collects the legislature's decisions without changing any state.
    async fn legislate(&mut self, government: &Government, cards: [Party; 3]) -> Result<Legislation, GameError> {
        let Government { president, chancellor } = government;

        let discard = self
            .choose(president, Prompt::PresidentDiscard { cards }, &policy_labels(&cards))
            .await?;
        let hand = match discard {
            0 => [cards[1], cards[2]],
            1 => [cards[0], cards[2]],
            _ => [cards[0], cards[1]],
        };
        let mut discarded = vec![cards[discard]];

        let can_veto = self.opts.veto_unlocked(self.state.board.fascist_cards);
        let mut options = policy_labels(&hand);
        if can_veto {
            options.push(VETO_LABEL.to_string());
        }
        let mut choice = self
            .choose(chancellor, Prompt::ChancellorEnact { cards: hand, can_veto }, &options)
            .await?;

        if choice == 2 {
            self.announce(Announcement::VetoProposed { chancellor: chancellor.clone() }).await?;
            let accepted = self
                .ask_vote(president, Prompt::ApproveVeto, "Accept veto", "Reject veto")
                .await?;
            self.announce(Announcement::VetoOutcome { accepted }).await?;
            if accepted {
                log::info!("{} and {} vetoed the agenda", president, chancellor);
                discarded.extend(hand);
                return Ok(Legislation {
                    president_hand: cards,
                    chancellor_hand: hand,
                    enacted: None,
                    discarded,
                });
            }
            choice = self
                .choose(chancellor, Prompt::ChancellorEnact { cards: hand, can_veto: false }, &options[..2])
                .await?;
        }

        discarded.push(hand[1 - choice]);
        Ok(Legislation {
            president_hand: cards,
            chancellor_hand: hand,
            enacted: Some(hand[choice]),
            discarded,
        })
    }

    /// Lets the president and chancellor each claim what they were handed, at the same time.
    async fn offer_claims(
        &mut self,
        government: &Government,
        president_hand: [Party; 3],
        chancellor_hand: [Party; 2],
    ) -> Result<(), GameError> {
        let president_claims = policy_claims(3);
        let chancellor_claims = policy_claims(2);
        let president_labels = claim_labels(&president_claims);
        let chancellor_labels = claim_labels(&chancellor_claims);

        let interaction = self.interaction;
        let requests = vec![
            (
                &government.president,
                interaction.choose(
                    &government.president,
                    Prompt::ClaimPresidentHand { cards: president_hand },
                    &president_labels,
                ),
            ),
            (
                &government.chancellor,
                interaction.choose(
                    &government.chancellor,
                    Prompt::ClaimChancellorHand { cards: chancellor_hand },
                    &chancellor_labels,
                ),
            ),
        ];

        for (player, response) in self.gather(requests).await? {
            let claims = if *player == government.president { &president_claims } else { &chancellor_claims };
            self.publish_claim(player, claims, response).await?;
        }
        Ok(())
    }

    async fn publish_claim(
        &mut self,
        player: &PlayerId,
        claims: &[Claim],
        response: Result<usize, InteractionError>,
    ) -> Result<(), GameError> {
        let choice = self.check_choice(player, response, claims.len() + 1).await?;
        let announcement = match claim_from_choice(claims, choice) {
            Some(claim) => {
                log::debug!("{} claims {}", player, claim);
                Announcement::Claim { player: player.clone(), claim }
            }
            None => Announcement::NoClaim { player: player.clone() },
        };
        self.announce(announcement).await
    }

    /// Carries out the power granted by the fascist policy just enacted.
    pub(crate) async fn executive_action(
        &mut self,
        power: ExecutivePower,
        government: &Government,
    ) -> Result<RoundEnd<()>, GameError> {
        use ExecutivePower::*;

        self.enter(Phase::ExecutiveAction).await?;
        let president = government.president.clone();
        self.seats = vec![president.clone()];
        log::info!("{} must use the {} power", president, power);
        self.announce(Announcement::ExecutivePower { president: president.clone(), power })
            .await?;

        match power {
            PolicyPeek => {
                self.reshuffle().await?;
                let cards = self.state.deck.peek_three()?;
                let claims = policy_claims(3);
                let choice = self
                    .choose(&president, Prompt::PolicyPeek { cards }, &claim_labels(&claims))
                    .await?;
                self.announce(Announcement::PolicyPeeked { president: president.clone() }).await?;
                self.publish_claim(&president, &claims, Ok(choice)).await?;
            }
            Execution => {
                let targets = self.state.eligible_players().exclude(&president).make();
                let target = self.choose_player(&president, ChoosePlayerKind::Execute, &targets).await?;
                let player = self
                    .state
                    .players
                    .get_mut(&target)
                    .ok_or(GameError::InvariantViolation("executed player is not in the game"))?;
                player.alive = false;
                let was_hitler = player.role == Some(Role::Hitler);
                player.not_hitler = !was_hitler;
                log::info!("{} executed {}", president, target);
                self.announce(Announcement::Executed { player: target }).await?;
                if was_hitler {
                    return Ok(RoundEnd::GameOver(WinCondition::HitlerExecuted));
                }
            }
            InvestigateLoyalty => {
                let targets = self
                    .state
                    .eligible_players()
                    .exclude(&president)
                    .not_investigated()
                    .make();
                if targets.is_empty() {
                    log::warn!("Nobody is left to investigate; skipping the power");
                    return Ok(RoundEnd::Continue(()));
                }
                let target = self.choose_player(&president, ChoosePlayerKind::Investigate, &targets).await?;
                let party = self
                    .state
                    .players
                    .party_membership(&target)
                    .ok_or(GameError::InvariantViolation("investigated player has no party"))?;
                if let Some(player) = self.state.players.get_mut(&target) {
                    player.investigated = true;
                }
                self.announce(Announcement::Investigated {
                    president: president.clone(),
                    player: target.clone(),
                })
                .await?;

                let claims = loyalty_claims();
                let choice = self
                    .choose(
                        &president,
                        Prompt::InvestigationResult { player: target, party },
                        &claim_labels(&claims),
                    )
                    .await?;
                self.publish_claim(&president, &claims, Ok(choice)).await?;
            }
            SpecialElection => {
                let targets = self.state.eligible_players().exclude(&president).make();
                let candidate = self
                    .choose_player(&president, ChoosePlayerKind::NominatePresident, &targets)
                    .await?;
                self.state.call_special_election(candidate.clone());
                self.announce(Announcement::SpecialElectionCalled { president, candidate }).await?;
            }
        }
        Ok(RoundEnd::Continue(()))
    }

    async fn choose_player(
        &mut self,
        player: &PlayerId,
        kind: ChoosePlayerKind,
        targets: &[PlayerId],
    ) -> Result<PlayerId, GameError> {
        if targets.is_empty() {
            return Err(GameError::NoEligibleCandidates);
        }
        let choice = self
            .choose(player, Prompt::ChoosePlayer { kind }, &player_labels(targets))
            .await?;
        Ok(targets[choice].clone())
    }

    /// Asks a single player to pick an option, returning a valid index into `options`.
    async fn choose(&mut self, player: &PlayerId, prompt: Prompt, options: &[String]) -> Result<usize, GameError> {
        if options.is_empty() || options.len() > MAX_OPTIONS {
            return Err(GameError::InvariantViolation("choice prompt with an unsupported number of options"));
        }
        let interaction = self.interaction;
        let response = self.guard(interaction.choose(player, prompt, options)).await?;
        self.check_choice(player, response, options.len()).await
    }

    async fn check_choice(
        &mut self,
        player: &PlayerId,
        response: Result<usize, InteractionError>,
        num_options: usize,
    ) -> Result<usize, GameError> {
        match response {
            Ok(index) if index < num_options => Ok(index),
            Ok(index) => Err(GameError::Interaction {
                player: player.clone(),
                source: InteractionError::InvalidChoice { index, options: num_options },
            }),
            Err(source) => Err(self.interaction_failure(player, source).await),
        }
    }

    async fn ask_vote(&mut self, player: &PlayerId, prompt: Prompt, yes: &str, no: &str) -> Result<bool, GameError> {
        let interaction = self.interaction;
        match self.guard(interaction.vote(player, prompt, yes, no)).await? {
            Ok(vote) => Ok(vote),
            Err(source) => Err(self.interaction_failure(player, source).await),
        }
    }

    /// Reports a failed prompt as a departure if the player has meanwhile left the game.
    async fn interaction_failure(&mut self, player: &PlayerId, source: InteractionError) -> GameError {
        if let Err(err) = self.apply_pending_departures().await {
            return err;
        }
        log::warn!("{} could not complete a prompt: {}", player, source);
        if self.state.players.contains(player) {
            GameError::Interaction { player: player.clone(), source }
        } else {
            GameError::PlayerLeft { player: player.clone() }
        }
    }

    /// Issues requests to several players at once and waits for all of them, in whatever order
    /// the answers come. Players who leave in the meantime are no longer waited for.
    ///
    /// Returns the answers of the players still in the game, in request order.
    async fn gather<'p, T, F>(
        &mut self,
        requests: Vec<(&'p PlayerId, F)>,
    ) -> Result<Vec<(&'p PlayerId, Result<T, InteractionError>)>, GameError>
    where
        F: Future<Output = Result<T, InteractionError>>,
    {
        let players: Vec<&'p PlayerId> = requests.iter().map(|(player, _)| *player).collect();
        let mut responses: Vec<Option<Result<T, InteractionError>>> = players.iter().map(|_| None).collect();
        let mut awaiting = vec![true; players.len()];
        let mut pending: FuturesUnordered<_> = requests
            .into_iter()
            .enumerate()
            .map(|(idx, (_, request))| request.map(move |response| (idx, response)))
            .collect();

        while awaiting.contains(&true) {
            let event = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Event::Cancelled,
                Some(player) = self.departures.recv() => Event::Left(player),
                Some(response) = pending.next() => Event::Done(response),
            };
            match event {
                Event::Cancelled => return Err(GameError::Cancelled),
                Event::Left(player) => {
                    for (idx, requested) in players.iter().enumerate() {
                        if **requested == player {
                            awaiting[idx] = false;
                        }
                    }
                    self.depart(player).await?;
                }
                Event::Done((idx, response)) => {
                    if awaiting[idx] {
                        awaiting[idx] = false;
                        responses[idx] = Some(response);
                    }
                }
            }
        }
        drop(pending);
        self.apply_pending_departures().await?;

        let directory = &self.state.players;
        Ok(players
            .into_iter()
            .zip(responses)
            .filter(|(player, _)| directory.contains(player))
            .filter_map(|(player, response)| response.map(|response| (player, response)))
            .collect())
    }

    /// Waits for `fut`, handling departures in the meantime and giving up on cancellation.
    async fn guard<F: Future>(&mut self, fut: F) -> Result<F::Output, GameError> {
        tokio::pin!(fut);
        loop {
            let event = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Event::Cancelled,
                Some(player) = self.departures.recv() => Event::Left(player),
                output = &mut fut => Event::Done(output),
            };
            match event {
                Event::Cancelled => return Err(GameError::Cancelled),
                Event::Left(player) => self.depart(player).await?,
                Event::Done(output) => return Ok(output),
            }
        }
    }

    async fn apply_pending_departures(&mut self) -> Result<(), GameError> {
        while let Ok(player) = self.departures.try_recv() {
            self.depart(player).await?;
        }
        Ok(())
    }

    /// Removes a player who left. Fails if the round cannot go on without them.
    async fn depart(&mut self, player: PlayerId) -> Result<(), GameError> {
        let was_hitler = self.state.players.role(&player) == Some(Role::Hitler);
        match self.state.remove_player(&player) {
            RemovalOutcome::NotFound => return Ok(()),
            RemovalOutcome::RemovedAndEmpty => return Err(GameError::PlayerLeft { player }),
            RemovalOutcome::Removed { .. } => {}
        }
        log::info!("{} left the game", player);
        self.announce(Announcement::PlayerLeft { player: player.clone() }).await?;

        if was_hitler || self.seats.contains(&player) {
            return Err(GameError::PlayerLeft { player });
        }
        Ok(())
    }

    async fn enter(&mut self, phase: Phase) -> Result<(), GameError> {
        self.phase = phase;
        log::debug!("Entering {:?}", phase);
        self.announce(Announcement::Phase { phase }).await
    }

    async fn announce(&mut self, announcement: Announcement) -> Result<(), GameError> {
        let broadcast = self.broadcast;
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(GameError::Cancelled),
            _ = broadcast.announce(announcement) => Ok(()),
        }
    }

    async fn announce_policy(&mut self, policy: Party) -> Result<(), GameError> {
        self.announce(Announcement::PolicyEnacted {
            policy,
            liberal_cards: self.state.board.liberal_cards,
            fascist_cards: self.state.board.fascist_cards,
        })
        .await
    }

    async fn announce_deck(&mut self) -> Result<(), GameError> {
        self.announce(Announcement::DeckStatus {
            remaining: self.state.deck.count(),
            distribution: self.state.deck.distribution(),
        })
        .await
    }

    /// Shuffles the discard pile back in if fewer than three policies remain.
    async fn reshuffle(&mut self) -> Result<(), GameError> {
        if self.state.deck.reshuffle_if_needed(&mut self.rng) {
            log::debug!("Reshuffled the discard pile into the deck");
            self.announce(Announcement::DeckReshuffled).await?;
            self.announce_deck().await?;
        }
        Ok(())
    }
}

fn player_labels(players: &[PlayerId]) -> Vec<String> {
    players.iter().map(PlayerId::to_string).collect()
}

fn policy_labels(cards: &[Party]) -> Vec<String> {
    cards.iter().map(Party::to_string).collect()
}
