//! The game state machine for one room.
//!
//! `GameState` is plain synchronous data — roster, phase, votes,
//! impostor, word — with no channels or I/O. The room actor owns
//! exactly one and is the only thing that ever mutates it, so none of
//! these methods need locks. Keeping the rules here, separate from the
//! actor loop, is what makes them unit-testable without a runtime.

use std::collections::BTreeMap;

use rand::seq::IndexedRandom;

use wordspy_protocol::{Player, PlayerId, RoomId, VoteTally, Winner};

use crate::RoomPhase;

/// Full game state for one room.
///
/// Invariants:
/// - `impostor` is `Some` iff the phase is `InProgress` or later.
/// - `the_word` is `Some` iff the phase is `InProgress` or later.
/// - every accused id in `votes` is a current roster member (a leaving
///   player's entry is removed with them).
#[derive(Debug, Clone)]
pub struct GameState {
    room_id: RoomId,
    rounds: u32,
    phase: RoomPhase,
    /// Roster in join order. Join order drives deterministic iteration
    /// (roster broadcasts, quorum checks) but never turn order.
    players: Vec<Player>,
    /// Accused player → avatar URLs of everyone who voted for them,
    /// insertion-ordered by first accusation. Re-votes append; nothing
    /// is ever overwritten.
    votes: Vec<(PlayerId, Vec<String>)>,
    impostor: Option<PlayerId>,
    the_word: Option<String>,
}

impl GameState {
    /// Creates a fresh room state in the `Waiting` phase.
    pub fn new(room_id: RoomId, rounds: u32) -> Self {
        Self {
            room_id,
            rounds,
            phase: RoomPhase::Waiting,
            players: Vec::new(),
            votes: Vec::new(),
            impostor: None,
            the_word: None,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    /// The roster in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.player_id == id)
    }

    fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.player_id == id)
    }

    pub fn impostor(&self) -> Option<&PlayerId> {
        self.impostor.as_ref()
    }

    pub fn the_word(&self) -> Option<&str> {
        self.the_word.as_deref()
    }

    // -----------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------

    /// Adds a player at the end of the join order.
    pub fn add_player(&mut self, player: Player) {
        self.players.push(player);
    }

    /// Removes a player and any votes cast against them. Votes they
    /// cast against others stay on record.
    pub fn remove_player(&mut self, id: &PlayerId) -> Option<Player> {
        let index = self.players.iter().position(|p| &p.player_id == id)?;
        let player = self.players.remove(index);
        self.votes.retain(|(accused, _)| accused != id);
        Some(player)
    }

    // -----------------------------------------------------------------
    // Ready / identity
    // -----------------------------------------------------------------

    pub fn set_ready(&mut self, id: &PlayerId) {
        if let Some(player) = self.player_mut(id) {
            player.is_ready = true;
        }
    }

    pub fn unready(&mut self, id: &PlayerId) {
        if let Some(player) = self.player_mut(id) {
            player.is_ready = false;
        }
    }

    pub fn set_name(&mut self, id: &PlayerId, new_name: String) {
        if let Some(player) = self.player_mut(id) {
            player.player_name = new_name;
        }
    }

    /// The ready quorum: every current member is ready. An empty room
    /// never counts as ready.
    pub fn all_ready(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.is_ready)
    }

    // -----------------------------------------------------------------
    // Phase transitions
    // -----------------------------------------------------------------

    /// `Waiting → Starting`. Returns `false` (and does nothing) from any
    /// other phase — this is the guard that makes the countdown fire at
    /// most once per quorum edge, even if players re-ready afterwards.
    pub fn begin_countdown(&mut self) -> bool {
        if !self.phase.is_waiting() {
            return false;
        }
        self.phase = RoomPhase::Starting;
        true
    }

    /// `Starting → InProgress`: picks the impostor uniformly at random
    /// from the current roster and fixes the secret word.
    ///
    /// Returns the impostor's id, or `None` (no transition) if the room
    /// emptied during the countdown.
    pub fn begin_round(&mut self, word: String) -> Option<PlayerId> {
        let impostor = self
            .players
            .choose(&mut rand::rng())?
            .player_id
            .clone();
        self.impostor = Some(impostor.clone());
        self.the_word = Some(word);
        self.phase = RoomPhase::InProgress;
        Some(impostor)
    }

    /// `InProgress → Voting`.
    pub fn begin_voting(&mut self) {
        self.phase = RoomPhase::Voting;
    }

    /// `Voting → Revealed`.
    pub fn reveal(&mut self) {
        self.phase = RoomPhase::Revealed;
    }

    /// Returns the room to `Waiting`, clearing votes, impostor, word,
    /// and every per-player flag. The only path to another round in the
    /// same room.
    pub fn reset(&mut self) {
        self.phase = RoomPhase::Waiting;
        self.votes.clear();
        self.impostor = None;
        self.the_word = None;
        for player in &mut self.players {
            player.reset_flags();
        }
    }

    // -----------------------------------------------------------------
    // Turns
    // -----------------------------------------------------------------

    pub fn start_turn(&mut self, id: &PlayerId) {
        if let Some(player) = self.player_mut(id) {
            player.currently_discussing = true;
        }
    }

    pub fn end_turn(&mut self, id: &PlayerId) {
        if let Some(player) = self.player_mut(id) {
            player.currently_discussing = false;
            player.turn_ended = true;
        }
    }

    /// Picks the next speaker uniformly at random among players whose
    /// turn hasn't ended; `None` once everyone is done.
    ///
    /// Turn order is redrawn after every completed turn, not fixed at
    /// round start — only the exclusion of finished players keeps
    /// anyone from speaking twice.
    pub fn whos_next(&self) -> Option<&Player> {
        let pending: Vec<&Player> =
            self.players.iter().filter(|p| !p.turn_ended).collect();
        pending.choose(&mut rand::rng()).copied()
    }

    // -----------------------------------------------------------------
    // Votes
    // -----------------------------------------------------------------

    /// Records a vote: appends the voter's avatar to the accused's list
    /// and marks the voter as having voted.
    ///
    /// Returns `false` (recording nothing) if the accused is not a
    /// current roster member. Re-votes stack — a voter who votes twice
    /// appears twice.
    pub fn record_vote(&mut self, voter: &PlayerId, accused: &PlayerId) -> bool {
        if self.player(accused).is_none() {
            return false;
        }
        let Some(avatar) =
            self.player(voter).map(|p| p.player_image_url.clone())
        else {
            return false;
        };

        match self.votes.iter_mut().find(|(id, _)| id == accused) {
            Some((_, voters)) => voters.push(avatar),
            None => self.votes.push((accused.clone(), vec![avatar])),
        }

        if let Some(player) = self.player_mut(voter) {
            player.has_voted = true;
        }
        true
    }

    /// Every current member has voted. An empty room never counts.
    pub fn all_voted(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.has_voted)
    }

    /// The tally map broadcast after each vote: accused id → true.
    pub fn vote_map(&self) -> BTreeMap<PlayerId, bool> {
        self.votes
            .iter()
            .map(|(accused, _)| (accused.clone(), true))
            .collect()
    }

    /// The full breakdown for `SHOW_IMPOSTOR`, in first-accusation order.
    pub fn vote_tally(&self) -> Vec<VoteTally> {
        self.votes
            .iter()
            .map(|(accused, voters)| VoteTally {
                player_id: accused.clone(),
                voted_this_guy: voters.clone(),
            })
            .collect()
    }

    /// Decides the round: players win iff the votes cast against the
    /// impostor strictly exceed half the roster (integer floor),
    /// otherwise the impostor wins.
    pub fn winner(&self) -> Winner {
        let against_impostor = self
            .impostor
            .as_ref()
            .and_then(|impostor| {
                self.votes
                    .iter()
                    .find(|(accused, _)| accused == impostor)
            })
            .map_or(0, |(_, voters)| voters.len());

        if against_impostor > self.players.len() / 2 {
            Winner::Players
        } else {
            Winner::Impostor
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: &str) -> PlayerId {
        PlayerId::from(id)
    }

    fn player(id: &str) -> Player {
        Player::new(pid(id), format!("Player {id}"), format!("http://img/{id}.png"))
    }

    /// A room with `n` players joined, still in `Waiting`.
    fn room_with(n: usize) -> GameState {
        let mut state = GameState::new(RoomId::from("abc123"), 3);
        for i in 1..=n {
            state.add_player(player(&format!("p{i}")));
        }
        state
    }

    /// Drives a 3-player room into `InProgress` and returns the
    /// impostor's id.
    fn started_room() -> (GameState, PlayerId) {
        let mut state = room_with(3);
        for i in 1..=3 {
            state.set_ready(&pid(&format!("p{i}")));
        }
        assert!(state.begin_countdown());
        let impostor = state.begin_round("pizza".into()).unwrap();
        (state, impostor)
    }

    // =====================================================================
    // Ready quorum
    // =====================================================================

    #[test]
    fn test_all_ready_false_until_every_player_ready() {
        let mut state = room_with(3);
        state.set_ready(&pid("p1"));
        state.set_ready(&pid("p2"));
        assert!(!state.all_ready());

        state.set_ready(&pid("p3"));
        assert!(state.all_ready());
    }

    #[test]
    fn test_all_ready_false_for_empty_room() {
        let state = room_with(0);
        assert!(!state.all_ready());
    }

    #[test]
    fn test_unready_withdraws_from_quorum() {
        let mut state = room_with(2);
        state.set_ready(&pid("p1"));
        state.set_ready(&pid("p2"));
        state.unready(&pid("p1"));
        assert!(!state.all_ready());
    }

    #[test]
    fn test_begin_countdown_fires_once_per_waiting_edge() {
        let mut state = room_with(2);
        assert!(state.begin_countdown());
        // A player re-readying after quorum must not re-arm the start.
        assert!(!state.begin_countdown());
        assert_eq!(state.phase(), RoomPhase::Starting);
    }

    // =====================================================================
    // Round start
    // =====================================================================

    #[test]
    fn test_impostor_empty_before_round_starts() {
        let mut state = room_with(3);
        assert!(state.impostor().is_none());
        assert!(state.the_word().is_none());

        state.begin_countdown();
        // Still counting down — no impostor yet.
        assert!(state.impostor().is_none());
    }

    #[test]
    fn test_begin_round_assigns_exactly_one_impostor_from_roster() {
        let (state, impostor) = started_room();
        assert_eq!(state.impostor(), Some(&impostor));
        assert!(state.player(&impostor).is_some());
        assert_eq!(state.the_word(), Some("pizza"));
        assert_eq!(state.phase(), RoomPhase::InProgress);
    }

    #[test]
    fn test_begin_round_on_empty_room_does_nothing() {
        let mut state = room_with(0);
        state.begin_countdown();
        assert!(state.begin_round("pizza".into()).is_none());
        assert_eq!(state.phase(), RoomPhase::Starting);
        assert!(state.impostor().is_none());
    }

    // =====================================================================
    // Turns
    // =====================================================================

    #[test]
    fn test_whos_next_never_returns_a_finished_player() {
        let (mut state, _) = started_room();
        state.end_turn(&pid("p1"));
        state.end_turn(&pid("p3"));

        // Only p2 is pending — every draw must land on them.
        for _ in 0..20 {
            assert_eq!(state.whos_next().unwrap().player_id, pid("p2"));
        }
    }

    #[test]
    fn test_whos_next_none_once_all_turns_ended() {
        let (mut state, _) = started_room();
        for i in 1..=3 {
            state.end_turn(&pid(&format!("p{i}")));
        }
        assert!(state.whos_next().is_none());
    }

    #[test]
    fn test_end_turn_clears_discussing_and_marks_ended() {
        let (mut state, _) = started_room();
        state.start_turn(&pid("p2"));
        assert!(state.player(&pid("p2")).unwrap().currently_discussing);

        state.end_turn(&pid("p2"));
        let p2 = state.player(&pid("p2")).unwrap();
        assert!(!p2.currently_discussing);
        assert!(p2.turn_ended);
    }

    // =====================================================================
    // Votes
    // =====================================================================

    #[test]
    fn test_record_vote_appends_voter_avatar() {
        let (mut state, _) = started_room();
        state.begin_voting();

        // P1 votes P2, P2 votes P2, P3 votes P1.
        assert!(state.record_vote(&pid("p1"), &pid("p2")));
        assert!(state.record_vote(&pid("p2"), &pid("p2")));
        assert!(state.record_vote(&pid("p3"), &pid("p1")));

        let tally = state.vote_tally();
        assert_eq!(tally.len(), 2);
        assert_eq!(tally[0].player_id, pid("p2"));
        assert_eq!(
            tally[0].voted_this_guy,
            vec!["http://img/p1.png".to_string(), "http://img/p2.png".to_string()]
        );
        assert_eq!(tally[1].player_id, pid("p1"));
        assert_eq!(tally[1].voted_this_guy, vec!["http://img/p3.png".to_string()]);

        assert!(state.all_voted());
    }

    #[test]
    fn test_vote_sum_equals_votes_cast() {
        let (mut state, _) = started_room();
        state.begin_voting();
        state.record_vote(&pid("p1"), &pid("p3"));
        state.record_vote(&pid("p2"), &pid("p3"));
        state.record_vote(&pid("p3"), &pid("p3"));

        let total: usize = state
            .vote_tally()
            .iter()
            .map(|t| t.voted_this_guy.len())
            .sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_revote_stacks_instead_of_overwriting() {
        let (mut state, _) = started_room();
        state.begin_voting();
        state.record_vote(&pid("p1"), &pid("p2"));
        state.record_vote(&pid("p1"), &pid("p2"));

        assert_eq!(state.vote_tally()[0].voted_this_guy.len(), 2);
    }

    #[test]
    fn test_vote_for_non_member_is_rejected() {
        let (mut state, _) = started_room();
        state.begin_voting();

        assert!(!state.record_vote(&pid("p1"), &pid("ghost")));
        assert!(state.vote_tally().is_empty());
        assert!(!state.player(&pid("p1")).unwrap().has_voted);
    }

    #[test]
    fn test_all_voted_requires_every_member() {
        let (mut state, _) = started_room();
        state.begin_voting();
        state.record_vote(&pid("p1"), &pid("p2"));
        state.record_vote(&pid("p2"), &pid("p1"));
        assert!(!state.all_voted());

        state.record_vote(&pid("p3"), &pid("p1"));
        assert!(state.all_voted());
    }

    #[test]
    fn test_vote_map_keys_are_accused_players() {
        let (mut state, _) = started_room();
        state.begin_voting();
        state.record_vote(&pid("p1"), &pid("p2"));
        state.record_vote(&pid("p3"), &pid("p2"));

        let map = state.vote_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&pid("p2")), Some(&true));
    }

    // =====================================================================
    // Winner
    // =====================================================================

    #[test]
    fn test_winner_players_when_majority_votes_impostor() {
        let (mut state, impostor) = started_room();
        state.begin_voting();
        // 2 of 3 vote the impostor — strictly more than 3 / 2 == 1.
        let voters: Vec<PlayerId> = state
            .players()
            .iter()
            .filter(|p| p.player_id != impostor)
            .map(|p| p.player_id.clone())
            .collect();
        for voter in &voters {
            state.record_vote(voter, &impostor);
        }
        assert_eq!(state.winner(), Winner::Players);
    }

    #[test]
    fn test_winner_impostor_when_votes_split() {
        let (mut state, impostor) = started_room();
        state.begin_voting();
        // Exactly one vote against the impostor: 1 > 3 / 2 is false.
        let voter = state
            .players()
            .iter()
            .find(|p| p.player_id != impostor)
            .unwrap()
            .player_id
            .clone();
        state.record_vote(&voter, &impostor);
        assert_eq!(state.winner(), Winner::Impostor);
    }

    #[test]
    fn test_winner_impostor_when_no_votes_cast() {
        let (state, _) = started_room();
        assert_eq!(state.winner(), Winner::Impostor);
    }

    // =====================================================================
    // Roster changes
    // =====================================================================

    #[test]
    fn test_remove_player_drops_votes_against_them() {
        let (mut state, _) = started_room();
        state.begin_voting();
        state.record_vote(&pid("p1"), &pid("p2"));
        state.record_vote(&pid("p3"), &pid("p1"));

        state.remove_player(&pid("p2"));

        // Votes against p2 are gone with them; p3's vote against p1 stays.
        let tally = state.vote_tally();
        assert_eq!(tally.len(), 1);
        assert_eq!(tally[0].player_id, pid("p1"));
        // Every remaining accused is still a roster member.
        for entry in &tally {
            assert!(state.player(&entry.player_id).is_some());
        }
    }

    #[test]
    fn test_remove_player_returns_their_record() {
        let mut state = room_with(2);
        let removed = state.remove_player(&pid("p1")).unwrap();
        assert_eq!(removed.player_id, pid("p1"));
        assert_eq!(state.player_count(), 1);
        assert!(state.remove_player(&pid("p1")).is_none());
    }

    #[test]
    fn test_players_keep_join_order() {
        let state = room_with(3);
        let ids: Vec<&PlayerId> =
            state.players().iter().map(|p| &p.player_id).collect();
        assert_eq!(ids, vec![&pid("p1"), &pid("p2"), &pid("p3")]);
    }

    // =====================================================================
    // Reset
    // =====================================================================

    #[test]
    fn test_reset_clears_round_state_but_keeps_roster() {
        let (mut state, _) = started_room();
        state.begin_voting();
        state.record_vote(&pid("p1"), &pid("p2"));
        state.reveal();

        state.reset();

        assert_eq!(state.phase(), RoomPhase::Waiting);
        assert!(state.impostor().is_none());
        assert!(state.the_word().is_none());
        assert!(state.vote_tally().is_empty());
        assert_eq!(state.player_count(), 3);
        for player in state.players() {
            assert!(!player.is_ready);
            assert!(!player.turn_ended);
            assert!(!player.has_voted);
            assert!(!player.currently_discussing);
        }
    }

    #[test]
    fn test_reset_allows_a_second_quorum_edge() {
        let (mut state, _) = started_room();
        state.reset();

        for i in 1..=3 {
            state.set_ready(&pid(&format!("p{i}")));
        }
        assert!(state.all_ready());
        assert!(state.begin_countdown());
    }
}
