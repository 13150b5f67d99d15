use crate::model::deck::Deck;
use crate::model::player::{Seat, Team};
use crate::model::round::{RoundOutcome, RoundPhase, RoundRules, RoundState};
use crate::model::score::ScoreBoard;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// A game to ten points. The dealer rotates clockwise each round and the
/// first dealer is drawn from the seeded generator.
#[derive(Debug, Clone)]
pub struct MatchState {
    scores: ScoreBoard,
    round_number: u32,
    current_round: RoundState,
    rules: RoundRules,
    rng: StdRng,
    seed: u64,
    thrown_in: u32,
}

impl MatchState {
    pub fn new(rules: RoundRules) -> Self {
        let seed: u64 = rand::random();
        Self::with_seed(seed, rules)
    }

    pub fn with_seed(seed: u64, rules: RoundRules) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let dealer = Seat::LOOP[(rng.next_u64() % 4) as usize];
        Self::with_dealer(rng, seed, dealer, rules)
    }

    /// Deterministic match with a known first dealer.
    pub fn with_seed_and_dealer(seed: u64, dealer: Seat, rules: RoundRules) -> Self {
        Self::with_dealer(StdRng::seed_from_u64(seed), seed, dealer, rules)
    }

    fn with_dealer(mut rng: StdRng, seed: u64, dealer: Seat, rules: RoundRules) -> Self {
        let deck = Deck::shuffled(&mut rng);
        Self {
            scores: ScoreBoard::new(),
            round_number: 1,
            current_round: RoundState::deal(&deck, dealer, rules),
            rules,
            rng,
            seed,
            thrown_in: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn round(&self) -> &RoundState {
        &self.current_round
    }

    pub fn round_mut(&mut self) -> &mut RoundState {
        &mut self.current_round
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn rules(&self) -> RoundRules {
        self.rules
    }

    /// Rounds redealt because nobody named trump.
    pub fn thrown_in(&self) -> u32 {
        self.thrown_in
    }

    pub fn is_round_finished(&self) -> bool {
        matches!(
            self.current_round.phase(),
            RoundPhase::Complete | RoundPhase::ThrownIn
        )
    }

    pub fn winner(&self) -> Option<Team> {
        self.scores.winner()
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Scores the finished round and deals the next one to the left. Returns
    /// the outcome of a played round; thrown-in rounds score nothing.
    pub fn finish_round_and_start_next(&mut self) -> Option<RoundOutcome> {
        let outcome = self.current_round.outcome();
        match outcome {
            Some(outcome) => self
                .scores
                .apply_round((outcome.points[0], outcome.points[1])),
            None if self.current_round.phase() == RoundPhase::ThrownIn => self.thrown_in += 1,
            None => {}
        }

        self.round_number += 1;
        let next_dealer = self.current_round.dealer().next();
        let deck = Deck::shuffled(&mut self.rng);
        self.current_round = RoundState::deal(&deck, next_dealer, self.rules);
        outcome
    }
}
