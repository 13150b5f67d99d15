use crate::features::FeatureRow;
use euchre_bot::{
    HeuristicPolicy, Policy, PolicyContext, PolicyError, SeatRole, StrategyParams, TrumpDecision,
};
use euchre_core::game::match_state::MatchState;
use euchre_core::model::bidding::{BidError, BidStage};
use euchre_core::model::card::Card;
use euchre_core::model::player::{Seat, Team};
use euchre_core::model::round::{PlayError, RoundPhase, RoundRules};
use euchre_core::model::suit::Suit;
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

/// Upper bound on rounds per game; only reachable when every deal is thrown in.
pub const MAX_ROUNDS: u32 = 500;

/// One dealt round as it is written to the hand log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandRecord {
    pub game_index: usize,
    pub game_seed: u64,
    pub round_number: u32,
    pub dealer: Seat,
    pub up_card: Card,
    pub thrown_in: bool,
    pub contract: Option<ContractRecord>,
    /// Tricks taken as `[team one, team two]`.
    pub tricks: [u8; 2],
    pub points: [u8; 2],
    /// Match score after this round.
    pub scores: [u32; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContractRecord {
    pub caller: Seat,
    pub caller_role: SeatRole,
    pub trump: Suit,
    pub stage: BidStage,
    pub alone: bool,
    pub euchre: bool,
    pub march: bool,
}

/// Everything one game produced.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub game_index: usize,
    pub seed: u64,
    pub hands: Vec<HandRecord>,
    pub features: Vec<FeatureRow>,
    pub winner: Team,
    pub final_scores: [u32; 2],
}

impl GameRecord {
    pub fn rounds(&self) -> usize {
        self.hands.len()
    }

    pub fn thrown_in(&self) -> usize {
        self.hands.iter().filter(|hand| hand.thrown_in).count()
    }
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("policy failed for {seat}: {source}")]
    Policy {
        seat: Seat,
        #[source]
        source: PolicyError,
    },
    #[error("bid rejected: {0}")]
    Bid(#[from] BidError),
    #[error("play rejected: {0}")]
    Play(#[from] PlayError),
    #[error("no seat to act during {phase:?}")]
    Stalled { phase: RoundPhase },
    #[error("policy called {called} in round one but {expected} was turned up")]
    WrongOrderUpSuit { called: Suit, expected: Suit },
    #[error("no team reached the target within {rounds} rounds")]
    RoundLimit { rounds: u32 },
    #[error("game panicked: {message}")]
    Panicked { message: String },
}

/// Plays one game to ten points with four heuristic seats sharing `params`.
pub fn play_game(
    game_index: usize,
    seed: u64,
    params: &StrategyParams,
    record_features: bool,
) -> Result<GameRecord, GameError> {
    let rules = RoundRules {
        stick_the_dealer: params.stick_the_dealer,
    };
    let mut match_state = MatchState::with_seed(seed, rules);
    let mut seats: Vec<Box<dyn Policy>> = (0..4)
        .map(|_| Box::new(HeuristicPolicy::new(*params)) as Box<dyn Policy>)
        .collect();
    let mut hands = Vec::new();
    let mut features = Vec::new();

    loop {
        if match_state.round_number() > MAX_ROUNDS {
            return Err(GameError::RoundLimit { rounds: MAX_ROUNDS });
        }

        let feature_sink = record_features.then_some(&mut features);
        play_round(&mut match_state, &mut seats, game_index, feature_sink)?;

        let round_number = match_state.round_number();
        let dealer = match_state.round().dealer();
        let up_card = match_state.round().up_card();
        let tricks = [
            match_state.round().tricks_won(Team::One),
            match_state.round().tricks_won(Team::Two),
        ];
        let outcome = match_state.finish_round_and_start_next();
        let scores = *match_state.scores().standings();

        let contract = outcome.map(|outcome| ContractRecord {
            caller: outcome.contract.caller,
            caller_role: SeatRole::of(outcome.contract.caller, dealer),
            trump: outcome.contract.trump,
            stage: outcome.contract.stage,
            alone: outcome.contract.alone,
            euchre: outcome.is_euchre(),
            march: outcome.is_march(),
        });

        event!(
            target: "euchre_bench::hand",
            Level::DEBUG,
            game_index = game_index as u64,
            round_number,
            dealer = %dealer,
            thrown_in = outcome.is_none(),
            team_one = scores[0],
            team_two = scores[1],
        );

        hands.push(HandRecord {
            game_index,
            game_seed: seed,
            round_number,
            dealer,
            up_card,
            thrown_in: outcome.is_none(),
            contract,
            tricks,
            points: outcome.map(|o| o.points).unwrap_or([0, 0]),
            scores,
        });

        if let Some(winner) = match_state.winner() {
            return Ok(GameRecord {
                game_index,
                seed,
                hands,
                features,
                winner,
                final_scores: scores,
            });
        }
    }
}

/// Drives the current round until it completes or is thrown in.
fn play_round(
    match_state: &mut MatchState,
    seats: &mut [Box<dyn Policy>],
    game_index: usize,
    mut features: Option<&mut Vec<FeatureRow>>,
) -> Result<(), GameError> {
    let round_number = match_state.round_number();

    loop {
        let phase = match_state.round().phase();
        if matches!(phase, RoundPhase::Complete | RoundPhase::ThrownIn) {
            return Ok(());
        }
        let seat = match_state
            .round()
            .to_act()
            .ok_or(GameError::Stalled { phase })?;
        let policy = &mut seats[seat.index()];

        match phase {
            RoundPhase::Bidding => {
                let round = match_state.round();
                let stage = round.bidding().stage();
                let up_suit = round.up_card().suit;
                let decision = policy
                    .decide_trump(&PolicyContext::new(seat, round))
                    .map_err(|source| GameError::Policy { seat, source })?;

                let round = match_state.round_mut();
                match decision {
                    TrumpDecision::Pass => {
                        round.pass(seat)?;
                    }
                    TrumpDecision::Call { suit, alone } if stage == BidStage::OrderUp => {
                        if suit != up_suit {
                            return Err(GameError::WrongOrderUpSuit {
                                called: suit,
                                expected: up_suit,
                            });
                        }
                        round.order_up(seat, alone)?;
                    }
                    TrumpDecision::Call { suit, alone } => {
                        round.call(seat, suit, alone)?;
                    }
                }
            }
            RoundPhase::Discarding => {
                let card = policy
                    .choose_discard(&PolicyContext::new(seat, match_state.round()))
                    .map_err(|source| GameError::Policy { seat, source })?;
                match_state.round_mut().discard(card)?;
            }
            RoundPhase::Playing => {
                let round = match_state.round();
                let card = policy
                    .choose_play(&PolicyContext::new(seat, round))
                    .map_err(|source| GameError::Policy { seat, source })?;
                if let Some(rows) = features.as_deref_mut()
                    && let Some(row) =
                        FeatureRow::capture(game_index, round_number, round, seat, card)
                {
                    rows.push(row);
                }
                match_state.round_mut().play_card(seat, card)?;
            }
            RoundPhase::Complete | RoundPhase::ThrownIn => return Ok(()),
        }
    }
}
