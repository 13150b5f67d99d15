use super::discard::{discard, pickup};
use super::evaluate::evaluate_hand;
use super::params::{SeatRole, StrategyParams};
use euchre_core::model::bidding::{BidError, BidStage};
use euchre_core::model::card::Card;
use euchre_core::model::player::Seat;
use euchre_core::model::round::{RoundPhase, RoundState};
use euchre_core::model::suit::Suit;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum TrumpDecision {
    Pass,
    Call { suit: Suit, alone: bool },
}

/// Everything the trump engine looks at for one seat's turn to bid.
#[derive(Debug, Clone, Copy)]
pub struct TrumpContext<'a> {
    pub seat: Seat,
    pub dealer: Seat,
    pub hand: &'a [Card],
    pub up_card: Card,
    pub stage: BidStage,
    pub stick_the_dealer: bool,
}

impl<'a> TrumpContext<'a> {
    /// Context for `seat` in a round that is still bidding. Asking again
    /// once trump is set is rejected rather than re-decided.
    pub fn from_round(round: &'a RoundState, seat: Seat) -> Result<Self, BidError> {
        if let Some(contract) = round.contract() {
            return Err(BidError::AmbiguousTrumpState {
                trump: contract.trump,
            });
        }
        if round.phase() != RoundPhase::Bidding {
            return Err(BidError::NotInBiddingPhase);
        }
        let bidding = round.bidding();
        if bidding.turn() != seat {
            return Err(BidError::OutOfTurn {
                expected: bidding.turn(),
                actual: seat,
            });
        }
        Ok(Self {
            seat,
            dealer: round.dealer(),
            hand: round.hand(seat).cards(),
            up_card: bidding.up_card(),
            stage: bidding.stage(),
            stick_the_dealer: bidding.stick_the_dealer(),
        })
    }

    pub fn role(&self) -> SeatRole {
        SeatRole::of(self.seat, self.dealer)
    }
}

/// A decision with the score that drove it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrumpCall {
    pub decision: TrumpDecision,
    pub role: SeatRole,
    /// Suit the score refers to.
    pub candidate: Suit,
    pub score: f64,
    pub threshold: Option<f64>,
}

pub fn decide_trump(ctx: &TrumpContext<'_>, params: &StrategyParams) -> TrumpCall {
    match ctx.stage {
        BidStage::OrderUp => order_up(ctx, params),
        BidStage::CallSuit => call_suit(ctx, params),
    }
}

fn order_up(ctx: &TrumpContext<'_>, params: &StrategyParams) -> TrumpCall {
    let role = ctx.role();
    let trump = ctx.up_card.suit;
    let score = if role == SeatRole::Dealer {
        let picked = pickup(ctx.hand, ctx.up_card);
        match discard(&picked, trump) {
            Some(result) => evaluate_hand(&result.kept, trump, params),
            None => evaluate_hand(ctx.hand, trump, params),
        }
    } else {
        evaluate_hand(ctx.hand, trump, params)
    };

    let threshold = params.order_up.for_role(role);
    TrumpCall {
        decision: call_if(score >= threshold, trump, score, params),
        role,
        candidate: trump,
        score,
        threshold: Some(threshold),
    }
}

fn call_suit(ctx: &TrumpContext<'_>, params: &StrategyParams) -> TrumpCall {
    let role = ctx.role();
    let turned_down = ctx.up_card.suit;
    let next = turned_down.partner();
    let next_score = evaluate_hand(ctx.hand, next, params);
    let [first, second] = turned_down.reverse();
    let first_score = evaluate_hand(ctx.hand, first, params);
    let second_score = evaluate_hand(ctx.hand, second, params);
    let (reverse, reverse_score) = if second_score > first_score {
        (second, second_score)
    } else {
        (first, first_score)
    };

    if role == SeatRole::Dealer && ctx.stick_the_dealer {
        let (suit, score) = if reverse_score > next_score {
            (reverse, reverse_score)
        } else {
            (next, next_score)
        };
        return TrumpCall {
            decision: call_if(true, suit, score, params),
            role,
            candidate: suit,
            score,
            threshold: None,
        };
    }

    let next_threshold = params.call_next.for_role(role);
    if next_score >= next_threshold {
        return TrumpCall {
            decision: call_if(true, next, next_score, params),
            role,
            candidate: next,
            score: next_score,
            threshold: Some(next_threshold),
        };
    }

    let reverse_threshold = params.call_reverse.for_role(role);
    TrumpCall {
        decision: call_if(reverse_score >= reverse_threshold, reverse, reverse_score, params),
        role,
        candidate: reverse,
        score: reverse_score,
        threshold: Some(reverse_threshold),
    }
}

fn call_if(clears: bool, suit: Suit, score: f64, params: &StrategyParams) -> TrumpDecision {
    if clears {
        TrumpDecision::Call {
            suit,
            alone: score >= params.alone_threshold,
        }
    } else {
        TrumpDecision::Pass
    }
}
