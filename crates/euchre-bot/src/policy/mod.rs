mod heuristic;
mod scripted;

pub use heuristic::HeuristicPolicy;
pub use scripted::ScriptedPolicy;

use crate::bot::TrumpDecision;
use euchre_core::model::bidding::BidError;
use euchre_core::model::card::Card;
use euchre_core::model::player::Seat;
use euchre_core::model::round::{PlayError, RoundPhase, RoundState};
use euchre_core::model::suit::Suit;
use thiserror::Error;

/// Context provided to policies for decision-making
pub struct PolicyContext<'a> {
    pub seat: Seat,
    pub round: &'a RoundState,
}

impl<'a> PolicyContext<'a> {
    pub fn new(seat: Seat, round: &'a RoundState) -> Self {
        Self { seat, round }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error(transparent)]
    Bid(#[from] BidError),
    #[error(transparent)]
    Play(#[from] PlayError),
    #[error("no scripted {decision} left for {seat}")]
    ScriptExhausted { seat: Seat, decision: &'static str },
}

/// Decision capability a seat holds for one round. Heuristic bots and
/// externally driven seats both plug in here.
pub trait Policy: Send {
    /// Pass or name trump when bidding reaches this seat.
    fn decide_trump(&mut self, ctx: &PolicyContext) -> Result<TrumpDecision, PolicyError>;

    /// Card the dealer drops after picking up the up card.
    fn choose_discard(&mut self, ctx: &PolicyContext) -> Result<Card, PolicyError>;

    /// Card to play to the current trick.
    fn choose_play(&mut self, ctx: &PolicyContext) -> Result<Card, PolicyError>;
}

/// Dealer's six-card hand and trump, or `NotDiscarding`.
fn discard_state<'a>(ctx: &PolicyContext<'a>) -> Result<(&'a [Card], Suit), BidError> {
    match (ctx.round.phase(), ctx.round.trump()) {
        (RoundPhase::Discarding, Some(trump)) if ctx.seat == ctx.round.dealer() => {
            Ok((ctx.round.hand(ctx.seat).cards(), trump))
        }
        _ => Err(BidError::NotDiscarding),
    }
}
