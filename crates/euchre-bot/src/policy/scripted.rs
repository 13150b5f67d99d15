use super::{Policy, PolicyContext, PolicyError, discard_state};
use crate::bot::{PlayView, TrumpContext, TrumpDecision};
use euchre_core::model::bidding::{BidError, BidStage};
use euchre_core::model::card::Card;
use euchre_core::model::round::validate_play;
use std::collections::VecDeque;

/// Replays externally forced decisions in order. Every decision is checked
/// against the round's rules before it is handed back, so a bad script
/// fails here instead of inside the round.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPolicy {
    bids: VecDeque<TrumpDecision>,
    discards: VecDeque<Card>,
    plays: VecDeque<Card>,
}

impl ScriptedPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bids(mut self, bids: impl IntoIterator<Item = TrumpDecision>) -> Self {
        self.bids.extend(bids);
        self
    }

    pub fn with_discards(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        self.discards.extend(cards);
        self
    }

    pub fn with_plays(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        self.plays.extend(cards);
        self
    }

    pub fn push_play(&mut self, card: Card) {
        self.plays.push_back(card);
    }

    pub fn remaining_plays(&self) -> usize {
        self.plays.len()
    }
}

impl Policy for ScriptedPolicy {
    fn decide_trump(&mut self, ctx: &PolicyContext) -> Result<TrumpDecision, PolicyError> {
        let trump_ctx = TrumpContext::from_round(ctx.round, ctx.seat)?;
        let decision = self.bids.pop_front().ok_or(PolicyError::ScriptExhausted {
            seat: ctx.seat,
            decision: "bid",
        })?;

        match decision {
            TrumpDecision::Pass if ctx.round.bidding().dealer_is_stuck() => {
                Err(BidError::DealerMustCall.into())
            }
            TrumpDecision::Call { suit, .. }
                if trump_ctx.stage == BidStage::CallSuit && suit == trump_ctx.up_card.suit =>
            {
                Err(BidError::SuitTurnedDown(suit).into())
            }
            TrumpDecision::Call { suit, .. }
                if trump_ctx.stage == BidStage::OrderUp && suit != trump_ctx.up_card.suit =>
            {
                Err(BidError::WrongStage("call a suit", BidStage::OrderUp).into())
            }
            _ => Ok(decision),
        }
    }

    fn choose_discard(&mut self, ctx: &PolicyContext) -> Result<Card, PolicyError> {
        let (hand, _) = discard_state(ctx)?;
        let card = self.discards.pop_front().ok_or(PolicyError::ScriptExhausted {
            seat: ctx.seat,
            decision: "discard",
        })?;
        if !hand.contains(&card) {
            return Err(BidError::CardNotInHand(card).into());
        }
        Ok(card)
    }

    fn choose_play(&mut self, ctx: &PolicyContext) -> Result<Card, PolicyError> {
        let view = PlayView::from_round(ctx.round, ctx.seat)?;
        let card = self.plays.pop_front().ok_or(PolicyError::ScriptExhausted {
            seat: ctx.seat,
            decision: "play",
        })?;
        validate_play(view.hand, card, view.lead_suit(), view.trump)?;
        Ok(card)
    }
}
