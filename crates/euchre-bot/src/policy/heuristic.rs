use super::{Policy, PolicyContext, PolicyError, discard_state};
use crate::bot::{
    PlayChoice, PlayPlanner, PlayView, StrategyParams, TrumpCall, TrumpContext, TrumpDecision,
    decide_trump, worst_card,
};
use euchre_core::model::bidding::BidError;
use euchre_core::model::card::Card;
use tracing::{Level, event};

/// Rule-based seat driven by [`StrategyParams`].
#[derive(Debug, Clone, Default)]
pub struct HeuristicPolicy {
    params: StrategyParams,
}

impl HeuristicPolicy {
    pub fn new(params: StrategyParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    /// The trump decision together with the score behind it.
    pub fn assess_trump(&self, ctx: &PolicyContext) -> Result<TrumpCall, BidError> {
        let trump_ctx = TrumpContext::from_round(ctx.round, ctx.seat)?;
        Ok(decide_trump(&trump_ctx, &self.params))
    }

    pub fn plan_play(&self, ctx: &PolicyContext) -> Result<PlayChoice, PolicyError> {
        let view = PlayView::from_round(ctx.round, ctx.seat)?;
        Ok(PlayPlanner::choose(&view)?)
    }
}

impl Policy for HeuristicPolicy {
    fn decide_trump(&mut self, ctx: &PolicyContext) -> Result<TrumpDecision, PolicyError> {
        let call = self.assess_trump(ctx)?;
        log_trump_decision(ctx, &call);
        Ok(call.decision)
    }

    fn choose_discard(&mut self, ctx: &PolicyContext) -> Result<Card, PolicyError> {
        let (hand, trump) = discard_state(ctx)?;
        let card = worst_card(hand, trump).ok_or(BidError::NotDiscarding)?;
        event!(
            target: "euchre_bot::trump",
            Level::DEBUG,
            seat = %ctx.seat,
            trump = %trump,
            discard = %card,
            "dealer discard"
        );
        Ok(card)
    }

    fn choose_play(&mut self, ctx: &PolicyContext) -> Result<Card, PolicyError> {
        let choice = self.plan_play(ctx)?;
        log_play_decision(ctx, &choice);
        Ok(choice.card)
    }
}

fn log_trump_decision(ctx: &PolicyContext, call: &TrumpCall) {
    if !tracing::enabled!(target: "euchre_bot::trump", Level::DEBUG) {
        return;
    }

    let (called, alone) = match call.decision {
        TrumpDecision::Pass => (None, false),
        TrumpDecision::Call { suit, alone } => (Some(suit.as_str()), alone),
    };
    event!(
        target: "euchre_bot::trump",
        Level::DEBUG,
        seat = %ctx.seat,
        role = call.role.as_str(),
        stage = %ctx.round.bidding().stage(),
        candidate = %call.candidate,
        score = call.score,
        threshold = ?call.threshold,
        called = ?called,
        alone,
    );
}

fn log_play_decision(ctx: &PolicyContext, choice: &PlayChoice) {
    if !tracing::enabled!(target: "euchre_bot::play", Level::DEBUG) {
        return;
    }

    let trick = ctx.round.current_trick();
    event!(
        target: "euchre_bot::play",
        Level::DEBUG,
        seat = %ctx.seat,
        trick_number = ctx.round.tricks_completed() + 1,
        trick_cards = trick.plays().len(),
        hand_size = ctx.round.hand(ctx.seat).len(),
        chosen = %choice.card,
        reason = choice.reason,
    );
}
