use super::params::StrategyParams;
use euchre_core::model::card::Card;
use euchre_core::model::rank::Rank;
use euchre_core::model::suit::Suit;

/// Components of a hand score under one candidate trump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandStrength {
    pub trump: f64,
    pub aces: f64,
    pub voids: f64,
    pub score: f64,
}

/// Weighted hand strength in `[0, 1]`. Pure: `trump` may be hypothetical.
pub fn evaluate_hand(hand: &[Card], trump: Suit, params: &StrategyParams) -> f64 {
    hand_strength(hand, trump, params).score
}

pub fn hand_strength(hand: &[Card], trump: Suit, params: &StrategyParams) -> HandStrength {
    let trump_score = ratio(
        hand.iter().filter_map(|card| trump_value(*card, trump, params)).sum(),
        params.trump_norm,
    );
    let aces = ratio(
        hand.iter().filter_map(|card| ace_value(*card, trump, params)).sum(),
        params.ace_norm,
    );
    let voids = void_score(hand, trump, params);

    let score = params.trump_weight * trump_score + params.ace_weight * aces + params.void_weight * voids;
    HandStrength {
        trump: trump_score,
        aces,
        voids,
        score: score.clamp(0.0, 1.0),
    }
}

fn trump_value(card: Card, trump: Suit, params: &StrategyParams) -> Option<f64> {
    if card.is_right_bower(trump) {
        return Some(params.right_bower);
    }
    if card.is_left_bower(trump) {
        return Some(params.left_bower);
    }
    if card.suit != trump {
        return None;
    }
    match card.rank {
        Rank::Ace => Some(params.trump_ace),
        Rank::King => Some(params.trump_king),
        Rank::Queen => Some(params.trump_queen),
        Rank::Ten => Some(params.trump_ten),
        Rank::Nine => Some(params.trump_nine),
        Rank::Jack => None,
    }
}

fn ace_value(card: Card, trump: Suit, params: &StrategyParams) -> Option<f64> {
    if card.rank != Rank::Ace || card.suit == trump {
        return None;
    }
    if card.suit == trump.partner() {
        Some(params.partner_suit_ace)
    } else {
        Some(params.off_ace)
    }
}

/// Voids earn nothing without trump to ruff with.
fn void_score(hand: &[Card], trump: Suit, params: &StrategyParams) -> f64 {
    let holds_trump = hand.iter().any(|card| card.is_trump(trump));
    let distinct = if holds_trump {
        Suit::ALL
            .iter()
            .filter(|&&suit| hand.iter().any(|card| card.suit == suit))
            .count()
    } else {
        Suit::ALL.len()
    };
    ratio((Suit::ALL.len() - distinct) as f64, params.void_norm)
}

fn ratio(value: f64, norm: f64) -> f64 {
    if norm > 0.0 { value / norm } else { 0.0 }
}
