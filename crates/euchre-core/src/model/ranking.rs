//! Context-dependent card order.
//!
//! There is no global order on cards: the same card can be the highest in
//! the deck or worthless depending on trump and the suit that was led. The
//! values produced here only compare meaningfully within one
//! `(trump, lead)` context.

use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;

const RIGHT_BOWER: u8 = 40;
const LEFT_BOWER: u8 = 39;
const TRUMP_BASE: u8 = 30;
const LEAD_BASE: u8 = 20;

/// Rank `card` under `trump`, optionally within a trick led in `lead`.
///
/// High to low: right bower, left bower, remaining trump (A K Q 10 9),
/// cards of the lead suit when it is not trump (A K Q J 10 9), then
/// everything else by face value. The last tier can never win a trick.
pub fn rank(card: Card, trump: Suit, lead: Option<Suit>) -> u8 {
    if card.is_right_bower(trump) {
        return RIGHT_BOWER;
    }
    if card.is_left_bower(trump) {
        return LEFT_BOWER;
    }
    if card.suit == trump {
        return TRUMP_BASE + face_value(card.rank);
    }
    match lead {
        Some(lead) if lead != trump && card.suit == lead => LEAD_BASE + face_value(card.rank),
        _ => face_value(card.rank),
    }
}

/// Ranking used when comparing cards of one effective suit, e.g. for boss
/// detection. The suit acts as the lead so off-trump suits keep their
/// natural order.
pub fn rank_in_suit(card: Card, trump: Suit) -> u8 {
    rank(card, trump, Some(card.effective_suit(trump)))
}

/// Lead suit of a trick whose first card is `card`.
pub fn lead_suit_of(card: Card, trump: Suit) -> Suit {
    card.effective_suit(trump)
}

fn face_value(rank: Rank) -> u8 {
    match rank {
        Rank::Nine => 1,
        Rank::Ten => 2,
        Rank::Jack => 3,
        Rank::Queen => 4,
        Rank::King => 5,
        Rank::Ace => 6,
    }
}
