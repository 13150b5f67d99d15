use euchre_core::model::card::Card;
use euchre_core::model::deck::Deck;
use euchre_core::model::player::Seat;
use euchre_core::model::ranking::rank_in_suit;
use euchre_core::model::suit::Suit;
use euchre_core::model::trick::Trick;
use std::collections::HashSet;

/// Cards a seat knows are out of reach of the other hands: everything
/// played this round, its own hand, and the turned-down up card. Rebuilt
/// from the round history for every decision.
#[derive(Debug, Clone, Default)]
pub struct SeenCards {
    seen: HashSet<Card>,
}

impl SeenCards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(
        hand: &[Card],
        history: &[Trick],
        current: &Trick,
        known: impl IntoIterator<Item = Card>,
    ) -> Self {
        let mut seen: HashSet<Card> = hand.iter().copied().collect();
        seen.extend(history.iter().flat_map(Trick::cards));
        seen.extend(current.cards());
        seen.extend(known);
        Self { seen }
    }

    pub fn mark(&mut self, card: Card) {
        self.seen.insert(card);
    }

    pub fn is_seen(&self, card: Card) -> bool {
        self.seen.contains(&card)
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// True when every higher card of `card`'s effective suit is accounted
    /// for, so nothing left in play can beat it within its suit.
    pub fn is_boss(&self, card: Card, trump: Suit) -> bool {
        let suit = card.effective_suit(trump);
        let value = rank_in_suit(card, trump);
        Deck::standard()
            .cards()
            .iter()
            .filter(|other| other.effective_suit(trump) == suit)
            .filter(|other| rank_in_suit(**other, trump) > value)
            .all(|other| self.is_seen(*other))
    }

    /// The boss among `hand`'s cards of effective suit `suit`, if any.
    pub fn boss_in(&self, hand: &[Card], suit: Suit, trump: Suit) -> Option<Card> {
        hand.iter()
            .copied()
            .filter(|card| card.effective_suit(trump) == suit)
            .find(|card| self.is_boss(*card, trump))
    }
}

/// Whether a seat on the other team has led trump in a finished trick.
pub fn trump_led_by_opponent(history: &[Trick], seat: Seat, trump: Suit) -> bool {
    history.iter().any(|trick| {
        trick.plays().first().is_some_and(|lead| {
            lead.seat.team() != seat.team() && lead.card.is_trump(trump)
        })
    })
}

/// Whether `seat` itself has already led trump this round.
pub fn has_led_trump(history: &[Trick], seat: Seat, trump: Suit) -> bool {
    history.iter().any(|trick| {
        trick
            .plays()
            .first()
            .is_some_and(|lead| lead.seat == seat && lead.card.is_trump(trump))
    })
}
