use euchre_core::model::card::Card;
use euchre_core::model::rank::Rank;
use euchre_core::model::ranking::rank;
use euchre_core::model::suit::Suit;

/// Dealer's hand after taking the up card.
pub fn pickup(hand: &[Card], up_card: Card) -> Vec<Card> {
    let mut cards = Vec::with_capacity(hand.len() + 1);
    cards.extend_from_slice(hand);
    cards.push(up_card);
    cards
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discard {
    pub card: Card,
    pub kept: Vec<Card>,
}

/// Splits a picked-up hand into the discard and the five cards kept.
pub fn discard(hand: &[Card], trump: Suit) -> Option<Discard> {
    let card = worst_card(hand, trump)?;
    let mut kept = hand.to_vec();
    if let Some(index) = kept.iter().position(|held| *held == card) {
        kept.remove(index);
    }
    Some(Discard { card, kept })
}

/// The card a hand can best spare under `trump`.
///
/// A lone non-ace in an off suit goes first since shedding it leaves a void;
/// then the lowest off-suit card; an all-trump hand gives up its lowest trump.
pub fn worst_card(hand: &[Card], trump: Suit) -> Option<Card> {
    let off_suit: Vec<Card> = hand.iter().copied().filter(|card| !card.is_trump(trump)).collect();

    let singleton = off_suit
        .iter()
        .copied()
        .filter(|card| card.rank != Rank::Ace)
        .filter(|card| off_suit.iter().filter(|other| other.suit == card.suit).count() == 1);
    if let Some(card) = lowest(singleton, trump) {
        return Some(card);
    }

    lowest(off_suit.iter().copied(), trump).or_else(|| lowest(hand.iter().copied(), trump))
}

/// Lowest card under `trump`; suit order breaks ties between equal faces.
pub fn lowest(cards: impl Iterator<Item = Card>, trump: Suit) -> Option<Card> {
    cards.min_by_key(|card| (rank(*card, trump, None), card.suit))
}

pub fn highest(cards: impl Iterator<Item = Card>, trump: Suit, lead: Option<Suit>) -> Option<Card> {
    cards.max_by_key(|card| (rank(*card, trump, lead), std::cmp::Reverse(card.suit)))
}

#[cfg(test)]
mod tests {
    use super::{discard, pickup, worst_card};
    use euchre_core::model::card::Card;
    use euchre_core::model::suit::Suit;

    fn cards(texts: &[&str]) -> Vec<Card> {
        texts.iter().map(|t| t.parse().unwrap()).collect()
    }

    fn card(text: &str) -> Card {
        text.parse().unwrap()
    }

    #[test]
    fn singleton_is_discarded_to_create_void() {
        let hand = cards(&["9 of hearts", "10 of hearts", "K of clubs", "A of spades", "9 of spades", "J of hearts"]);
        assert_eq!(worst_card(&hand, Suit::Hearts), Some(card("K of clubs")));
    }

    #[test]
    fn singleton_ace_is_kept() {
        let hand = cards(&["9 of hearts", "A of clubs", "10 of spades", "9 of spades", "J of hearts", "Q of hearts"]);
        assert_eq!(worst_card(&hand, Suit::Hearts), Some(card("9 of spades")));
    }

    #[test]
    fn left_bower_is_not_an_off_suit_singleton() {
        let hand = cards(&["J of diamonds", "9 of hearts", "10 of clubs", "Q of clubs", "K of spades", "A of spades"]);
        assert_eq!(worst_card(&hand, Suit::Hearts), Some(card("10 of clubs")));
    }

    #[test]
    fn all_trump_hand_gives_up_lowest_trump() {
        let hand = cards(&["J of spades", "J of clubs", "A of spades", "9 of spades", "10 of spades", "Q of spades"]);
        assert_eq!(worst_card(&hand, Suit::Spades), Some(card("9 of spades")));
    }

    #[test]
    fn discard_keeps_five_and_the_up_card() {
        let hand = cards(&["9 of hearts", "10 of hearts", "K of clubs", "A of spades", "9 of spades"]);
        let up = card("A of hearts");
        let picked = pickup(&hand, up);
        assert_eq!(picked.len(), 6);
        let result = discard(&picked, Suit::Hearts).unwrap();
        assert_eq!(result.kept.len(), 5);
        assert!(!result.kept.contains(&result.card));
        assert!(result.kept.contains(&up));
    }
}
