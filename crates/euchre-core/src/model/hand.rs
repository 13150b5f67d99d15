use crate::model::card::Card;
use crate::model::suit::Suit;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.sort();
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Cards whose effective suit under `trump` is `suit`.
    pub fn cards_of(&self, suit: Suit, trump: Suit) -> Vec<Card> {
        self.cards
            .iter()
            .copied()
            .filter(|card| card.effective_suit(trump) == suit)
            .collect()
    }

    pub fn has_suit(&self, suit: Suit, trump: Suit) -> bool {
        self.cards
            .iter()
            .any(|card| card.effective_suit(trump) == suit)
    }

    pub fn trump_count(&self, trump: Suit) -> usize {
        self.cards.iter().filter(|card| card.is_trump(trump)).count()
    }

    /// Printed suits present, ignoring bower reclassification.
    pub fn distinct_suits(&self) -> usize {
        Suit::ALL
            .iter()
            .filter(|&&suit| self.cards.iter().any(|card| card.suit == suit))
            .count()
    }

    fn sort(&mut self) {
        self.cards
            .sort_by(|a, b| a.suit.cmp(&b.suit).then(a.rank.cmp(&b.rank)));
    }
}

#[cfg(test)]
mod tests {
    use super::Hand;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn add_and_remove_cards() {
        let mut hand = Hand::new();
        let card = Card::new(Rank::Nine, Suit::Clubs);
        hand.add(card);
        assert!(hand.contains(card));
        assert!(hand.remove(card));
        assert!(!hand.contains(card));
        assert!(!hand.remove(card));
    }

    #[test]
    fn cards_are_sorted_by_suit_then_rank() {
        let mut hand = Hand::new();
        hand.add(Card::new(Rank::King, Suit::Spades));
        hand.add(Card::new(Rank::Nine, Suit::Hearts));
        hand.add(Card::new(Rank::Ace, Suit::Hearts));
        let ordered: Vec<_> = hand.iter().copied().collect();
        assert_eq!(ordered[0], Card::new(Rank::Nine, Suit::Hearts));
        assert_eq!(ordered[1], Card::new(Rank::Ace, Suit::Hearts));
        assert_eq!(ordered[2], Card::new(Rank::King, Suit::Spades));
    }

    #[test]
    fn left_bower_counts_toward_trump_not_printed_suit() {
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Jack, Suit::Diamonds),
            Card::new(Rank::Ace, Suit::Diamonds),
            Card::new(Rank::Nine, Suit::Hearts),
        ]);
        assert_eq!(hand.trump_count(Suit::Hearts), 2);
        assert_eq!(hand.cards_of(Suit::Diamonds, Suit::Hearts).len(), 1);
        assert!(hand.has_suit(Suit::Hearts, Suit::Hearts));
        assert!(!hand.has_suit(Suit::Clubs, Suit::Hearts));
        assert_eq!(hand.distinct_suits(), 2);
    }
}
