use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

/// Rejected card text. Raised at the deserialization boundary so malformed
/// data never reaches ranking or evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardParseError {
    #[error("invalid suit '{0}'")]
    InvalidSuit(String),
    #[error("invalid rank '{0}'")]
    InvalidRank(String),
    #[error("malformed card '{0}', expected '<rank> of <suit>'")]
    Malformed(String),
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn is_right_bower(self, trump: Suit) -> bool {
        self.rank == Rank::Jack && self.suit == trump
    }

    pub fn is_left_bower(self, trump: Suit) -> bool {
        self.rank == Rank::Jack && self.suit == trump.partner()
    }

    pub fn is_trump(self, trump: Suit) -> bool {
        self.suit == trump || self.is_left_bower(trump)
    }

    /// Suit the card belongs to for following and winning: the left bower
    /// counts as trump, every other card keeps its printed suit.
    pub fn effective_suit(self, trump: Suit) -> Suit {
        if self.is_left_bower(trump) {
            trump
        } else {
            self.suit
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (rank, suit) = value
            .split_once(" of ")
            .ok_or_else(|| CardParseError::Malformed(value.to_string()))?;
        Ok(Card::new(rank.parse()?, suit.parse()?))
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, CardParseError, Rank, Suit};

    #[test]
    fn bowers_follow_trump_colour() {
        let jack_spades = Card::new(Rank::Jack, Suit::Spades);
        assert!(jack_spades.is_right_bower(Suit::Spades));
        assert!(jack_spades.is_left_bower(Suit::Clubs));
        assert!(!jack_spades.is_left_bower(Suit::Hearts));
        assert!(jack_spades.is_trump(Suit::Clubs));
        assert_eq!(jack_spades.effective_suit(Suit::Clubs), Suit::Clubs);
        assert_eq!(jack_spades.effective_suit(Suit::Hearts), Suit::Spades);
    }

    #[test]
    fn non_jacks_keep_printed_suit() {
        let queen = Card::new(Rank::Queen, Suit::Diamonds);
        assert!(!queen.is_trump(Suit::Hearts));
        assert_eq!(queen.effective_suit(Suit::Hearts), Suit::Diamonds);
    }

    #[test]
    fn text_encoding_matches_wire_format() {
        let card = Card::new(Rank::Jack, Suit::Spades);
        assert_eq!(card.to_string(), "J of spades");
        assert_eq!("10 of hearts".parse::<Card>(), Ok(Card::new(Rank::Ten, Suit::Hearts)));
    }

    #[test]
    fn parse_reports_which_part_is_bad() {
        assert!(matches!(
            "J of swords".parse::<Card>(),
            Err(CardParseError::InvalidSuit(_))
        ));
        assert!(matches!(
            "7 of clubs".parse::<Card>(),
            Err(CardParseError::InvalidRank(_))
        ));
        assert!(matches!(
            "jack-spades".parse::<Card>(),
            Err(CardParseError::Malformed(_))
        ));
    }

    #[test]
    fn serde_uses_text_encoding() {
        let card = Card::new(Rank::Ace, Suit::Clubs);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "\"A of clubs\"");
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);
        assert!(serde_json::from_str::<Card>("\"A of cups\"").is_err());
    }
}
