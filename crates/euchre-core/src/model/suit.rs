use crate::model::card::CardParseError;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Diamonds = 1,
    Clubs = 2,
    Spades = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Hearts),
            1 => Some(Suit::Diamonds),
            2 => Some(Suit::Clubs),
            3 => Some(Suit::Spades),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Same-colour suit; its jack becomes the left bower when `self` is trump.
    pub const fn partner(self) -> Suit {
        match self {
            Suit::Hearts => Suit::Diamonds,
            Suit::Diamonds => Suit::Hearts,
            Suit::Clubs => Suit::Spades,
            Suit::Spades => Suit::Clubs,
        }
    }

    pub const fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }

    /// The two suits of the opposite colour ("reverse next" in round two).
    pub const fn reverse(self) -> [Suit; 2] {
        if self.is_red() {
            [Suit::Clubs, Suit::Spades]
        } else {
            [Suit::Hearts, Suit::Diamonds]
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Suit {
    type Err = CardParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "hearts" => Ok(Suit::Hearts),
            "diamonds" => Ok(Suit::Diamonds),
            "clubs" => Ok(Suit::Clubs),
            "spades" => Ok(Suit::Spades),
            other => Err(CardParseError::InvalidSuit(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Suit;
    use crate::model::card::CardParseError;

    #[test]
    fn partner_is_same_colour_and_involutive() {
        for suit in Suit::ALL {
            assert_ne!(suit.partner(), suit);
            assert_eq!(suit.partner().is_red(), suit.is_red());
            assert_eq!(suit.partner().partner(), suit);
        }
    }

    #[test]
    fn reverse_suits_are_opposite_colour() {
        assert_eq!(Suit::Hearts.reverse(), [Suit::Clubs, Suit::Spades]);
        assert_eq!(Suit::Spades.reverse(), [Suit::Hearts, Suit::Diamonds]);
    }

    #[test]
    fn display_is_lowercase_name() {
        assert_eq!(Suit::Spades.to_string(), "spades");
        assert_eq!(Suit::Diamonds.to_string(), "diamonds");
    }

    #[test]
    fn parse_rejects_unknown_suit() {
        assert_eq!("clubs".parse::<Suit>(), Ok(Suit::Clubs));
        assert_eq!(
            "Clubs".parse::<Suit>(),
            Err(CardParseError::InvalidSuit("Clubs".to_string()))
        );
        assert!(matches!(
            "stars".parse::<Suit>(),
            Err(CardParseError::InvalidSuit(_))
        ));
    }

    #[test]
    fn from_index_maps_valid_values() {
        assert_eq!(Suit::from_index(2), Some(Suit::Clubs));
        assert_eq!(Suit::from_index(4), None);
    }
}
