use crate::model::card::Card;
use crate::model::player::Seat;
use crate::model::ranking::{lead_suit_of, rank};
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trick {
    leader: Seat,
    sitting_out: Option<Seat>,
    plays: Vec<Play>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub seat: Seat,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrickError {
    #[error("trick already complete")]
    TrickComplete,
    #[error("expected {expected} to play next but got {actual}")]
    OutOfTurn { expected: Seat, actual: Seat },
    #[error("{0} has already played this trick")]
    AlreadyPlayed(Seat),
    #[error("{0} is sitting out this round")]
    SittingOut(Seat),
}

impl Trick {
    pub fn new(leader: Seat) -> Self {
        Self::with_sitting_out(leader, None)
    }

    /// A trick in a round where `sitting_out` (the lone caller's partner)
    /// does not play. A sitting-out leader passes the lead to the left.
    pub fn with_sitting_out(leader: Seat, sitting_out: Option<Seat>) -> Self {
        let leader = if Some(leader) == sitting_out {
            leader.next()
        } else {
            leader
        };
        Self {
            leader,
            sitting_out,
            plays: Vec::with_capacity(4),
        }
    }

    pub fn leader(&self) -> Seat {
        self.leader
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.plays.iter().map(|play| play.card)
    }

    pub fn sitting_out(&self) -> Option<Seat> {
        self.sitting_out
    }

    /// Number of plays that complete this trick.
    pub fn size(&self) -> usize {
        if self.sitting_out.is_some() { 3 } else { 4 }
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == self.size()
    }

    /// Effective suit of the first card; the left bower leads trump.
    pub fn lead_suit(&self, trump: Suit) -> Option<Suit> {
        self.plays.first().map(|play| lead_suit_of(play.card, trump))
    }

    pub fn expected_seat(&self) -> Option<Seat> {
        if self.is_complete() {
            return None;
        }
        let mut seat = self
            .plays
            .last()
            .map(|play| play.seat.next())
            .unwrap_or(self.leader);
        if Some(seat) == self.sitting_out {
            seat = seat.next();
        }
        Some(seat)
    }

    pub fn play(&mut self, seat: Seat, card: Card) -> Result<(), TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }

        if Some(seat) == self.sitting_out {
            return Err(TrickError::SittingOut(seat));
        }

        if self.plays.iter().any(|play| play.seat == seat) {
            return Err(TrickError::AlreadyPlayed(seat));
        }

        if let Some(expected) = self.expected_seat()
            && expected != seat
        {
            return Err(TrickError::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        self.plays.push(Play { seat, card });
        Ok(())
    }

    /// Play currently taking the trick, complete or not.
    pub fn winning_play(&self, trump: Suit) -> Option<Play> {
        winning_play(trump, &self.plays)
    }

    pub fn winner(&self, trump: Suit) -> Option<Seat> {
        if !self.is_complete() {
            return None;
        }
        trick_winner(trump, &self.plays)
    }
}

/// Seat whose card ranks highest, with the lead suit taken from the first
/// play only.
pub fn trick_winner(trump: Suit, plays: &[Play]) -> Option<Seat> {
    winning_play(trump, plays).map(|play| play.seat)
}

fn winning_play(trump: Suit, plays: &[Play]) -> Option<Play> {
    let lead = lead_suit_of(plays.first()?.card, trump);
    plays
        .iter()
        .copied()
        .max_by_key(|play| rank(play.card, trump, Some(lead)))
}

#[cfg(test)]
mod tests {
    use super::{Play, Trick, TrickError, trick_winner};
    use crate::model::card::Card;
    use crate::model::player::Seat;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn plays_follow_turn_order() {
        let mut trick = Trick::new(Seat::North);
        assert!(trick.play(Seat::North, Card::new(Rank::Nine, Suit::Clubs)).is_ok());
        assert!(matches!(
            trick.play(Seat::South, Card::new(Rank::Ten, Suit::Clubs)),
            Err(TrickError::OutOfTurn { .. })
        ));
    }

    #[test]
    fn off_suit_ace_loses_to_led_suit() {
        let mut trick = Trick::new(Seat::North);
        trick.play(Seat::North, Card::new(Rank::Ten, Suit::Clubs)).unwrap();
        trick.play(Seat::East, Card::new(Rank::Queen, Suit::Clubs)).unwrap();
        trick.play(Seat::South, Card::new(Rank::Nine, Suit::Clubs)).unwrap();
        trick.play(Seat::West, Card::new(Rank::Ace, Suit::Diamonds)).unwrap();

        assert_eq!(trick.winner(Suit::Hearts), Some(Seat::East));
    }

    #[test]
    fn right_bower_beats_left_bower_and_led_ace() {
        let plays = [
            Play { seat: Seat::North, card: Card::new(Rank::Nine, Suit::Spades) },
            Play { seat: Seat::East, card: Card::new(Rank::Ace, Suit::Spades) },
            Play { seat: Seat::South, card: Card::new(Rank::Jack, Suit::Spades) },
            Play { seat: Seat::West, card: Card::new(Rank::Jack, Suit::Clubs) },
        ];
        assert_eq!(trick_winner(Suit::Spades, &plays), Some(Seat::South));
    }

    #[test]
    fn left_bower_lead_makes_trump_the_lead_suit() {
        let mut trick = Trick::new(Seat::East);
        trick.play(Seat::East, Card::new(Rank::Jack, Suit::Diamonds)).unwrap();
        assert_eq!(trick.lead_suit(Suit::Hearts), Some(Suit::Hearts));
        assert_eq!(trick.lead_suit(Suit::Spades), Some(Suit::Diamonds));
    }

    #[test]
    fn sitting_out_seat_is_skipped() {
        let mut trick = Trick::with_sitting_out(Seat::West, Some(Seat::North));
        trick.play(Seat::West, Card::new(Rank::Nine, Suit::Hearts)).unwrap();
        assert_eq!(trick.expected_seat(), Some(Seat::East));
        assert_eq!(
            trick.play(Seat::North, Card::new(Rank::Ten, Suit::Hearts)),
            Err(TrickError::SittingOut(Seat::North))
        );
        trick.play(Seat::East, Card::new(Rank::Ten, Suit::Hearts)).unwrap();
        trick.play(Seat::South, Card::new(Rank::King, Suit::Hearts)).unwrap();
        assert!(trick.is_complete());
        assert_eq!(trick.winner(Suit::Clubs), Some(Seat::South));
    }

    #[test]
    fn sitting_out_leader_passes_lead_left() {
        let trick = Trick::with_sitting_out(Seat::South, Some(Seat::South));
        assert_eq!(trick.leader(), Seat::West);
        assert_eq!(trick.size(), 3);
    }

    #[test]
    fn winner_ignores_play_order_beyond_the_lead() {
        let lead = Play { seat: Seat::North, card: Card::new(Rank::King, Suit::Hearts) };
        let others = [
            Play { seat: Seat::East, card: Card::new(Rank::Nine, Suit::Clubs) },
            Play { seat: Seat::South, card: Card::new(Rank::Ace, Suit::Hearts) },
            Play { seat: Seat::West, card: Card::new(Rank::Ace, Suit::Spades) },
        ];
        let forward = [lead, others[0], others[1], others[2]];
        let shuffled = [lead, others[2], others[0], others[1]];
        assert_eq!(trick_winner(Suit::Clubs, &forward), Some(Seat::East));
        assert_eq!(trick_winner(Suit::Clubs, &shuffled), Some(Seat::East));
        assert_eq!(trick_winner(Suit::Diamonds, &forward), Some(Seat::South));
    }
}
