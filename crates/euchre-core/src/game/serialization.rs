use crate::model::card::Card;
use crate::model::deck::DECK_SIZE;
use crate::model::hand::Hand;
use crate::model::player::Seat;
use crate::model::round::{HAND_SIZE, KITTY_SIZE, RoundPhase, RoundRules, RoundState};
use serde::{Deserialize, Serialize};
use std::array;
use std::collections::HashSet;
use thiserror::Error;

/// A deal as handed over by the persistence layer: who dealt, the four
/// hands in seat order and the kitty with the up card first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DealSnapshot {
    pub dealer: Seat,
    pub hands: [Vec<Card>; 4],
    pub kitty: Vec<Card>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid snapshot json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{seat} holds {len} cards, expected {HAND_SIZE}")]
    WrongHandSize { seat: Seat, len: usize },
    #[error("kitty holds {0} cards, expected {KITTY_SIZE}")]
    WrongKittySize(usize),
    #[error("{0} appears more than once")]
    DuplicateCard(Card),
    #[error("only a freshly dealt round can be captured")]
    NotFreshDeal,
}

impl DealSnapshot {
    pub fn capture(round: &RoundState) -> Result<Self, SnapshotError> {
        if round.phase() != RoundPhase::Bidding {
            return Err(SnapshotError::NotFreshDeal);
        }
        Ok(Self {
            dealer: round.dealer(),
            hands: array::from_fn(|i| round.hands()[i].cards().to_vec()),
            kitty: round.kitty().to_vec(),
        })
    }

    /// Checks that the snapshot partitions one full deck.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        for seat in Seat::LOOP {
            let len = self.hands[seat.index()].len();
            if len != HAND_SIZE {
                return Err(SnapshotError::WrongHandSize { seat, len });
            }
        }
        if self.kitty.len() != KITTY_SIZE {
            return Err(SnapshotError::WrongKittySize(self.kitty.len()));
        }

        let mut seen = HashSet::with_capacity(DECK_SIZE);
        for card in self.hands.iter().flatten().chain(self.kitty.iter()) {
            if !seen.insert(*card) {
                return Err(SnapshotError::DuplicateCard(*card));
            }
        }
        Ok(())
    }

    pub fn restore(&self, rules: RoundRules) -> Result<RoundState, SnapshotError> {
        self.validate()?;
        let hands = array::from_fn(|i| Hand::with_cards(self.hands[i].clone()));
        let kitty = array::from_fn(|i| self.kitty[i]);
        Ok(RoundState::from_hands(self.dealer, hands, kitty, rules))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}
