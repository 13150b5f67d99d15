use crate::model::card::Card;
use crate::model::player::{Seat, Team};
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which bidding round produced the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidStage {
    /// Round one: the up card's suit is the only candidate.
    OrderUp,
    /// Round two: any suit except the turned-down one.
    CallSuit,
}

impl BidStage {
    pub const fn number(self) -> u8 {
        match self {
            BidStage::OrderUp => 1,
            BidStage::CallSuit => 2,
        }
    }
}

impl fmt::Display for BidStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BidStage::OrderUp => f.write_str("order up"),
            BidStage::CallSuit => f.write_str("call suit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub trump: Suit,
    pub caller: Seat,
    pub alone: bool,
    pub stage: BidStage,
}

impl Contract {
    pub const fn caller_team(&self) -> Team {
        self.caller.team()
    }

    /// The lone caller's partner, who takes no part in play.
    pub fn sitting_out(&self) -> Option<Seat> {
        self.alone.then(|| self.caller.partner())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BidError {
    #[error("trump is already {trump} for this round")]
    AmbiguousTrumpState { trump: Suit },
    #[error("round is not in the bidding phase")]
    NotInBiddingPhase,
    #[error("expected {expected} to bid but got {actual}")]
    OutOfTurn { expected: Seat, actual: Seat },
    #[error("{0} was turned down and cannot be called this round")]
    SuitTurnedDown(Suit),
    #[error("dealer must name trump once everyone else has passed")]
    DealerMustCall,
    #[error("cannot {0} during the {1} stage")]
    WrongStage(&'static str, BidStage),
    #[error("dealer is not waiting to discard")]
    NotDiscarding,
    #[error("{0} is not in the dealer's hand")]
    CardNotInHand(Card),
}

/// Result of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidProgress {
    Next { seat: Seat, stage: BidStage },
    /// Every seat passed both rounds; only possible without stick-the-dealer.
    AllPassed,
}

/// Turn-taking for the two bidding rounds. Seats bid starting left of the
/// dealer; the dealer speaks last in each round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bidding {
    dealer: Seat,
    up_card: Card,
    stage: BidStage,
    turn: Seat,
    stick_the_dealer: bool,
}

impl Bidding {
    pub fn new(dealer: Seat, up_card: Card, stick_the_dealer: bool) -> Self {
        Self {
            dealer,
            up_card,
            stage: BidStage::OrderUp,
            turn: dealer.next(),
            stick_the_dealer,
        }
    }

    pub fn dealer(&self) -> Seat {
        self.dealer
    }

    pub fn up_card(&self) -> Card {
        self.up_card
    }

    pub fn stage(&self) -> BidStage {
        self.stage
    }

    pub fn turn(&self) -> Seat {
        self.turn
    }

    pub fn stick_the_dealer(&self) -> bool {
        self.stick_the_dealer
    }

    /// The up card's suit once the table has passed on it.
    pub fn turned_down(&self) -> Option<Suit> {
        match self.stage {
            BidStage::OrderUp => None,
            BidStage::CallSuit => Some(self.up_card.suit),
        }
    }

    /// The dealer is out of options in round two.
    pub fn dealer_is_stuck(&self) -> bool {
        self.stick_the_dealer && self.stage == BidStage::CallSuit && self.turn == self.dealer
    }

    pub fn pass(&mut self, seat: Seat) -> Result<BidProgress, BidError> {
        self.check_turn(seat)?;
        if self.dealer_is_stuck() {
            return Err(BidError::DealerMustCall);
        }

        if seat == self.dealer {
            match self.stage {
                BidStage::OrderUp => self.stage = BidStage::CallSuit,
                BidStage::CallSuit => return Ok(BidProgress::AllPassed),
            }
        }
        self.turn = seat.next();
        Ok(BidProgress::Next {
            seat: self.turn,
            stage: self.stage,
        })
    }

    pub fn order_up(&self, seat: Seat, alone: bool) -> Result<Contract, BidError> {
        self.check_turn(seat)?;
        if self.stage != BidStage::OrderUp {
            return Err(BidError::WrongStage("order up", self.stage));
        }
        Ok(Contract {
            trump: self.up_card.suit,
            caller: seat,
            alone,
            stage: BidStage::OrderUp,
        })
    }

    pub fn call(&self, seat: Seat, suit: Suit, alone: bool) -> Result<Contract, BidError> {
        self.check_turn(seat)?;
        if self.stage != BidStage::CallSuit {
            return Err(BidError::WrongStage("call a suit", self.stage));
        }
        if suit == self.up_card.suit {
            return Err(BidError::SuitTurnedDown(suit));
        }
        Ok(Contract {
            trump: suit,
            caller: seat,
            alone,
            stage: BidStage::CallSuit,
        })
    }

    fn check_turn(&self, seat: Seat) -> Result<(), BidError> {
        if seat != self.turn {
            return Err(BidError::OutOfTurn {
                expected: self.turn,
                actual: seat,
            });
        }
        Ok(())
    }
}
