//! Per-decision feature rows for offline tuning.
//!
//! One row is emitted for every card a seat plays. Cards use the textual
//! `"<rank> of <suit>"` encoding so downstream tooling never needs this crate.

use euchre_core::model::card::Card;
use euchre_core::model::player::Seat;
use euchre_core::model::round::RoundState;
use euchre_core::model::suit::Suit;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub game_index: usize,
    pub round_number: u32,
    pub seat: Seat,
    /// The seat's cards before this play.
    pub hand: Vec<Card>,
    /// Cards any seat at the table could see: plays so far this round and a
    /// face-up card that no seat holds.
    pub known_cards: Vec<Card>,
    pub card_to_play: Card,
    pub trump_suit: Suit,
    pub is_dealer: bool,
    pub partner_is_dealer: bool,
    /// 1 for the seat left of the dealer through 4 for the dealer.
    pub seat_position: u8,
    /// 1-based index of the trick being played.
    pub trick_number: u8,
}

impl FeatureRow {
    /// Row describing `seat` playing `card` from the round as it stands.
    /// `None` before trump is named.
    pub fn capture(
        game_index: usize,
        round_number: u32,
        round: &RoundState,
        seat: Seat,
        card: Card,
    ) -> Option<Self> {
        let trump_suit = round.trump()?;
        let dealer = round.dealer();
        let known_cards = round
            .played_cards()
            .chain(round.out_of_play_up_card())
            .collect();

        Some(Self {
            game_index,
            round_number,
            seat,
            hand: round.hand(seat).cards().to_vec(),
            known_cards,
            card_to_play: card,
            trump_suit,
            is_dealer: seat == dealer,
            partner_is_dealer: seat.partner() == dealer,
            seat_position: seat_position(seat, dealer),
            trick_number: (round.tricks_completed() + 1) as u8,
        })
    }
}

fn seat_position(seat: Seat, dealer: Seat) -> u8 {
    match seat.offset_from(dealer) {
        0 => 4,
        offset => offset as u8,
    }
}
