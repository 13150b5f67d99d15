use crate::model::bidding::{BidError, BidProgress, BidStage, Bidding, Contract};
use crate::model::card::Card;
use crate::model::deck::{DECK_SIZE, Deck};
use crate::model::hand::Hand;
use crate::model::player::{Seat, Team};
use crate::model::score::{TRICKS_PER_ROUND, points};
use crate::model::suit::Suit;
use crate::model::trick::{Trick, TrickError};
use serde::{Deserialize, Serialize};
use std::array;
use thiserror::Error;

pub const HAND_SIZE: usize = 5;
pub const KITTY_SIZE: usize = DECK_SIZE - 4 * HAND_SIZE;

/// Table rules that vary between house games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRules {
    /// The dealer may not pass in round two.
    pub stick_the_dealer: bool,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self {
            stick_the_dealer: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoundState {
    dealer: Seat,
    hands: [Hand; 4],
    kitty: [Card; KITTY_SIZE],
    bidding: Bidding,
    contract: Option<Contract>,
    phase: RoundPhase,
    current_trick: Trick,
    trick_history: Vec<Trick>,
    tricks_won: [u8; 2],
    discarded: Option<Card>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Bidding,
    /// Dealer holds six cards after being ordered up.
    Discarding,
    Playing,
    Complete,
    /// Everyone passed twice without stick-the-dealer.
    ThrownIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub contract: Contract,
    pub tricks: [u8; 2],
    pub points: [u8; 2],
}

impl RoundOutcome {
    pub fn caller_tricks(&self) -> u8 {
        self.tricks[self.contract.caller_team().index()]
    }

    pub fn is_euchre(&self) -> bool {
        self.caller_tricks() < 3
    }

    pub fn is_march(&self) -> bool {
        self.caller_tricks() == TRICKS_PER_ROUND
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played,
    TrickCompleted { winner: Seat },
    RoundCompleted { winner: Seat, outcome: RoundOutcome },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("round is not in the play phase")]
    NotInPlayPhase,
    #[error("{0} is not in hand")]
    CardNotInHand(Card),
    #[error("expected {expected} to play but got {actual}")]
    OutOfTurn { expected: Seat, actual: Seat },
    #[error("{card} does not follow {lead} while holding {lead}")]
    IllegalPlay { card: Card, lead: Suit },
    #[error("{0} has no cards left to play")]
    EmptyHand(Seat),
    #[error(transparent)]
    Trick(#[from] TrickError),
}

/// Cards in `hand` that may be played to a trick led in `lead`. Holding the
/// effective lead suit forces a follow; otherwise anything goes.
pub fn legal_plays(hand: &[Card], lead: Option<Suit>, trump: Suit) -> Vec<Card> {
    match lead {
        Some(lead) if hand.iter().any(|card| card.effective_suit(trump) == lead) => hand
            .iter()
            .copied()
            .filter(|card| card.effective_suit(trump) == lead)
            .collect(),
        _ => hand.to_vec(),
    }
}

/// Checks a proposed card against the follow rule.
pub fn validate_play(
    hand: &[Card],
    card: Card,
    lead: Option<Suit>,
    trump: Suit,
) -> Result<(), PlayError> {
    if !hand.contains(&card) {
        return Err(PlayError::CardNotInHand(card));
    }
    if let Some(lead) = lead
        && card.effective_suit(trump) != lead
        && hand.iter().any(|held| held.effective_suit(trump) == lead)
    {
        return Err(PlayError::IllegalPlay { card, lead });
    }
    Ok(())
}

impl RoundState {
    /// Deals five cards to each seat starting left of the dealer; the last
    /// four form the kitty with the up card on top.
    pub fn deal(deck: &Deck, dealer: Seat, rules: RoundRules) -> Self {
        let mut hands: [Hand; 4] = array::from_fn(|_| Hand::new());
        let cards = deck.cards();
        let (dealt, rest) = cards.split_at(4 * HAND_SIZE);

        let mut seat = dealer.next();
        for card in dealt {
            hands[seat.index()].add(*card);
            seat = seat.next();
        }

        let kitty = array::from_fn(|i| rest[i]);
        Self::from_hands(dealer, hands, kitty, rules)
    }

    /// Builds a round in the bidding phase from an existing deal.
    pub fn from_hands(
        dealer: Seat,
        hands: [Hand; 4],
        kitty: [Card; KITTY_SIZE],
        rules: RoundRules,
    ) -> Self {
        Self {
            dealer,
            hands,
            kitty,
            bidding: Bidding::new(dealer, kitty[0], rules.stick_the_dealer),
            contract: None,
            phase: RoundPhase::Bidding,
            current_trick: Trick::new(dealer.next()),
            trick_history: Vec::with_capacity(TRICKS_PER_ROUND as usize),
            tricks_won: [0; 2],
            discarded: None,
        }
    }

    pub fn dealer(&self) -> Seat {
        self.dealer
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn hands(&self) -> &[Hand; 4] {
        &self.hands
    }

    pub fn kitty(&self) -> &[Card; KITTY_SIZE] {
        &self.kitty
    }

    pub fn up_card(&self) -> Card {
        self.kitty[0]
    }

    pub fn bidding(&self) -> &Bidding {
        &self.bidding
    }

    pub fn contract(&self) -> Option<&Contract> {
        self.contract.as_ref()
    }

    pub fn trump(&self) -> Option<Suit> {
        self.contract.map(|contract| contract.trump)
    }

    /// The up card when it was left face down, which everyone has seen.
    pub fn turned_down_card(&self) -> Option<Card> {
        self.bidding.turned_down().map(|_| self.up_card())
    }

    /// The up card when it is seen by every seat but held by none: turned
    /// down, or ordered up while the dealer sits out.
    pub fn out_of_play_up_card(&self) -> Option<Card> {
        let dealer_sits_out = self.contract.is_some_and(|contract| {
            contract.stage == BidStage::OrderUp && contract.sitting_out() == Some(self.dealer)
        });
        if dealer_sits_out {
            return Some(self.up_card());
        }
        self.turned_down_card()
    }

    pub fn discarded(&self) -> Option<Card> {
        self.discarded
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    /// Completed tricks in play order. Grows only as tricks finish.
    pub fn trick_history(&self) -> &[Trick] {
        &self.trick_history
    }

    pub fn tricks_completed(&self) -> usize {
        self.trick_history.len()
    }

    pub fn tricks_won(&self, team: Team) -> u8 {
        self.tricks_won[team.index()]
    }

    /// Every card played so far this round, finished tricks first.
    pub fn played_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.trick_history
            .iter()
            .flat_map(Trick::cards)
            .chain(self.current_trick.cards())
    }

    /// Seat due to act in the current phase.
    pub fn to_act(&self) -> Option<Seat> {
        match self.phase {
            RoundPhase::Bidding => Some(self.bidding.turn()),
            RoundPhase::Discarding => Some(self.dealer),
            RoundPhase::Playing => self.current_trick.expected_seat(),
            RoundPhase::Complete | RoundPhase::ThrownIn => None,
        }
    }

    pub fn pass(&mut self, seat: Seat) -> Result<BidProgress, BidError> {
        self.ensure_bidding()?;
        let progress = self.bidding.pass(seat)?;
        if progress == BidProgress::AllPassed {
            self.phase = RoundPhase::ThrownIn;
        }
        Ok(progress)
    }

    /// Round one call. The dealer picks up the up card and must discard,
    /// unless the dealer is the partner sitting out.
    pub fn order_up(&mut self, seat: Seat, alone: bool) -> Result<Contract, BidError> {
        self.ensure_bidding()?;
        let contract = self.bidding.order_up(seat, alone)?;
        if contract.sitting_out() == Some(self.dealer) {
            self.start_play(contract);
        } else {
            self.hands[self.dealer.index()].add(self.up_card());
            self.contract = Some(contract);
            self.phase = RoundPhase::Discarding;
        }
        Ok(contract)
    }

    /// Round two call naming any suit but the turned-down one.
    pub fn call(&mut self, seat: Seat, suit: Suit, alone: bool) -> Result<Contract, BidError> {
        self.ensure_bidding()?;
        let contract = self.bidding.call(seat, suit, alone)?;
        self.start_play(contract);
        Ok(contract)
    }

    pub fn discard(&mut self, card: Card) -> Result<(), BidError> {
        let contract = match (self.phase, self.contract) {
            (RoundPhase::Discarding, Some(contract)) => contract,
            _ => return Err(BidError::NotDiscarding),
        };
        if !self.hands[self.dealer.index()].remove(card) {
            return Err(BidError::CardNotInHand(card));
        }
        self.discarded = Some(card);
        self.start_play(contract);
        Ok(())
    }

    pub fn play_card(&mut self, seat: Seat, card: Card) -> Result<PlayOutcome, PlayError> {
        if self.phase != RoundPhase::Playing {
            return Err(PlayError::NotInPlayPhase);
        }
        let Some(trump) = self.trump() else {
            return Err(PlayError::NotInPlayPhase);
        };

        if Some(seat) == self.current_trick.sitting_out() {
            return Err(PlayError::Trick(TrickError::SittingOut(seat)));
        }

        let hand = &self.hands[seat.index()];
        if hand.is_empty() {
            return Err(PlayError::EmptyHand(seat));
        }

        if let Some(expected) = self.current_trick.expected_seat()
            && expected != seat
        {
            return Err(PlayError::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        validate_play(hand.cards(), card, self.current_trick.lead_suit(trump), trump)?;

        self.current_trick.play(seat, card)?;
        self.hands[seat.index()].remove(card);

        if !self.current_trick.is_complete() {
            return Ok(PlayOutcome::Played);
        }

        let Some(winner) = self.current_trick.winner(trump) else {
            return Ok(PlayOutcome::Played);
        };
        self.tricks_won[winner.team().index()] += 1;
        let sitting_out = self.current_trick.sitting_out();
        let finished = std::mem::replace(
            &mut self.current_trick,
            Trick::with_sitting_out(winner, sitting_out),
        );
        self.trick_history.push(finished);

        if self.trick_history.len() < TRICKS_PER_ROUND as usize {
            return Ok(PlayOutcome::TrickCompleted { winner });
        }

        self.phase = RoundPhase::Complete;
        match self.outcome() {
            Some(outcome) => Ok(PlayOutcome::RoundCompleted { winner, outcome }),
            None => Ok(PlayOutcome::TrickCompleted { winner }),
        }
    }

    /// Legal cards for the seat due to play, empty outside the play phase.
    pub fn legal_plays(&self, seat: Seat) -> Vec<Card> {
        match (self.phase, self.trump()) {
            (RoundPhase::Playing, Some(trump)) => legal_plays(
                self.hands[seat.index()].cards(),
                self.current_trick.lead_suit(trump),
                trump,
            ),
            _ => Vec::new(),
        }
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        if self.phase != RoundPhase::Complete {
            return None;
        }
        let contract = self.contract?;
        let (team1, team2) = points(
            self.tricks_won[0],
            self.tricks_won[1],
            contract.caller_team(),
            contract.alone,
        );
        Some(RoundOutcome {
            contract,
            tricks: self.tricks_won,
            points: [team1, team2],
        })
    }

    fn ensure_bidding(&self) -> Result<(), BidError> {
        match (self.phase, self.contract) {
            (RoundPhase::Bidding, _) => Ok(()),
            (_, Some(contract)) => Err(BidError::AmbiguousTrumpState {
                trump: contract.trump,
            }),
            (_, None) => Err(BidError::NotInBiddingPhase),
        }
    }

    fn start_play(&mut self, contract: Contract) {
        self.contract = Some(contract);
        self.current_trick = Trick::with_sitting_out(self.dealer.next(), contract.sitting_out());
        self.phase = RoundPhase::Playing;
    }
}

#[cfg(test)]
mod tests {
    use super::{
        PlayError, PlayOutcome, RoundPhase, RoundRules, RoundState, legal_plays, validate_play,
    };
    use crate::model::bidding::{BidError, BidStage};
    use crate::model::card::Card;
    use crate::model::deck::Deck;
    use crate::model::hand::Hand;
    use crate::model::player::{Seat, Team};
    use crate::model::suit::Suit;
    use crate::model::trick::TrickError;

    fn card(text: &str) -> Card {
        text.parse().unwrap()
    }

    fn hand(cards: &[&str]) -> Hand {
        Hand::with_cards(cards.iter().map(|c| card(c)).collect())
    }

    /// North deals. East holds all of the hearts power.
    fn fixed_round(rules: RoundRules) -> RoundState {
        RoundState::from_hands(
            Seat::North,
            [
                hand(&["9 of clubs", "10 of clubs", "Q of clubs", "K of clubs", "A of clubs"]),
                hand(&["J of hearts", "J of diamonds", "A of hearts", "K of hearts", "Q of hearts"]),
                hand(&["9 of spades", "10 of spades", "Q of spades", "K of spades", "A of spades"]),
                hand(&["9 of diamonds", "10 of diamonds", "Q of diamonds", "K of diamonds", "A of diamonds"]),
            ],
            [card("10 of hearts"), card("9 of hearts"), card("J of clubs"), card("J of spades")],
            rules,
        )
    }

    #[test]
    fn dealing_gives_five_cards_each_and_four_to_kitty() {
        let deck = Deck::shuffled_with_seed(7);
        let round = RoundState::deal(&deck, Seat::South, RoundRules::default());
        for seat in Seat::LOOP {
            assert_eq!(round.hand(seat).len(), 5, "{seat} should hold five");
        }
        assert_eq!(round.kitty().len(), 4);
        assert_eq!(round.up_card(), deck.cards()[20]);
        assert_eq!(round.hand(Seat::West).cards().len(), 5);
        assert!(round.hand(Seat::West).contains(deck.cards()[0]));
        assert_eq!(round.phase(), RoundPhase::Bidding);
        assert_eq!(round.to_act(), Some(Seat::West));
    }

    #[test]
    fn order_up_puts_dealer_into_discard() {
        let mut round = fixed_round(RoundRules::default());
        let contract = round.order_up(Seat::East, false).unwrap();
        assert_eq!(contract.trump, Suit::Hearts);
        assert_eq!(round.phase(), RoundPhase::Discarding);
        assert_eq!(round.hand(Seat::North).len(), 6);
        assert!(round.hand(Seat::North).contains(card("10 of hearts")));

        assert_eq!(
            round.discard(card("A of spades")),
            Err(BidError::CardNotInHand(card("A of spades")))
        );
        round.discard(card("9 of clubs")).unwrap();
        assert_eq!(round.hand(Seat::North).len(), 5);
        assert_eq!(round.phase(), RoundPhase::Playing);
        assert_eq!(round.to_act(), Some(Seat::East));
        assert_eq!(round.out_of_play_up_card(), None);
    }

    #[test]
    fn bidding_after_trump_is_set_is_ambiguous() {
        let mut round = fixed_round(RoundRules::default());
        round.order_up(Seat::East, false).unwrap();
        assert_eq!(
            round.pass(Seat::South),
            Err(BidError::AmbiguousTrumpState { trump: Suit::Hearts })
        );
        assert_eq!(round.discard(card("9 of clubs")), Ok(()));
        assert_eq!(round.discard(card("10 of clubs")), Err(BidError::NotDiscarding));
    }

    #[test]
    fn dealer_partner_alone_skips_pickup() {
        let mut round = fixed_round(RoundRules::default());
        round.pass(Seat::East).unwrap();
        let contract = round.order_up(Seat::South, true).unwrap();
        assert_eq!(contract.sitting_out(), Some(Seat::North));
        assert_eq!(round.phase(), RoundPhase::Playing);
        assert_eq!(round.hand(Seat::North).len(), 5);
        assert_eq!(round.current_trick().size(), 3);
        assert_eq!(round.turned_down_card(), None);
        assert_eq!(round.out_of_play_up_card(), Some(card("10 of hearts")));
    }

    #[test]
    fn all_pass_without_stick_the_dealer_throws_in() {
        let mut round = fixed_round(RoundRules {
            stick_the_dealer: false,
        });
        for _ in 0..8 {
            let seat = round.to_act().unwrap();
            round.pass(seat).unwrap();
        }
        assert_eq!(round.phase(), RoundPhase::ThrownIn);
        assert_eq!(round.turned_down_card(), Some(card("10 of hearts")));
        assert!(round.outcome().is_none());
    }

    #[test]
    fn follow_rule_is_bower_aware() {
        let hand = [card("J of diamonds"), card("A of diamonds"), card("9 of clubs")];
        // Hearts trump: the left bower is a heart, so a diamond lead only
        // forces the ace.
        assert_eq!(legal_plays(&hand, Some(Suit::Diamonds), Suit::Hearts), vec![card("A of diamonds")]);
        assert_eq!(legal_plays(&hand, Some(Suit::Hearts), Suit::Hearts), vec![card("J of diamonds")]);
        assert_eq!(legal_plays(&hand, Some(Suit::Spades), Suit::Hearts).len(), 3);
        assert_eq!(
            validate_play(&hand, card("J of diamonds"), Some(Suit::Diamonds), Suit::Hearts),
            Err(PlayError::IllegalPlay {
                card: card("J of diamonds"),
                lead: Suit::Diamonds
            })
        );
        assert_eq!(validate_play(&hand, card("9 of clubs"), None, Suit::Hearts), Ok(()));
    }

    #[test]
    fn play_rejects_out_of_turn_and_missing_cards() {
        let mut round = fixed_round(RoundRules::default());
        round.order_up(Seat::East, false).unwrap();
        round.discard(card("9 of clubs")).unwrap();
        assert!(matches!(
            round.play_card(Seat::South, card("9 of spades")),
            Err(PlayError::OutOfTurn { .. })
        ));
        assert_eq!(
            round.play_card(Seat::East, card("A of clubs")),
            Err(PlayError::CardNotInHand(card("A of clubs")))
        );
    }

    #[test]
    fn sitting_out_partner_cannot_play() {
        let mut round = fixed_round(RoundRules::default());
        round.order_up(Seat::East, true).unwrap();
        round.discard(card("9 of clubs")).unwrap();
        round.play_card(Seat::East, card("J of hearts")).unwrap();
        assert_eq!(
            round.play_card(Seat::West, card("9 of diamonds")),
            Err(PlayError::Trick(TrickError::SittingOut(Seat::West)))
        );
    }

    #[test]
    fn lone_march_scores_four() {
        let mut round = fixed_round(RoundRules::default());
        round.order_up(Seat::East, true).unwrap();
        round.discard(card("9 of clubs")).unwrap();

        let leads = ["J of hearts", "J of diamonds", "A of hearts", "K of hearts", "Q of hearts"];
        let mut last = None;
        for lead in leads {
            assert_eq!(round.to_act(), Some(Seat::East));
            round.play_card(Seat::East, card(lead)).unwrap();
            let south = round.legal_plays(Seat::South);
            round.play_card(Seat::South, south[0]).unwrap();
            let north = round.legal_plays(Seat::North);
            last = Some(round.play_card(Seat::North, north[0]).unwrap());
        }

        let Some(PlayOutcome::RoundCompleted { winner, outcome }) = last else {
            panic!("round should be complete, got {last:?}");
        };
        assert_eq!(winner, Seat::East);
        assert_eq!(outcome.tricks, [0, 5]);
        assert_eq!(outcome.points, [0, 4]);
        assert!(outcome.is_march());
        assert_eq!(outcome.contract.stage, BidStage::OrderUp);
        assert_eq!(round.tricks_won(Team::Two), 5);
        assert_eq!(round.trick_history().len(), 5);
        assert_eq!(round.played_cards().count(), 15);
        assert_eq!(round.phase(), RoundPhase::Complete);
        assert_eq!(
            round.play_card(Seat::East, card("9 of hearts")),
            Err(PlayError::NotInPlayPhase)
        );
    }

    #[test]
    fn round_two_call_starts_play_left_of_dealer() {
        let mut round = fixed_round(RoundRules::default());
        for _ in 0..4 {
            let seat = round.to_act().unwrap();
            round.pass(seat).unwrap();
        }
        assert_eq!(
            round.call(Seat::East, Suit::Hearts, false),
            Err(BidError::SuitTurnedDown(Suit::Hearts))
        );
        let contract = round.call(Seat::East, Suit::Diamonds, false).unwrap();
        assert_eq!(contract.stage, BidStage::CallSuit);
        assert_eq!(round.phase(), RoundPhase::Playing);
        assert_eq!(round.to_act(), Some(Seat::East));
        assert_eq!(round.turned_down_card(), Some(card("10 of hearts")));
        assert_eq!(round.out_of_play_up_card(), Some(card("10 of hearts")));
        assert_eq!(round.hand(Seat::North).len(), 5);
    }
}
