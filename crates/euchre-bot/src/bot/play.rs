use super::discard::{highest, lowest, worst_card};
use super::tracker::{SeenCards, has_led_trump, trump_led_by_opponent};
use euchre_core::model::bidding::Contract;
use euchre_core::model::card::Card;
use euchre_core::model::player::Seat;
use euchre_core::model::ranking::rank;
use euchre_core::model::round::{PlayError, RoundPhase, RoundState, validate_play};
use euchre_core::model::suit::Suit;
use euchre_core::model::trick::Trick;

/// What a seat sees when it is asked for a card.
#[derive(Debug, Clone, Copy)]
pub struct PlayView<'a> {
    pub seat: Seat,
    pub hand: &'a [Card],
    pub trump: Suit,
    pub trick: &'a Trick,
    pub history: &'a [Trick],
    pub contract: Contract,
    pub turned_down: Option<Card>,
    /// Only the dealer knows its own discard.
    pub discarded: Option<Card>,
}

impl<'a> PlayView<'a> {
    pub fn from_round(round: &'a RoundState, seat: Seat) -> Result<Self, PlayError> {
        if round.phase() != RoundPhase::Playing {
            return Err(PlayError::NotInPlayPhase);
        }
        let Some(contract) = round.contract().copied() else {
            return Err(PlayError::NotInPlayPhase);
        };
        if let Some(expected) = round.current_trick().expected_seat()
            && expected != seat
        {
            return Err(PlayError::OutOfTurn {
                expected,
                actual: seat,
            });
        }
        let hand = round.hand(seat).cards();
        if hand.is_empty() {
            return Err(PlayError::EmptyHand(seat));
        }
        Ok(Self {
            seat,
            hand,
            trump: contract.trump,
            trick: round.current_trick(),
            history: round.trick_history(),
            contract,
            turned_down: round.out_of_play_up_card(),
            discarded: (seat == round.dealer()).then(|| round.discarded()).flatten(),
        })
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.trick.lead_suit(self.trump)
    }

    fn seen(&self) -> SeenCards {
        SeenCards::observe(
            self.hand,
            self.history,
            self.trick,
            self.turned_down.into_iter().chain(self.discarded),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayChoice {
    pub card: Card,
    pub reason: &'static str,
}

impl PlayChoice {
    const fn new(card: Card, reason: &'static str) -> Self {
        Self { card, reason }
    }
}

pub struct PlayPlanner;

impl PlayPlanner {
    /// Picks a card from the view's hand. Holding the lead suit always
    /// yields a card of that suit.
    pub fn choose(view: &PlayView<'_>) -> Result<PlayChoice, PlayError> {
        let seen = view.seen();
        let lead = view.lead_suit();
        let choice = match lead {
            None => lead_card(view, &seen),
            Some(lead) => follow_card(view, &seen, lead),
        }
        .ok_or(PlayError::EmptyHand(view.seat))?;

        validate_play(view.hand, choice.card, lead, view.trump)?;
        Ok(choice)
    }
}

fn lead_card(view: &PlayView<'_>, seen: &SeenCards) -> Option<PlayChoice> {
    let (seat, trump, hand) = (view.seat, view.trump, view.hand);
    let trumps: Vec<Card> = hand.iter().copied().filter(|c| c.is_trump(trump)).collect();
    let off: Vec<Card> = hand.iter().copied().filter(|c| !c.is_trump(trump)).collect();

    let trump_boss = highest(trumps.iter().copied(), trump, None).filter(|c| seen.is_boss(*c, trump));
    let off_boss = highest(off.iter().copied().filter(|c| seen.is_boss(*c, trump)), trump, None);

    let caller = view.contract.caller;
    let self_called = caller == seat;
    let partner_called = caller == seat.partner();
    let we_called = self_called || partner_called;

    if let (Some(top_trump), Some(top_off)) = (trump_boss, off_boss) {
        if we_called || trump_led_by_opponent(view.history, seat, trump) {
            return Some(PlayChoice::new(top_trump, "lead_trump_boss"));
        }
        return Some(PlayChoice::new(top_off, "lead_off_boss_first"));
    }

    if hand.len() == 2 && view.history.len() == 3 && trumps.len() == 1 && off.len() == 1 {
        return Some(PlayChoice::new(off[0], "save_last_trump"));
    }

    let repeat_lead = has_led_trump(view.history, seat, trump) && off_boss.is_none();
    if partner_called && !repeat_lead
        && let Some(card) = highest(trumps.iter().copied(), trump, None)
    {
        return Some(PlayChoice::new(card, "lead_trump_for_partner"));
    }

    if self_called {
        if let Some(card) = trump_boss {
            return Some(PlayChoice::new(card, "lead_trump_boss"));
        }
        if let Some(card) = lowest(trumps.iter().copied(), trump) {
            return Some(PlayChoice::new(card, "probe_low_trump"));
        }
    }

    if !we_called {
        if let Some(card) = off_boss {
            return Some(PlayChoice::new(card, "lead_off_boss"));
        }
        return lowest(hand.iter().copied(), trump).map(|card| PlayChoice::new(card, "lead_low"));
    }

    if let Some(card) = off_boss {
        return Some(PlayChoice::new(card, "lead_off_boss"));
    }

    worst_card(hand, trump).map(|card| PlayChoice::new(card, "lead_worst"))
}

fn follow_card(view: &PlayView<'_>, seen: &SeenCards, lead: Suit) -> Option<PlayChoice> {
    let (seat, trump, hand, trick) = (view.seat, view.trump, view.hand, view.trick);
    let winning = trick.winning_play(trump)?;
    let winning_rank = rank(winning.card, trump, Some(lead));
    let beats = |card: &Card| rank(*card, trump, Some(lead)) > winning_rank;

    let partner_winning = winning.seat == seat.partner();
    let last_to_play = trick.plays().len() + 1 == trick.size();
    let partner_safe = partner_winning && (last_to_play || seen.is_boss(winning.card, trump));

    let followers: Vec<Card> = hand.iter().copied().filter(|c| c.effective_suit(trump) == lead).collect();
    if !followers.is_empty() {
        let low = lowest(followers.iter().copied(), trump)?;
        if partner_safe {
            return Some(PlayChoice::new(low, "follow_low_partner_safe"));
        }
        let high = highest(followers.iter().copied(), trump, Some(lead))?;
        if beats(&high) {
            return Some(PlayChoice::new(high, "follow_overtake"));
        }
        return Some(PlayChoice::new(low, "follow_low"));
    }

    let trumps: Vec<Card> = hand.iter().copied().filter(|c| c.is_trump(trump)).collect();
    let discard_low = || {
        lowest(hand.iter().copied().filter(|c| !c.is_trump(trump)), trump)
            .or_else(|| lowest(hand.iter().copied(), trump))
    };

    let trump_in_trick = trick.cards().any(|c| c.is_trump(trump));
    if !trump_in_trick {
        if !partner_safe
            && let Some(card) = lowest(trumps.iter().copied(), trump)
        {
            return Some(PlayChoice::new(card, "trump_in_low"));
        }
        return discard_low().map(|card| PlayChoice::new(card, "discard_low"));
    }

    if !partner_winning
        && let Some(card) = lowest(trumps.iter().copied().filter(|c| beats(c)), trump)
    {
        return Some(PlayChoice::new(card, "overtrump_minimal"));
    }
    discard_low().map(|card| PlayChoice::new(card, "discard_low"))
}

#[cfg(test)]
mod tests {
    use super::{PlayPlanner, PlayView};
    use euchre_core::model::bidding::{BidStage, Contract};
    use euchre_core::model::card::Card;
    use euchre_core::model::hand::Hand;
    use euchre_core::model::player::Seat;
    use euchre_core::model::round::{PlayError, RoundRules, RoundState};
    use euchre_core::model::suit::Suit;
    use euchre_core::model::trick::Trick;

    fn card(text: &str) -> Card {
        text.parse().unwrap()
    }

    fn cards(texts: &[&str]) -> Vec<Card> {
        texts.iter().map(|t| card(t)).collect()
    }

    fn contract(caller: Seat) -> Contract {
        Contract {
            trump: Suit::Spades,
            caller,
            alone: false,
            stage: BidStage::OrderUp,
        }
    }

    fn trick(leader: Seat, plays: &[&str]) -> Trick {
        let mut trick = Trick::new(leader);
        let mut seat = leader;
        for text in plays {
            trick.play(seat, card(text)).unwrap();
            seat = seat.next();
        }
        trick
    }

    fn choose(hand: &[Card], trick: &Trick, history: &[Trick], caller: Seat) -> (Card, &'static str) {
        let view = PlayView {
            seat: Seat::South,
            hand,
            trump: Suit::Spades,
            trick,
            history,
            contract: contract(caller),
            turned_down: None,
            discarded: None,
        };
        let choice = PlayPlanner::choose(&view).unwrap();
        (choice.card, choice.reason)
    }

    #[test]
    fn caller_with_both_bosses_leads_trump() {
        let hand = cards(&["J of spades", "A of hearts", "9 of diamonds"]);
        let lead = Trick::new(Seat::South);
        assert_eq!(choose(&hand, &lead, &[], Seat::South).0, card("J of spades"));
        assert_eq!(choose(&hand, &lead, &[], Seat::East), (card("A of hearts"), "lead_off_boss_first"));
    }

    #[test]
    fn keeps_last_trump_for_the_final_trick() {
        let history = vec![
            trick(Seat::North, &["9 of hearts", "10 of hearts", "Q of hearts", "K of hearts"]),
            trick(Seat::North, &["9 of clubs", "10 of clubs", "Q of clubs", "K of clubs"]),
            trick(Seat::North, &["9 of diamonds", "10 of diamonds", "Q of diamonds", "K of diamonds"]),
        ];
        let hand = cards(&["9 of spades", "J of hearts"]);
        let lead = Trick::new(Seat::South);
        assert_eq!(
            choose(&hand, &lead, &history, Seat::South),
            (card("J of hearts"), "save_last_trump")
        );
    }

    #[test]
    fn partner_called_leads_highest_trump() {
        let hand = cards(&["A of spades", "9 of spades", "K of hearts", "Q of clubs"]);
        let lead = Trick::new(Seat::South);
        assert_eq!(
            choose(&hand, &lead, &[], Seat::North),
            (card("A of spades"), "lead_trump_for_partner")
        );
    }

    #[test]
    fn caller_without_boss_probes_low_trump() {
        let hand = cards(&["A of spades", "9 of spades", "K of hearts", "Q of clubs"]);
        let lead = Trick::new(Seat::South);
        assert_eq!(
            choose(&hand, &lead, &[], Seat::South),
            (card("9 of spades"), "probe_low_trump")
        );
    }

    #[test]
    fn defender_leads_low_without_a_boss() {
        let hand = cards(&["10 of clubs", "K of hearts", "Q of diamonds", "9 of spades"]);
        let lead = Trick::new(Seat::South);
        assert_eq!(choose(&hand, &lead, &[], Seat::West), (card("10 of clubs"), "lead_low"));
    }

    #[test]
    fn follows_low_when_partner_holds_the_boss() {
        // North leads the ace of hearts, East follows low.
        let current = trick(Seat::North, &["A of hearts", "9 of hearts"]);
        let hand = cards(&["K of hearts", "10 of hearts", "Q of clubs"]);
        assert_eq!(
            choose(&hand, &current, &[], Seat::North),
            (card("10 of hearts"), "follow_low_partner_safe")
        );
    }

    #[test]
    fn overtakes_an_opponent_when_possible() {
        let current = trick(Seat::East, &["Q of hearts"]);
        let hand = cards(&["K of hearts", "10 of hearts", "Q of clubs"]);
        assert_eq!(
            choose(&hand, &current, &[], Seat::North),
            (card("K of hearts"), "follow_overtake")
        );
    }

    #[test]
    fn left_bower_must_follow_a_trump_lead() {
        let current = trick(Seat::East, &["9 of spades"]);
        let hand = cards(&["J of clubs", "A of clubs", "K of hearts"]);
        let (chosen, _) = choose(&hand, &current, &[], Seat::East);
        assert_eq!(chosen, card("J of clubs"));
    }

    #[test]
    fn void_seat_trumps_in_low() {
        let current = trick(Seat::East, &["A of diamonds"]);
        let hand = cards(&["Q of spades", "A of spades", "K of hearts"]);
        assert_eq!(
            choose(&hand, &current, &[], Seat::East),
            (card("Q of spades"), "trump_in_low")
        );
    }

    #[test]
    fn overtrumps_with_the_smallest_winner() {
        let current = trick(Seat::West, &["A of diamonds", "K of diamonds", "10 of spades"]);
        let hand = cards(&["9 of spades", "Q of spades", "A of spades", "K of hearts"]);
        assert_eq!(
            choose(&hand, &current, &[], Seat::West),
            (card("Q of spades"), "overtrump_minimal")
        );
    }

    #[test]
    fn discards_when_partner_already_trumped() {
        let current = trick(Seat::West, &["A of diamonds", "10 of spades", "9 of diamonds"]);
        let hand = cards(&["9 of spades", "K of hearts", "9 of clubs"]);
        assert_eq!(
            choose(&hand, &current, &[], Seat::East),
            (card("9 of clubs"), "discard_low")
        );
    }

    #[test]
    fn defender_leads_trump_back_once_opponents_have_led_it() {
        let history = vec![trick(Seat::East, &["9 of spades", "Q of hearts", "10 of spades", "K of clubs"])];
        let hand = cards(&["J of spades", "A of hearts", "9 of diamonds", "10 of clubs"]);
        let lead = Trick::new(Seat::South);
        assert_eq!(
            choose(&hand, &lead, &history, Seat::East),
            (card("J of spades"), "lead_trump_boss")
        );
    }

    #[test]
    fn partner_called_does_not_lead_trump_a_second_time() {
        let hand = cards(&["A of spades", "K of hearts", "10 of diamonds", "9 of clubs"]);
        let lead = Trick::new(Seat::South);
        assert_eq!(
            choose(&hand, &lead, &[], Seat::North),
            (card("A of spades"), "lead_trump_for_partner")
        );

        let history = vec![trick(Seat::South, &["9 of spades", "10 of hearts", "Q of spades", "K of clubs"])];
        assert_eq!(
            choose(&hand, &lead, &history, Seat::North),
            (card("9 of clubs"), "lead_worst")
        );
    }

    #[test]
    fn our_side_without_trump_cashes_an_off_suit_boss() {
        let hand = cards(&["A of hearts", "9 of diamonds", "10 of clubs"]);
        let lead = Trick::new(Seat::South);
        assert_eq!(
            choose(&hand, &lead, &[], Seat::North),
            (card("A of hearts"), "lead_off_boss")
        );
    }

    #[test]
    fn caller_without_trump_or_boss_leads_worst_card() {
        let hand = cards(&["K of hearts", "9 of hearts", "Q of diamonds"]);
        let lead = Trick::new(Seat::South);
        assert_eq!(
            choose(&hand, &lead, &[], Seat::South),
            (card("Q of diamonds"), "lead_worst")
        );
    }

    #[test]
    fn overtakes_partner_holding_a_beatable_card() {
        // North leads the queen of hearts; the ace and king are still out.
        let current = trick(Seat::North, &["Q of hearts", "9 of hearts"]);
        let hand = cards(&["K of hearts", "10 of hearts", "Q of clubs"]);
        assert_eq!(
            choose(&hand, &current, &[], Seat::East),
            (card("K of hearts"), "follow_overtake")
        );
    }

    #[test]
    fn up_card_left_out_by_a_sitting_dealer_counts_as_seen() {
        let hand = |texts: &[&str]| Hand::with_cards(cards(texts));
        let mut round = RoundState::from_hands(
            Seat::North,
            [
                hand(&["9 of clubs", "10 of clubs", "Q of clubs", "K of clubs", "A of clubs"]),
                hand(&["A of hearts", "K of hearts", "Q of hearts", "10 of hearts", "9 of diamonds"]),
                hand(&["J of diamonds", "9 of hearts", "Q of spades", "10 of diamonds", "9 of spades"]),
                hand(&["10 of spades", "K of spades", "A of spades", "Q of diamonds", "K of diamonds"]),
            ],
            [card("J of hearts"), card("A of diamonds"), card("J of clubs"), card("J of spades")],
            RoundRules::default(),
        );
        round.pass(Seat::East).unwrap();
        round.order_up(Seat::South, true).unwrap();

        let leader = PlayView::from_round(&round, Seat::East).unwrap();
        assert_eq!(leader.turned_down, Some(card("J of hearts")));

        let opening = Trick::new(Seat::South);
        let south = PlayView {
            seat: Seat::South,
            hand: round.hand(Seat::South).cards(),
            trick: &opening,
            ..leader
        };
        let choice = PlayPlanner::choose(&south).unwrap();
        assert_eq!((choice.card, choice.reason), (card("J of diamonds"), "lead_trump_boss"));

        let unaware = PlayView {
            turned_down: None,
            ..south
        };
        let choice = PlayPlanner::choose(&unaware).unwrap();
        assert_eq!((choice.card, choice.reason), (card("9 of hearts"), "probe_low_trump"));
    }

    #[test]
    fn empty_hand_is_rejected() {
        let view = PlayView {
            seat: Seat::South,
            hand: &[],
            trump: Suit::Spades,
            trick: &Trick::new(Seat::South),
            history: &[],
            contract: contract(Seat::South),
            turned_down: None,
            discarded: None,
        };
        assert_eq!(PlayPlanner::choose(&view), Err(PlayError::EmptyHand(Seat::South)));
    }
}
