use euchre_core::model::player::Seat;
use serde::{Deserialize, Serialize};

/// Tunable strategy constants for the evaluator and the trump engine.
///
/// One immutable value is handed to every decision. The harness sweeps
/// configurations by deserializing partial overrides on top of the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Weight of the trump component (default: 0.5)
    pub trump_weight: f64,
    /// Weight of the off-suit ace component (default: 0.4)
    pub ace_weight: f64,
    /// Weight of the void component (default: 0.1)
    pub void_weight: f64,

    pub right_bower: f64,
    pub left_bower: f64,
    pub trump_ace: f64,
    pub trump_king: f64,
    pub trump_queen: f64,
    pub trump_ten: f64,
    pub trump_nine: f64,

    /// Off-suit ace outside trump's colour (default: 1.0)
    pub off_ace: f64,
    /// Ace of trump's partner suit, thinner because the jack left (default: 0.9)
    pub partner_suit_ace: f64,

    pub trump_norm: f64,
    pub ace_norm: f64,
    pub void_norm: f64,

    /// Round one: score needed to order up, by seat.
    pub order_up: SeatThresholds,
    /// Round two: score needed to call the same-colour suit.
    pub call_next: SeatThresholds,
    /// Round two: score needed to call an opposite-colour suit.
    pub call_reverse: SeatThresholds,

    /// Score at which the caller plays without a partner (default: 0.58)
    pub alone_threshold: f64,
    /// Dealer may not pass in round two (default: true)
    pub stick_the_dealer: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeatThresholds {
    pub first: f64,
    pub second: f64,
    pub third: f64,
    pub dealer: f64,
}

impl SeatThresholds {
    pub const fn for_role(&self, role: SeatRole) -> f64 {
        match role {
            SeatRole::First => self.first,
            SeatRole::Second => self.second,
            SeatRole::Third => self.third,
            SeatRole::Dealer => self.dealer,
        }
    }

    pub fn values(&self) -> [f64; 4] {
        [self.first, self.second, self.third, self.dealer]
    }
}

/// Position relative to the dealer; first is the seat to the dealer's left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatRole {
    First,
    Second,
    Third,
    Dealer,
}

impl SeatRole {
    pub const ALL: [SeatRole; 4] = [
        SeatRole::First,
        SeatRole::Second,
        SeatRole::Third,
        SeatRole::Dealer,
    ];

    pub const fn of(seat: Seat, dealer: Seat) -> Self {
        match seat.offset_from(dealer) {
            1 => SeatRole::First,
            2 => SeatRole::Second,
            3 => SeatRole::Third,
            _ => SeatRole::Dealer,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            SeatRole::First => 0,
            SeatRole::Second => 1,
            SeatRole::Third => 2,
            SeatRole::Dealer => 3,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SeatRole::First => "first",
            SeatRole::Second => "second",
            SeatRole::Third => "third",
            SeatRole::Dealer => "dealer",
        }
    }
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            trump_weight: 0.5,
            ace_weight: 0.4,
            void_weight: 0.1,
            right_bower: 1.0,
            left_bower: 0.9,
            trump_ace: 0.8,
            trump_king: 0.7,
            trump_queen: 0.6,
            trump_ten: 0.5,
            trump_nine: 0.4,
            off_ace: 1.0,
            partner_suit_ace: 0.9,
            trump_norm: 4.0,
            ace_norm: 2.9,
            void_norm: 3.0,
            order_up: SeatThresholds {
                first: 0.42,
                second: 0.35,
                third: 0.44,
                dealer: 0.375,
            },
            call_next: SeatThresholds {
                first: 0.275,
                second: 0.45,
                third: 0.3,
                dealer: 0.35,
            },
            call_reverse: SeatThresholds {
                first: 0.4,
                second: 0.275,
                third: 0.375,
                dealer: 0.25,
            },
            alone_threshold: 0.58,
            stick_the_dealer: true,
        }
    }
}
