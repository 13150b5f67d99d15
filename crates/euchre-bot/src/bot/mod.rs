mod discard;
mod evaluate;
mod params;
mod play;
mod tracker;
mod trump;

pub use discard::{Discard, discard, highest, lowest, pickup, worst_card};
pub use evaluate::{HandStrength, evaluate_hand, hand_strength};
pub use params::{SeatRole, SeatThresholds, StrategyParams};
pub use play::{PlayChoice, PlayPlanner, PlayView};
pub use tracker::{SeenCards, has_led_trump, trump_led_by_opponent};
pub use trump::{TrumpCall, TrumpContext, TrumpDecision, decide_trump};
