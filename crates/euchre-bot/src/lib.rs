pub mod bot;
pub mod policy;

pub use bot::{
    PlayChoice, PlayPlanner, PlayView, SeatRole, SeenCards, StrategyParams, TrumpCall,
    TrumpContext, TrumpDecision, decide_trump, evaluate_hand,
};
pub use policy::{HeuristicPolicy, Policy, PolicyContext, PolicyError, ScriptedPolicy};
