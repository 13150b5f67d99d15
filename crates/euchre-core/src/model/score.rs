use crate::model::player::Team;

/// Points needed to win a game.
pub const GAME_TARGET: u32 = 10;

pub const TRICKS_PER_ROUND: u8 = 5;

/// Points for one completed round as `(team one, team two)`.
///
/// The calling team scores 1 for three or four tricks, 2 for a march and 4
/// for a march played alone. Defenders taking three or more tricks euchre
/// the callers for 2. Exactly one side scores.
pub fn points(team1_tricks: u8, team2_tricks: u8, caller_team: Team, alone: bool) -> (u8, u8) {
    let (caller_tricks, defender_tricks) = match caller_team {
        Team::One => (team1_tricks, team2_tricks),
        Team::Two => (team2_tricks, team1_tricks),
    };

    let (caller_points, defender_points) = if caller_tricks >= TRICKS_PER_ROUND {
        (if alone { 4 } else { 2 }, 0)
    } else if caller_tricks >= 3 {
        (1, 0)
    } else {
        debug_assert!(defender_tricks >= 3 || caller_tricks + defender_tricks < TRICKS_PER_ROUND);
        (0, 2)
    };

    match caller_team {
        Team::One => (caller_points, defender_points),
        Team::Two => (defender_points, caller_points),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBoard {
    totals: [u32; 2],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self { totals: [0; 2] }
    }

    pub fn add(&mut self, team: Team, points: u32) {
        self.totals[team.index()] += points;
    }

    pub fn apply_round(&mut self, points: (u8, u8)) {
        self.add(Team::One, u32::from(points.0));
        self.add(Team::Two, u32::from(points.1));
    }

    pub fn score(&self, team: Team) -> u32 {
        self.totals[team.index()]
    }

    pub fn standings(&self) -> &[u32; 2] {
        &self.totals
    }

    /// The team that has reached the target, if any.
    pub fn winner(&self) -> Option<Team> {
        Team::BOTH
            .iter()
            .copied()
            .filter(|team| self.score(*team) >= GAME_TARGET)
            .max_by_key(|team| self.score(*team))
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}
