use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use euchre_bot::SeatRole;
use euchre_core::model::bidding::BidStage;
use euchre_core::model::player::Team;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::simulation::GameRecord;

const CONFIDENCE: f64 = 0.95;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build normal distribution: {0}")]
    Distribution(String),
}

/// Counters for one seat position relative to the dealer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeatStats {
    /// Calls made, split by bidding round (order up, call suit).
    pub calls: [u64; 2],
    /// Calls that took three or more tricks, split by bidding round.
    pub wins: [u64; 2],
    pub euchres: u64,
    pub marches: u64,
    /// Points the caller's side scored on its own calls.
    pub points: u64,
    /// Like `points`, less the two conceded on each euchre.
    pub net_points: i64,
    pub loner_attempts: u64,
    pub loner_wins: u64,
}

impl SeatStats {
    pub fn total_calls(&self) -> u64 {
        self.calls.iter().sum()
    }

    pub fn total_wins(&self) -> u64 {
        self.wins.iter().sum()
    }

    fn merge(&mut self, other: &SeatStats) {
        for stage in 0..2 {
            self.calls[stage] += other.calls[stage];
            self.wins[stage] += other.wins[stage];
        }
        self.euchres += other.euchres;
        self.marches += other.marches;
        self.points += other.points;
        self.net_points += other.net_points;
        self.loner_attempts += other.loner_attempts;
        self.loner_wins += other.loner_wins;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamStats {
    pub calls: u64,
    pub wins: u64,
    pub euchres: u64,
    /// Every point the team scored, as caller or defender.
    pub points: u64,
    pub loner_attempts: u64,
    pub loner_wins: u64,
}

impl TeamStats {
    fn merge(&mut self, other: &TeamStats) {
        self.calls += other.calls;
        self.wins += other.wins;
        self.euchres += other.euchres;
        self.points += other.points;
        self.loner_attempts += other.loner_attempts;
        self.loner_wins += other.loner_wins;
    }
}

/// Aggregate counters over a batch of games. Merging is a field-wise sum,
/// so per-worker partials can be combined in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationStats {
    pub games: u64,
    pub games_failed: u64,
    pub rounds: u64,
    pub thrown_in: u64,
    pub game_wins: [u64; 2],
    /// Indexed by [`SeatRole::index`].
    pub seats: [SeatStats; 4],
    /// Indexed by [`Team::index`].
    pub teams: [TeamStats; 2],
}

impl SimulationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game(&mut self, game: &GameRecord) {
        self.games += 1;
        self.game_wins[game.winner.index()] += 1;

        for hand in &game.hands {
            self.rounds += 1;
            for team in Team::BOTH {
                self.teams[team.index()].points += u64::from(hand.points[team.index()]);
            }

            let Some(contract) = hand.contract else {
                self.thrown_in += 1;
                continue;
            };

            let caller_team = contract.caller.team();
            let caller_points = i64::from(hand.points[caller_team.index()]);
            let defender_points = i64::from(hand.points[caller_team.opponent().index()]);
            let made = !contract.euchre;
            let lone_march = contract.alone && contract.march;
            let stage = stage_index(contract.stage);

            let seat = &mut self.seats[contract.caller_role.index()];
            seat.calls[stage] += 1;
            seat.wins[stage] += u64::from(made);
            seat.euchres += u64::from(contract.euchre);
            seat.marches += u64::from(contract.march);
            seat.points += u64::from(hand.points[caller_team.index()]);
            seat.net_points += caller_points - defender_points;
            seat.loner_attempts += u64::from(contract.alone);
            seat.loner_wins += u64::from(lone_march);

            let team = &mut self.teams[caller_team.index()];
            team.calls += 1;
            team.wins += u64::from(made);
            team.euchres += u64::from(contract.euchre);
            team.loner_attempts += u64::from(contract.alone);
            team.loner_wins += u64::from(lone_march);
        }
    }

    pub fn record_failure(&mut self) {
        self.games_failed += 1;
    }

    pub fn merge(mut self, other: Self) -> Self {
        self.games += other.games;
        self.games_failed += other.games_failed;
        self.rounds += other.rounds;
        self.thrown_in += other.thrown_in;
        for team in 0..2 {
            self.game_wins[team] += other.game_wins[team];
            self.teams[team].merge(&other.teams[team]);
        }
        for (seat, theirs) in self.seats.iter_mut().zip(other.seats.iter()) {
            seat.merge(theirs);
        }
        self
    }

    pub fn seat(&self, role: SeatRole) -> &SeatStats {
        &self.seats[role.index()]
    }

    pub fn team(&self, team: Team) -> &TeamStats {
        &self.teams[team.index()]
    }

    /// Derived rates for every seat position.
    pub fn seat_rates(&self) -> Result<Vec<SeatRates>, AnalyticsError> {
        let z = z_score(CONFIDENCE)?;
        Ok(SeatRole::ALL
            .iter()
            .map(|&role| {
                let stats = self.seat(role);
                let calls = stats.total_calls();
                let wins = stats.total_wins();
                SeatRates {
                    role,
                    call_rate: ratio(calls, self.rounds),
                    win_rate: ratio(wins, calls),
                    win_ci95: wilson_interval(wins, calls, z),
                    euchre_rate: ratio(stats.euchres, calls),
                    avg_points_per_call: ratio(stats.points, calls),
                    avg_net_points_per_call: if calls == 0 {
                        0.0
                    } else {
                        stats.net_points as f64 / calls as f64
                    },
                    loner_rate: ratio(stats.loner_attempts, calls),
                    loner_success: ratio(stats.loner_wins, stats.loner_attempts),
                }
            })
            .collect())
    }

    pub fn write_markdown(
        &self,
        run_id: &str,
        path: impl AsRef<Path>,
    ) -> Result<(), AnalyticsError> {
        let rates = self.seat_rates()?;
        let mut out = String::new();

        let _ = writeln!(out, "# Simulation Summary: {run_id}\n");
        let _ = writeln!(
            out,
            "Games: {} played, {} failed. Rounds: {} dealt, {} thrown in.\n",
            self.games, self.games_failed, self.rounds, self.thrown_in
        );
        for team in Team::BOTH {
            let wins = self.game_wins[team.index()];
            let _ = writeln!(
                out,
                "- {team}: {wins} games ({:.1}%)",
                ratio(wins, self.games) * 100.0
            );
        }

        out.push_str("\n## Seat positions\n\n");
        out.push_str("| Seat | Calls | Call % | R1 calls | R1 wins | R2 calls | R2 wins | Win % | 95% CI | Euchre % | Avg pts/call | Net pts/call | Marches | Loners | Loner win % |\n");
        out.push_str("|------|-------|--------|----------|---------|----------|---------|-------|--------|----------|--------------|--------------|---------|--------|-------------|\n");
        for rate in &rates {
            let stats = self.seat(rate.role);
            let ci = match rate.win_ci95 {
                Some((low, high)) => format!("[{low:.3}, {high:.3}]"),
                None => "n/a".to_string(),
            };
            let _ = writeln!(
                out,
                "| {role} | {calls} | {call:.1}% | {r1c} | {r1w} | {r2c} | {r2w} | {win:.1}% | {ci} | {euchre:.1}% | {avg:.3} | {net:+.3} | {marches} | {loners} | {loner:.1}% |",
                role = rate.role.as_str(),
                calls = stats.total_calls(),
                call = rate.call_rate * 100.0,
                r1c = stats.calls[0],
                r1w = stats.wins[0],
                r2c = stats.calls[1],
                r2w = stats.wins[1],
                win = rate.win_rate * 100.0,
                euchre = rate.euchre_rate * 100.0,
                avg = rate.avg_points_per_call,
                net = rate.avg_net_points_per_call,
                marches = stats.marches,
                loners = stats.loner_attempts,
                loner = rate.loner_success * 100.0,
            );
        }

        out.push_str("\n## Teams\n\n");
        out.push_str("| Team | Calls | Wins | Euchres | Points | Loners | Loner wins |\n");
        out.push_str("|------|-------|------|---------|--------|--------|------------|\n");
        for team in Team::BOTH {
            let stats = self.team(team);
            let _ = writeln!(
                out,
                "| {team} | {} | {} | {} | {} | {} | {} |",
                stats.calls,
                stats.wins,
                stats.euchres,
                stats.points,
                stats.loner_attempts,
                stats.loner_wins
            );
        }

        fs::write(path.as_ref(), out).map_err(|source| AnalyticsError::Io {
            context: "writing summary markdown",
            source,
        })
    }
}

/// Rates derived from one seat position's counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeatRates {
    pub role: SeatRole,
    pub call_rate: f64,
    pub win_rate: f64,
    /// Wilson interval on the win rate given a call; `None` without calls.
    pub win_ci95: Option<(f64, f64)>,
    pub euchre_rate: f64,
    /// Caller's own points per call; a euchre counts as zero.
    pub avg_points_per_call: f64,
    pub avg_net_points_per_call: f64,
    pub loner_rate: f64,
    pub loner_success: f64,
}

fn stage_index(stage: BidStage) -> usize {
    usize::from(stage.number() - 1)
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn z_score(confidence: f64) -> Result<f64, AnalyticsError> {
    let normal =
        Normal::new(0.0, 1.0).map_err(|err| AnalyticsError::Distribution(err.to_string()))?;
    Ok(normal.inverse_cdf(0.5 + confidence / 2.0))
}

/// Wilson score interval for a binomial proportion.
fn wilson_interval(successes: u64, trials: u64, z: f64) -> Option<(f64, f64)> {
    if trials == 0 {
        return None;
    }
    let n = trials as f64;
    let p = successes as f64 / n;
    let z2 = z * z;
    let denom = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denom;
    let margin = z * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt() / denom;
    Some(((center - margin).max(0.0), (center + margin).min(1.0)))
}
