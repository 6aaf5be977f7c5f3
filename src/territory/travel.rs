//! Overland travel and fog of war.

use super::{ActionFailure, GameClock, TerritoryEngine};
use crate::hex::{self, HexCoord};

/// Minutes to cross a tile with travel modifier 1.0.
pub const BASE_STEP_MINUTES: f64 = 30.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TravelResult {
    pub arrived: bool,
    /// Tiles walked, starting position first
    pub path: Vec<HexCoord>,
    pub minutes: u32,
    /// Tiles revealed along the way
    pub newly_discovered: Vec<HexCoord>,
    pub failure: Option<ActionFailure>,
}

impl TravelResult {
    fn failed(reason: ActionFailure) -> Self {
        Self {
            failure: Some(reason),
            ..Default::default()
        }
    }
}

impl TerritoryEngine {
    /// Mark every tile within `radius` of `center` discovered. Returns the
    /// tiles that were hidden before, in spiral order.
    pub fn reveal(&mut self, center: HexCoord, radius: u32) -> Vec<HexCoord> {
        let mut revealed = Vec::new();
        for coord in hex::spiral(center, radius) {
            if let Some(t) = self.territories.get_mut(coord) {
                if !t.discovered {
                    t.discovered = true;
                    revealed.push(coord);
                }
            }
        }
        revealed
    }

    /// Cheapest land route from the player's position to `goal`, or empty.
    pub fn plan_route(&self, goal: HexCoord) -> Vec<HexCoord> {
        hex::find_path(self.player_position, goal, |c| {
            self.territories.get(c).and_then(|t| t.travel_modifier)
        })
    }

    /// Walk the player to `goal`. Every step advances the clock by
    /// `30 * travel_modifier` minutes, stamps the tile visited and reveals the
    /// ring around it.
    pub fn travel_to(&mut self, goal: HexCoord, clock: &mut impl GameClock) -> TravelResult {
        let Some(target) = self.territories.get(goal) else {
            return TravelResult::failed(ActionFailure::OutOfBounds);
        };
        if !target.is_passable() {
            return TravelResult::failed(ActionFailure::Impassable);
        }

        let path = self.plan_route(goal);
        if path.is_empty() {
            return TravelResult::failed(ActionFailure::Unreachable);
        }

        let mut minutes = 0;
        let mut newly_discovered = Vec::new();
        for &step in path.iter().skip(1) {
            let modifier = self.territories.get(step).and_then(|t| t.travel_modifier).unwrap_or(1.0);
            let step_minutes = (BASE_STEP_MINUTES * modifier).round() as u32;
            clock.advance_time(step_minutes);
            minutes += step_minutes;

            let now = clock.current_minute();
            if let Some(t) = self.territories.get_mut(step) {
                t.visited = true;
                t.last_visited = Some(now);
            }
            newly_discovered.extend(self.reveal(step, 1));
            self.player_position = step;
        }

        tracing::debug!("travelled {} steps to {} in {} minutes", path.len() - 1, goal, minutes);

        TravelResult {
            arrived: self.player_position == goal,
            path,
            minutes,
            newly_discovered,
            failure: None,
        }
    }
}
