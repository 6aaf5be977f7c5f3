//! Claiming explored territory.

use super::{ActionFailure, GameClock, SkillProvider, TerritoryEngine, FULL_CONTROL};
use crate::hex::HexCoord;
use crate::tile::FactionId;

pub const CLAIM_SKILL: &str = "leadership";
/// Game minutes spent on every claim attempt that gets under way.
pub const CLAIM_MINUTES: u32 = 120;
const SUCCESS_XP: f64 = 15.0;
const FAILURE_XP: f64 = 5.0;
const CONTESTED_PENALTY: f64 = 30.0;
const SETBACK_CHANCE: f64 = 0.3;
const SETBACK: f64 = 10.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClaimResult {
    pub success: bool,
    /// Claim progress after the attempt
    pub progress: f64,
    /// Ownership passed to the claimant on this attempt
    pub claimed: bool,
    pub contested: bool,
    pub requires_exploration: bool,
    /// Minutes the attempt took
    pub minutes: u32,
    pub failure: Option<ActionFailure>,
}

impl ClaimResult {
    fn failed(reason: ActionFailure) -> Self {
        Self {
            requires_exploration: reason == ActionFailure::RequiresExploration,
            failure: Some(reason),
            ..Default::default()
        }
    }
}

impl TerritoryEngine {
    /// Claim attempt by the player.
    pub fn attempt_claim(
        &mut self,
        position: HexCoord,
        skills: &mut impl SkillProvider,
        clock: &mut impl GameClock,
    ) -> ClaimResult {
        self.attempt_claim_for(position, FactionId::PLAYER, skills, clock)
    }

    /// Claim attempt on behalf of `claimant`.
    ///
    /// Difficulty is `40 + 30 if contested + control_strength * 0.3` and the
    /// roll succeeds below `50 + skill - difficulty`. Success adds
    /// `15 + skill / 4` progress; at 100 the tile changes hands at full
    /// strength. A failed contested attempt may lose 10 progress.
    pub fn attempt_claim_for(
        &mut self,
        position: HexCoord,
        claimant: FactionId,
        skills: &mut impl SkillProvider,
        clock: &mut impl GameClock,
    ) -> ClaimResult {
        let Some(territory) = self.territories.get(position) else {
            return ClaimResult::failed(ActionFailure::OutOfBounds);
        };
        if !territory.is_passable() {
            return ClaimResult::failed(ActionFailure::Impassable);
        }
        if !territory.fully_explored {
            return ClaimResult::failed(ActionFailure::RequiresExploration);
        }
        if territory.owner == Some(claimant) {
            return ClaimResult::failed(ActionFailure::AlreadyOwned);
        }
        if self.world.map.get(position).is_some_and(|t| t.is_sacred) {
            return ClaimResult::failed(ActionFailure::SacredGround);
        }

        let contested = territory.owner.is_some();
        let difficulty = 40.0
            + if contested { CONTESTED_PENALTY } else { 0.0 }
            + territory.control_strength * 0.3;
        let skill = skills.effective_skill(CLAIM_SKILL);
        let chance = 50.0 + skill - difficulty;
        let before = territory.claim_progress;

        clock.advance_time(CLAIM_MINUTES);
        let success = self.rng.next() * 100.0 < chance;

        let mut progress = before;
        if success {
            progress = (before + 15.0 + skill / 4.0).min(100.0);
            skills.gain_skill_xp(CLAIM_SKILL, SUCCESS_XP);
        } else {
            if contested && self.rng.bool(SETBACK_CHANCE) {
                progress = (before - SETBACK).max(0.0);
            }
            skills.gain_skill_xp(CLAIM_SKILL, FAILURE_XP);
        }

        let claimed = progress >= 100.0;
        if claimed {
            self.set_owner(position, Some(claimant));
            tracing::info!("{} claimed {}", claimant, position);
        }
        if let Some(territory) = self.territories.get_mut(position) {
            territory.claim_progress = progress;
            if claimed {
                territory.control_strength = FULL_CONTROL;
            }
        }

        ClaimResult {
            success,
            progress,
            claimed,
            contested,
            requires_exploration: false,
            minutes: CLAIM_MINUTES,
            failure: None,
        }
    }
}
