//! Exploration of discovered territory.
//!
//! Each attempt rolls against `50 + skill - terrain difficulty`. Success adds
//! `10 + skill / 5` progress; crossing the 25/50/75/100 marks can turn up a
//! resource node, an encounter, an event and finally the area's secret.

use serde::{Deserialize, Serialize};

use super::{ActionFailure, GameClock, SkillProvider, TerritoryEngine};
use crate::biomes::Biome;
use crate::hex::HexCoord;
use crate::tile::Terrain;

pub const EXPLORATION_SKILL: &str = "exploration";
const SUCCESS_XP: f64 = 10.0;
const FAILURE_XP: f64 = 3.0;
const NPC_CHANCE: f64 = 0.5;
const EVENT_CHANCE: f64 = 0.4;
/// Units in a freshly found resource node.
const NODE_SIZE: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Fish,
    FreshWater,
    Clay,
    Fibre,
    Herbs,
    Fruit,
    Timber,
    Stone,
    Ore,
    Obsidian,
}

impl ResourceKind {
    /// What a tile of this terrain can yield.
    pub fn for_terrain(terrain: Terrain) -> &'static [ResourceKind] {
        match terrain {
            Terrain::Sea => &[],
            Terrain::Beach => &[ResourceKind::Fish, ResourceKind::Fibre],
            Terrain::River => &[ResourceKind::FreshWater, ResourceKind::Clay, ResourceKind::Fish],
            Terrain::Land(Biome::Savanna) => &[ResourceKind::Fibre, ResourceKind::Clay],
            Terrain::Land(Biome::Grassland) => &[ResourceKind::Herbs, ResourceKind::Fibre],
            Terrain::Land(Biome::Jungle) => &[ResourceKind::Fruit, ResourceKind::Timber, ResourceKind::Herbs],
            Terrain::Land(Biome::ScrubHills) => &[ResourceKind::Stone, ResourceKind::Fibre],
            Terrain::Land(Biome::HighlandForest) => &[ResourceKind::Timber, ResourceKind::Herbs],
            Terrain::Land(Biome::JungleHills) => &[ResourceKind::Fruit, ResourceKind::Stone],
            Terrain::Land(Biome::Mountain) => &[ResourceKind::Ore, ResourceKind::Obsidian, ResourceKind::Stone],
            Terrain::Land(Biome::CloudForest) => &[ResourceKind::Herbs, ResourceKind::FreshWater],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub kind: ResourceKind,
    pub remaining: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NpcKind {
    Hunter,
    Trader,
    Hermit,
    Scout,
    Castaway,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IslandEvent {
    AbandonedCamp,
    AnimalTracks,
    AncientCarvings,
    Rockslide,
    HiddenCache,
}

/// Something found while exploring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Discovery {
    Resource(ResourceKind),
    Npc(NpcKind),
    Event(IslandEvent),
    LandmarkSecret,
}

/// A non-resource discovery stamped with the game minute it happened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerritoryEvent {
    pub discovery: Discovery,
    pub minute: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExploreResult {
    pub success: bool,
    pub progress: f64,
    pub fully_explored: bool,
    pub discoveries: Vec<Discovery>,
    pub failure: Option<ActionFailure>,
}

impl ExploreResult {
    fn failed(reason: ActionFailure) -> Self {
        Self {
            failure: Some(reason),
            ..Default::default()
        }
    }
}

impl TerritoryEngine {
    /// One exploration attempt on a discovered land tile.
    pub fn attempt_explore(
        &mut self,
        position: HexCoord,
        skills: &mut impl SkillProvider,
        clock: &impl GameClock,
    ) -> ExploreResult {
        let Some(territory) = self.territories.get(position) else {
            return ExploreResult::failed(ActionFailure::OutOfBounds);
        };
        if !territory.is_passable() {
            return ExploreResult::failed(ActionFailure::Impassable);
        }
        if !territory.discovered {
            return ExploreResult::failed(ActionFailure::Undiscovered);
        }
        if territory.fully_explored {
            return ExploreResult::failed(ActionFailure::AlreadyExplored);
        }

        let skill = skills.effective_skill(EXPLORATION_SKILL);
        let chance = 50.0 + skill - territory.terrain.exploration_difficulty();
        let terrain = territory.terrain;
        let before = territory.exploration_progress;

        if self.rng.next() * 100.0 >= chance {
            skills.gain_skill_xp(EXPLORATION_SKILL, FAILURE_XP);
            return ExploreResult {
                success: false,
                progress: before,
                ..Default::default()
            };
        }

        let after = (before + 10.0 + skill / 5.0).min(100.0);
        let discoveries = self.roll_discoveries(terrain, before, after);

        let minute = clock.current_minute();
        let Some(territory) = self.territories.get_mut(position) else {
            return ExploreResult::failed(ActionFailure::OutOfBounds);
        };
        territory.exploration_progress = after;
        territory.fully_explored = after >= 100.0;
        for discovery in &discoveries {
            match discovery {
                Discovery::Resource(kind) => territory.resource_nodes.push(ResourceNode {
                    kind: *kind,
                    remaining: NODE_SIZE,
                }),
                other => territory.events.push(TerritoryEvent {
                    discovery: other.clone(),
                    minute,
                }),
            }
        }
        let fully_explored = territory.fully_explored;

        skills.gain_skill_xp(EXPLORATION_SKILL, SUCCESS_XP);
        if fully_explored {
            tracing::info!("{} fully explored", position);
        }

        ExploreResult {
            success: true,
            progress: after,
            fully_explored,
            discoveries,
            failure: None,
        }
    }

    /// Discoveries for every threshold crossed moving from `before` to `after`.
    fn roll_discoveries(&mut self, terrain: Terrain, before: f64, after: f64) -> Vec<Discovery> {
        let crossed = |mark: f64| before < mark && after >= mark;
        let mut found = Vec::new();

        if crossed(25.0) {
            if let Some(kind) = self.rng.choice(ResourceKind::for_terrain(terrain)) {
                found.push(Discovery::Resource(*kind));
            }
        }
        if crossed(50.0) && self.rng.bool(NPC_CHANCE) {
            const NPCS: [NpcKind; 5] = [
                NpcKind::Hunter,
                NpcKind::Trader,
                NpcKind::Hermit,
                NpcKind::Scout,
                NpcKind::Castaway,
            ];
            if let Some(npc) = self.rng.choice(&NPCS) {
                found.push(Discovery::Npc(*npc));
            }
        }
        if crossed(75.0) && self.rng.bool(EVENT_CHANCE) {
            const EVENTS: [IslandEvent; 5] = [
                IslandEvent::AbandonedCamp,
                IslandEvent::AnimalTracks,
                IslandEvent::AncientCarvings,
                IslandEvent::Rockslide,
                IslandEvent::HiddenCache,
            ];
            if let Some(event) = self.rng.choice(&EVENTS) {
                found.push(Discovery::Event(*event));
            }
        }
        if crossed(100.0) {
            found.push(Discovery::LandmarkSecret);
        }

        found
    }

    /// Take one unit from the first non-empty resource node on a tile.
    pub fn gather(&mut self, position: HexCoord) -> Result<ResourceKind, ActionFailure> {
        let territory = self
            .territories
            .get_mut(position)
            .ok_or(ActionFailure::OutOfBounds)?;
        let node = territory
            .resource_nodes
            .iter_mut()
            .find(|n| n.remaining > 0)
            .ok_or(ActionFailure::Depleted)?;
        node.remaining -= 1;
        Ok(node.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_land_terrain_yields_something() {
        assert!(ResourceKind::for_terrain(Terrain::Sea).is_empty());
        assert!(!ResourceKind::for_terrain(Terrain::Beach).is_empty());
        assert!(!ResourceKind::for_terrain(Terrain::River).is_empty());
        for biome in Biome::ALL {
            assert!(!ResourceKind::for_terrain(Terrain::Land(biome)).is_empty());
        }
    }
}
