use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use engine::{EngineError, GridPos};

pub const DEMO_LEVEL_JSON: &str = include_str!("../assets/demo_level.json");

/// A level as authored: tile placements plus entity placements. Validated
/// structurally here; cross-entity rules (exactly one player, a goal present)
/// are enforced when a level is built from this data.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelData {
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub ground_tiles: Vec<TileRecord>,
    #[serde(default)]
    pub wall_tiles: Vec<TileRecord>,
    pub entities: Vec<EntityRecord>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TileRecord {
    pub id: u16,
    pub cell: GridPos,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityRecord {
    pub kind: EntityKind,
    pub cell: GridPos,
    #[serde(default)]
    pub fields: EntityFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Truck,
    PatrolLight,
    Goal,
    HelpText,
}

/// Kind-specific attributes. Flat rather than per-kind structs so authored
/// files stay uniform; which fields are required depends on the kind.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityFields {
    pub light_id: Option<u32>,
    pub order: Option<usize>,
    pub text: Option<String>,
}

#[derive(Debug, Error)]
pub enum LevelDataError {
    #[error("failed to parse level {name}: {message}")]
    Parse { name: String, message: String },
    #[error("level {name} must contain exactly one player start")]
    MissingPlayer { name: String },
    #[error("level {name} contains more than one player start")]
    DuplicatePlayer { name: String },
    #[error("level {name} has no goal")]
    MissingGoal { name: String },
    #[error("patrol light at ({x}, {y}) is missing its {field} field", x = .cell.x, y = .cell.y)]
    LightField { cell: GridPos, field: &'static str },
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl LevelData {
    pub fn from_json_str(name: &str, json: &str) -> Result<Self, LevelDataError> {
        let deserializer = &mut serde_json::Deserializer::from_str(json);
        let data: LevelData =
            serde_path_to_error::deserialize(deserializer).map_err(|err| LevelDataError::Parse {
                name: name.to_string(),
                message: err.to_string(),
            })?;
        Ok(data)
    }

    pub fn player_start(&self) -> Result<GridPos, LevelDataError> {
        let mut starts = self
            .entities
            .iter()
            .filter(|entity| entity.kind == EntityKind::Player);
        let first = starts.next().ok_or_else(|| LevelDataError::MissingPlayer {
            name: self.name.clone(),
        })?;
        if starts.next().is_some() {
            return Err(LevelDataError::DuplicatePlayer {
                name: self.name.clone(),
            });
        }
        Ok(first.cell)
    }

    pub fn goal_cell(&self) -> Result<GridPos, LevelDataError> {
        self.entities
            .iter()
            .find(|entity| entity.kind == EntityKind::Goal)
            .map(|entity| entity.cell)
            .ok_or_else(|| LevelDataError::MissingGoal {
                name: self.name.clone(),
            })
    }

    pub fn truck_cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.entities
            .iter()
            .filter(|entity| entity.kind == EntityKind::Truck)
            .map(|entity| entity.cell)
    }

    pub fn help_texts(&self) -> impl Iterator<Item = (GridPos, &str)> + '_ {
        self.entities
            .iter()
            .filter(|entity| entity.kind == EntityKind::HelpText)
            .filter_map(|entity| {
                entity
                    .fields
                    .text
                    .as_deref()
                    .map(|text| (entity.cell, text))
            })
    }

    /// Waypoint paths of the patrol lights, keyed by light id, each ordered
    /// by the authored `order` field. Both fields are mandatory on a patrol
    /// light record.
    pub fn light_paths(&self) -> Result<BTreeMap<u32, Vec<GridPos>>, LevelDataError> {
        let mut ordered: BTreeMap<u32, BTreeMap<usize, GridPos>> = BTreeMap::new();
        for entity in &self.entities {
            if entity.kind != EntityKind::PatrolLight {
                continue;
            }
            let light_id = entity.fields.light_id.ok_or(LevelDataError::LightField {
                cell: entity.cell,
                field: "light_id",
            })?;
            let order = entity.fields.order.ok_or(LevelDataError::LightField {
                cell: entity.cell,
                field: "order",
            })?;
            ordered.entry(light_id).or_default().insert(order, entity.cell);
        }
        Ok(ordered
            .into_iter()
            .map(|(id, path)| (id, path.into_values().collect()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_level_parses_and_satisfies_entity_rules() {
        let data = LevelData::from_json_str("demo", DEMO_LEVEL_JSON).expect("parse");
        data.player_start().expect("player start");
        data.goal_cell().expect("goal");
        let paths = data.light_paths().expect("light paths");
        assert!(!paths.is_empty());
    }

    #[test]
    fn parse_error_names_the_offending_path() {
        let err = LevelData::from_json_str("broken", r#"{"name": "x", "width": "wide"}"#)
            .expect_err("must fail");
        let LevelDataError::Parse { message, .. } = err else {
            panic!("expected parse error");
        };
        assert!(message.contains("width"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let json = r#"{"name": "x", "width": 4, "height": 4, "entities": [], "extra": 1}"#;
        assert!(LevelData::from_json_str("strict", json).is_err());
    }

    #[test]
    fn missing_player_is_reported() {
        let json = r#"{"name": "empty", "width": 4, "height": 4, "entities": []}"#;
        let data = LevelData::from_json_str("empty", json).expect("parse");
        assert!(matches!(
            data.player_start(),
            Err(LevelDataError::MissingPlayer { .. })
        ));
    }

    #[test]
    fn duplicate_player_is_reported() {
        let json = r#"{
            "name": "twins", "width": 4, "height": 4,
            "entities": [
                {"kind": "player", "cell": {"x": 1, "y": 1}},
                {"kind": "player", "cell": {"x": 2, "y": 2}}
            ]
        }"#;
        let data = LevelData::from_json_str("twins", json).expect("parse");
        assert!(matches!(
            data.player_start(),
            Err(LevelDataError::DuplicatePlayer { .. })
        ));
    }

    #[test]
    fn light_without_order_is_an_error() {
        let json = r#"{
            "name": "lights", "width": 4, "height": 4,
            "entities": [
                {"kind": "patrol_light", "cell": {"x": 1, "y": 1}, "fields": {"light_id": 0}}
            ]
        }"#;
        let data = LevelData::from_json_str("lights", json).expect("parse");
        assert!(matches!(
            data.light_paths(),
            Err(LevelDataError::LightField { field: "order", .. })
        ));
    }

    #[test]
    fn light_paths_are_sorted_by_order_not_file_position() {
        let json = r#"{
            "name": "lights", "width": 8, "height": 8,
            "entities": [
                {"kind": "patrol_light", "cell": {"x": 5, "y": 1}, "fields": {"light_id": 3, "order": 1}},
                {"kind": "patrol_light", "cell": {"x": 1, "y": 1}, "fields": {"light_id": 3, "order": 0}},
                {"kind": "patrol_light", "cell": {"x": 5, "y": 5}, "fields": {"light_id": 3, "order": 2}}
            ]
        }"#;
        let data = LevelData::from_json_str("lights", json).expect("parse");
        let paths = data.light_paths().expect("paths");
        assert_eq!(
            paths[&3],
            vec![
                GridPos::new(1, 1),
                GridPos::new(5, 1),
                GridPos::new(5, 5)
            ]
        );
    }
}
