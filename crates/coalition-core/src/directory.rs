//! Unit/Room Directory: read-only, name-based lookups over a room snapshot.
//!
//! The workflow engine resolves every unit name dynamically at invocation
//! time against the current snapshot, so the directory is rebuilt per
//! invocation. "Not found" is an ordinary outcome (`Option`), never a panic:
//! the engine treats missing units as configuration state, not bugs.

use crate::shared::{Room, Unit};
use std::collections::HashMap;
use thiserror::Error;

/// Raised by [`verify_unique_unit_names`] when two units share a display name.
/// Name-based dispatch is only unambiguous under this invariant; the CRUD
/// layer is expected to enforce it on every edit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate unit name \"{name}\" (rooms \"{first_room}\" and \"{second_room}\")")]
pub struct DuplicateUnitName {
    pub name: String,
    pub first_room: String,
    pub second_room: String,
}

/// Checks the cross-room unit-name uniqueness invariant.
pub fn verify_unique_unit_names(rooms: &[Room]) -> Result<(), DuplicateUnitName> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for room in rooms {
        for unit in &room.units {
            if let Some(first_room) = seen.insert(unit.name.as_str(), room.name.as_str()) {
                return Err(DuplicateUnitName {
                    name: unit.name.clone(),
                    first_room: first_room.to_string(),
                    second_room: room.name.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Indexed lookup surface over one room snapshot. Build once per workflow
/// invocation; all lookups are then O(1) instead of repeated linear scans.
pub struct RoomDirectory<'a> {
    rooms: &'a [Room],
    units_by_name: HashMap<&'a str, (&'a Room, &'a Unit)>,
}

impl<'a> RoomDirectory<'a> {
    /// Index the snapshot. On duplicate names the first match (rooms in array
    /// order, units in array order within a room) wins, matching the scan
    /// contract.
    pub fn index(rooms: &'a [Room]) -> Self {
        let mut units_by_name: HashMap<&str, (&Room, &Unit)> = HashMap::new();
        for room in rooms {
            for unit in &room.units {
                units_by_name.entry(unit.name.as_str()).or_insert((room, unit));
            }
        }
        Self {
            rooms,
            units_by_name,
        }
    }

    pub fn find_unit(&self, name: &str) -> Option<&'a Unit> {
        self.units_by_name.get(name).map(|(_, unit)| *unit)
    }

    /// Like [`find_unit`](Self::find_unit) but also yields the containing room.
    pub fn find_unit_with_room(&self, name: &str) -> Option<(&'a Room, &'a Unit)> {
        self.units_by_name.get(name).copied()
    }

    pub fn find_room(&self, name: &str) -> Option<&'a Room> {
        self.rooms.iter().find(|room| room.name == name)
    }

    /// All units, rooms in order, units within a room in order.
    pub fn all_units(&self) -> impl Iterator<Item = (&'a Room, &'a Unit)> {
        self.rooms
            .iter()
            .flat_map(|room| room.units.iter().map(move |unit| (room, unit)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{LlmProviderRef, UnitType};

    fn unit(id: &str, name: &str) -> Unit {
        Unit {
            id: id.to_string(),
            name: name.to_string(),
            unit_type: UnitType::Standard,
            purpose: String::new(),
            is_loop_open: true,
            llm_provider: LlmProviderRef::default(),
        }
    }

    fn room(id: &str, name: &str, units: Vec<Unit>) -> Room {
        Room {
            id: id.to_string(),
            name: name.to_string(),
            manager: None,
            units,
            tools: Vec::new(),
        }
    }

    #[test]
    fn finds_units_and_rooms_by_name() {
        let rooms = vec![
            room("r1", "Admin Room", vec![unit("u1", "Admin Manager")]),
            room("r2", "Sanctions Room", vec![unit("u2", "Chat Responder")]),
        ];
        let dir = RoomDirectory::index(&rooms);

        assert_eq!(dir.find_unit("Chat Responder").map(|u| u.id.as_str()), Some("u2"));
        assert_eq!(dir.find_room("Admin Room").map(|r| r.id.as_str()), Some("r1"));
        assert!(dir.find_unit("Weather Unit").is_none());
        assert!(dir.find_room("Visual Room").is_none());

        let (containing, _) = dir.find_unit_with_room("Chat Responder").unwrap();
        assert_eq!(containing.name, "Sanctions Room");
    }

    #[test]
    fn first_match_wins_on_duplicate_names() {
        let rooms = vec![
            room("r1", "Admin Room", vec![unit("u1", "Echo")]),
            room("r2", "Sound Room", vec![unit("u2", "Echo")]),
        ];
        let dir = RoomDirectory::index(&rooms);
        assert_eq!(dir.find_unit("Echo").map(|u| u.id.as_str()), Some("u1"));

        let err = verify_unique_unit_names(&rooms).unwrap_err();
        assert_eq!(err.name, "Echo");
        assert_eq!(err.first_room, "Admin Room");
        assert_eq!(err.second_room, "Sound Room");
    }

    #[test]
    fn all_units_preserves_room_then_unit_order() {
        let rooms = vec![
            room("r1", "A", vec![unit("u1", "one"), unit("u2", "two")]),
            room("r2", "B", vec![unit("u3", "three")]),
        ];
        let dir = RoomDirectory::index(&rooms);
        let ids: Vec<&str> = dir.all_units().map(|(_, u)| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u2", "u3"]);
    }
}
