//! Core identifier and timeline types shared across the crate

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Unique identifier for an entity in the world graph
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Unique identifier for a relationship edge
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelationshipId(pub u32);

/// Entity kind. The set is open: the five built-in kinds cover the stock
/// growth templates, and `Custom` carries anything registered beyond them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Actor,
    Faction,
    Rule,
    Ability,
    Location,
    Custom(String),
}

impl EntityKind {
    pub fn as_str(&self) -> &str {
        match self {
            EntityKind::Actor => "actor",
            EntityKind::Faction => "faction",
            EntityKind::Rule => "rule",
            EntityKind::Ability => "ability",
            EntityKind::Location => "location",
            EntityKind::Custom(s) => s.as_str(),
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "actor" => EntityKind::Actor,
            "faction" => EntityKind::Faction,
            "rule" => EntityKind::Rule,
            "ability" => EntityKind::Ability,
            "location" => EntityKind::Location,
            other => EntityKind::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EntityKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntityKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KindVisitor;

        impl Visitor<'_> for KindVisitor {
            type Value = EntityKind;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an entity kind string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<EntityKind, E> {
                Ok(EntityKind::from_name(v))
            }
        }

        deserializer.deserialize_str(KindVisitor)
    }
}

/// In-world renown tier. Ordered: entities climb this ladder over a run
/// and never fall back down.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Prominence {
    #[default]
    Unnoticed,
    Local,
    Notable,
    Renowned,
    Mythic,
}

impl Prominence {
    /// Next tier up, saturating at `Mythic`.
    pub fn step_up(self) -> Self {
        match self {
            Prominence::Unnoticed => Prominence::Local,
            Prominence::Local => Prominence::Notable,
            Prominence::Notable => Prominence::Renowned,
            Prominence::Renowned | Prominence::Mythic => Prominence::Mythic,
        }
    }
}

impl fmt::Display for Prominence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Prominence::Unnoticed => "unnoticed",
            Prominence::Local => "local",
            Prominence::Notable => "notable",
            Prominence::Renowned => "renowned",
            Prominence::Mythic => "mythic",
        };
        f.write_str(s)
    }
}

/// Snapshot of simulation time handed to systems and templates each tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimClock {
    pub tick: u64,
    pub epoch: u64,
    pub era: String,
}

impl SimClock {
    pub fn start(era: impl Into<String>) -> Self {
        Self {
            tick: 0,
            epoch: 0,
            era: era.into(),
        }
    }
}
