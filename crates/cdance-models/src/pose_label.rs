//! Pose catalog definitions.
//!
//! The catalog is closed: every classification result carries one of these
//! labels. Difficulty is reporting metadata and never influences
//! classification.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Difficulty tier of a pose.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulty tiers, easiest first.
    pub const ALL: &'static [Difficulty] = &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DifficultyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(DifficultyParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown difficulty: {0}")]
pub struct DifficultyParseError(String);

/// A named pose from the fixed catalog.
///
/// Serialized ids are the catalog keys used by training files and
/// choreography documents (e.g. `brazos_arriba`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
    Default,
)]
pub enum PoseLabel {
    #[serde(rename = "brazos_arriba")]
    ArmsUp,
    #[serde(rename = "brazos_extendidos_lateral")]
    ArmsSpread,
    #[serde(rename = "brazos_adelante")]
    ArmsForward,
    #[serde(rename = "agachado")]
    Crouch,
    #[serde(rename = "pierna_levantada_derecha")]
    RightLegRaised,
    #[serde(rename = "pierna_levantada_izquierda")]
    LeftLegRaised,
    #[serde(rename = "salto")]
    Jump,
    #[serde(rename = "giro_derecha")]
    TurnRight,
    #[serde(rename = "giro_izquierda")]
    TurnLeft,
    #[serde(rename = "manos_caderas")]
    HandsOnHips,
    #[serde(rename = "brazo_derecho_arriba")]
    RightArmUp,
    #[serde(rename = "brazo_izquierdo_arriba")]
    LeftArmUp,
    #[default]
    #[serde(rename = "neutral")]
    Neutral,
}

impl PoseLabel {
    /// The full catalog in canonical order.
    pub const ALL: &'static [PoseLabel] = &[
        PoseLabel::ArmsUp,
        PoseLabel::ArmsSpread,
        PoseLabel::ArmsForward,
        PoseLabel::Crouch,
        PoseLabel::RightLegRaised,
        PoseLabel::LeftLegRaised,
        PoseLabel::Jump,
        PoseLabel::TurnRight,
        PoseLabel::TurnLeft,
        PoseLabel::HandsOnHips,
        PoseLabel::RightArmUp,
        PoseLabel::LeftArmUp,
        PoseLabel::Neutral,
    ];

    /// Catalog id.
    pub fn as_str(&self) -> &'static str {
        match self {
            PoseLabel::ArmsUp => "brazos_arriba",
            PoseLabel::ArmsSpread => "brazos_extendidos_lateral",
            PoseLabel::ArmsForward => "brazos_adelante",
            PoseLabel::Crouch => "agachado",
            PoseLabel::RightLegRaised => "pierna_levantada_derecha",
            PoseLabel::LeftLegRaised => "pierna_levantada_izquierda",
            PoseLabel::Jump => "salto",
            PoseLabel::TurnRight => "giro_derecha",
            PoseLabel::TurnLeft => "giro_izquierda",
            PoseLabel::HandsOnHips => "manos_caderas",
            PoseLabel::RightArmUp => "brazo_derecho_arriba",
            PoseLabel::LeftArmUp => "brazo_izquierdo_arriba",
            PoseLabel::Neutral => "neutral",
        }
    }

    /// Human-readable name shown to players.
    pub fn display_name(&self) -> &'static str {
        match self {
            PoseLabel::ArmsUp => "Brazos arriba",
            PoseLabel::ArmsSpread => "Brazos en cruz",
            PoseLabel::ArmsForward => "Brazos adelante",
            PoseLabel::Crouch => "Agachado",
            PoseLabel::RightLegRaised => "Pierna derecha",
            PoseLabel::LeftLegRaised => "Pierna izquierda",
            PoseLabel::Jump => "Salto",
            PoseLabel::TurnRight => "Giro derecha",
            PoseLabel::TurnLeft => "Giro izquierda",
            PoseLabel::HandsOnHips => "Manos caderas",
            PoseLabel::RightArmUp => "Brazo derecho",
            PoseLabel::LeftArmUp => "Brazo izquierdo",
            PoseLabel::Neutral => "Neutral",
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        match self {
            PoseLabel::Crouch
            | PoseLabel::RightLegRaised
            | PoseLabel::LeftLegRaised
            | PoseLabel::TurnRight
            | PoseLabel::TurnLeft => Difficulty::Medium,
            PoseLabel::Jump => Difficulty::Hard,
            _ => Difficulty::Easy,
        }
    }
}

impl fmt::Display for PoseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PoseLabel {
    type Err = PoseLabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        PoseLabel::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == key)
            .ok_or_else(|| PoseLabelParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown pose label: {0}")]
pub struct PoseLabelParseError(String);
