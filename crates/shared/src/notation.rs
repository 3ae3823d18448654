//! Move-token grammar and the fixed human-readable description of every token.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::FaceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    Clockwise,
    CounterClockwise,
    Double,
}

impl Turn {
    fn suffix(self) -> &'static str {
        match self {
            Turn::Clockwise => "",
            Turn::CounterClockwise => "'",
            Turn::Double => "2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slice {
    Middle,
    Equatorial,
    Standing,
}

impl Slice {
    fn letter(self) -> char {
        match self {
            Slice::Middle => 'M',
            Slice::Equatorial => 'E',
            Slice::Standing => 'S',
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            Slice::Middle => "middle layer (between L and R)",
            Slice::Equatorial => "equatorial layer (between U and D)",
            Slice::Standing => "standing layer (between F and B)",
        }
    }

    /// Face whose turn direction the slice follows.
    fn follows(self) -> FaceId {
        match self {
            Slice::Middle => FaceId::Left,
            Slice::Equatorial => FaceId::Down,
            Slice::Standing => FaceId::Front,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn letter(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        }
    }

    fn follows(self) -> FaceId {
        match self {
            Axis::X => FaceId::Right,
            Axis::Y => FaceId::Up,
            Axis::Z => FaceId::Front,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Face(FaceId),
    Wide(FaceId),
    Slice(Slice),
    Rotation(Axis),
}

/// A token of the closed move grammar: `<Face><Modifier>?`, `<Face>w<Modifier>?`,
/// a slice `M|E|S` or a whole-cube rotation `x|y|z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveToken {
    pub layer: Layer,
    pub turn: Turn,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized move token {0:?}")]
pub struct NotationError(pub String);

impl FromStr for MoveToken {
    type Err = NotationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let err = || NotationError(raw.to_string());
        let mut chars = raw.chars();
        let head = chars.next().ok_or_else(err)?;
        let mut rest = chars.as_str();

        let layer = match head {
            'M' => Layer::Slice(Slice::Middle),
            'E' => Layer::Slice(Slice::Equatorial),
            'S' => Layer::Slice(Slice::Standing),
            'x' => Layer::Rotation(Axis::X),
            'y' => Layer::Rotation(Axis::Y),
            'z' => Layer::Rotation(Axis::Z),
            letter => {
                let face = FaceId::from_letter(letter).ok_or_else(err)?;
                if let Some(after_w) = rest.strip_prefix('w') {
                    rest = after_w;
                    Layer::Wide(face)
                } else {
                    Layer::Face(face)
                }
            }
        };

        let turn = match rest {
            "" => Turn::Clockwise,
            "'" => Turn::CounterClockwise,
            "2" => Turn::Double,
            _ => return Err(err()),
        };

        Ok(Self { layer, turn })
    }
}

impl fmt::Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.layer {
            Layer::Face(face) => write!(f, "{}", face.letter())?,
            Layer::Wide(face) => write!(f, "{}w", face.letter())?,
            Layer::Slice(slice) => write!(f, "{}", slice.letter())?,
            Layer::Rotation(axis) => write!(f, "{}", axis.letter())?,
        }
        f.write_str(self.turn.suffix())
    }
}

impl MoveToken {
    pub fn description(&self) -> String {
        let quarter = |turn: Turn| match turn {
            Turn::Clockwise => "clockwise 90°",
            Turn::CounterClockwise => "counter-clockwise 90°",
            Turn::Double => "180°",
        };

        match self.layer {
            Layer::Face(face) => format!(
                "Turn the {} face {}",
                face.human_name(),
                quarter(self.turn)
            ),
            Layer::Wide(face) => format!(
                "Turn the {} two layers {}",
                face.human_name(),
                quarter(self.turn)
            ),
            Layer::Slice(slice) => match self.turn {
                Turn::Double => format!("Turn the {} 180°", slice.phrase()),
                turn => format!(
                    "Turn the {} like {}{}",
                    slice.phrase(),
                    slice.follows().letter(),
                    turn.suffix()
                ),
            },
            Layer::Rotation(axis) => format!(
                "Rotate the entire cube like {}{}",
                axis.follows().letter(),
                self.turn.suffix()
            ),
        }
    }
}

/// Description for any notation string; unknown tokens get a generic text.
pub fn describe(notation: &str) -> String {
    match notation.parse::<MoveToken>() {
        Ok(token) => token.description(),
        Err(_) => format!("Perform move: {notation}"),
    }
}

/// One step of a solution. The description is derived from the notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    notation: String,
    description: String,
}

impl Move {
    pub fn new(notation: impl Into<String>) -> Self {
        let notation = notation.into().trim().to_string();
        let description = describe(&notation);
        Self {
            notation,
            description,
        }
    }

    pub fn notation(&self) -> &str {
        &self.notation
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn token(&self) -> Option<MoveToken> {
        self.notation.parse().ok()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation)
    }
}
