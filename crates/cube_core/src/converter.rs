use std::fmt;

use serde::Serialize;
use shared::domain::{Color, CubeState, FaceId};

pub const SOLVED_CANONICAL: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";

/// Fixed color-to-face-letter table. The solving backend assumes this
/// orientation, so it is not configurable.
pub fn face_letter(color: Color) -> char {
    match color {
        Color::White => 'U',
        Color::Green => 'R',
        Color::Red => 'F',
        Color::Yellow => 'D',
        Color::Blue => 'L',
        Color::Orange => 'B',
    }
}

/// 54 face letters laid out Up, Right, Front, Down, Left, Back, each face row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CanonicalString(String);

impl CanonicalString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_solved(&self) -> bool {
        self.0 == SOLVED_CANONICAL
    }
}

impl AsRef<str> for CanonicalString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unset stickers become the Up letter. Only validated cubes may be submitted,
/// so the substitute only ever shows up in diagnostics.
pub fn to_canonical(state: &CubeState) -> CanonicalString {
    CanonicalString(
        state
            .stickers()
            .map(|(_, _, sticker)| sticker.map_or(FaceId::Up.letter(), face_letter))
            .collect(),
    )
}
