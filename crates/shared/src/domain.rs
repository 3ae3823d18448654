use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const STICKERS_PER_FACE: usize = 9;
pub const FACE_COUNT: usize = 6;
pub const STICKER_COUNT: usize = STICKERS_PER_FACE * FACE_COUNT;
pub const CENTER_INDEX: usize = 4;

/// One of the six real sticker colors. An unset sticker is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    Yellow,
    Red,
    Orange,
    Green,
    Blue,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Yellow,
        Color::Red,
        Color::Orange,
        Color::Green,
        Color::Blue,
    ];

    pub fn code(self) -> char {
        match self {
            Color::White => 'W',
            Color::Yellow => 'Y',
            Color::Red => 'R',
            Color::Orange => 'O',
            Color::Green => 'G',
            Color::Blue => 'B',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'Y' => Some(Color::Yellow),
            'R' => Some(Color::Red),
            'O' => Some(Color::Orange),
            'G' => Some(Color::Green),
            'B' => Some(Color::Blue),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Yellow => "Yellow",
            Color::Red => "Red",
            Color::Orange => "Orange",
            Color::Green => "Green",
            Color::Blue => "Blue",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Faces in canonical solver order: Up, Right, Front, Down, Left, Back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FaceId {
    #[serde(rename = "U")]
    Up,
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "F")]
    Front,
    #[serde(rename = "D")]
    Down,
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "B")]
    Back,
}

impl FaceId {
    pub const ALL: [FaceId; 6] = [
        FaceId::Up,
        FaceId::Right,
        FaceId::Front,
        FaceId::Down,
        FaceId::Left,
        FaceId::Back,
    ];

    /// Pairs of faces that can never share a center color.
    pub const OPPOSITE_PAIRS: [(FaceId, FaceId); 3] = [
        (FaceId::Up, FaceId::Down),
        (FaceId::Front, FaceId::Back),
        (FaceId::Right, FaceId::Left),
    ];

    pub fn letter(self) -> char {
        match self {
            FaceId::Up => 'U',
            FaceId::Right => 'R',
            FaceId::Front => 'F',
            FaceId::Down => 'D',
            FaceId::Left => 'L',
            FaceId::Back => 'B',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        FaceId::ALL.into_iter().find(|face| face.letter() == letter)
    }

    pub fn opposite(self) -> Self {
        match self {
            FaceId::Up => FaceId::Down,
            FaceId::Down => FaceId::Up,
            FaceId::Right => FaceId::Left,
            FaceId::Left => FaceId::Right,
            FaceId::Front => FaceId::Back,
            FaceId::Back => FaceId::Front,
        }
    }

    /// Word used in move descriptions ("Turn the top face ...").
    pub fn human_name(self) -> &'static str {
        match self {
            FaceId::Up => "top",
            FaceId::Right => "right",
            FaceId::Front => "front",
            FaceId::Down => "bottom",
            FaceId::Left => "left",
            FaceId::Back => "back",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

pub type Sticker = Option<Color>;
pub type Face = [Sticker; STICKERS_PER_FACE];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CubeStateError {
    #[error("sticker index {index} is out of range for face {face} (expected 0..9)")]
    IndexOutOfRange { face: FaceId, index: usize },
    #[error("expected {expected} stickers, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("unrecognized sticker code {code:?} at position {position}")]
    UnknownCode { code: char, position: usize },
}

/// The sticker colors of all six faces, each read row-major with the center at index 4.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CubeState {
    faces: [Face; FACE_COUNT],
}

impl Default for CubeState {
    fn default() -> Self {
        Self::empty()
    }
}

impl CubeState {
    pub fn empty() -> Self {
        Self {
            faces: [[None; STICKERS_PER_FACE]; FACE_COUNT],
        }
    }

    pub fn solved() -> Self {
        let mut state = Self::empty();
        for face in FaceId::ALL {
            state.faces[face.index()] = [Some(solved_color(face)); STICKERS_PER_FACE];
        }
        state
    }

    pub fn face(&self, face: FaceId) -> &Face {
        &self.faces[face.index()]
    }

    pub fn center(&self, face: FaceId) -> Sticker {
        self.faces[face.index()][CENTER_INDEX]
    }

    pub fn sticker(&self, face: FaceId, index: usize) -> Result<Sticker, CubeStateError> {
        self.faces[face.index()]
            .get(index)
            .copied()
            .ok_or(CubeStateError::IndexOutOfRange { face, index })
    }

    pub fn set_sticker(
        &mut self,
        face: FaceId,
        index: usize,
        color: Sticker,
    ) -> Result<(), CubeStateError> {
        let slot = self.faces[face.index()]
            .get_mut(index)
            .ok_or(CubeStateError::IndexOutOfRange { face, index })?;
        *slot = color;
        Ok(())
    }

    /// All 54 stickers in canonical face order.
    pub fn stickers(&self) -> impl Iterator<Item = (FaceId, usize, Sticker)> + '_ {
        FaceId::ALL.into_iter().flat_map(move |face| {
            self.faces[face.index()]
                .iter()
                .enumerate()
                .map(move |(index, sticker)| (face, index, *sticker))
        })
    }

    pub fn color_counts(&self) -> ColorCounts {
        let mut counts = ColorCounts::default();
        for (_, _, sticker) in self.stickers() {
            match sticker {
                Some(color) => counts.real[color.index()] += 1,
                None => counts.unset += 1,
            }
        }
        counts
    }

    /// Color codes in URFDLB order, `.` for unset stickers.
    pub fn to_sticker_string(&self) -> String {
        self.stickers()
            .map(|(_, _, sticker)| sticker.map_or('.', Color::code))
            .collect()
    }
}

impl FromStr for CubeState {
    type Err = CubeStateError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let codes: Vec<char> = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if codes.len() != STICKER_COUNT {
            return Err(CubeStateError::WrongLength {
                expected: STICKER_COUNT,
                actual: codes.len(),
            });
        }

        let mut state = Self::empty();
        for (position, code) in codes.into_iter().enumerate() {
            let sticker = match code {
                '.' | '-' => None,
                other => Some(
                    Color::from_code(other)
                        .ok_or(CubeStateError::UnknownCode { code, position })?,
                ),
            };
            state.faces[position / STICKERS_PER_FACE][position % STICKERS_PER_FACE] = sticker;
        }
        Ok(state)
    }
}

/// Color of each face in the reference solved orientation.
pub fn solved_color(face: FaceId) -> Color {
    match face {
        FaceId::Up => Color::White,
        FaceId::Right => Color::Green,
        FaceId::Front => Color::Red,
        FaceId::Down => Color::Yellow,
        FaceId::Left => Color::Blue,
        FaceId::Back => Color::Orange,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorCounts {
    real: [usize; 6],
    unset: usize,
}

impl ColorCounts {
    pub fn get(&self, color: Color) -> usize {
        self.real[color.index()]
    }

    pub fn unset(&self) -> usize {
        self.unset
    }

    pub fn set(&self) -> usize {
        self.real.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_layout_matches_reference_orientation() {
        let cube = CubeState::solved();
        assert_eq!(cube.center(FaceId::Up), Some(Color::White));
        assert_eq!(cube.center(FaceId::Right), Some(Color::Green));
        assert_eq!(cube.center(FaceId::Back), Some(Color::Orange));
        let counts = cube.color_counts();
        for color in Color::ALL {
            assert_eq!(counts.get(color), 9);
        }
        assert_eq!(counts.unset(), 0);
    }

    #[test]
    fn set_sticker_rejects_out_of_range_index() {
        let mut cube = CubeState::empty();
        assert_eq!(
            cube.set_sticker(FaceId::Left, 9, Some(Color::Red)),
            Err(CubeStateError::IndexOutOfRange {
                face: FaceId::Left,
                index: 9
            })
        );
        cube.set_sticker(FaceId::Left, 8, Some(Color::Red))
            .expect("last index");
        assert_eq!(cube.sticker(FaceId::Left, 8), Ok(Some(Color::Red)));
    }

    #[test]
    fn sticker_string_parses_back_to_same_state() {
        let mut cube = CubeState::solved();
        cube.set_sticker(FaceId::Down, 0, None).expect("set");
        let text = cube.to_sticker_string();
        assert_eq!(text.len(), STICKER_COUNT);
        assert_eq!(&text[27..29], ".Y");
        assert_eq!(text.parse::<CubeState>(), Ok(cube));
    }

    #[test]
    fn parse_reports_unknown_codes_and_length() {
        assert_eq!(
            "WWW".parse::<CubeState>(),
            Err(CubeStateError::WrongLength {
                expected: 54,
                actual: 3
            })
        );
        let mut raw = CubeState::solved().to_sticker_string();
        raw.replace_range(10..11, "Q");
        assert_eq!(
            raw.parse::<CubeState>(),
            Err(CubeStateError::UnknownCode {
                code: 'Q',
                position: 10
            })
        );
    }

    #[test]
    fn opposite_faces_are_symmetric() {
        for face in FaceId::ALL {
            assert_eq!(face.opposite().opposite(), face);
            assert_ne!(face.opposite(), face);
        }
    }
}
