use super::*;
use crate::converter::to_canonical;
use proptest::prelude::*;
use shared::domain::{CubeState, STICKER_COUNT};

fn cube_from(stickers: &[Option<Color>]) -> CubeState {
    let mut cube = CubeState::empty();
    for (position, sticker) in stickers.iter().enumerate() {
        cube.set_sticker(
            FaceId::ALL[position / STICKERS_PER_FACE],
            position % STICKERS_PER_FACE,
            *sticker,
        )
        .expect("index in range");
    }
    cube
}

fn any_color() -> impl Strategy<Value = Color> {
    prop::sample::select(Color::ALL.to_vec())
}

/// Nine of each color in a random arrangement.
fn balanced_stickers() -> impl Strategy<Value = Vec<Option<Color>>> {
    let pool: Vec<Option<Color>> = Color::ALL
        .into_iter()
        .flat_map(|color| std::iter::repeat(Some(color)).take(STICKERS_PER_FACE))
        .collect();
    Just(pool).prop_shuffle()
}

#[test]
fn empty_cube_has_not_started() {
    let verdict = validate(&CubeState::empty());
    assert_eq!(verdict.reason, ReasonCode::NotStarted);
    assert!(!verdict.is_structurally_valid);
    assert!(!verdict.can_solve);
    assert!(!verdict.show_error());
    assert_eq!(verdict.message(), "Start filling squares with colors");
}

#[test]
fn partially_filled_cube_is_incomplete() {
    let mut cube = CubeState::empty();
    cube.set_sticker(FaceId::Up, 4, Some(Color::White))
        .expect("set");
    let verdict = validate(&cube);
    assert_eq!(verdict.reason, ReasonCode::Incomplete { unset: 53 });
    assert!(verdict.show_error());
    assert_eq!(verdict.message(), "Fill all squares with colors (9 of each)");
    assert_eq!(verdict.reason.error_code(), Some(ErrorCode::Incomplete));
}

#[test]
fn reference_solved_cube_is_already_solved() {
    let verdict = validate(&CubeState::solved());
    assert_eq!(verdict.reason, ReasonCode::AlreadySolved);
    assert!(verdict.is_structurally_valid);
    assert!(verdict.is_already_solved);
    assert!(!verdict.can_solve);
    assert!(!verdict.show_error());
    assert_eq!(verdict.message(), "Cube is already solved!");
}

#[test]
fn one_yellow_sticker_on_top_names_both_colors() {
    let mut cube = CubeState::solved();
    cube.set_sticker(FaceId::Up, 0, Some(Color::Yellow))
        .expect("set");
    let verdict = validate(&cube);
    assert_eq!(
        verdict.reason,
        ReasonCode::WrongColorCounts {
            counts: vec![(Color::White, 8), (Color::Yellow, 10)]
        }
    );
    assert!(!verdict.can_solve);
    assert_eq!(
        verdict.message(),
        "Each color must appear exactly 9 times (W:8, Y:10)"
    );
}

#[test]
fn shared_opposite_center_is_rejected() {
    let mut cube = CubeState::solved();
    // Swap the bottom center with a top edge: counts stay at nine each.
    cube.set_sticker(FaceId::Up, 1, Some(Color::Yellow))
        .expect("set");
    cube.set_sticker(FaceId::Down, 4, Some(Color::White))
        .expect("set");
    let verdict = validate(&cube);
    assert_eq!(
        verdict.reason,
        ReasonCode::InvalidCenters {
            pairs: vec![(FaceId::Up, FaceId::Down)]
        }
    );
    assert!(!verdict.is_structurally_valid);
    assert_eq!(
        verdict.message(),
        "Invalid cube configuration - check center positions"
    );
}

#[test]
fn swapped_edge_stickers_pass_structural_validation() {
    let mut cube = CubeState::solved();
    cube.set_sticker(FaceId::Up, 7, Some(Color::Red))
        .expect("set");
    cube.set_sticker(FaceId::Front, 1, Some(Color::White))
        .expect("set");
    let verdict = validate(&cube);
    assert_eq!(verdict.reason, ReasonCode::Solvable);
    assert!(verdict.can_solve);
    assert!(verdict.is_structurally_valid);
    assert_eq!(verdict.message(), "Valid cube configuration");
}

#[test]
fn verdict_serializes_with_reason_tag() {
    let solved = serde_json::to_string(&validate(&CubeState::solved()).reason).expect("encode");
    assert_eq!(solved, r#"{"reason":"already_solved"}"#);

    let mut cube = CubeState::solved();
    cube.set_sticker(FaceId::Up, 0, None).expect("set");
    let incomplete = serde_json::to_string(&validate(&cube).reason).expect("encode");
    assert_eq!(incomplete, r#"{"reason":"incomplete","unset":1}"#);
}

proptest! {
    #[test]
    fn partial_fills_never_solve(
        stickers in prop::collection::vec(prop::option::of(any_color()), STICKER_COUNT)
    ) {
        let set = stickers.iter().filter(|s| s.is_some()).count();
        prop_assume!(set > 0 && set < STICKER_COUNT);

        let verdict = validate(&cube_from(&stickers));
        prop_assert!(!verdict.can_solve);
        let narrowed = matches!(
            verdict.reason,
            ReasonCode::Incomplete { .. } | ReasonCode::WrongColorCounts { .. }
        );
        prop_assert!(narrowed, "unexpected reason {:?}", verdict.reason);
    }

    #[test]
    fn monochrome_faces_are_solved_in_any_color_arrangement(
        colors in Just(Color::ALL.to_vec()).prop_shuffle()
    ) {
        let stickers: Vec<Option<Color>> = colors
            .iter()
            .flat_map(|color| std::iter::repeat(Some(*color)).take(STICKERS_PER_FACE))
            .collect();

        let verdict = validate(&cube_from(&stickers));
        prop_assert_eq!(verdict.reason, ReasonCode::AlreadySolved);
        prop_assert!(!verdict.can_solve);
    }

    #[test]
    fn balanced_cubes_convert_deterministically(stickers in balanced_stickers()) {
        let cube = cube_from(&stickers);
        let verdict = validate(&cube);
        prop_assume!(verdict.is_structurally_valid);

        let first = to_canonical(&cube);
        let second = to_canonical(&cube);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.as_str().len(), STICKER_COUNT);
        for letter in ['U', 'R', 'F', 'D', 'L', 'B'] {
            prop_assert_eq!(first.as_str().chars().filter(|c| *c == letter).count(), 9);
        }
    }
}
