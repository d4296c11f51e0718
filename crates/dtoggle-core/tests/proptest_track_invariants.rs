//! Property-based invariant tests for track geometry and entity vocabulary.
//!
//! 1. clamp never leaves `[0, max_offset]`.
//! 2. clamp is the identity inside the legal range.
//! 3. resolve uses the strict `offset < extent / 2` tie-break.
//! 4. resolve is monotone: moving the thumb away from the leading edge never
//!    flips Off back to On.
//! 5. Every vocabulary maps unknown raw words to Off.

use dtoggle_core::{BinaryState, EntityKind, TrackSpan};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn track_span() -> impl Strategy<Value = TrackSpan> {
    (0i32..=2_000, 0i32..=2_000).prop_map(|(track, thumb)| TrackSpan::new(track, thumb))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. clamp never leaves the legal range
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn clamp_stays_in_bounds(span in track_span(), offset in any::<i32>()) {
        let clamped = span.clamp(offset);
        prop_assert!(clamped >= 0, "negative offset {} for {:?}", clamped, span);
        prop_assert!(
            clamped <= span.max_offset(),
            "offset {} past max {} for {:?}", clamped, span.max_offset(), span
        );
        prop_assert!(span.max_offset() <= span.track_extent.max(0));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. clamp is the identity inside the range
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn clamp_identity_inside_range(span in track_span(), frac in 0.0f64..=1.0) {
        let offset = (f64::from(span.max_offset()) * frac).floor() as i32;
        prop_assert_eq!(span.clamp(offset), offset);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. strict midpoint tie-break
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn midpoint_tie_break(half in 1i32..=1_000, thumb in 0i32..=500) {
        let span = TrackSpan::new(half * 2, thumb);
        prop_assert_eq!(span.resolve(half - 1), BinaryState::On);
        prop_assert_eq!(span.resolve(half), BinaryState::Off);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. resolve is monotone in the offset
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resolve_is_monotone(span in track_span(), a in -100i32..=2_100, b in -100i32..=2_100) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if span.resolve(lo) == BinaryState::Off {
            prop_assert_eq!(span.resolve(hi), BinaryState::Off);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. unknown words are Off
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unknown_words_are_off(raw in "[a-z_]{0,12}") {
        for kind in [EntityKind::Generic, EntityKind::Lock] {
            let vocab = kind.binding().vocabulary;
            let expected = BinaryState::from_on(raw == vocab.on);
            prop_assert_eq!(vocab.interpret(&raw), expected);
        }
    }
}
