#![no_main]

use arbitrary::Arbitrary;
use dtoggle_core::{
    HitTarget, Offset, PointerInput, Size, StateSnapshot, ThumbGeometry, ToggleConfig,
};
use dtoggle_widgets::{DragToggle, ListenerRegistry};
use libfuzzer_sys::fuzz_target;
use web_time::Instant;

#[derive(Debug, Arbitrary)]
enum Step {
    Refresh(bool),
    Down {
        thumb: bool,
        x: i16,
        y: i16,
        track: u8,
        size: u8,
        origin: u8,
    },
    Move { x: i16, y: i16 },
    Up,
    Cancel,
    Click(bool),
    GeometryLost,
    Disconnect,
    Connect,
}

fuzz_target!(|steps: Vec<Step>| {
    let Ok(config) = ToggleConfig::for_entity("switch.fuzz") else {
        return;
    };
    let registry = ListenerRegistry::new();
    let mut toggle = DragToggle::new(config, registry.clone());
    let now = Instant::now();

    for step in steps {
        match step {
            Step::Refresh(on) => {
                let raw = if on { "on" } else { "off" };
                toggle.refresh(&StateSnapshot::new().with("switch.fuzz", raw));
            }
            Step::Down {
                thumb,
                x,
                y,
                track,
                size,
                origin,
            } => {
                let geometry = ThumbGeometry {
                    thumb_offset: Offset::new(0, i32::from(origin)),
                    thumb_size: Size::new(i32::from(size), i32::from(size)),
                    track_size: Size::new(i32::from(size), i32::from(track)),
                };
                let target = if thumb { HitTarget::Thumb } else { HitTarget::Track };
                toggle.pointer_down(
                    target,
                    PointerInput::mouse(x.into(), y.into()),
                    Some(geometry),
                    now,
                );
            }
            Step::Move { x, y } => {
                toggle.pointer_move(PointerInput::mouse(x.into(), y.into()));
            }
            Step::Up => {
                toggle.pointer_up(PointerInput::mouse(0, 0), now);
            }
            Step::Cancel => {
                toggle.cancel(now);
            }
            Step::Click(thumb) => {
                let target = if thumb { HitTarget::Thumb } else { HitTarget::Track };
                toggle.click(target);
            }
            Step::GeometryLost => {
                toggle.invalidate_geometry();
            }
            Step::Disconnect => {
                toggle.disconnect(now);
                assert_eq!(registry.live_count(), 0);
            }
            Step::Connect => {
                toggle.connect();
            }
        }
        if let Some(offset) = toggle.drag_offset() {
            assert!(offset >= 0);
        }
        assert!(registry.live_count() == 0 || registry.live_count() == 4);
    }

    drop(toggle);
    assert_eq!(registry.live_count(), 0);
});
