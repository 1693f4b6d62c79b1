mod common;

use common::{seeds, Event, RecordingBackend};
use ripple_canvas::targets::Extent;
use ripple_canvas::{Effect, EffectConfig, PlatformProfile};

fn effect(constrained: bool, width: u32, height: u32) -> Effect<RecordingBackend> {
    Effect::new(
        RecordingBackend::default(),
        PlatformProfile::new(constrained),
        EffectConfig::default(),
        Box::new(seeds()),
        1.0,
        width,
        height,
    )
    .unwrap()
}

fn drawn(effect: &mut Effect<RecordingBackend>, now_ms: f64) -> bool {
    effect.frame(now_ms).unwrap()
}

#[test]
fn first_frame_paints_initial_press() {
    let mut fx = effect(false, 800, 600);
    assert!(drawn(&mut fx, 20.0));

    let u = fx.pipeline().uniforms();
    assert_eq!(u.cursor[0], 0.66);
    assert!((u.cursor[1] - 0.7).abs() < 1e-6);
    assert_eq!(u.elapsed_since_trigger, 0.0);
    assert!(u.trigger_seed.iter().all(|s| (0.0..1.0).contains(s)));
    assert!(!fx.pointer().triggered);
}

#[test]
fn cursor_is_last_press_before_frame() {
    let mut fx = effect(false, 800, 600);
    drawn(&mut fx, 20.0);

    assert!(fx.press(80.0, 60.0, 800.0, 600.0));
    assert!(fx.press(200.0, 450.0, 800.0, 600.0));
    assert!(drawn(&mut fx, 40.0));

    let u = fx.pipeline().uniforms();
    assert_eq!(u.cursor, [0.25, 0.25]);
    assert!(!fx.pointer().triggered);

    // Consumed once: the next frame keeps the cursor and accumulates time.
    assert!(drawn(&mut fx, 60.0));
    let u = fx.pipeline().uniforms();
    assert_eq!(u.cursor, [0.25, 0.25]);
    assert!((u.elapsed_since_trigger - 0.04).abs() < 1e-6);
}

#[test]
fn elapsed_time_grows_until_next_trigger() {
    let mut fx = effect(false, 800, 600);
    let mut last = -1.0f32;
    let mut t = 0.0;
    for _ in 0..30 {
        t += 17.0;
        if drawn(&mut fx, t) {
            let elapsed = fx.pipeline().uniforms().elapsed_since_trigger;
            assert!(elapsed >= last);
            last = elapsed;
        }
    }
    assert!(last > 0.4);

    fx.record_pointer(0.1, 0.1);
    t += 17.0;
    assert!(drawn(&mut fx, t));
    let elapsed = fx.pipeline().uniforms().elapsed_since_trigger;
    assert!((elapsed - 0.017).abs() < 1e-6, "trigger frame only carries its own delta: {elapsed}");
}

#[test]
fn clear_request_suppresses_feedback_for_its_window() {
    let mut fx = effect(false, 800, 600);
    drawn(&mut fx, 20.0);
    assert_eq!(fx.pipeline().uniforms().clear_mix, 1.0);

    fx.clear(30.0);
    assert!(drawn(&mut fx, 40.0));
    assert_eq!(fx.pipeline().uniforms().clear_mix, 0.0);
    assert!(drawn(&mut fx, 60.0));
    assert_eq!(fx.pipeline().uniforms().clear_mix, 0.0);

    // Window ends at 90ms even though the tick at 100ms is the first to see it.
    assert!(!drawn(&mut fx, 70.0));
    assert!(drawn(&mut fx, 100.0));
    assert_eq!(fx.pipeline().uniforms().clear_mix, 1.0);
}

#[test]
fn relayout_flushes_trails_for_a_hundred_ms() {
    let mut fx = effect(false, 800, 600);
    assert!(drawn(&mut fx, 20.0));
    assert_eq!(fx.pipeline().uniforms().clear_mix, 1.0);

    fx.relayout(1024, 768, 1.0, 30.0).unwrap();
    assert!(drawn(&mut fx, 40.0));
    assert_eq!(fx.pipeline().uniforms().clear_mix, 0.0);
    assert!(drawn(&mut fx, 120.0));
    assert_eq!(fx.pipeline().uniforms().clear_mix, 0.0);

    assert!(drawn(&mut fx, 140.0));
    assert_eq!(fx.pipeline().uniforms().clear_mix, 1.0);
}

#[test]
fn relayout_on_constrained_platform_scales_buffers() {
    let mut fx = effect(true, 800, 600);
    assert_eq!(fx.pipeline().targets().unwrap().extent(), Extent::new(480, 360));

    fx.relayout(1600, 900, 1.0, 0.0).unwrap();
    assert_eq!(fx.pipeline().targets().unwrap().extent(), Extent::new(960, 540));
    assert!((fx.pipeline().uniforms().aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    assert_eq!(fx.surface().viewport(), Some(Extent::new(1600, 900)));
}

#[test]
fn relayout_clamps_density_to_profile_cap() {
    let mut fx = effect(true, 800, 600);
    assert!(fx.surface().profile().constrained);

    fx.relayout(800, 600, 3.0, 0.0).unwrap();
    assert_eq!(fx.surface().pixel_ratio(), 1.25);
    let last_surface = fx
        .pipeline()
        .backend()
        .events()
        .into_iter()
        .rev()
        .find(|e| matches!(e, Event::Surface(..)));
    assert_eq!(last_surface, Some(Event::Surface(Extent::new(800, 600), 1.25)));

    let mut desktop = effect(false, 800, 600);
    desktop.relayout(800, 600, 3.0, 0.0).unwrap();
    assert_eq!(desktop.surface().pixel_ratio(), 2.0);
    assert!(!desktop.surface().profile().constrained);
}

#[test]
fn relayout_releases_old_pair_before_allocating() {
    let mut fx = effect(false, 800, 600);
    fx.relayout(1024, 768, 1.0, 0.0).unwrap();

    let events = fx.pipeline().backend().events();
    let tail: Vec<_> = events
        .iter()
        .skip_while(|e| !matches!(e, Event::Surface(ext, _) if ext.width == 1024))
        .cloned()
        .collect();
    assert_eq!(
        tail,
        vec![
            Event::Surface(Extent::new(1024, 768), 1.0),
            Event::Released(1),
            Event::Released(2),
            Event::Created(3, Extent::new(1024, 768)),
            Event::Created(4, Extent::new(1024, 768)),
        ]
    );
}

#[test]
fn frames_ping_pong_between_targets() {
    let mut fx = effect(false, 64, 64);
    for t in [20.0, 40.0, 60.0, 80.0] {
        assert!(drawn(&mut fx, t));
    }
    let passes: Vec<_> = fx
        .pipeline()
        .backend()
        .events()
        .into_iter()
        .filter_map(|e| match e {
            Event::Feedback { source, dest, .. } => Some((source, dest)),
            Event::Composite(src) => Some((src, 0)),
            _ => None,
        })
        .collect();
    assert_eq!(
        passes,
        vec![(1, 2), (2, 0), (2, 1), (1, 0), (1, 2), (2, 0), (2, 1), (1, 0)]
    );
    // Four swaps: back where we started.
    assert_eq!(fx.pipeline().targets().unwrap().front().id, 1);
}

#[test]
fn thirty_fps_cap_drops_ticks() {
    let mut fx = effect(true, 800, 600);
    let mut accepted = Vec::new();
    for i in 0..100 {
        let t = i as f64 * 10.0;
        if drawn(&mut fx, t) {
            accepted.push(t);
        }
    }
    assert!(accepted.len() <= 30);
    for pair in accepted.windows(2) {
        assert!(pair[1] - pair[0] >= 1000.0 / 30.0);
    }
    assert_eq!(fx.pipeline().backend().feedback_uniforms().len(), accepted.len());
}

#[test]
fn touch_session_ignores_mouse_presses() {
    let mut fx = effect(false, 800, 600);
    drawn(&mut fx, 20.0);

    fx.touch_start(400.0, 300.0, 800.0, 600.0);
    assert!(!fx.press(0.0, 0.0, 800.0, 600.0));
    drawn(&mut fx, 40.0);
    assert_eq!(fx.pipeline().uniforms().cursor, [0.5, 0.5]);
}

#[test]
fn stopped_effect_ignores_ticks_and_input() {
    let mut fx = effect(false, 800, 600);
    assert!(drawn(&mut fx, 20.0));
    fx.stop();
    assert!(!fx.is_running());
    let before = fx.pipeline().backend().events().len();

    assert!(!drawn(&mut fx, 40.0));
    assert!(!fx.press(200.0, 450.0, 800.0, 600.0));
    fx.touch_start(400.0, 300.0, 800.0, 600.0);
    fx.clear(50.0);
    fx.relayout(1024, 768, 2.0, 60.0).unwrap();

    assert_eq!(fx.pipeline().backend().events().len(), before);
    assert!(!fx.pointer().triggered);
    assert!(!fx.pointer().clear_requested);
    assert_eq!(fx.surface().viewport(), Some(Extent::new(800, 600)));
}

#[test]
fn dropping_the_effect_releases_both_targets() {
    let fx = effect(false, 64, 64);
    let journal = fx.pipeline().backend().journal.clone();
    drop(fx);

    let released: Vec<_> = journal
        .borrow()
        .iter()
        .filter_map(|e| match e {
            Event::Released(id) => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(released.len(), 2);
    assert!(released.contains(&1) && released.contains(&2));
}
