mod common;

use common::*;
use image::codecs::gif::Repeat;
use uvfx::FilterSource;

fn animated_filter(
    frames: usize,
    delay_ms: u32,
    repeat: Repeat,
) -> (
    tempfile::TempDir,
    std::sync::Arc<FakeHost>,
    std::sync::Arc<FakeGraphics>,
    std::sync::Arc<TestFilter>,
) {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("anim.gif");
    write_gif(&image, frames, delay_ms, repeat);

    let host = FakeHost::new(true);
    let graphics = FakeGraphics::new();
    let filter = create(dir.path(), settings_for(&image), &host, &graphics);
    filter.tick(0.016);
    assert!(filter.is_texture_ready());
    (dir, host, graphics, filter)
}

#[test]
fn frames_follow_the_host_clock() {
    let (_dir, host, graphics, filter) = animated_filter(3, 100, Repeat::Infinite);
    assert_eq!(filter.current_frame(), Some(0));

    host.advance_clock(60 * MS);
    filter.tick(0.06);
    assert_eq!(filter.current_frame(), Some(0));
    assert_eq!(graphics.update_count(), 0);

    host.advance_clock(40 * MS);
    filter.tick(0.04);
    assert_eq!(filter.current_frame(), Some(1));
    assert_eq!(graphics.update_count(), 1);

    host.advance_clock(250 * MS);
    filter.tick(0.25);
    assert_eq!(filter.current_frame(), Some(0));
    assert_eq!(filter.current_loop(), Some(1));
}

#[test]
fn one_full_cycle_counts_one_loop() {
    let (_dir, host, _graphics, filter) = animated_filter(3, 100, Repeat::Infinite);
    for _ in 0..30 {
        host.advance_clock(10 * MS);
        filter.tick(0.01);
    }
    assert_eq!(filter.current_loop(), Some(1));
    assert_eq!(filter.current_frame(), Some(0));
}

#[test]
fn activation_rewinds_on_next_tick() {
    let (_dir, host, graphics, filter) = animated_filter(4, 100, Repeat::Infinite);
    host.advance_clock(650 * MS);
    filter.tick(0.65);
    assert_eq!(filter.current_frame(), Some(2));
    assert_eq!(filter.current_loop(), Some(1));

    let updates = graphics.update_count();
    filter.activate();
    assert_eq!(filter.current_frame(), Some(2));
    filter.tick(0.016);
    assert_eq!(filter.current_frame(), Some(0));
    assert_eq!(filter.current_loop(), Some(0));
    assert_eq!(graphics.update_count(), updates + 1);

    filter.tick(0.016);
    assert_eq!(graphics.update_count(), updates + 1);
}

#[test]
fn hiding_rewinds_and_showing_starts_a_new_baseline() {
    let (_dir, host, _graphics, filter) = animated_filter(3, 100, Repeat::Infinite);
    host.advance_clock(150 * MS);
    filter.tick(0.15);
    assert_eq!(filter.current_frame(), Some(1));

    host.set_showing(false);
    filter.tick(0.016);
    assert_eq!(filter.current_frame(), Some(0));

    host.advance_clock(10_000 * MS);
    filter.tick(0.016);
    host.set_showing(true);
    filter.tick(0.016);
    assert_eq!(filter.current_frame(), Some(0));

    host.advance_clock(100 * MS);
    filter.tick(0.1);
    assert_eq!(filter.current_frame(), Some(1));
}

#[test]
fn finite_loops_hold_on_the_last_frame() {
    let (_dir, host, _graphics, filter) = animated_filter(2, 100, Repeat::Finite(2));
    for _ in 0..20 {
        host.advance_clock(100 * MS);
        filter.tick(0.1);
    }
    assert_eq!(filter.current_frame(), Some(1));
    assert_eq!(filter.current_loop(), Some(2));
}

#[test]
fn still_images_keep_restart_pending_harmlessly() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("still.png");
    write_png(&image, 4, 4);

    let host = FakeHost::new(true);
    let graphics = FakeGraphics::new();
    let filter = create(dir.path(), settings_for(&image), &host, &graphics);
    filter.tick(0.016);
    filter.activate();
    host.advance_clock(500 * MS);
    filter.tick(0.5);
    assert_eq!(filter.current_frame(), None);
    assert_eq!(graphics.update_count(), 0);
}
