use super::*;
use crate::config::StickerDefaults;
use crate::store::AssetRef;

// =============================================================
// Helpers
// =============================================================

fn store() -> ElementStore {
    let defaults = StickerDefaults { jitter: 0, ..StickerDefaults::default() };
    ElementStore::with_seed(defaults, 0)
}

fn add_at(store: &mut ElementStore, top: f64, left: f64) -> ElementId {
    let id = store.add(AssetRef::new("/images/rose.png"));
    store.update(&id, |e| {
        e.position.top = top;
        e.position.left = left;
    });
    id
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// Layout
// =============================================================

#[test]
fn corners_centered_on_box_corners() {
    let layout = HandleLayout::for_size(100.0, 80.0);
    let (corner, rect) = layout.corners[3];
    assert_eq!(corner, Corner::BottomRight);
    assert_eq!(rect, Rect::new(74.0, 94.0, 12.0, 12.0));
}

#[test]
fn rotate_handle_overhangs_top_right() {
    let layout = HandleLayout::for_size(100.0, 100.0);
    assert_eq!(layout.rotate, Rect::new(-15.0, 91.0, 24.0, 24.0));
}

#[test]
fn handles_do_not_overlap_delete() {
    let layout = HandleLayout::for_size(50.0, 50.0);
    for (_, rect) in layout.corners {
        assert!(rect.right() <= layout.delete.left || rect.left >= layout.delete.right() || rect.top >= layout.delete.bottom());
    }
}

#[test]
fn part_at_prefers_rotate_over_corner() {
    let layout = HandleLayout::for_size(100.0, 100.0);
    // Inside both the top-right square and the rotate circle.
    assert_eq!(layout.part_at(pt(104.0, -2.0)), Some(HitPart::RotateHandle));
    assert_eq!(layout.part_at(pt(-3.0, 101.0)), Some(HitPart::ResizeHandle(Corner::BottomLeft)));
    assert_eq!(layout.part_at(pt(50.0, -15.0)), Some(HitPart::DeleteControl));
    assert_eq!(layout.part_at(pt(50.0, 50.0)), None);
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn empty_store_hits_nothing() {
    assert_eq!(hit_test(pt(10.0, 10.0), &store(), None), None);
}

#[test]
fn body_hit() {
    let mut s = store();
    let id = add_at(&mut s, 100.0, 100.0);
    assert_eq!(hit_test(pt(150.0, 150.0), &s, None), Some(Hit { element: id, part: HitPart::Body }));
    assert_eq!(hit_test(pt(99.0, 150.0), &s, None), None);
}

#[test]
fn topmost_body_wins() {
    let mut s = store();
    let _below = add_at(&mut s, 100.0, 100.0);
    let above = add_at(&mut s, 150.0, 150.0);
    let hit = hit_test(pt(175.0, 175.0), &s, None).unwrap();
    assert_eq!(hit.element, above);
}

#[test]
fn handles_only_for_active() {
    let mut s = store();
    let id = add_at(&mut s, 100.0, 100.0);
    let corner = pt(200.0, 200.0);
    assert_eq!(hit_test(corner, &s, None).map(|h| h.part), Some(HitPart::Body));
    assert_eq!(
        hit_test(corner, &s, Some(id)).map(|h| h.part),
        Some(HitPart::ResizeHandle(Corner::BottomRight))
    );
}

#[test]
fn active_handle_beats_body_on_top() {
    let mut s = store();
    let active = add_at(&mut s, 100.0, 100.0);
    let _cover = add_at(&mut s, 150.0, 150.0);
    let hit = hit_test(pt(200.0, 200.0), &s, Some(active)).unwrap();
    assert_eq!(hit, Hit { element: active, part: HitPart::ResizeHandle(Corner::BottomRight) });
}

#[test]
fn rotation_is_honoured() {
    let mut s = store();
    let id = add_at(&mut s, 100.0, 100.0);
    s.update(&id, |e| e.rotation = 45.0);
    // The unrotated corner (101, 101) falls outside once the box turns 45°.
    assert_eq!(hit_test(pt(101.0, 101.0), &s, None), None);
    // The rotated box reaches further along the axes from the center.
    let reach = 50.0 * std::f64::consts::SQRT_2 - 1.0;
    assert!(hit_test(pt(150.0 + reach, 150.0), &s, None).is_some());
}

#[test]
fn rotated_handle_moves_with_sticker() {
    let mut s = store();
    let id = add_at(&mut s, 100.0, 100.0);
    s.update(&id, |e| e.rotation = 90.0);
    // Bottom-right corner (200, 200) turns a quarter clockwise to (100, 200).
    let hit = hit_test(pt(100.0, 200.0), &s, Some(id)).unwrap();
    assert_eq!(hit.part, HitPart::ResizeHandle(Corner::BottomRight));
}

#[test]
fn missing_active_falls_back_to_bodies() {
    let mut s = store();
    let id = add_at(&mut s, 100.0, 100.0);
    let ghost = uuid::Uuid::new_v4();
    assert_eq!(hit_test(pt(150.0, 150.0), &s, Some(ghost)).map(|h| h.element), Some(id));
}
