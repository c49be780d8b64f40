use super::*;
use crate::render::recording::RecordingRenderer;

#[test]
fn default_pool_holds_two_slots() {
    let pool = OffscreenPool::default();
    assert_eq!(pool.stats().slots, 2);
    assert_eq!(pool.stats().allocations, 0);
}

#[test]
fn slots_allocate_once_and_grow_on_demand() {
    let mut r = RecordingRenderer::new(Viewport::default());
    let mut pool = OffscreenPool::default();
    let a = pool.slot(&mut r, 0, Viewport::default()).unwrap();
    let again = pool.slot(&mut r, 0, Viewport::default()).unwrap();
    assert_eq!(a, again);
    assert_eq!(pool.stats().allocations, 1);

    pool.slot(&mut r, 3, Viewport::default()).unwrap();
    let st = pool.stats();
    assert_eq!(st.slots, 4);
    assert_eq!(st.grown, 1);
    assert_eq!(st.allocations, 2);
}

#[test]
fn dispose_releases_slot_textures() {
    let mut r = RecordingRenderer::new(Viewport::default());
    let mut pool = OffscreenPool::new(2);
    pool.slot(&mut r, 0, Viewport::default()).unwrap();
    pool.slot(&mut r, 1, Viewport::default()).unwrap();
    assert_eq!(r.live_textures(), 2);
    pool.dispose(&mut r);
    assert_eq!(r.live_textures(), 0);
    assert_eq!(pool.stats().slots, 2);
}
