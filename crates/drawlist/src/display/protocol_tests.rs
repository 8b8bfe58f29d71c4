//! Lifecycle-protocol tests for the paint display list
//!
//! Covers the reset/reuse, sync, and prepare contracts end to end, including
//! the release-before-reset ordering the arena depends on.

use super::*;
use crate::config::ListConfig;
use crate::foundation::math::{Mat3, Rect};
use crate::scene::{InvalidationFlags, NodeId, NodeRegistry, RenderContext, RenderNode, TraversalMode, TreeInfo};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

/// Shared event log for observing drop and sync ordering.
type EventLog = Arc<Mutex<Vec<&'static str>>>;

fn log_event(log: &EventLog, event: &'static str) {
    log.lock().unwrap().push(event);
}

fn events(log: &EventLog) -> Vec<&'static str> {
    log.lock().unwrap().clone()
}

/// Picture double that records when its handle is released.
#[derive(Debug)]
struct TracedPicture {
    ops: usize,
    log: EventLog,
}

impl RecordedPicture for TracedPicture {
    fn op_count(&self) -> usize {
        self.ops
    }

    fn cull_bounds(&self) -> Rect {
        Rect::ZERO
    }
}

impl Drop for TracedPicture {
    fn drop(&mut self) {
        log_event(&self.log, "picture released");
    }
}

/// Arena-resident drawable that records when the arena tears it down.
#[derive(Debug)]
struct TracedDrawable {
    log: EventLog,
}

impl Drawable for TracedDrawable {}

impl Drop for TracedDrawable {
    fn drop(&mut self) {
        log_event(&self.log, "drawable destroyed");
    }
}

/// Functor double that logs syncs under a fixed name.
struct NamedFunctor {
    name: &'static str,
    log: EventLog,
}

impl ExternalFunctor for NamedFunctor {
    fn sync_frame_state(&mut self) {
        log_event(&self.log, self.name);
    }
}

fn list_with_children(
    nodes: &mut NodeRegistry,
    count: usize,
) -> (PaintDisplayList, Vec<NodeId>) {
    let mut list = PaintDisplayList::new(Rect::from_size(100.0, 100.0));
    let children: Vec<NodeId> = (0..count)
        .map(|_| {
            let node = nodes.insert(RenderNode::new());
            let id = list.allocate_drawable(SubListDrawable::new(node, Mat3::identity()));
            list.register_sub_list(id);
            node
        })
        .collect();
    (list, children)
}

#[test]
fn test_reset_restores_fresh_state() {
    let mut nodes = NodeRegistry::new();
    let (mut list, _children) = list_with_children(&mut nodes, 3);

    let functor_log = EventLog::default();
    let ext = list.allocate_drawable(ExternalDrawable::new(Box::new(NamedFunctor {
        name: "ext",
        log: functor_log,
    })));
    list.register_external(ext);
    list.register_mutable_image(Rc::new(MutableImage::new(image::RgbaImage::new(2, 2))));
    list.register_vector_icon(Rc::new(VectorIconRoot::new()));
    list.set_projection_receiver(true);

    let mut recorder = PictureRecorder::new(list.bounds());
    recorder.fill_rect(Rect::from_size(10.0, 10.0), Color::BLACK);
    list.set_picture(recorder.finish());
    assert!(!list.is_empty());

    list.reset(Rect::from_size(50.0, 50.0));

    assert!(list.is_empty());
    assert!(!list.has_external_draws());
    assert!(!list.has_vector_icon_content());
    assert!(!list.is_projection_receiver());
    assert_eq!(list.sub_list_child_count(), 0);
    assert_eq!(list.mutable_image_count(), 0);
    assert_eq!(list.bounds(), Rect::from_size(50.0, 50.0));
    assert_eq!(list.phase(), Phase::Recording);
}

#[test]
fn test_double_reset_matches_fresh_construction() {
    let mut nodes = NodeRegistry::new();
    let (mut list, _children) = list_with_children(&mut nodes, 2);

    list.reset(Rect::from_size(10.0, 10.0));
    list.reset(Rect::from_size(30.0, 40.0));

    let fresh = PaintDisplayList::new(Rect::from_size(30.0, 40.0));

    assert_eq!(list.bounds(), fresh.bounds());
    assert_eq!(list.is_empty(), fresh.is_empty());
    assert_eq!(list.has_external_draws(), fresh.has_external_draws());
    assert_eq!(list.has_vector_icon_content(), fresh.has_vector_icon_content());
    assert_eq!(list.is_projection_receiver(), fresh.is_projection_receiver());
    assert_eq!(list.phase(), fresh.phase());
}

#[test]
fn test_prepare_visits_every_child_without_short_circuit() {
    let mut nodes = NodeRegistry::new();
    let (mut list, children) = list_with_children(&mut nodes, 5);

    list.sync_contents();

    let mut visited = Vec::new();
    let mut info = TreeInfo::new(TraversalMode::Full);
    let dirty = list.prepare_list_and_children(&mut info, false, &mut |node, _info, _layer| {
        let index = children.iter().position(|&c| c == node).unwrap();
        visited.push(index);
        // Even-indexed children report their own invalidation.
        index % 2 == 0
    });

    assert_eq!(visited, vec![0, 1, 2, 3, 4]);
    assert!(dirty);
    assert!(info.out.invalidations.contains(InvalidationFlags::CHILD_NODES));
}

#[test]
fn test_prepare_clean_children_report_no_redraw() {
    let mut nodes = NodeRegistry::new();
    let (mut list, _children) = list_with_children(&mut nodes, 4);

    list.sync_contents();

    let mut calls = 0;
    let mut info = TreeInfo::new(TraversalMode::Full);
    let dirty = list.prepare_list_and_children(&mut info, false, &mut |_, _, _| {
        calls += 1;
        false
    });

    assert_eq!(calls, 4);
    assert!(!dirty);
    assert!(!info.out.requires_redraw());
}

#[test]
#[should_panic(expected = "without a prior sync_contents")]
fn test_prepare_without_sync_trips_assertion() {
    let mut nodes = NodeRegistry::new();
    let (mut list, _children) = list_with_children(&mut nodes, 1);

    let mut info = TreeInfo::new(TraversalMode::Full);
    let _ = list.prepare_list_and_children(&mut info, false, &mut |_, _, _| false);
}

#[test]
#[should_panic(expected = "between sync and prepare")]
fn test_mutation_after_sync_trips_assertion() {
    let mut nodes = NodeRegistry::new();
    let node = nodes.insert(RenderNode::new());
    let mut list = PaintDisplayList::new(Rect::from_size(10.0, 10.0));

    list.sync_contents();
    let _ = list.allocate_drawable(SubListDrawable::new(node, Mat3::identity()));
}

#[test]
fn test_recording_resumes_after_prepare() {
    let mut nodes = NodeRegistry::new();
    let (mut list, _children) = list_with_children(&mut nodes, 1);

    list.sync_contents();
    let mut info = TreeInfo::new(TraversalMode::Full);
    let _ = list.prepare_list_and_children(&mut info, false, &mut |_, _, _| false);
    assert_eq!(list.phase(), Phase::Prepared);

    // The state machine allows recording again without an explicit reset.
    let node = nodes.insert(RenderNode::new());
    let id = list.allocate_drawable(SubListDrawable::new(node, Mat3::identity()));
    list.register_sub_list(id);
    assert_eq!(list.phase(), Phase::Recording);
}

#[test]
fn test_has_external_draws_tracks_registry() {
    let mut list = PaintDisplayList::new(Rect::from_size(10.0, 10.0));
    assert!(!list.has_external_draws());

    let log = EventLog::default();
    let id = list.allocate_drawable(ExternalDrawable::new(Box::new(NamedFunctor {
        name: "ext",
        log,
    })));
    list.register_external(id);
    assert!(list.has_external_draws());

    list.reset(Rect::from_size(10.0, 10.0));
    assert!(!list.has_external_draws());
}

#[test]
fn test_reset_releases_picture_before_arena() {
    let log = EventLog::default();
    let mut list = PaintDisplayList::new(Rect::from_size(10.0, 10.0));

    let _ = list.allocate_drawable(TracedDrawable { log: log.clone() });
    list.set_picture(Arc::new(TracedPicture {
        ops: 1,
        log: log.clone(),
    }));

    list.reset(Rect::from_size(10.0, 10.0));

    assert_eq!(events(&log), vec!["picture released", "drawable destroyed"]);
}

#[test]
fn test_destruction_releases_picture_before_arena() {
    let log = EventLog::default();
    {
        let mut list = PaintDisplayList::new(Rect::from_size(10.0, 10.0));
        let _ = list.allocate_drawable(TracedDrawable { log: log.clone() });
        list.set_picture(Arc::new(TracedPicture {
            ops: 1,
            log: log.clone(),
        }));
    }

    assert_eq!(events(&log), vec!["picture released", "drawable destroyed"]);
}

#[test]
fn test_sync_visits_children_in_registration_order() {
    let log = EventLog::default();
    let mut nodes = NodeRegistry::new();
    let (mut list, _children) = list_with_children(&mut nodes, 2);

    for name in ["functor a", "functor b"] {
        let id = list.allocate_drawable(ExternalDrawable::new(Box::new(NamedFunctor {
            name,
            log: log.clone(),
        })));
        list.register_external(id);
    }

    list.sync_contents();
    assert_eq!(events(&log), vec!["functor a", "functor b"]);
}

#[test]
fn test_sync_commits_staged_transforms() {
    let mut nodes = NodeRegistry::new();
    let node = nodes.insert(RenderNode::new());
    let mut list = PaintDisplayList::new(Rect::from_size(10.0, 10.0));

    let id = list.allocate_drawable(SubListDrawable::new(node, Mat3::identity()));
    list.register_sub_list(id);

    let moved = Mat3::new_translation(&crate::foundation::math::Vec2::new(7.0, 3.0));
    if let Some(child) = list.drawable_mut(id).as_sub_list_mut() {
        child.set_transform(moved);
    }

    list.sync_contents();
    assert_eq!(*list.drawable(id).as_sub_list().unwrap().transform(), moved);
}

#[test]
fn test_prepare_flags_image_and_icon_changes() {
    let mut list = PaintDisplayList::new(Rect::from_size(10.0, 10.0));
    let image = Rc::new(MutableImage::new(image::RgbaImage::new(2, 2)));
    let icon = Rc::new(VectorIconRoot::new());
    icon.set_root_alpha(0.5);
    list.register_mutable_image(image.clone());
    list.register_vector_icon(icon.clone());

    list.sync_contents();
    let mut info = TreeInfo::new(TraversalMode::Full);
    let dirty = list.prepare_list_and_children(&mut info, false, &mut |_, _, _| false);

    // First prepare uploads the image and commits the staged alpha.
    assert!(dirty);
    assert!(info.out.invalidations.contains(InvalidationFlags::MUTABLE_IMAGES));
    assert!(info.out.invalidations.contains(InvalidationFlags::VECTOR_ICONS));

    // A second frame with no edits is clean.
    list.sync_contents();
    let mut info = TreeInfo::new(TraversalMode::Full);
    let dirty = list.prepare_list_and_children(&mut info, false, &mut |_, _, _| false);
    assert!(!dirty);
}

#[test]
fn test_prepare_defers_uploads_without_texture_budget() {
    let mut list = PaintDisplayList::new(Rect::from_size(10.0, 10.0));
    let image = Rc::new(MutableImage::new(image::RgbaImage::new(2, 2)));
    list.register_mutable_image(image.clone());

    list.sync_contents();
    let mut info = TreeInfo::new(TraversalMode::Full);
    info.prepare_textures = false;
    let dirty = list.prepare_list_and_children(&mut info, false, &mut |_, _, _| false);

    // The pending change still invalidates, but the transfer is deferred.
    assert!(dirty);
    assert!(info.out.invalidations.contains(InvalidationFlags::MUTABLE_IMAGES));
    assert!(image.needs_upload());

    // The next budgeted pass performs the upload.
    list.sync_contents();
    let mut info = TreeInfo::new(TraversalMode::Full);
    let dirty = list.prepare_list_and_children(&mut info, false, &mut |_, _, _| false);
    assert!(dirty);
    assert!(!image.needs_upload());
}

#[test]
fn test_playback_only_prepare_leaves_staged_icon_properties() {
    let mut list = PaintDisplayList::new(Rect::from_size(10.0, 10.0));
    let icon = Rc::new(VectorIconRoot::new());
    icon.set_root_alpha(0.5);
    list.register_vector_icon(icon.clone());

    list.sync_contents();
    let mut info = TreeInfo::new(TraversalMode::PlaybackOnly);
    let dirty = list.prepare_list_and_children(&mut info, false, &mut |_, _, _| false);

    assert!(!dirty);
    assert!((icon.committed().root_alpha - 1.0).abs() < f32::EPSILON);

    // The staged alpha survives for the next full traversal.
    list.sync_contents();
    let mut info = TreeInfo::new(TraversalMode::Full);
    let dirty = list.prepare_list_and_children(&mut info, false, &mut |_, _, _| false);
    assert!(dirty);
    assert!((icon.committed().root_alpha - 0.5).abs() < f32::EPSILON);
}

#[test]
fn test_prepare_marks_external_layers_on_request() {
    let log = EventLog::default();
    let mut list = PaintDisplayList::new(Rect::from_size(10.0, 10.0));
    let id = list.allocate_drawable(ExternalDrawable::new(Box::new(NamedFunctor {
        name: "ext",
        log,
    })));
    list.register_external(id);

    list.sync_contents();
    let mut info = TreeInfo::new(TraversalMode::Full);
    let _ = list.prepare_list_and_children(&mut info, true, &mut |_, _, _| false);

    // Marking is observable through the drawable's layer flag.
    let external = list.drawable_mut(id).as_external_mut().unwrap();
    assert!(external.needs_layer());
}

#[test]
fn test_update_children_visits_in_order() {
    let mut nodes = NodeRegistry::new();
    let (mut list, children) = list_with_children(&mut nodes, 3);

    let mut visited = Vec::new();
    list.update_children(&mut |node| visited.push(node));

    assert_eq!(visited, children);
}

#[test]
fn test_reuse_accepted_moves_list_into_node() {
    let mut node = RenderNode::new();
    node.attach();
    let context = RenderContext::new();

    let mut list = Box::new(PaintDisplayList::new(Rect::from_size(64.0, 64.0)));
    let mut recorder = PictureRecorder::new(list.bounds());
    recorder.fill_rect(Rect::from_size(8.0, 8.0), Color::WHITE);
    list.set_picture(recorder.finish());

    assert!(list.attempt_reuse(&mut node, &context).is_none());
    assert!(node.has_reusable_list());

    let recycled = node.take_reusable_list().unwrap();
    assert!(recycled.is_empty());
    assert_eq!(recycled.bounds(), Rect::ZERO);
    assert!(recycled.is_paint_list());
}

#[test]
fn test_reuse_rejected_for_dead_context_or_detached_node() {
    let mut attached = RenderNode::new();
    attached.attach();
    let mut detached = RenderNode::new();

    let mut dead_context = RenderContext::new();
    dead_context.invalidate();
    let live_context = RenderContext::new();

    let list = Box::new(PaintDisplayList::new(Rect::from_size(8.0, 8.0)));
    let list = list.attempt_reuse(&mut attached, &dead_context);
    assert!(list.is_some());

    let list = Box::new(PaintDisplayList::new(Rect::from_size(8.0, 8.0)));
    assert!(list.attempt_reuse(&mut detached, &live_context).is_some());
}

#[test]
fn test_reuse_rejected_when_disabled_by_config() {
    let mut node = RenderNode::new();
    node.attach();
    let context = RenderContext::new();

    let config = ListConfig::new().with_reuse(false);
    let list = Box::new(PaintDisplayList::with_config(
        Rect::from_size(8.0, 8.0),
        &config,
    ));
    assert!(list.attempt_reuse(&mut node, &context).is_some());
}

#[test]
#[should_panic(expected = "invalid list configuration")]
fn test_invalid_config_trips_assertion() {
    let config = ListConfig::new().with_arena_block_capacity(0);
    let _ = PaintDisplayList::with_config(Rect::from_size(8.0, 8.0), &config);
}

#[test]
fn test_end_to_end_two_children() {
    let mut nodes = NodeRegistry::new();
    let (mut list, children) = list_with_children(&mut nodes, 2);

    let mut recorder = PictureRecorder::new(list.bounds());
    recorder.draw_sub_list(*list.sub_list_children().first().unwrap());
    list.set_picture(recorder.finish());

    list.sync_contents();

    let mut order = Vec::new();
    let mut info = TreeInfo::new(TraversalMode::Full);
    let dirty = list.prepare_list_and_children(&mut info, false, &mut |node, _, _| {
        order.push(node);
        // Child A reports invalidated, child B does not.
        node == children[0]
    });

    assert_eq!(order, children);
    assert!(dirty, "aggregate must be the OR of per-child results");
}
