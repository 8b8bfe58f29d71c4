//! Display-list lifecycle demo
//!
//! Drives one scene through three frames of the record → sync → prepare
//! cycle, then recycles the root list. Run with `RUST_LOG=debug` to watch the
//! container's phase transitions.

use drawlist::prelude::*;
use image::RgbaImage;
use log::info;
use std::rc::Rc;

/// Stand-in for a platform view interleaved into the frame
#[derive(Debug)]
struct PlatformViewHook {
    frames_synced: u32,
}

impl ExternalFunctor for PlatformViewHook {
    fn sync_frame_state(&mut self) {
        self.frames_synced += 1;
        info!("platform view synced frame state ({} total)", self.frames_synced);
    }

    fn layer_requirement_changed(&mut self, needs_layer: bool) {
        info!("platform view layer requirement -> {needs_layer}");
    }
}

fn record_root(
    list: &mut PaintDisplayList,
    badge: &Rc<MutableImage>,
    icon: &Rc<VectorIconRoot>,
    children: &[NodeId],
) {
    for &child in children {
        let translate = Mat3::new_translation(&Vec2::new(16.0, 16.0));
        let id = list.allocate_drawable(SubListDrawable::new(child, translate));
        list.register_sub_list(id);
    }
    let hook = list.allocate_drawable(ExternalDrawable::new(Box::new(PlatformViewHook {
        frames_synced: 0,
    })));
    list.register_external(hook);

    let badge_slot = list.register_mutable_image(badge.clone());
    let icon_slot = list.register_vector_icon(icon.clone());

    let mut recorder = PictureRecorder::new(list.bounds());
    recorder
        .fill_rect(list.bounds(), Color::rgb(24, 24, 32))
        .draw_image(badge_slot, Rect::new(8.0, 8.0, 32.0, 32.0))
        .draw_vector_icon(icon_slot, Rect::new(48.0, 8.0, 24.0, 24.0))
        .draw_external(hook);
    for &id in list.sub_list_children() {
        recorder.draw_sub_list(id);
    }
    list.set_picture(recorder.finish());
}

fn main() {
    env_logger::init();

    let mut nodes = NodeRegistry::new();
    let mut root = RenderNode::new();
    root.attach();
    let children: Vec<NodeId> = (0..2)
        .map(|_| {
            let mut node = RenderNode::new();
            node.attach();
            nodes.insert(node)
        })
        .collect();

    let badge = Rc::new(MutableImage::new(RgbaImage::new(32, 32)));
    let icon = Rc::new(VectorIconRoot::new());
    icon.set_viewport(Rect::from_size(24.0, 24.0));

    let mut context = RenderContext::new();
    let mut list = Box::new(PaintDisplayList::new(Rect::from_size(320.0, 240.0)));
    record_root(&mut list, &badge, &icon, &children);

    for frame in 0..3 {
        // Frame edits: animate the icon every frame, repaint the badge once.
        icon.set_root_alpha(1.0 - frame as f32 * 0.25);
        if frame == 1 {
            badge.update_pixels(|pixels| {
                pixels.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
            });
        }

        list.sync_contents();

        let mut info = TreeInfo::new(TraversalMode::Full);
        let dirty = list.prepare_list_and_children(&mut info, false, &mut |child, _info, _layer| {
            // Child nodes carry no lists of their own in this demo, so they
            // never report an invalidation.
            debug_assert!(nodes.get(child).is_some());
            false
        });

        info!(
            "frame {frame}: dirty={dirty} invalidations={:?} ops={}",
            info.out.invalidations,
            list.picture().map_or(0, |p| p.op_count())
        );

        context.advance_frame();
    }

    // Recycle the root list instead of destroying it.
    match list.attempt_reuse(&mut root, &context) {
        None => info!("root list recycled for the next recording pass"),
        Some(list) => info!("root list rejected for reuse, dropping {:?}", list.bounds()),
    }

    if let Some(recycled) = root.take_reusable_list() {
        info!(
            "recycled list is empty={} and ready to record",
            recycled.is_empty()
        );
    }
}
