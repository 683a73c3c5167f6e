//! Hit-region index
//!
//! A flat, paint-ordered list of interactive regions rebuilt from scratch on
//! every committed frame. Regions cache the world transform and padded
//! bounds observed at commit time; queries scan in reverse so the top-most
//! painted region wins.

use rustc_hash::FxHashMap;
use strata_core::{Affine2D, Point, Rect, Vec2};
use strata_scene::{NodeId, NodeKind, SceneGraph};

use crate::handlers::HandlerMap;

/// Hit-testing options for one container
#[derive(Clone, Copy, Debug, Default)]
pub struct HitOptions {
    /// Symmetric expansion of every interactive region, in logical units
    pub padding: Vec2,
}

impl HitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_padding(mut self, padding: Vec2) -> Self {
        self.padding = padding;
        self
    }
}

/// One interactive region, derived from a committed node
#[derive(Clone, Debug)]
pub struct HitRegion {
    pub node: NodeId,
    /// World transform at commit time (drag offsets included as committed)
    pub world: Affine2D,
    /// Local-space bounds, already expanded by the hit padding
    pub rect: Rect,
    /// Effective corner radius, clamped to half the smaller padded dimension
    pub radius: f32,
}

impl HitRegion {
    /// Whether the region contains a logical-space point
    ///
    /// Maps the point into the region's local space first; a singular world
    /// transform means the point cannot be localized and is a miss.
    pub fn contains(&self, point: Point) -> bool {
        let Some(inverse) = self.world.invert() else {
            tracing::trace!(node = ?self.node, "singular region transform; treating as miss");
            return false;
        };
        let local = inverse.transform_point(point);
        if !self.rect.contains(local) {
            return false;
        }
        if self.radius <= 0.0 {
            return true;
        }

        // Inside the padded box; corner quadrants additionally require the
        // point to fall within that corner's inscribed circle.
        let r = self.radius;
        let (x0, y0) = (self.rect.x(), self.rect.y());
        let (x1, y1) = (self.rect.max_x(), self.rect.max_y());
        let corner = if local.x < x0 + r && local.y < y0 + r {
            Some(Point::new(x0 + r, y0 + r))
        } else if local.x > x1 - r && local.y < y0 + r {
            Some(Point::new(x1 - r, y0 + r))
        } else if local.x > x1 - r && local.y > y1 - r {
            Some(Point::new(x1 - r, y1 - r))
        } else if local.x < x0 + r && local.y > y1 - r {
            Some(Point::new(x0 + r, y1 - r))
        } else {
            None
        };
        match corner {
            Some(center) => {
                let dx = local.x - center.x;
                let dy = local.y - center.y;
                dx * dx + dy * dy <= r * r
            }
            None => true,
        }
    }
}

/// Paint-ordered index of every interactive region in the committed tree
#[derive(Default)]
pub struct HitRegionIndex {
    regions: Vec<HitRegion>,
    by_node: FxHashMap<NodeId, usize>,
}

impl HitRegionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard and rebuild the index from the committed tree
    ///
    /// Cleared to empty when nothing in the tree is interactive, which keeps
    /// static scenes free of per-frame traversal cost.
    pub fn rebuild(&mut self, scene: &SceneGraph, handlers: &HandlerMap, options: HitOptions) {
        self.regions.clear();
        self.by_node.clear();

        let Some(root) = scene.root() else {
            return;
        };
        if !Self::any_interactive(scene, handlers, root) {
            return;
        }
        self.collect(scene, handlers, options, root, Affine2D::IDENTITY);
        tracing::trace!(regions = self.regions.len(), "hit index rebuilt");
    }

    fn any_interactive(scene: &SceneGraph, handlers: &HandlerMap, id: NodeId) -> bool {
        let Some(node) = scene.get(id) else {
            return false;
        };
        if !node.is_visible() || !node.is_listening() {
            return false;
        }
        if handlers.has_node_handlers(id) || node.props.draggable {
            return true;
        }
        node.children
            .iter()
            .any(|&child| Self::any_interactive(scene, handlers, child))
    }

    fn collect(
        &mut self,
        scene: &SceneGraph,
        handlers: &HandlerMap,
        options: HitOptions,
        id: NodeId,
        accumulated: Affine2D,
    ) {
        let Some(node) = scene.get(id) else {
            return;
        };
        // Invisible or non-listening subtrees are pruned entirely.
        if !node.is_visible() || !node.is_listening() {
            return;
        }

        let world = match scene.local_transform(id) {
            Some(local) => accumulated.then(&local),
            None => accumulated,
        };

        if node.kind == NodeKind::Rect
            && (handlers.has_node_handlers(id) || node.props.draggable)
        {
            let width = node.props.width.unwrap_or(0.0);
            let height = node.props.height.unwrap_or(0.0);
            let rect = Rect::new(0.0, 0.0, width, height)
                .expand(options.padding.x, options.padding.y);
            let max_radius = (rect.width().min(rect.height())) / 2.0;
            let radius = node.props.corner_radius.unwrap_or(0.0).clamp(0.0, max_radius);
            let index = self.regions.len();
            self.regions.push(HitRegion {
                node: id,
                world,
                rect,
                radius,
            });
            self.by_node.insert(id, index);
        }

        for &child in &node.children {
            self.collect(scene, handlers, options, child, world);
        }
    }

    /// Top-most region containing the logical-space point
    ///
    /// Regions are stored in paint order, so the reverse scan returns the
    /// last-painted (top-most) hit.
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        self.regions
            .iter()
            .rev()
            .find(|region| region.contains(point))
            .map(|region| region.node)
    }

    pub fn region_for(&self, node: NodeId) -> Option<&HitRegion> {
        self.by_node.get(&node).map(|&i| &self.regions[i])
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.by_node.contains_key(&node)
    }

    pub fn regions(&self) -> &[HitRegion] {
        &self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
        self.by_node.clear();
    }
}
