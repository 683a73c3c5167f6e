//! End-to-end container tests: host edits in, encoded frames out, pointer
//! samples routed in between.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use strata_core::{Color, Point, PointerId, PointerInput, PointerInputKind};
use strata_input::PointerEventType;
use strata_runtime::{BackendError, Container, ContainerConfig, RenderBackend};
use strata_scene::{NodeKind, NodeProps};
use strata_wire::{OP_BEGIN_FRAME, OP_END_FRAME, OP_RECT};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Backend capturing every applied frame, with switchable failure modes
#[derive(Clone, Default)]
struct CollectingBackend {
    frames: Rc<RefCell<Vec<Vec<u8>>>>,
    renders: Rc<Cell<usize>>,
    resizes: Rc<RefCell<Vec<(f32, f32)>>>,
    fail_apply: Rc<Cell<bool>>,
}

impl RenderBackend for CollectingBackend {
    fn apply(&mut self, frame: &[u8]) -> Result<(), BackendError> {
        if self.fail_apply.get() {
            return Err(BackendError::new("device lost"));
        }
        self.frames.borrow_mut().push(frame.to_vec());
        Ok(())
    }

    fn render(&mut self) -> Result<(), BackendError> {
        self.renders.set(self.renders.get() + 1);
        Ok(())
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.resizes.borrow_mut().push((width, height));
    }
}

fn container_with_backend() -> (Container, CollectingBackend) {
    init_tracing();
    let backend = CollectingBackend::default();
    let container = Container::new(
        ContainerConfig::new(640.0, 480.0).with_background(Color::WHITE),
        Box::new(backend.clone()),
    );
    (container, backend)
}

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

const BEGIN_FRAME_LEN: usize = 1 + 7 * 4;

#[test]
fn test_full_pipeline_presents_encoded_frame() {
    let (mut c, backend) = container_with_backend();
    let root = c.create_node(NodeKind::Root, NodeProps::new());
    c.set_root(Some(root));
    let rect = c.create_node(
        NodeKind::Rect,
        NodeProps::new()
            .with_position(10.0, 20.0)
            .with_size(100.0, 50.0)
            .with_fill(Color::from_hex(0x3366FF)),
    );
    c.append_child(root, rect);

    assert!(c.tick());

    let frames = backend.frames.borrow();
    assert_eq!(frames.len(), 1);
    let frame = &frames[0];
    assert_eq!(frame[0], OP_BEGIN_FRAME);
    assert_eq!(frame[BEGIN_FRAME_LEN], OP_RECT);
    assert_eq!(*frame.last().unwrap(), OP_END_FRAME);
    assert_eq!(backend.renders.get(), 1);
}

#[test]
fn test_unchanged_tree_does_not_re_present() {
    let (mut c, backend) = container_with_backend();
    let root = c.create_node(NodeKind::Root, NodeProps::new());
    c.set_root(Some(root));

    assert!(c.tick());
    assert!(!c.tick());
    assert!(!c.tick());
    assert_eq!(backend.frames.borrow().len(), 1);
}

#[test]
fn test_drag_through_container_updates_frame() {
    let (mut c, backend) = container_with_backend();
    let root = c.create_node(NodeKind::Root, NodeProps::new());
    c.set_root(Some(root));
    let rect = c.create_node(
        NodeKind::Rect,
        NodeProps::new()
            .with_position(0.0, 0.0)
            .with_size(100.0, 100.0)
            .with_fill(Color::BLACK)
            .draggable(),
    );
    c.append_child(root, rect);
    c.tick();

    c.pointer_input(&PointerInput::new(
        PointerInputKind::Down,
        PointerId::PRIMARY,
        Point::new(50.0, 50.0),
    ));
    assert_eq!(c.drag_target(PointerId::PRIMARY), Some(rect));

    c.pointer_input(&PointerInput::new(
        PointerInputKind::Move,
        PointerId::PRIMARY,
        Point::new(60.0, 54.0),
    ));
    assert!(c.is_frame_pending());
    assert!(c.tick());

    // The drag displacement lands in the rect's wire transform.
    let frames = backend.frames.borrow();
    let frame = frames.last().unwrap();
    assert_eq!(frame[BEGIN_FRAME_LEN], OP_RECT);
    let matrix_start = BEGIN_FRAME_LEN + 1 + 4;
    assert_eq!(read_f32(frame, matrix_start + 16), 10.0);
    assert_eq!(read_f32(frame, matrix_start + 20), 4.0);
}

#[test]
fn test_backend_failure_keeps_frame_pending() {
    let (mut c, backend) = container_with_backend();
    let errors: Rc<RefCell<Vec<String>>> = Rc::default();
    {
        let errors = Rc::clone(&errors);
        c.set_error_callback(move |e| {
            errors.borrow_mut().push(e.to_string());
        });
    }

    let root = c.create_node(NodeKind::Root, NodeProps::new());
    c.set_root(Some(root));

    backend.fail_apply.set(true);
    assert!(!c.tick());
    assert!(c.is_frame_pending());
    assert!(matches!(
        errors.borrow().as_slice(),
        [message] if message == "backend apply failed"
    ));

    // Recovery needs no replay: the next tick re-encodes the snapshot.
    backend.fail_apply.set(false);
    assert!(c.tick());
    assert!(!c.is_frame_pending());
    assert_eq!(backend.frames.borrow().len(), 1);
}

#[test]
fn test_resize_updates_header_and_backend() {
    let (mut c, backend) = container_with_backend();
    let root = c.create_node(NodeKind::Root, NodeProps::new());
    c.set_root(Some(root));
    c.tick();

    c.resize(1024.0, 768.0);
    assert!(c.tick());

    assert_eq!(backend.resizes.borrow().as_slice(), &[(1024.0, 768.0)]);
    let frames = backend.frames.borrow();
    let frame = frames.last().unwrap();
    assert_eq!(read_f32(frame, 1), 1024.0);
    assert_eq!(read_f32(frame, 5), 768.0);
}

#[test]
fn test_handler_fires_through_container() {
    let (mut c, _backend) = container_with_backend();
    let root = c.create_node(NodeKind::Root, NodeProps::new());
    c.set_root(Some(root));
    let rect = c.create_node(
        NodeKind::Rect,
        NodeProps::new().with_size(100.0, 100.0).with_fill(Color::BLACK),
    );
    c.append_child(root, rect);

    let clicks: Rc<Cell<usize>> = Rc::default();
    {
        let clicks = Rc::clone(&clicks);
        c.on(rect, PointerEventType::Click, move |_| {
            clicks.set(clicks.get() + 1);
        });
    }
    // The index only knows the handler after the next commit.
    c.tick();

    c.pointer_input(&PointerInput::new(
        PointerInputKind::Click,
        PointerId::PRIMARY,
        Point::new(50.0, 50.0),
    ));
    assert_eq!(clicks.get(), 1);

    c.pointer_input(&PointerInput::new(
        PointerInputKind::Click,
        PointerId::PRIMARY,
        Point::new(500.0, 500.0),
    ));
    assert_eq!(clicks.get(), 1);
}

#[test]
fn test_removed_node_receives_no_events() {
    let (mut c, _backend) = container_with_backend();
    let root = c.create_node(NodeKind::Root, NodeProps::new());
    c.set_root(Some(root));
    let rect = c.create_node(
        NodeKind::Rect,
        NodeProps::new().with_size(100.0, 100.0).with_fill(Color::BLACK),
    );
    c.append_child(root, rect);

    let downs: Rc<Cell<usize>> = Rc::default();
    {
        let downs = Rc::clone(&downs);
        c.on(rect, PointerEventType::Down, move |_| {
            downs.set(downs.get() + 1);
        });
    }
    c.tick();

    c.remove_child(root, rect);
    c.tick();

    c.pointer_input(&PointerInput::new(
        PointerInputKind::Down,
        PointerId::PRIMARY,
        Point::new(50.0, 50.0),
    ));
    assert_eq!(downs.get(), 0);
}

#[test]
fn test_root_swap_frees_old_tree_and_its_handlers() {
    let (mut c, _backend) = container_with_backend();
    let root = c.create_node(NodeKind::Root, NodeProps::new());
    c.set_root(Some(root));
    let rect = c.create_node(
        NodeKind::Rect,
        NodeProps::new().with_size(100.0, 100.0).with_fill(Color::BLACK),
    );
    c.append_child(root, rect);

    let downs: Rc<Cell<usize>> = Rc::default();
    {
        let downs = Rc::clone(&downs);
        c.on(rect, PointerEventType::Down, move |_| {
            downs.set(downs.get() + 1);
        });
    }
    c.tick();

    let new_root = c.create_node(NodeKind::Root, NodeProps::new());
    c.set_root(Some(new_root));
    c.tick();

    // The old tree is freed outright, not merely detached.
    assert!(!c.scene().contains(root));
    assert!(!c.scene().contains(rect));
    assert_eq!(c.scene().len(), 1);

    c.pointer_input(&PointerInput::new(
        PointerInputKind::Down,
        PointerId::PRIMARY,
        Point::new(50.0, 50.0),
    ));
    assert_eq!(downs.get(), 0);
}

#[test]
fn test_dpr_divides_input_and_scales_output() {
    init_tracing();
    let backend = CollectingBackend::default();
    let mut c = Container::new(
        ContainerConfig::new(640.0, 480.0).with_device_pixel_ratio(2.0),
        Box::new(backend.clone()),
    );
    let root = c.create_node(NodeKind::Root, NodeProps::new());
    c.set_root(Some(root));
    let rect = c.create_node(
        NodeKind::Rect,
        NodeProps::new()
            .with_position(10.0, 10.0)
            .with_size(50.0, 50.0)
            .with_fill(Color::BLACK)
            .draggable(),
    );
    c.append_child(root, rect);
    c.tick();

    // Device (40,40) is logical (20,20), inside the rect.
    c.pointer_input(&PointerInput::new(
        PointerInputKind::Down,
        PointerId::PRIMARY,
        Point::new(40.0, 40.0),
    ));
    assert_eq!(c.drag_target(PointerId::PRIMARY), Some(rect));

    let frames = backend.frames.borrow();
    let frame = frames.last().unwrap();
    let matrix_start = BEGIN_FRAME_LEN + 1 + 4;
    // Root scale is the dpr; the rect's translation is in device pixels.
    assert_eq!(read_f32(frame, matrix_start), 2.0);
    assert_eq!(read_f32(frame, matrix_start + 16), 20.0);
}
