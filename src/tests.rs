use approx::assert_relative_eq;
use tracing::Level;

use crate::prelude::*;

fn init_tracing() {
    drop(
        tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_test_writer()
            .try_init(),
    );
}

fn scene(size: Size<f32, Raw>) -> (Target, flume::Receiver<SceneEvent>) {
    let (sender, receiver) = flume::unbounded();
    let mut scene = Scene::new(sender);
    scene.set_size(size);
    (Target::from(scene), receiver)
}

fn paint_frame(control: &mut Control<DiagonalLine>, target: &Target) {
    target.start_frame();
    control.paint(target);
    target.end_frame();
}

#[test]
fn cross_at_200_by_50() {
    init_tracing();
    let (target, receiver) = scene(Size::new(200., 50.));
    let mut control = Control::new(DiagonalLine::new());
    assert_eq!(control.size(), Size::new(100., 100.));

    control.set_size(Size::new(200., 50.));
    control.widget_mut().set_direction(Direction::Cross);
    assert!(control.needs_redraw());
    paint_frame(&mut control, &target);
    assert!(!control.needs_redraw());

    let mut frame = Frame::default();
    assert!(frame.update(&receiver).unwrap());
    let bounds = Rect::new(Point::new(0, 0), Size::new(200, 50));
    let black_hairline = Stroke::new(Color::BLACK).line_width(Length::new(1.));
    assert_eq!(
        frame.commands(),
        &[
            FrameCommand::StrokeLine {
                from: Point::new(0., 0.),
                to: Point::new(200., 50.),
                stroke: black_hairline.clone(),
                clip: Some(bounds),
            },
            FrameCommand::StrokeLine {
                from: Point::new(200., 0.),
                to: Point::new(0., 50.),
                stroke: black_hairline,
                clip: Some(bounds),
            },
        ]
    );
    assert_eq!(frame.live_pens(), 1);

    let batches = frame.tessellate().unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].clip, Some(bounds));
    let geometry = &batches[0].geometry;
    assert!(!geometry.vertices.is_empty());
    for vertex in &geometry.vertices {
        assert_eq!(vertex.color, Color::BLACK.rgba());
        assert!(vertex.position[0] >= -1. && vertex.position[0] <= 201.);
        assert!(vertex.position[1] >= -1. && vertex.position[1] <= 51.);
    }
}

#[test]
fn negative_width_is_rejected() {
    let mut line = DiagonalLine::new();
    assert!(matches!(
        line.set_line_width(-1.),
        Err(Error::InvalidConfiguration { .. })
    ));
    assert_relative_eq!(line.line_width(), 1.);
}

#[test]
fn location_and_scale_are_applied() {
    let (mut target, receiver) = scene(Size::new(400., 400.));
    target
        .scene_mut()
        .unwrap()
        .set_scale_factor(Scale::new(2.));
    let mut control = Control::new(DiagonalLine::new());
    control.set_size(Size::new(10., 20.));
    control.set_location(Point::new(5., 5.));
    control
        .widget_mut()
        .set_direction(Direction::RightUpToLeftDown);
    paint_frame(&mut control, &target);

    let mut frame = Frame::default();
    frame.update(&receiver).unwrap();
    assert_eq!(frame.commands().len(), 1);
    let FrameCommand::StrokeLine { from, to, .. } = &frame.commands()[0];
    assert_eq!(*from, Point::new(30., 10.));
    assert_eq!(*to, Point::new(10., 50.));
}

#[test]
fn only_pending_redraws_are_painted() {
    let (target, receiver) = scene(Size::new(100., 100.));
    let mut control = Control::new(DiagonalLine::new());
    let mut frame = Frame::default();

    target.start_frame();
    assert!(control.paint_if_needed(&target));
    assert!(!control.paint_if_needed(&target));
    target.end_frame();
    frame.update(&receiver).unwrap();
    assert_eq!(frame.commands().len(), 1);

    // Resizing to the same size doesn't invalidate.
    control.set_size(Size::new(100., 100.));
    assert!(!control.needs_redraw());

    control.widget_mut().set_line_color(Color::RED);
    target.start_frame();
    assert!(control.paint_if_needed(&target));
    target.end_frame();
    frame.update(&receiver).unwrap();
    match &frame.commands()[0] {
        FrameCommand::StrokeLine { stroke, .. } => assert_eq!(stroke.color, Color::RED),
    }
    assert_eq!(frame.live_pens(), 1);
}

#[test]
fn wide_strokes_scale_with_the_frame() {
    let (mut target, receiver) = scene(Size::new(100., 100.));
    target
        .scene_mut()
        .unwrap()
        .set_scale_factor(Scale::new(2.));
    let mut control = Control::new(
        DiagonalLine::with_style(DiagonalLineStyle::default().line_width(3.)).unwrap(),
    );
    control.set_size(Size::new(10., 10.));
    paint_frame(&mut control, &target);

    let mut frame = Frame::default();
    frame.update(&receiver).unwrap();
    let batches = frame.tessellate().unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(
        batches[0].clip,
        Some(Rect::new(Point::new(0, 0), Size::new(20, 20)))
    );
    // A line from (0, 0) to (20, 20) stroked 6 pixels wide with butt caps.
    let half_width = 3. / 2_f32.sqrt();
    let min_x = batches[0]
        .geometry
        .vertices
        .iter()
        .map(|vertex| vertex.position[0])
        .fold(f32::MAX, f32::min);
    let max_x = batches[0]
        .geometry
        .vertices
        .iter()
        .map(|vertex| vertex.position[0])
        .fold(f32::MIN, f32::max);
    assert_relative_eq!(min_x, -half_width, epsilon = 0.01);
    assert_relative_eq!(max_x, 20. + half_width, epsilon = 0.01);
}

#[test]
fn painting_is_clipped_to_bounds() {
    let (target, receiver) = scene(Size::new(100., 100.));
    let mut control = Control::new(DiagonalLine::new());
    control.set_size(Size::new(5., 5.));
    control.set_location(Point::new(10., 10.));
    paint_frame(&mut control, &target);

    let mut frame = Frame::default();
    frame.update(&receiver).unwrap();
    let batches = frame.tessellate().unwrap();
    assert_eq!(
        batches[0].clip,
        Some(Rect::new(Point::new(10, 10), Size::new(5, 5)))
    );
    for vertex in &batches[0].geometry.vertices {
        assert!(vertex.position[0] >= 9.5 && vertex.position[0] <= 15.5);
        assert!(vertex.position[1] >= 9.5 && vertex.position[1] <= 15.5);
    }
}

#[test]
fn teardown_releases_every_pen() {
    let (target, receiver) = scene(Size::new(100., 100.));
    let mut control = Control::new(DiagonalLine::new());
    let mut frame = Frame::default();

    paint_frame(&mut control, &target);
    control.widget_mut().set_line_width(2.).unwrap();
    paint_frame(&mut control, &target);
    frame.update(&receiver).unwrap();
    assert_eq!(frame.live_pens(), 1);

    control.dispose();
    control.dispose();
    drop(control);

    // Double releases would make this frame fail with `UnknownPen`.
    target.start_frame();
    target.end_frame();
    assert!(frame.update(&receiver).unwrap());
    assert_eq!(frame.live_pens(), 0);
    assert!(frame.commands().is_empty());
}
