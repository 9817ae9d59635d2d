// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate std;

use alloc::vec;
use alloc::vec::Vec;

use kurbo::PathEl;
use peniko::color::palette::css;
use quadrant_surface::{Attrs, ElementId, Scene, Shape, Surface};

use crate::{
    Axis, BarChart, Canvas, ChartId, Customize, Dimension, Footprint, GroupOwner, Layer,
    LineChart, Point, RenderError, RenderableSeries,
};

const LINE: [(f64, f64); 3] = [(0.0, 0.0), (1.0, 5.0), (2.0, 2.0)];

fn canvas() -> Canvas<Scene> {
    Canvas::new(Scene::new(400.0, 300.0))
}

fn position(scene: &Scene, id: ElementId) -> usize {
    scene
        .paint_order()
        .iter()
        .position(|e| *e == id)
        .expect("element should be on the surface")
}

fn group(chart: &dyn RenderableSeries, layer: Layer) -> Vec<ElementId> {
    chart
        .groups()
        .get(layer)
        .map(|g| g.elements().to_vec())
        .unwrap_or_default()
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() <= 1e-9, "{a} != {b}");
}

#[test]
fn line_chart_resolves_ranges_and_draws_vertices() {
    let mut canvas = canvas();
    let id = canvas.add_chart(LineChart::new(LINE));
    let report = canvas.render().unwrap();

    let (x, y) = (report.layout.x_range(), report.layout.y_range());
    assert_eq!((x.min, x.max), (0.0, 2.0));
    assert_eq!((y.min, y.max), (0.0, 5.0));

    let transform = report.layout.transform();
    let expected: Vec<kurbo::Point> = LINE
        .iter()
        .map(|&p| transform.to_pixel(Point::from(p)).into())
        .collect();

    let chart = canvas.chart(id).unwrap();
    let scene = canvas.surface();
    let paths = group(chart, Layer::Paths);
    assert_eq!(paths.len(), 1, "one series, one path");
    let Shape::Path(path) = scene.element(paths[0]).unwrap().shape() else {
        panic!("path group should hold a path");
    };
    let vertices: Vec<kurbo::Point> = path
        .elements()
        .iter()
        .map(|el| match el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => *p,
            other => panic!("unexpected path element {other:?}"),
        })
        .collect();
    assert_eq!(vertices, expected);

    let dots = group(chart, Layer::Dots);
    assert_eq!(dots.len(), 3, "one dot per point");
    for (dot, at) in dots.iter().zip(&expected) {
        let Shape::Circle(c) = scene.element(*dot).unwrap().shape() else {
            panic!("dots should be circles");
        };
        assert_eq!(c.center, *at);
    }
}

#[test]
fn adjacent_bars_share_the_gap_as_width() {
    let mut canvas = canvas();
    let id = canvas.add_chart(BarChart::new([(0.0, 1.0), (1.0, 1.0)]));
    let report = canvas.render().unwrap();
    let transform = report.layout.transform();
    let plot = report.layout.plot();

    let chart: &BarChart = canvas.chart_as(id).unwrap();
    let width = chart.bar_width(&transform);
    assert_eq!(width.data, Some(1.0));
    assert_close(width.pixels, transform.x_scale());

    let boxes = group(chart, Layer::Boxes);
    assert_eq!(boxes.len(), 2);
    let rects: Vec<kurbo::Rect> = boxes
        .iter()
        .map(|id| match canvas.surface().element(*id).unwrap().shape() {
            Shape::Rect(r) => *r,
            other => panic!("bars should be rects, got {other:?}"),
        })
        .collect();
    assert_close(rects[0].height(), rects[1].height());
    for r in &rects {
        assert!(r.y0 >= plot.y() - 1e-9, "{r:?} pokes above {plot:?}");
        assert_close(r.width(), width.pixels - 1.0);
    }
}

#[test]
fn zero_ticks_leave_no_labels_and_no_footprint() {
    let mut canvas = canvas();
    canvas.add_chart(LineChart::new(LINE));
    let y = canvas.axis(Axis::Y).clone().with_tick_count(0);
    canvas.set_axis(Axis::Y, y);
    let report = canvas.render().unwrap();

    assert_eq!(report.layout.footprint(Axis::Y), Footprint::default());
    let labels = canvas
        .surface()
        .iter()
        .filter(|(_, e)| matches!(e.shape(), Shape::Text(_)))
        .count();
    // 400 wide: six x labels, nothing else.
    assert_eq!(labels, 6);
}

#[test]
fn reorder_hook_swaps_border_and_fills() {
    let mut canvas = canvas();
    let id = canvas.add_chart(LineChart::new(LINE).with_fill_x(Attrs::new().with_fill(css::BLUE)));
    let chart = GroupOwner::Chart(id);

    let (mut border, mut fills) = (Vec::new(), Vec::new());
    canvas
        .render_with(|stack| {
            border = stack.group(GroupOwner::Canvas, Layer::Border).unwrap().elements().to_vec();
            fills = stack.group(chart, Layer::Fills).unwrap().elements().to_vec();
        })
        .unwrap();
    assert_eq!((border.len(), fills.len()), (1, 1));
    let scene = canvas.surface();
    assert!(position(scene, border[0]) < position(scene, fills[0]));

    canvas
        .render_with(|stack| {
            let b = stack.group(GroupOwner::Canvas, Layer::Border).unwrap().z_index();
            let f = stack.group(chart, Layer::Fills).unwrap().z_index();
            assert!(stack.set_z_index(GroupOwner::Canvas, Layer::Border, f));
            assert!(stack.set_z_index(chart, Layer::Fills, b));
            border = stack.group(GroupOwner::Canvas, Layer::Border).unwrap().elements().to_vec();
            fills = stack.group(chart, Layer::Fills).unwrap().elements().to_vec();
        })
        .unwrap();
    let scene = canvas.surface();
    assert!(position(scene, fills[0]) < position(scene, border[0]));
}

#[test]
fn paint_order_follows_z_indices_across_charts() {
    let mut canvas = canvas();
    canvas.set_grid_lines(Dimension::Y, vec![1.0, 3.0]);
    let line = canvas.add_chart(LineChart::new(LINE).with_fill_y(Attrs::new().with_fill(css::RED)));
    canvas.add_chart(BarChart::new([(0.5, 2.0), (1.5, 4.0)]));
    canvas.add_chart(LineChart::new([(0.0, 1.0), (2.0, 1.0)]));

    let mut z_of = Vec::new();
    canvas
        .render_with(|stack| {
            stack.set_z_index(GroupOwner::Chart(line), Layer::Fills, 95);
            for (_, g) in stack.groups() {
                z_of.extend(g.elements().iter().map(|id| (*id, g.z_index())));
            }
        })
        .unwrap();

    let scene = canvas.surface();
    let mut painted: Vec<(usize, i32)> = z_of
        .iter()
        .map(|(id, z)| (position(scene, *id), *z))
        .collect();
    painted.sort_unstable();
    assert!(
        painted.windows(2).all(|w| w[0].1 <= w[1].1),
        "z must not decrease along the paint order: {painted:?}"
    );
    assert_eq!(z_of.len(), scene.len(), "every element belongs to a group");
}

#[test]
fn later_charts_paint_over_earlier_ones_within_a_layer() {
    let mut canvas = canvas();
    let first = canvas.add_chart(LineChart::new(LINE));
    let second = canvas.add_chart(LineChart::new([(0.0, 5.0), (2.0, 0.0)]));
    canvas.render().unwrap();

    let scene = canvas.surface();
    let a = group(canvas.chart(first).unwrap(), Layer::Dots);
    let b = group(canvas.chart(second).unwrap(), Layer::Dots);
    let last_a = a.iter().map(|id| position(scene, *id)).max().unwrap();
    let first_b = b.iter().map(|id| position(scene, *id)).min().unwrap();
    assert!(last_a < first_b);
}

#[test]
fn hide_show_round_trips_through_rerender() {
    let mut canvas = canvas();
    let id = canvas.add_chart(LineChart::new(LINE));
    canvas.render().unwrap();

    canvas.hide_chart(id).unwrap();
    canvas.render().unwrap();
    let dots = group(canvas.chart(id).unwrap(), Layer::Dots);
    for dot in &dots {
        assert_eq!(canvas.surface().attrs(*dot).unwrap().opacity, Some(0.0));
    }
    assert!(canvas.chart(id).unwrap().is_hidden());

    canvas.show_chart(id).unwrap();
    for dot in &dots {
        let attrs = canvas.surface().attrs(*dot).unwrap();
        assert_eq!(
            (attrs.opacity, attrs.fill_opacity, attrs.stroke_opacity),
            (Some(1.0), Some(1.0), Some(1.0))
        );
    }

    assert_eq!(
        canvas.hide_chart(ChartId::from_index(7)),
        Err(RenderError::UnknownChart(ChartId::from_index(7)))
    );
}

#[test]
fn faded_translucent_fill_exports_each_opacity_once() {
    let mut canvas = canvas();
    let id = canvas.add_chart(
        LineChart::new(LINE)
            .with_fill_x(Attrs::new().with_fill(peniko::Color::from_rgba8(70, 130, 180, 51))),
    );
    canvas.render().unwrap();
    canvas
        .fade_out_chart(id, core::time::Duration::from_millis(200))
        .unwrap();
    canvas
        .fade_in_chart(id, core::time::Duration::from_millis(200))
        .unwrap();

    let fill = group(canvas.chart(id).unwrap(), Layer::Fills)[0];
    let attrs = canvas.surface().attrs(fill).unwrap();
    assert_eq!(attrs.fill_opacity, Some(1.0));

    let svg = canvas.surface().to_svg_string();
    let path_lines: Vec<&str> = svg.lines().filter(|l| l.contains("<path")).collect();
    assert!(!path_lines.is_empty());
    for line in path_lines {
        assert!(line.matches("fill-opacity=").count() <= 1, "{line}");
        assert!(line.matches("stroke-opacity=").count() <= 1, "{line}");
    }
    // 51 / 255 alpha times the restored opacity of 1.
    assert!(svg.contains("fill-opacity=\"0.2\""), "{svg}");
}

#[test]
fn grid_lines_sit_on_pixel_rows_and_honour_hooks() {
    let mut canvas = canvas();
    canvas.add_chart(LineChart::new(LINE));
    canvas.set_grid_lines(Dimension::Y, vec![1.0, 2.0, 4.0]);
    canvas.set_grid_style_fn(Dimension::Y, |line| {
        if line.index == 1 {
            Customize::Skip
        } else {
            Customize::UseDefault
        }
    });
    canvas.render().unwrap();

    let grid: Vec<&kurbo::BezPath> = canvas
        .surface()
        .iter()
        .filter(|(_, e)| e.attrs().dash.is_some())
        .filter_map(|(_, e)| match e.shape() {
            Shape::Path(p) => Some(p),
            _ => None,
        })
        .collect();
    assert_eq!(grid.len(), 2);
    for path in grid {
        let Some(PathEl::MoveTo(p)) = path.elements().first().copied() else {
            panic!("grid line should start with a move");
        };
        assert_close(p.y.fract(), 0.5);
    }
}

#[test]
fn decorations_land_at_the_bottom_and_top() {
    let mut canvas = canvas();
    canvas.add_chart(LineChart::new(LINE));
    canvas.set_decorations(|sink| {
        let plot = sink.transform().plot().to_kurbo();
        let below = sink.surface().rect(plot);
        sink.surface().set_attrs(below, &Attrs::new().with_fill(css::LIGHT_GRAY))?;
        sink.add_below(below);
        let above = sink.surface().text(plot.center(), "draft");
        sink.add_above(above);
        Ok(())
    });
    canvas.render().unwrap();

    let order = canvas.surface().paint_order();
    let first = canvas.surface().element(order[0]).unwrap();
    let last = canvas.surface().element(*order.last().unwrap()).unwrap();
    assert!(matches!(first.shape(), Shape::Rect(_)));
    assert_eq!(last.text(), "draft");
}

#[test]
fn non_finite_range_is_rejected() {
    let mut canvas = canvas();
    canvas.set_range(Dimension::X, (0.0, f64::INFINITY));
    assert!(matches!(
        canvas.render(),
        Err(RenderError::NonFiniteRange {
            dimension: Dimension::X,
            ..
        })
    ));
}

#[test]
fn fixed_range_and_margins_shape_the_transform() {
    let mut canvas = canvas();
    canvas.add_chart(LineChart::new(LINE));
    canvas.set_range(Dimension::Y, (-10.0, 10.0));
    canvas.set_range_margins(crate::Insets::new(0.0, 0.5, 0.0, 0.5));
    let report = canvas.render().unwrap();

    let (x, y) = (report.layout.x_range(), report.layout.y_range());
    assert_eq!((x.min, x.max), (-0.5, 2.5));
    assert_eq!((y.min, y.max), (-10.0, 10.0));
    assert_eq!(canvas.range(Dimension::X), x);
}
