// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart demos for `quadrant_charts`, written out as standalone SVG files.

use kurbo::Rect;
use peniko::Color;
use peniko::color::palette::css;
use quadrant_charts::{
    Axis, BarChart, BarContext, Canvas, Customize, DOT_RADIUS, Dimension, GroupOwner, Insets,
    Layer, LineChart, Point, RenderError, evenly_spaced,
};
use quadrant_surface::{Attrs, Scene, Surface, TextAnchor};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 420.0;

fn main() {
    let demos: [(&str, fn() -> Result<Scene, RenderError>); 3] = [
        ("quadrant_line.svg", line_demo),
        ("quadrant_bars.svg", bar_demo),
        ("quadrant_layers.svg", layers_demo),
    ];
    for (file, demo) in demos {
        let scene = demo().unwrap_or_else(|e| panic!("{file}: {e}"));
        std::fs::write(file, scene.to_svg_string()).unwrap_or_else(|e| panic!("write {file}: {e}"));
        println!(
            "wrote {file} ({}x{}, {} elements)",
            scene.width(),
            scene.height(),
            scene.len()
        );
    }
}

fn padded_canvas() -> Canvas<Scene> {
    let mut canvas = Canvas::new(Scene::new(WIDTH, HEIGHT));
    canvas.set_padding(Insets::uniform(16.0));
    canvas
}

fn sine(n: u32) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| {
            let x = f64::from(i) / 4.0;
            (x, 3.0 + 2.5 * x.sin())
        })
        .collect()
}

/// A line with an area fill, grid lines and a highlighted maximum.
fn line_demo() -> Result<Scene, RenderError> {
    let mut canvas = padded_canvas();
    canvas.set_range_margins(Insets::new(0.5, 0.0, 0.0, 0.0));
    canvas.set_grid_lines_fn(Dimension::Y, |range| evenly_spaced(5, range.min, range.max));
    canvas.set_grid_lines_fn(Dimension::X, |range| evenly_spaced(6, range.min, range.max));

    let points = sine(25);
    let peak = points
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.1.total_cmp(&b.1.1))
        .map(|(i, _)| i);
    canvas.add_chart(
        LineChart::new(points)
            .with_line(
                Attrs::new()
                    .with_stroke(css::STEEL_BLUE)
                    .with_stroke_width(2.0)
                    .without_fill(),
            )
            .with_fill_x(Attrs::new().with_fill(Color::from_rgba8(70, 130, 180, 60)))
            .with_dot_fn(move |sink, dot| {
                let id = sink.circle(dot.at, DOT_RADIUS);
                let fill = if Some(dot.index) == peak {
                    css::CRIMSON
                } else {
                    css::STEEL_BLUE
                };
                sink.set_attrs(id, &Attrs::new().with_fill(fill).without_stroke())?;
                Ok(Customize::UseDefault)
            }),
    );

    canvas.render()?;
    Ok(canvas.into_surface())
}

/// Bars with a value label on top of each one.
fn bar_demo() -> Result<Scene, RenderError> {
    let mut canvas = padded_canvas();
    canvas.set_range_margins(Insets::new(1.0, 0.5, 0.0, 0.5));
    let x = canvas.axis(Axis::X).clone().with_ticks(evenly_spaced(8, 0.0, 7.0));
    canvas.set_axis(Axis::X, x);

    let values = [4.0, 7.5, 3.0, 9.0, 6.5, 2.0, 5.5, 8.0];
    canvas.add_chart(
        BarChart::new(values.iter().copied()).with_bar_fn(|sink, bar: &BarContext| {
            let rect = sink.rect(bar.rect());
            let fill = if bar.value.y >= 7.0 {
                css::SEA_GREEN
            } else {
                css::DARK_SEA_GREEN
            };
            sink.set_attrs(rect, &Attrs::new().with_fill(fill).without_stroke())?;
            let label = sink.text(
                Point::new(bar.top.x, bar.top.y - 10.0),
                &format!("{}", bar.value.y),
            );
            sink.set_attrs(
                label,
                &Attrs::new()
                    .with_font_size(12.0)
                    .with_anchor(TextAnchor::Middle),
            )?;
            Ok(Customize::UseDefault)
        }),
    );

    canvas.render()?;
    Ok(canvas.into_surface())
}

/// Two charts sharing a canvas, with a watermark and a reordered fill.
fn layers_demo() -> Result<Scene, RenderError> {
    let mut canvas = padded_canvas();
    canvas.set_decorations(|sink| {
        let plot = sink.transform().plot().to_kurbo();
        let band = Rect::new(plot.x0, plot.y0, plot.x1, plot.center().y);
        let id = sink.surface().rect(band);
        sink.surface().set_attrs(
            id,
            &Attrs::new()
                .with_fill(css::LIGHT_YELLOW)
                .without_stroke(),
        )?;
        sink.add_below(id);

        let mark = sink.surface().text(plot.center(), "preview");
        sink.surface().set_attrs(
            mark,
            &Attrs::new()
                .with_font_size(48.0)
                .with_fill(css::GRAY)
                .with_opacity(0.3),
        )?;
        sink.add_above(mark);
        Ok(())
    });

    canvas.add_chart(
        BarChart::new((0..12).map(|i| (f64::from(i), 1.0 + f64::from(i % 5))))
            .with_fill(css::LIGHT_SLATE_GRAY),
    );
    let trend = canvas.add_chart(
        LineChart::new((0..12).map(|i| (f64::from(i), 1.0 + 0.3 * f64::from(i))))
            .with_fill_y(Attrs::new().with_fill(Color::from_rgba8(220, 20, 60, 40)))
            .without_dots(),
    );

    canvas.render_with(|stack| {
        // Put the trend's fill over the bars.
        let above_bars = Layer::Boxes.default_z_index() + 5;
        stack.set_z_index(GroupOwner::Chart(trend), Layer::Fills, above_bars);
    })?;
    Ok(canvas.into_surface())
}
