// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG export for [`Scene`].

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Affine, BezPath, PathEl, Rect};
use peniko::Brush;

use crate::scene::{Element, Scene, Shape};
use crate::{TextAnchor, TextMeasurer};

impl<M: TextMeasurer> Scene<M> {
    /// Writes the scene as a standalone SVG document, in paint order.
    pub fn to_svg_string(&self) -> String {
        let width = crate::Surface::width(self);
        let height = crate::Surface::height(self);
        let mut out = String::new();

        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        out.push_str(&format!(
            r#"viewBox="0 0 {width} {height}" width="{width}" height="{height}">"#
        ));
        out.push('\n');

        let mut clips: Vec<Rect> = Vec::new();
        for (_, element) in self.iter() {
            if let Some(clip) = element.clip()
                && !clips.contains(&clip)
            {
                clips.push(clip);
            }
        }
        if !clips.is_empty() {
            out.push_str("<defs>\n");
            for (i, c) in clips.iter().enumerate() {
                out.push_str(&format!(
                    r#"<clipPath id="clip{i}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
                    c.x0,
                    c.y0,
                    c.width(),
                    c.height()
                ));
                out.push('\n');
            }
            out.push_str("</defs>\n");
        }

        for (_, element) in self.iter() {
            write_element(&mut out, element, &clips);
        }

        out.push_str("</svg>\n");
        out
    }
}

fn write_element(out: &mut String, element: &Element, clips: &[Rect]) {
    let attrs = element.attrs();
    match element.shape() {
        Shape::Rect(r) => {
            out.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                r.x0,
                r.y0,
                r.width(),
                r.height(),
            ));
        }
        Shape::Circle(c) => {
            out.push_str(&format!(
                r#"<circle cx="{}" cy="{}" r="{}""#,
                c.center.x, c.center.y, c.radius
            ));
        }
        Shape::Path(p) => {
            out.push_str(r#"<path d=""#);
            write_path_data(out, p);
            out.push('"');
        }
        Shape::Text(at) => {
            out.push_str(&format!(
                r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="middle""#,
                at.x,
                at.y,
                attrs.font_size.unwrap_or(10.0)
            ));
            out.push_str(match attrs.anchor.unwrap_or_default() {
                TextAnchor::Start => r#" text-anchor="start""#,
                TextAnchor::Middle => r#" text-anchor="middle""#,
                TextAnchor::End => r#" text-anchor="end""#,
            });
        }
    }

    write_paint_attr(out, "fill", attrs.fill.as_ref(), attrs.fill_opacity);
    write_paint_attr(out, "stroke", attrs.stroke.as_ref(), attrs.stroke_opacity);
    if let Some(w) = attrs.stroke_width {
        out.push_str(&format!(r#" stroke-width="{w}""#));
    }
    if let Some(dash) = &attrs.dash {
        let parts: Vec<String> = dash.iter().map(|d| format!("{d}")).collect();
        out.push_str(&format!(r#" stroke-dasharray="{}""#, parts.join(",")));
    }
    if let Some(o) = attrs.opacity {
        out.push_str(&format!(r#" opacity="{o}""#));
    }
    if let Some(t) = attrs.transform
        && t != Affine::IDENTITY
    {
        let [a, b, c, d, e, f] = t.as_coeffs();
        out.push_str(&format!(
            r#" transform="matrix({a} {b} {c} {d} {e} {f})""#
        ));
    }
    if let Some(clip) = element.clip()
        && let Some(i) = clips.iter().position(|c| *c == clip)
    {
        out.push_str(&format!(r#" clip-path="url(#clip{i})""#));
    }

    if matches!(element.shape(), Shape::Text(_)) {
        out.push('>');
        out.push_str(&escape_xml(element.text()));
        out.push_str("</text>\n");
    } else {
        out.push_str("/>\n");
    }
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            if rgba.a == 0 {
                return ("none".into(), None);
            }
            let paint = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (paint, opacity)
        }
        _ => ("none".into(), None),
    }
}

/// Writes `name` and `name-opacity`; the brush alpha is scaled by the explicit opacity.
fn write_paint_attr(out: &mut String, name: &str, brush: Option<&Brush>, opacity: Option<f64>) {
    let (value, alpha) = match brush {
        Some(brush) => {
            let (value, alpha) = svg_paint(brush);
            (Some(value), alpha)
        }
        None => (None, None),
    };
    if let Some(value) = value {
        out.push_str(&format!(r#" {name}="{value}""#));
    }
    let combined = match (alpha, opacity) {
        (None, None) => None,
        (a, o) => Some(a.unwrap_or(1.0) * o.unwrap_or(1.0)),
    };
    if let Some(o) = combined {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

fn write_path_data(out: &mut String, path: &BezPath) {
    for (i, el) in path.elements().iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let segment = match el {
            PathEl::MoveTo(p) => format!("M{},{}", p.x, p.y),
            PathEl::LineTo(p) => format!("L{},{}", p.x, p.y),
            PathEl::QuadTo(a, p) => format!("Q{},{} {},{}", a.x, a.y, p.x, p.y),
            PathEl::CurveTo(a, b, p) => {
                format!("C{},{} {},{} {},{}", a.x, a.y, b.x, b.y, p.x, p.y)
            }
            PathEl::ClosePath => "Z".into(),
        };
        out.push_str(&segment);
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
