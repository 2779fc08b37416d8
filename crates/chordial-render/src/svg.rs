use crate::diff::{RenderPlan, ShapeKey};
use crate::model::{
    BarChartLayout, ChordDiagramLayout, ChordSubgroupLayout, DiagramLayout, SankeyDiagramLayout,
};
use crate::palette;
use std::f64::consts::PI;
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root SVG `id`; also prefixes hover rules and gradient ids.
    pub diagram_id: Option<String>,
    /// When false, output is static: no transition `<animate>` nodes and no
    /// exiting-shape layer.
    pub animate: bool,
    /// When true, hoverable shapes embed `<title>` tooltips and the
    /// stylesheet thickens strokes on `:hover`.
    pub include_tooltips: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            animate: true,
            include_tooltips: true,
        }
    }
}

pub fn render_diagram(
    layout: &DiagramLayout,
    previous: Option<&DiagramLayout>,
    plan: &RenderPlan,
    options: &SvgRenderOptions,
) -> String {
    match layout {
        DiagramLayout::Chord(l) => {
            let prev = match previous {
                Some(DiagramLayout::Chord(p)) => Some(p),
                _ => None,
            };
            render_chord_svg(l, prev, plan, options)
        }
        DiagramLayout::Sankey(l) => {
            let prev = match previous {
                Some(DiagramLayout::Sankey(p)) => Some(p),
                _ => None,
            };
            render_sankey_svg(l, prev, plan, options)
        }
        DiagramLayout::Bars(l) => {
            let prev = match previous {
                Some(DiagramLayout::Bars(p)) => Some(p),
                _ => None,
            };
            render_bars_svg(l, prev, plan, options)
        }
    }
}

pub fn render_chord_svg(
    layout: &ChordDiagramLayout,
    previous: Option<&ChordDiagramLayout>,
    plan: &RenderPlan,
    options: &SvgRenderOptions,
) -> String {
    let id = options.diagram_id.as_deref().unwrap_or("chord");
    let id_esc = escape_xml(id);
    let b = layout.bounds;
    let dur = plan.transition.duration_secs();

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" width="100%" xmlns="http://www.w3.org/2000/svg" style="max-width: {w}px; font: 15px sans-serif;" viewBox="{x} {y} {w} {h}" role="graphics-document document" aria-roledescription="chord">"#,
        id = id_esc,
        x = fmt(b.min_x),
        y = fmt(b.min_y),
        w = fmt(b.width()),
        h = fmt(b.height()),
    );
    let _ = write!(&mut out, "<style>{}</style>", hover_css(id, options));

    out.push_str("<defs>");
    for gradient in &palette::GROUP_GRADIENTS {
        let _ = write!(
            &mut out,
            r#"<linearGradient id="{id}-{gid}" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" stop-color="{from}"/><stop offset="100%" stop-color="{to}"/></linearGradient>"#,
            id = id_esc,
            gid = gradient.id,
            from = gradient.from,
            to = gradient.to,
        );
    }
    out.push_str("</defs>");

    out.push_str(r#"<g class="groups">"#);
    for group in &layout.groups {
        let entering = plan.is_entering(&ShapeKey::Group(group.index));
        out.push_str(r#"<g class="group">"#);

        let d = arc_path(
            layout.inner_radius,
            layout.outer_radius,
            group.start_angle,
            group.end_angle,
        );
        let _ = write!(
            &mut out,
            r#"<path class="arc" d="{d}" fill="url(#{id}-{gid})" stroke="{stroke}">"#,
            d = d,
            id = id_esc,
            gid = palette::group_gradient(group.index).id,
            stroke = palette::category_stroke(group.index),
        );
        if options.include_tooltips {
            let _ = write!(
                &mut out,
                "<title>{}</title>",
                escape_xml(&crate::tooltip::format_value(group.value))
            );
        }
        if options.animate && entering {
            write_fade(&mut out, 0.0, 1.0, dur);
        }
        out.push_str("</path>");

        let placement = group.label_placement(layout.outer_radius);
        let mut transform = format!(
            "rotate({}) translate({})",
            fmt(placement.rotate_deg),
            fmt(placement.translate),
        );
        if placement.mirrored {
            transform.push_str(" rotate(180)");
        }
        let _ = write!(
            &mut out,
            r#"<text dy=".35em" transform="{transform}" text-anchor="{anchor}">{label}"#,
            transform = transform,
            anchor = placement.anchor.as_str(),
            label = escape_xml(&group.label),
        );
        if options.animate && entering {
            write_fade(&mut out, 0.0, 1.0, dur);
        }
        out.push_str("</text>");

        out.push_str("</g>");
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="ribbons" fill-opacity="0.67">"#);
    for ribbon in &layout.ribbons {
        let key = ShapeKey::Ribbon {
            source: ribbon.source.index,
            target: ribbon.target.index,
        };
        let d = ribbon_path(layout.inner_radius, &ribbon.source, &ribbon.target);
        let _ = write!(
            &mut out,
            r#"<path class="ribbon" d="{d}" fill="{fill}" stroke="{stroke}">"#,
            d = d,
            fill = palette::category_color(ribbon.target.index),
            stroke = palette::category_stroke(ribbon.target.index),
        );
        if options.include_tooltips {
            let _ = write!(
                &mut out,
                "<title>{}</title>",
                escape_xml(&crate::tooltip::format_value(ribbon.value()))
            );
        }
        if options.animate && plan.is_entering(&key) {
            write_fade(&mut out, 0.0, 1.0, dur);
        }
        out.push_str("</path>");
    }
    out.push_str("</g>");

    if options.animate && !plan.exit.is_empty() {
        if let Some(prev) = previous {
            out.push_str(r#"<g class="exiting" fill-opacity="0.67">"#);
            for group in &prev.groups {
                if !plan.exit.contains(&ShapeKey::Group(group.index)) {
                    continue;
                }
                let d = arc_path(
                    prev.inner_radius,
                    prev.outer_radius,
                    group.start_angle,
                    group.end_angle,
                );
                let _ = write!(
                    &mut out,
                    r#"<path class="arc" d="{d}" fill="url(#{id}-{gid})">"#,
                    d = d,
                    id = id_esc,
                    gid = palette::group_gradient(group.index).id,
                );
                write_fade(&mut out, 1.0, 0.0, dur);
                out.push_str("</path>");
            }
            for ribbon in &prev.ribbons {
                let key = ShapeKey::Ribbon {
                    source: ribbon.source.index,
                    target: ribbon.target.index,
                };
                if !plan.exit.contains(&key) {
                    continue;
                }
                let d = ribbon_path(prev.inner_radius, &ribbon.source, &ribbon.target);
                let _ = write!(
                    &mut out,
                    r#"<path class="ribbon" d="{d}" fill="{fill}">"#,
                    d = d,
                    fill = palette::category_color(ribbon.target.index),
                );
                write_fade(&mut out, 1.0, 0.0, dur);
                out.push_str("</path>");
            }
            out.push_str("</g>");
        }
    }

    out.push_str("</svg>");
    out
}

pub fn render_sankey_svg(
    layout: &SankeyDiagramLayout,
    previous: Option<&SankeyDiagramLayout>,
    plan: &RenderPlan,
    options: &SvgRenderOptions,
) -> String {
    let id = options.diagram_id.as_deref().unwrap_or("sankey");
    let id_esc = escape_xml(id);
    let dur = plan.transition.duration_secs();

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" width="100%" xmlns="http://www.w3.org/2000/svg" style="max-width: {w}px;" viewBox="0 0 {w} {h}" role="graphics-document document" aria-roledescription="sankey">"#,
        id = id_esc,
        w = fmt(layout.width),
        h = fmt(layout.height),
    );
    let _ = write!(&mut out, "<style>{}</style>", hover_css(id, options));

    out.push_str(r##"<g class="links" fill="none" stroke="#000" stroke-opacity="0.2">"##);
    for link in &layout.links {
        let source = &layout.nodes[link.source];
        let target = &layout.nodes[link.target];
        let key = ShapeKey::Flow {
            source: source.name.clone(),
            target: target.name.clone(),
        };
        let d = flow_path(source.x1, target.x0, link.y0, link.y1);
        let _ = write!(
            &mut out,
            r#"<path class="link" d="{d}" stroke-width="{sw}">"#,
            d = d,
            sw = fmt(link.width.max(1.0)),
        );
        if options.include_tooltips {
            let _ = write!(
                &mut out,
                "<title>{}</title>",
                escape_xml(&crate::tooltip::format_value(link.value))
            );
        }
        if options.animate && plan.is_entering(&key) {
            write_fade(&mut out, 0.0, 1.0, dur);
        }
        out.push_str("</path>");
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="nodes">"#);
    for node in &layout.nodes {
        let key = ShapeKey::Node(node.name.clone());
        let _ = write!(
            &mut out,
            r#"<rect class="node" x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}">"#,
            x = fmt(node.x0),
            y = fmt(node.y0),
            w = fmt(node.x1 - node.x0),
            h = fmt(node.y1 - node.y0),
            fill = palette::category_color(node.index),
        );
        if options.include_tooltips {
            let _ = write!(
                &mut out,
                "<title>{}</title>",
                escape_xml(&crate::tooltip::format_value(node.value))
            );
        }
        if options.animate && plan.is_entering(&key) {
            write_fade(&mut out, 0.0, 1.0, dur);
        }
        out.push_str("</rect>");
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="node-labels" font-family="sans-serif" font-size="10">"#);
    for node in &layout.nodes {
        let y = (node.y0 + node.y1) / 2.0;
        let (x, anchor) = if node.x0 < layout.width / 2.0 {
            (node.x1 + 6.0, "start")
        } else {
            (node.x0 - 6.0, "end")
        };
        let _ = write!(
            &mut out,
            r#"<text x="{x}" y="{y}" dy="0.35em" text-anchor="{anchor}">{name}</text>"#,
            x = fmt(x),
            y = fmt(y),
            anchor = anchor,
            name = escape_xml(&node.name),
        );
    }
    out.push_str("</g>");

    if options.animate && !plan.exit.is_empty() {
        if let Some(prev) = previous {
            out.push_str(r#"<g class="exiting">"#);
            for link in &prev.links {
                let source = &prev.nodes[link.source];
                let target = &prev.nodes[link.target];
                let key = ShapeKey::Flow {
                    source: source.name.clone(),
                    target: target.name.clone(),
                };
                if !plan.exit.contains(&key) {
                    continue;
                }
                let d = flow_path(source.x1, target.x0, link.y0, link.y1);
                let _ = write!(
                    &mut out,
                    r##"<path class="link" d="{d}" fill="none" stroke="#000" stroke-opacity="0.2" stroke-width="{sw}">"##,
                    d = d,
                    sw = fmt(link.width.max(1.0)),
                );
                write_fade(&mut out, 1.0, 0.0, dur);
                out.push_str("</path>");
            }
            for node in &prev.nodes {
                if !plan.exit.contains(&ShapeKey::Node(node.name.clone())) {
                    continue;
                }
                let _ = write!(
                    &mut out,
                    r#"<rect class="node" x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}">"#,
                    x = fmt(node.x0),
                    y = fmt(node.y0),
                    w = fmt(node.x1 - node.x0),
                    h = fmt(node.y1 - node.y0),
                    fill = palette::category_color(node.index),
                );
                write_fade(&mut out, 1.0, 0.0, dur);
                out.push_str("</rect>");
            }
            out.push_str("</g>");
        }
    }

    out.push_str("</svg>");
    out
}

pub fn render_bars_svg(
    layout: &BarChartLayout,
    previous: Option<&BarChartLayout>,
    plan: &RenderPlan,
    options: &SvgRenderOptions,
) -> String {
    let id = options.diagram_id.as_deref().unwrap_or("bars");
    let id_esc = escape_xml(id);
    let dur = plan.transition.duration_secs();

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" width="100%" xmlns="http://www.w3.org/2000/svg" style="max-width: {w}px;" viewBox="0 0 {w} {h}" role="graphics-document document" aria-roledescription="bar chart">"#,
        id = id_esc,
        w = fmt(layout.width),
        h = fmt(layout.height),
    );
    let _ = write!(&mut out, "<style>{}</style>", hover_css(id, options));

    // Bottom axis.
    let _ = write!(
        &mut out,
        r#"<g class="axis axis-x" transform="translate(0,{y})" fill="none" font-size="10" font-family="sans-serif" text-anchor="middle">"#,
        y = fmt(layout.baseline_y),
    );
    let _ = write!(
        &mut out,
        r#"<path class="domain" stroke="currentColor" d="M{x0},0H{x1}"/>"#,
        x0 = fmt(layout.axis_x),
        x1 = fmt(layout.axis_right),
    );
    for tick in &layout.x_ticks {
        let _ = write!(
            &mut out,
            r#"<g class="tick" transform="translate({x},0)"><line stroke="currentColor" y2="6"/><text fill="currentColor" y="9" dy="0.71em">{label}</text></g>"#,
            x = fmt(tick.position),
            label = escape_xml(&tick.label),
        );
    }
    out.push_str("</g>");

    // Left axis.
    let _ = write!(
        &mut out,
        r#"<g class="axis axis-y" transform="translate({x},0)" fill="none" font-size="10" font-family="sans-serif" text-anchor="end">"#,
        x = fmt(layout.axis_x),
    );
    let top = layout
        .y_ticks
        .last()
        .map(|t| t.position)
        .unwrap_or(layout.baseline_y);
    let _ = write!(
        &mut out,
        r#"<path class="domain" stroke="currentColor" d="M0,{y0}V{y1}"/>"#,
        y0 = fmt(layout.baseline_y),
        y1 = fmt(top),
    );
    for tick in &layout.y_ticks {
        let _ = write!(
            &mut out,
            r#"<g class="tick" transform="translate(0,{y})"><line stroke="currentColor" x2="-6"/><text fill="currentColor" x="-9" dy="0.32em">{label}</text></g>"#,
            y = fmt(tick.position),
            label = escape_xml(&tick.label),
        );
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="bars">"#);
    for bar in &layout.bars {
        let key = ShapeKey::Bar(bar.index);
        let _ = write!(
            &mut out,
            r#"<rect class="bar" x="{x}" y="{y}" width="{w}" height="{h}" fill="steelblue">"#,
            x = fmt(bar.x),
            y = fmt(bar.y),
            w = fmt(bar.width),
            h = fmt(bar.height),
        );
        if options.include_tooltips {
            let _ = write!(
                &mut out,
                "<title>{}</title>",
                escape_xml(&crate::tooltip::format_value(bar.value))
            );
        }
        if options.animate {
            if plan.is_entering(&key) {
                // Grow up from the baseline.
                write_animate(&mut out, "y", layout.baseline_y, bar.y, dur);
                write_animate(&mut out, "height", 0.0, bar.height, dur);
            } else if let Some(prev_bar) =
                previous.and_then(|p| p.bars.iter().find(|b| b.index == bar.index))
            {
                if prev_bar.y != bar.y || prev_bar.height != bar.height {
                    write_animate(&mut out, "y", prev_bar.y, bar.y, dur);
                    write_animate(&mut out, "height", prev_bar.height, bar.height, dur);
                }
            }
        }
        out.push_str("</rect>");
    }
    out.push_str("</g>");

    if options.animate && !plan.exit.is_empty() {
        if let Some(prev) = previous {
            out.push_str(r#"<g class="exiting">"#);
            for bar in &prev.bars {
                if !plan.exit.contains(&ShapeKey::Bar(bar.index)) {
                    continue;
                }
                let _ = write!(
                    &mut out,
                    r#"<rect class="bar" x="{x}" y="{y}" width="{w}" height="{h}" fill="steelblue">"#,
                    x = fmt(bar.x),
                    y = fmt(bar.y),
                    w = fmt(bar.width),
                    h = fmt(bar.height),
                );
                // Shrink back into the baseline, then drop.
                write_animate(&mut out, "y", bar.y, prev.baseline_y, dur);
                write_animate(&mut out, "height", bar.height, 0.0, dur);
                out.push_str("</rect>");
            }
            out.push_str("</g>");
        }
    }

    out.push_str("</svg>");
    out
}

fn hover_css(id: &str, options: &SvgRenderOptions) -> String {
    if !options.include_tooltips {
        return String::new();
    }
    // The hovered shape thickens its stroke; bars only show one on hover.
    format!(
        "#{id} path.arc:hover, #{id} path.ribbon:hover, #{id} path.link:hover, #{id} rect.node:hover {{ stroke-width: {w}; }} #{id} rect.bar {{ stroke: rgb(49, 91, 126); stroke-width: 0; }} #{id} rect.bar:hover {{ stroke-width: {w}; }}",
        id = css_ident(id),
        w = fmt(crate::tooltip::HOVER_STROKE_WIDTH),
    )
}

fn write_fade(out: &mut String, from: f64, to: f64, dur_secs: f64) {
    let _ = write!(
        out,
        r#"<animate attributeName="opacity" from="{from}" to="{to}" dur="{dur}s" fill="freeze"/>"#,
        from = fmt(from),
        to = fmt(to),
        dur = fmt(dur_secs),
    );
}

fn write_animate(out: &mut String, attribute: &str, from: f64, to: f64, dur_secs: f64) {
    let _ = write!(
        out,
        r#"<animate attributeName="{attr}" from="{from}" to="{to}" dur="{dur}s" fill="freeze"/>"#,
        attr = attribute,
        from = fmt(from),
        to = fmt(to),
        dur = fmt(dur_secs),
    );
}

/// Annular sector between `inner` and `outer` radii spanning `[a0, a1]`.
fn arc_path(inner: f64, outer: f64, a0: f64, a1: f64) -> String {
    let large = if a1 - a0 > PI { 1 } else { 0 };
    let (ox0, oy0) = crate::chord::polar_xy(outer, a0);
    let (ox1, oy1) = crate::chord::polar_xy(outer, a1);
    let (ix1, iy1) = crate::chord::polar_xy(inner, a1);
    let (ix0, iy0) = crate::chord::polar_xy(inner, a0);
    format!(
        "M{},{}A{},{} 0 {},1 {},{}L{},{}A{},{} 0 {},0 {},{}Z",
        fmt_path(ox0),
        fmt_path(oy0),
        fmt_path(outer),
        fmt_path(outer),
        large,
        fmt_path(ox1),
        fmt_path(oy1),
        fmt_path(ix1),
        fmt_path(iy1),
        fmt_path(inner),
        fmt_path(inner),
        large,
        fmt_path(ix0),
        fmt_path(iy0),
    )
}

/// Closed ribbon joining two angular slices at `radius`, pulled through the
/// center with quadratics.
fn ribbon_path(radius: f64, source: &ChordSubgroupLayout, target: &ChordSubgroupLayout) -> String {
    let (sx0, sy0) = crate::chord::polar_xy(radius, source.start_angle);
    let (sx1, sy1) = crate::chord::polar_xy(radius, source.end_angle);
    let large_s = if source.end_angle - source.start_angle > PI {
        1
    } else {
        0
    };

    let self_loop =
        source.index == target.index && source.subindex == target.subindex;
    if self_loop {
        return format!(
            "M{},{}A{},{} 0 {},1 {},{}Q0,0 {},{}Z",
            fmt_path(sx0),
            fmt_path(sy0),
            fmt_path(radius),
            fmt_path(radius),
            large_s,
            fmt_path(sx1),
            fmt_path(sy1),
            fmt_path(sx0),
            fmt_path(sy0),
        );
    }

    let (tx0, ty0) = crate::chord::polar_xy(radius, target.start_angle);
    let (tx1, ty1) = crate::chord::polar_xy(radius, target.end_angle);
    let large_t = if target.end_angle - target.start_angle > PI {
        1
    } else {
        0
    };
    format!(
        "M{},{}A{},{} 0 {},1 {},{}Q0,0 {},{}A{},{} 0 {},1 {},{}Q0,0 {},{}Z",
        fmt_path(sx0),
        fmt_path(sy0),
        fmt_path(radius),
        fmt_path(radius),
        large_s,
        fmt_path(sx1),
        fmt_path(sy1),
        fmt_path(tx0),
        fmt_path(ty0),
        fmt_path(radius),
        fmt_path(radius),
        large_t,
        fmt_path(tx1),
        fmt_path(ty1),
        fmt_path(sx0),
        fmt_path(sy0),
    )
}

/// Cubic flow path from the source node's right edge to the target's left.
fn flow_path(source_x: f64, target_x: f64, y0: f64, y1: f64) -> String {
    let mx = (source_x + target_x) / 2.0;
    format!(
        "M{},{}C{},{},{},{},{},{}",
        fmt_path(source_x),
        fmt_path(y0),
        fmt_path(mx),
        fmt_path(y0),
        fmt_path(mx),
        fmt_path(y1),
        fmt_path(target_x),
        fmt_path(y1),
    )
}

/// Conservative CSS identifier for hover rules keyed on the root id.
fn css_ident(raw: &str) -> String {
    raw.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '-'
            }
        })
        .collect()
}

/// Round-trippable decimal form for SVG attributes, avoiding `-0` and tiny
/// float noise from our own calculations.
pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

/// Path data rounds to three fractional digits.
fn fmt_path(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    if v.abs() < 0.0005 {
        return "0".to_string();
    }
    let mut r = ((v * 1000.0) + 0.5).floor() / 1000.0;
    if r.abs() < 0.0005 {
        r = 0.0;
    }
    let mut s = format!("{r:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
