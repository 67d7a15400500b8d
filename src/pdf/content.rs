//! Content stream operators for sheet drawing

/// Stroke color of the die-cut guide circles (magenta, kept out of gamut
/// for normal artwork so the print shop can isolate the cut layer)
pub const CUT_GUIDE_RGB: (f64, f64, f64) = (1.0, 0.0, 1.0);

/// Stroke width of the die-cut guide circles, in points
pub const CUT_GUIDE_WIDTH: f64 = 0.5;

/// Font size of the row's ID label, in points
pub const LABEL_FONT_SIZE: f64 = 10.0;

/// Kappa for approximating a quarter circle with one cubic Bézier
const CIRCLE_KAPPA: f64 = 0.55228475;

/// Format a coordinate for a content stream
///
/// Every coordinate written to a page goes through here, so all numbers on
/// a sheet round the same way: four decimal places.
pub fn coord(value: f64) -> String {
    format!("{:.4}", value)
}

/// Append a stroked, unfilled die-cut guide circle centered at (cx, cy)
pub fn cut_guide_circle(content: &mut String, cx: f64, cy: f64, radius: f64) {
    let k = radius * CIRCLE_KAPPA;
    let (r, g, b) = CUT_GUIDE_RGB;

    content.push_str(&format!("{} {} {} RG\n", r, g, b));
    content.push_str(&format!("{} w\n", CUT_GUIDE_WIDTH));
    content.push_str(&format!("{} {} m\n", coord(cx + radius), coord(cy)));
    content.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        coord(cx + radius),
        coord(cy + k),
        coord(cx + k),
        coord(cy + radius),
        coord(cx),
        coord(cy + radius)
    ));
    content.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        coord(cx - k),
        coord(cy + radius),
        coord(cx - radius),
        coord(cy + k),
        coord(cx - radius),
        coord(cy)
    ));
    content.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        coord(cx - radius),
        coord(cy - k),
        coord(cx - k),
        coord(cy - radius),
        coord(cx),
        coord(cy - radius)
    ));
    content.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        coord(cx + k),
        coord(cy - radius),
        coord(cx + radius),
        coord(cy - k),
        coord(cx + radius),
        coord(cy)
    ));
    content.push_str("h S\n");
}

/// Append an ID label in black Helvetica-Bold at the given baseline origin
pub fn id_label(content: &mut String, text: &str, x: f64, y: f64) {
    content.push_str("BT\n");
    content.push_str(&format!("/F1 {} Tf\n", LABEL_FONT_SIZE));
    content.push_str("0 g\n");
    content.push_str(&format!("1 0 0 1 {} {} Tm\n", coord(x), coord(y)));
    content.push_str(&format!("({}) Tj\n", escape_pdf_string(text)));
    content.push_str("ET\n");
}

/// Append a placed image XObject filling the given rectangle
pub fn place_image(content: &mut String, name: &str, x: f64, y: f64, width: f64, height: f64) {
    content.push_str("q\n");
    content.push_str(&format!(
        "{} 0 0 {} {} {} cm\n",
        coord(width),
        coord(height),
        coord(x),
        coord(y)
    ));
    content.push_str(&format!("/{} Do\n", name));
    content.push_str("Q\n");
}

/// Fit an image into a square box centered at (cx, cy), preserving aspect
///
/// Returns the (x, y, width, height) rectangle `place_image` should fill.
/// Square sources fill the box exactly; others shrink on their long axis and
/// stay centered.
pub fn fit_centered(img_width: u32, img_height: u32, cx: f64, cy: f64, box_size: f64) -> (f64, f64, f64, f64) {
    let w = img_width as f64;
    let h = img_height as f64;
    let scale = (box_size / w).min(box_size / h);
    let draw_w = w * scale;
    let draw_h = h * scale;

    (cx - draw_w / 2.0, cy - draw_h / 2.0, draw_w, draw_h)
}

/// Escape special characters in PDF strings
fn escape_pdf_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
        .replace('\r', "\\r")
        .replace('\n', "\\n")
}
