use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Ui, Vec2};

use crate::color::discrete_color;
use crate::data::aggregate::GenreCount;

// ---------------------------------------------------------------------------
// Squarified layout
// ---------------------------------------------------------------------------

/// Worst aspect ratio of a strip holding `areas` along a side of length `side`.
fn worst_ratio(areas: &[f64], side: f64) -> f64 {
    let sum: f64 = areas.iter().sum();
    let (min, max) = areas
        .iter()
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), &a| (lo.min(a), hi.max(a)));
    let side2 = side * side;
    let sum2 = sum * sum;
    (side2 * max / sum2).max(sum2 / (side2 * min))
}

/// Place one strip against the shorter side of `free` and shrink it.
fn lay_strip(strip: &[(usize, f64)], free: &mut Rect, out: &mut [Rect]) {
    let sum: f64 = strip.iter().map(|(_, a)| a).sum();
    if free.width() >= free.height() {
        let col_w = (sum / free.height() as f64) as f32;
        let mut y = free.min.y;
        for &(i, a) in strip {
            let h = (a / col_w as f64) as f32;
            out[i] = Rect::from_min_size(Pos2::new(free.min.x, y), Vec2::new(col_w, h));
            y += h;
        }
        free.min.x += col_w;
    } else {
        let row_h = (sum / free.width() as f64) as f32;
        let mut x = free.min.x;
        for &(i, a) in strip {
            let w = (a / row_h as f64) as f32;
            out[i] = Rect::from_min_size(Pos2::new(x, free.min.y), Vec2::new(w, row_h));
            x += w;
        }
        free.min.y += row_h;
    }
}

/// Squarified treemap of `values` inside `bounds`.
///
/// Returns one rectangle per value, in input order, with area proportional
/// to the value. Non-positive values get an empty rectangle.
pub fn squarify(values: &[f64], bounds: Rect) -> Vec<Rect> {
    let mut out = vec![Rect::from_min_size(bounds.min, Vec2::ZERO); values.len()];
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 || bounds.area() <= 0.0 {
        return out;
    }

    let scale = bounds.area() as f64 / total;
    let mut items: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v > 0.0)
        .map(|(i, v)| (i, v * scale))
        .collect();
    items.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut free = bounds;
    let mut strip: Vec<(usize, f64)> = Vec::new();
    for item in items {
        let side = free.width().min(free.height()) as f64;
        let current: Vec<f64> = strip.iter().map(|(_, a)| *a).collect();
        let mut extended = current.clone();
        extended.push(item.1);
        if strip.is_empty() || worst_ratio(&extended, side) <= worst_ratio(&current, side) {
            strip.push(item);
        } else {
            lay_strip(&strip, &mut free, &mut out);
            strip.clear();
            strip.push(item);
        }
    }
    if !strip.is_empty() {
        lay_strip(&strip, &mut free, &mut out);
    }
    out
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Paint the genre counts as a treemap filling the available width.
pub fn genre_treemap(ui: &mut Ui, genres: &[GenreCount], height: f32) {
    let size = egui::vec2(ui.available_width(), height);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let values: Vec<f64> = genres.iter().map(|g| g.count as f64).collect();
    let rects = squarify(&values, response.rect);

    for (i, (genre, rect)) in genres.iter().zip(&rects).enumerate() {
        if rect.area() <= 0.0 {
            continue;
        }
        painter.rect_filled(rect.shrink(1.0), 2.0, discrete_color(i));
        let label = format!("{}\n{}", genre.genre, genre.count);
        let galley = painter.layout_no_wrap(label, FontId::proportional(13.0), Color32::BLACK);
        if galley.size().x < rect.width() - 4.0 && galley.size().y < rect.height() - 4.0 {
            painter.galley(
                Align2::CENTER_CENTER.anchor_size(rect.center(), galley.size()).min,
                galley,
                Color32::BLACK,
            );
        }
    }

    if let Some(pos) = response.hover_pos() {
        if let Some((genre, _)) = genres.iter().zip(&rects).find(|(_, r)| r.contains(pos)) {
            let text = format!("{}: {}", genre.genre, genre.count);
            response.on_hover_text_at_pointer(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(600.0, 400.0))
    }

    #[test]
    fn areas_are_proportional_and_cover_the_bounds() {
        let values = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let rects = squarify(&values, bounds());
        assert_eq!(rects.len(), values.len());

        let total: f64 = values.iter().sum();
        let covered: f32 = rects.iter().map(Rect::area).sum();
        assert!((covered - bounds().area()).abs() < 1.0);

        for (v, r) in values.iter().zip(&rects) {
            let expected = (v / total) as f32 * bounds().area();
            assert!((r.area() - expected).abs() < 1.0, "{r:?} vs {expected}");
            assert!(bounds().expand(0.01).contains_rect(*r));
        }
    }

    #[test]
    fn rectangles_do_not_overlap() {
        let rects = squarify(&[5.0, 3.0, 3.0, 1.0], bounds());
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                let overlap = a.intersect(*b);
                assert!(overlap.width() <= 1e-3 || overlap.height() <= 1e-3);
            }
        }
    }

    #[test]
    fn non_positive_values_are_empty() {
        let rects = squarify(&[0.0, 4.0], bounds());
        assert_eq!(rects[0].area(), 0.0);
        assert!((rects[1].area() - bounds().area()).abs() < 1.0);
        assert!(squarify(&[], bounds()).is_empty());
    }
}
