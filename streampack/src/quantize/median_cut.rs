//! Deterministic median-cut palette generation.

use std::collections::HashMap;

use tracing::debug;

use super::{ColorDepth, Palette, QuantizedRaster, Quantization, Quantizer};
use crate::color::Rgb;
use crate::source::PixelSource;

/// Median-cut quantizer.
///
/// Builds a histogram of distinct colors, then repeatedly splits the color
/// box with the widest channel range at the count-weighted median of that
/// channel until there are as many boxes as palette entries. Each box
/// contributes its weighted mean. Images that already fit the palette keep
/// their exact colors, ordered by `0xRRGGBB`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianCut;

#[derive(Debug, Clone, Copy)]
struct ColorCount {
    color: Rgb,
    count: u32,
}

#[derive(Debug, Clone)]
struct ColorBox {
    colors: Vec<ColorCount>,
}

fn channel(color: Rgb, ch: usize) -> u8 {
    match ch {
        0 => color.r,
        1 => color.g,
        _ => color.b,
    }
}

impl ColorBox {
    /// Widest channel and its range. Ties go to red, then green.
    fn widest_channel(&self) -> (usize, u8) {
        let mut best = (0, 0u8);
        for ch in 0..3 {
            let (min, max) = self
                .colors
                .iter()
                .map(|c| channel(c.color, ch))
                .fold((u8::MAX, u8::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
            let range = max.saturating_sub(min);
            if range > best.1 {
                best = (ch, range);
            }
        }
        best
    }

    fn can_split(&self) -> bool {
        self.colors.len() > 1
    }

    fn split(mut self) -> (ColorBox, ColorBox) {
        let (ch, _) = self.widest_channel();
        self.colors
            .sort_unstable_by_key(|c| (channel(c.color, ch), c.color.key()));

        let total: u64 = self.colors.iter().map(|c| c.count as u64).sum();
        let mut acc = 0u64;
        let mut split_at = 0;
        for (i, c) in self.colors.iter().enumerate() {
            acc += c.count as u64;
            if acc * 2 >= total {
                split_at = i;
                break;
            }
        }
        // Both halves must be non-empty
        let split_at = split_at.min(self.colors.len() - 2);

        let right = self.colors.split_off(split_at + 1);
        (self, ColorBox { colors: right })
    }

    fn mean(&self) -> Rgb {
        let mut sums = [0u64; 3];
        let mut total = 0u64;
        for c in &self.colors {
            let n = c.count as u64;
            sums[0] += c.color.r as u64 * n;
            sums[1] += c.color.g as u64 * n;
            sums[2] += c.color.b as u64 * n;
            total += n;
        }
        if total == 0 {
            return Rgb::BLACK;
        }
        let avg = |s: u64| ((s + total / 2) / total) as u8;
        Rgb::new(avg(sums[0]), avg(sums[1]), avg(sums[2]))
    }
}

/// Distinct colors with their pixel counts, ordered by `0xRRGGBB`.
fn histogram(source: &dyn PixelSource) -> Vec<ColorCount> {
    let (width, height) = source.dimensions();
    let mut keys = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            keys.push(source.pixel(x, y).key());
        }
    }
    keys.sort_unstable();

    let mut colors: Vec<ColorCount> = Vec::new();
    for key in keys {
        match colors.last_mut() {
            Some(last) if last.color.key() == key => last.count += 1,
            _ => colors.push(ColorCount {
                color: Rgb::new((key >> 16) as u8, (key >> 8) as u8, key as u8),
                count: 1,
            }),
        }
    }
    colors
}

fn median_cut(colors: Vec<ColorCount>, max_colors: usize) -> Vec<Rgb> {
    let mut boxes = vec![ColorBox { colors }];
    while boxes.len() < max_colors {
        let mut pick: Option<(usize, u8)> = None;
        for (i, b) in boxes.iter().enumerate() {
            if !b.can_split() {
                continue;
            }
            let (_, range) = b.widest_channel();
            if pick.map_or(true, |(_, best)| range > best) {
                pick = Some((i, range));
            }
        }
        let Some((idx, _)) = pick else {
            break;
        };
        let (left, right) = boxes[idx].clone().split();
        boxes[idx] = left;
        boxes.insert(idx + 1, right);
    }
    boxes.iter().map(ColorBox::mean).collect()
}

impl Quantizer for MedianCut {
    fn quantize(&self, source: &dyn PixelSource, depth: ColorDepth) -> Quantization {
        let (width, height) = source.dimensions();
        let histogram = histogram(source);
        let distinct_colors = histogram.len();
        let max_colors = depth.colors() as usize;

        let palette = if distinct_colors <= max_colors {
            Palette::padded(histogram.iter().map(|c| c.color).collect(), depth)
        } else {
            Palette::padded(median_cut(histogram.clone(), max_colors), depth)
        };

        // One nearest-entry search per distinct color
        let lookup: HashMap<u32, u8> = histogram
            .iter()
            .map(|c| (c.color.key(), palette.nearest(c.color)))
            .collect();

        let mut indices = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let key = source.pixel(x, y).key();
                indices.push(lookup.get(&key).copied().unwrap_or(0));
            }
        }

        debug!(
            width,
            height,
            distinct_colors,
            colors = max_colors,
            "Quantized image"
        );

        Quantization {
            palette,
            raster: QuantizedRaster::new(width, height, depth, indices),
            distinct_colors,
        }
    }

    fn name(&self) -> &str {
        "median-cut"
    }
}
