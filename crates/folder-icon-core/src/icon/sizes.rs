/// Square sizes every icon container carries.
pub const CANONICAL_SIZES: [u32; 5] = [16, 32, 48, 64, 128];

/// Largest edge an ICO entry can describe.
pub const MAX_ICON_EDGE: u32 = 256;

/// Resolutions to generate for a source of `width` x `height`.
///
/// The canonical squares plus the source resolution, or the source scaled
/// down so its longer edge is exactly [`MAX_ICON_EDGE`]. Duplicates are
/// removed and the result is ordered largest first.
pub fn variant_sizes(width: u32, height: u32) -> Vec<(u32, u32)> {
    let mut sizes: Vec<(u32, u32)> = CANONICAL_SIZES.iter().map(|&s| (s, s)).collect();

    let native = fit_within(width, height, MAX_ICON_EDGE);
    if !sizes.contains(&native) {
        sizes.push(native);
    }

    sizes.sort_by(|a, b| {
        let area_a = a.0 as u64 * a.1 as u64;
        let area_b = b.0 as u64 * b.1 as u64;
        area_b.cmp(&area_a).then_with(|| b.cmp(a))
    });
    sizes
}

/// Scale `width` x `height` down so neither edge exceeds `max_edge`,
/// keeping the aspect ratio. Sizes already within bounds are returned as is.
pub fn fit_within(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width <= max_edge && height <= max_edge {
        return (width, height);
    }

    if width >= height {
        (max_edge, scale_edge(height, max_edge, width))
    } else {
        (scale_edge(width, max_edge, height), max_edge)
    }
}

// Rounds to nearest; never collapses an edge to zero.
fn scale_edge(edge: u32, target_long: u32, long: u32) -> u32 {
    let scaled = (edge as u64 * target_long as u64 + long as u64 / 2) / long as u64;
    scaled.max(1) as u32
}
