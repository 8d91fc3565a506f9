use super::render::PIXELS_PER_CELL;
use crate::arena::activity::Activity;
use crate::arena::arena::Arena;
use anyhow::Context;
use anyhow::Result;
use image::Rgba;
use image::RgbaImage;
use std::path::Path;

/// render a generation's aggregate activity as a heat-map: movement in
/// green, gunfire in red, idling in blue, each channel scaled to its own
/// peak so quiet maps still show structure. walls stay dark.
pub fn render(arena: &Arena, heat: &Activity, path: &Path) -> Result<()> {
    let peak = heat.peak();
    let mut img = RgbaImage::new(
        arena.width() as u32 * PIXELS_PER_CELL,
        arena.height() as u32 * PIXELS_PER_CELL,
    );
    for cell in arena.cells() {
        let color = if cell.terrain.opaque() {
            Rgba([16, 16, 16, 255])
        } else {
            let count = heat.at(cell.point);
            Rgba([
                channel(count.shots, peak.shots),
                channel(count.moves, peak.moves),
                channel(count.waits, peak.waits),
                255,
            ])
        };
        let x0 = cell.point.x as u32 * PIXELS_PER_CELL;
        let y0 = cell.point.y as u32 * PIXELS_PER_CELL;
        for px in x0..x0 + PIXELS_PER_CELL {
            for py in y0..y0 + PIXELS_PER_CELL {
                img.put_pixel(px, py, color);
            }
        }
    }
    img.save(path)
        .with_context(|| format!("couldn't write heat-map {}", path.display()))?;
    log::info!("heat-map written to {}", path.display());
    Ok(())
}

fn channel(count: u32, peak: u32) -> u8 {
    match peak {
        0 => 0,
        _ => (count as u64 * 255 / peak as u64) as u8,
    }
}
