use super::visualizer::Visualizer;
use crate::arena::team::Team;
use crate::arena::terrain::Terrain;
use crate::game::state::State;
use anyhow::Context;
use anyhow::Result;
use image::Rgba;
use image::RgbaImage;
use std::path::Path;
use std::path::PathBuf;

/// each grid cell is this many pixels wide in rendered output
pub const PIXELS_PER_CELL: u32 = 16;

const WALL: Rgba<u8> = Rgba([20, 20, 20, 255]);
const OPEN: Rgba<u8> = Rgba([250, 250, 250, 255]);
const SPAWN_A: Rgba<u8> = Rgba([255, 220, 220, 255]);
const SPAWN_B: Rgba<u8> = Rgba([220, 228, 255, 255]);
const GOAL_A: Rgba<u8> = Rgba([220, 60, 60, 255]);
const GOAL_B: Rgba<u8> = Rgba([60, 90, 220, 255]);
const BOT_A: Rgba<u8> = Rgba([180, 20, 20, 255]);
const BOT_B: Rgba<u8> = Rgba([20, 50, 180, 255]);
const RUBBLE: Rgba<u8> = Rgba([120, 120, 120, 255]);

/// writes one PNG per tick into a match directory. stitching the frames
/// into a GIF or movie is left to external tools; the suggested command
/// is logged on finish.
pub struct Frames {
    dir: PathBuf,
    count: usize,
}

impl Frames {
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("couldn't create frame directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            count: 0,
        })
    }

    fn write(&mut self, state: &State) {
        let path = self.dir.join(format!("tick_{:04}.png", self.count));
        self.count += 1;
        paint(state)
            .save(&path)
            .unwrap_or_else(|e| panic!("couldn't write frame {}: {}", path.display(), e));
    }
}

impl Visualizer for Frames {
    fn init(&mut self, state: &State) {
        self.write(state);
    }

    /// one frame per tick keeps the output small; per-action frames are
    /// what the update hook is for if anyone wants a movie version
    fn tick_complete(&mut self, state: &State) {
        self.write(state);
    }

    fn finish(&mut self) {
        log::info!(
            "wrote {} frames; stitch with: convert -delay 20 -loop 0 '{}/tick_*.png' game.gif",
            self.count,
            self.dir.display()
        );
    }
}

/// the current board as pixels: terrain underneath, bots on top, fallen
/// goals as rubble
pub fn paint(state: &State) -> RgbaImage {
    let arena = state.arena();
    let mut img = RgbaImage::new(
        arena.width() as u32 * PIXELS_PER_CELL,
        arena.height() as u32 * PIXELS_PER_CELL,
    );
    for cell in arena.cells() {
        let color = match (cell.terrain, cell.team) {
            (Terrain::Wall, _) => WALL,
            (Terrain::Open, _) => OPEN,
            (Terrain::Spawn, Some(Team::A)) => SPAWN_A,
            (Terrain::Spawn, _) => SPAWN_B,
            (Terrain::Goal, Some(Team::A)) => GOAL_A,
            (Terrain::Goal, _) => GOAL_B,
        };
        block(&mut img, cell.point.x, cell.point.y, 0, color);
    }
    for goal in state.goals() {
        if !goal.alive {
            block(&mut img, goal.position.x, goal.position.y, 0, RUBBLE);
        }
    }
    for bot in state.bots().iter().filter(|bot| bot.alive) {
        let color = match bot.team {
            Team::A => BOT_A,
            Team::B => BOT_B,
        };
        block(&mut img, bot.position.x, bot.position.y, 3, color);
    }
    img
}

/// fill one grid cell, inset by a margin so bots read as tokens on tiles
fn block(img: &mut RgbaImage, x: usize, y: usize, inset: u32, color: Rgba<u8>) {
    let x0 = x as u32 * PIXELS_PER_CELL + inset;
    let y0 = y as u32 * PIXELS_PER_CELL + inset;
    let x1 = (x as u32 + 1) * PIXELS_PER_CELL - inset;
    let y1 = (y as u32 + 1) * PIXELS_PER_CELL - inset;
    for px in x0..x1 {
        for py in y0..y1 {
            img.put_pixel(px, py, color);
        }
    }
}
