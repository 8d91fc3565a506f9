use super::cell::Cell;
use super::direction::Direction;
use super::line::Line;
use super::point::Point;
use super::sight::Sight;
use super::team::Team;
use super::terrain::Terrain;
use crate::BOTS_PER_TEAM;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;

/// the static battlefield: a rectangular grid of cells, the spawn and goal
/// placements for both teams, and the precomputed visibility relation.
/// immutable once loaded and shared by every match in a generation.
pub struct Arena {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    spawns: [Vec<Point>; 2],
    goals: [Point; 2],
    sight: Sight,
}

impl Arena {
    /// load a battlefield from its palette image. any pixel outside the
    /// palette, or a wrong spawn/goal census, is an operator error.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let img = image::open(path)
            .with_context(|| format!("couldn't open arena image {}", path.display()))?
            .to_rgba8();
        Self::decode(&img).with_context(|| format!("malformed arena image {}", path.display()))
    }

    /// pixels are cells. black means wall, white open; a red-dominant
    /// pixel is a spawn with the team in the green channel (0 is A), a
    /// green-dominant pixel a goal with the team in the red channel.
    /// alpha is ignored.
    pub fn decode(img: &image::RgbaImage) -> Result<Self> {
        let width = img.width() as usize;
        let height = img.height() as usize;
        let mut cells = vec![Cell::new(Point::default(), Terrain::Open, None); width * height];
        for (x, y, pixel) in img.enumerate_pixels() {
            let point = Point {
                x: x as usize,
                y: y as usize,
            };
            let [r, g, b, _] = pixel.0;
            let (terrain, team) = match (r, g, b) {
                (0, 0, 0) => (Terrain::Wall, None),
                (255, 255, 255) => (Terrain::Open, None),
                (255, g, 0) if g < 255 => (Terrain::Spawn, Some(Self::owner(g))),
                (r, 255, 0) if r < 255 => (Terrain::Goal, Some(Self::owner(r))),
                _ => bail!("unknown color at ({}, {}): #{:02x}{:02x}{:02x}", x, y, r, g, b),
            };
            cells[point.x * height + point.y] = Cell::new(point, terrain, team);
        }
        Self::assemble(width, height, cells)
    }

    fn owner(channel: u8) -> Team {
        if channel == 0 { Team::A } else { Team::B }
    }

    /// validate the census, then precompute visibility.
    fn assemble(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self> {
        let mut arena = Self {
            width,
            height,
            cells,
            spawns: [Vec::new(), Vec::new()],
            goals: [Point::default(); 2],
            sight: Sight::new(),
        };
        arena.census()?;
        arena.survey();
        Ok(arena)
    }

    /// every map fields exactly five spawns and one goal per team.
    fn census(&mut self) -> Result<()> {
        let mut goals: [Vec<Point>; 2] = [Vec::new(), Vec::new()];
        for cell in &self.cells {
            match (cell.terrain, cell.team) {
                (Terrain::Spawn, Some(team)) => self.spawns[usize::from(team)].push(cell.point),
                (Terrain::Goal, Some(team)) => goals[usize::from(team)].push(cell.point),
                _ => {}
            }
        }
        for team in Team::BOTH {
            let spawned = self.spawns[usize::from(team)].len();
            let placed = &goals[usize::from(team)];
            if spawned != BOTS_PER_TEAM || placed.len() != 1 {
                bail!(
                    "bogus map: team {} has {} spawns and {} goals",
                    team,
                    spawned,
                    placed.len()
                );
            }
            self.goals[usize::from(team)] = placed[0];
        }
        Ok(())
    }

    /// pre-calculate visibility for every pair of cells. it's slow (n²)
    /// but it only happens once on load. a pair sees each other iff
    /// neither endpoint is opaque and no interior cell of the canonical
    /// ray between them is opaque; a non-wall cell always sees itself.
    fn survey(&mut self) {
        let n = self.cells.len();
        for i in 0..n {
            if self.cells[i].terrain.opaque() {
                continue;
            }
            for j in i + 1..n {
                if self.cells[j].terrain.opaque() {
                    continue;
                }
                let ray = Line::new(self.cells[i].point, self.cells[j].point);
                let clear = ray
                    .filter(|&p| p != self.cells[i].point && p != self.cells[j].point)
                    .all(|p| !self.at(p).terrain.opaque());
                if clear {
                    self.sight.link(i as u32, j as u32);
                }
            }
        }
        log::debug!(
            "created {} cell visibility links for {} cells",
            self.sight.links(),
            n
        );
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn index(&self, p: Point) -> usize {
        p.x * self.height + p.y
    }

    pub fn at(&self, p: Point) -> &Cell {
        &self.cells[self.index(p)]
    }

    pub fn walkable(&self, p: Point) -> bool {
        self.at(p).terrain.walkable()
    }

    pub fn visible(&self, a: Point, b: Point) -> bool {
        if a == b {
            !self.at(a).terrain.opaque()
        } else {
            self.sight.visible(self.index(a) as u32, self.index(b) as u32)
        }
    }

    pub fn spawns(&self, team: Team) -> &[Point] {
        &self.spawns[usize::from(team)]
    }

    pub fn goal(&self, team: Team) -> Point {
        self.goals[usize::from(team)]
    }

    /// the adjacent cell one step away, if that step stays on the map and
    /// off walls and goals; otherwise you stay where you are.
    pub fn destination(&self, from: Point, dir: Direction) -> Point {
        let to = match dir {
            Direction::North if from.y > 0 => Point {
                x: from.x,
                y: from.y - 1,
            },
            Direction::South if from.y < self.height - 1 => Point {
                x: from.x,
                y: from.y + 1,
            },
            Direction::East if from.x < self.width - 1 => Point {
                x: from.x + 1,
                y: from.y,
            },
            Direction::West if from.x > 0 => Point {
                x: from.x - 1,
                y: from.y,
            },
            _ => return from,
        };
        if self.walkable(to) { to } else { from }
    }

    /// the map-edge cell a shot in this direction is declared at. the
    /// engine snaps the actual target to the first occupied cell en route.
    pub fn edge(&self, from: Point, dir: Direction) -> Point {
        match dir {
            Direction::North => Point { x: from.x, y: 0 },
            Direction::South => Point {
                x: from.x,
                y: self.height - 1,
            },
            Direction::East => Point {
                x: self.width - 1,
                y: from.y,
            },
            Direction::West => Point { x: 0, y: from.y },
        }
    }

    pub fn distance(&self, a: Point, b: Point) -> usize {
        a.distance(&b)
    }
}

#[cfg(test)]
impl Arena {
    /// test battlefields from ascii art: `.` open, `#` wall, `a`/`b`
    /// spawns, `A`/`B` goals. panics on a bogus sketch.
    pub fn sketch(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows[0].len();
        assert!(rows.iter().all(|row| row.len() == width));
        let mut cells = vec![Cell::new(Point::default(), Terrain::Open, None); width * height];
        for (y, row) in rows.iter().enumerate() {
            for (x, mark) in row.chars().enumerate() {
                let point = Point { x, y };
                let (terrain, team) = match mark {
                    '.' => (Terrain::Open, None),
                    '#' => (Terrain::Wall, None),
                    'a' => (Terrain::Spawn, Some(Team::A)),
                    'b' => (Terrain::Spawn, Some(Team::B)),
                    'A' => (Terrain::Goal, Some(Team::A)),
                    'B' => (Terrain::Goal, Some(Team::B)),
                    _ => panic!("unknown sketch mark '{}'", mark),
                };
                cells[x * height + y] = Cell::new(point, terrain, team);
            }
        }
        Self::assemble(width, height, cells).expect("valid sketch")
    }

    /// the standard small test map: team A on the west, B on the east, a
    /// wall down the middle with a gap at the equator.
    pub fn sample() -> Self {
        Self::sketch(&[
            "....#....",
            "a...#...b",
            "a...#...b",
            "Aa.....bB",
            "a...#...b",
            "a...#...b",
            "....#....",
        ])
    }
}
