use super::point::Point;
use super::team::Team;
use super::terrain::Terrain;

/// one square of the arena. spawns and goals carry the team that owns
/// them; open ground and walls belong to nobody.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub point: Point,
    pub terrain: Terrain,
    pub team: Option<Team>,
}

impl Cell {
    pub fn new(point: Point, terrain: Terrain, team: Option<Team>) -> Self {
        Self {
            point,
            terrain,
            team,
        }
    }
}
