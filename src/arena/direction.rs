use super::team::Team;

/// the four compass directions, in the order scripts index them.
#[derive(Debug, Clone, Copy, Hash, Ord, PartialOrd, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// scripts speak in team-relative directions where "north" points at
    /// the enemy goal and "south" back home. the remap is a 90° rotation,
    /// opposite for each team, so one script drives either side unchanged.
    pub fn absolute(self, team: Team) -> Self {
        match team {
            Team::A => match self {
                Direction::North => Direction::East,
                Direction::South => Direction::West,
                Direction::East => Direction::South,
                Direction::West => Direction::North,
            },
            Team::B => match self {
                Direction::North => Direction::West,
                Direction::South => Direction::East,
                Direction::East => Direction::North,
                Direction::West => Direction::South,
            },
        }
    }
}

/// scripts produce arbitrary integers; any of them selects a direction.
/// euclidean remainder so that negative values wrap instead of exploding.
impl From<i64> for Direction {
    fn from(n: i64) -> Self {
        Self::ALL[n.rem_euclid(Self::ALL.len() as i64) as usize]
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::North => write!(f, "north"),
            Direction::South => write!(f, "south"),
            Direction::East => write!(f, "east"),
            Direction::West => write!(f, "west"),
        }
    }
}
