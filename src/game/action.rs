use crate::arena::point::Point;

/// what a bot chose to do with its turn. a shot carries the cell it was
/// declared at; the engine snaps the real target to the first occupied
/// cell along the ray.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Action {
    Wait,
    Move(Point),
    Shoot(Point),
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Wait => write!(f, "wait"),
            Action::Move(to) => write!(f, "move to {}", to),
            Action::Shoot(at) => write!(f, "shoot at {}", at),
        }
    }
}
