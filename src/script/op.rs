/// the built-in operator table. every form has a fixed name and arity and
/// evaluates its own argument subtrees, which is what lets `if`, `and`
/// and `or` short-circuit. there are no user-defined functions.
#[derive(Debug, Clone, Copy, Hash, Ord, PartialOrd, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Less,
    Greater,
    Equal,
    If,
    And,
    Or,
    Not,
    Move,
    Wait,
    Shoot,
    ShootNearest,
    CanMove,
    EnemyVisible,
    EnemyGoalVisible,
    OwnGoalVisible,
    VisibleEnemies,
    VisibleAllies,
    MyX,
    MyY,
    Tick,
}

impl Op {
    pub const ALL: [Op; 25] = [
        Op::Add,
        Op::Sub,
        Op::Mul,
        Op::Div,
        Op::Mod,
        Op::Less,
        Op::Greater,
        Op::Equal,
        Op::If,
        Op::And,
        Op::Or,
        Op::Not,
        Op::Move,
        Op::Wait,
        Op::Shoot,
        Op::ShootNearest,
        Op::CanMove,
        Op::EnemyVisible,
        Op::EnemyGoalVisible,
        Op::OwnGoalVisible,
        Op::VisibleEnemies,
        Op::VisibleAllies,
        Op::MyX,
        Op::MyY,
        Op::Tick,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Mod => "mod",
            Op::Less => "<",
            Op::Greater => ">",
            Op::Equal => "=",
            Op::If => "if",
            Op::And => "and",
            Op::Or => "or",
            Op::Not => "not",
            Op::Move => "move",
            Op::Wait => "wait",
            Op::Shoot => "shoot",
            Op::ShootNearest => "shoot-nearest",
            Op::CanMove => "can-move?",
            Op::EnemyVisible => "enemy-visible?",
            Op::EnemyGoalVisible => "enemy-goal-visible?",
            Op::OwnGoalVisible => "own-goal-visible?",
            Op::VisibleEnemies => "visible-enemies-count",
            Op::VisibleAllies => "visible-allies-count",
            Op::MyX => "my-x-pos",
            Op::MyY => "my-y-pos",
            Op::Tick => "tick",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Mod => 2,
            Op::Less | Op::Greater | Op::Equal => 2,
            Op::If => 3,
            Op::And | Op::Or => 2,
            Op::Not => 1,
            Op::Move | Op::Shoot | Op::CanMove => 1,
            Op::Wait
            | Op::ShootNearest
            | Op::EnemyVisible
            | Op::EnemyGoalVisible
            | Op::OwnGoalVisible
            | Op::VisibleEnemies
            | Op::VisibleAllies
            | Op::MyX
            | Op::MyY
            | Op::Tick => 0,
        }
    }

    pub fn resolve(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.name() == name)
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl crate::Arbitrary for Op {
    fn random() -> Self {
        use rand::seq::IndexedRandom;
        *Self::ALL
            .choose(&mut rand::rng())
            .expect("operator table is not empty")
    }
}
