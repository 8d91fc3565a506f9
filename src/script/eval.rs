use super::node::Node;
use super::op::Op;
use super::value::Fault;
use super::value::Value;
use crate::arena::direction::Direction;
use crate::arena::team::Team;
use crate::game::action::Action;
use crate::game::state::State;

/// a script under evaluation: its tree plus a borrow of the live match
/// state, oriented around the current actor. operators receive their
/// arguments unevaluated, which is what lets `if`, `and` and `or`
/// short-circuit; everything else evaluates eagerly. evaluation is a
/// finite walk over a finite tree, so scripts cannot loop.
pub struct Script<'a> {
    code: &'a Node,
    state: &'a State<'a>,
}

impl<'a> Script<'a> {
    pub fn new(code: &'a Node, state: &'a State<'a>) -> Self {
        Self { code, state }
    }

    /// the top-level contract: a script that does not produce an action
    /// waits its turn.
    pub fn run(&self) -> Action {
        match self.eval(self.code) {
            Value::Act(action) => action,
            _ => Action::Wait,
        }
    }

    pub fn eval(&self, node: &Node) -> Value {
        match node {
            Node::Int(n) => Value::Int(*n),
            Node::Expr(children) => match children[0] {
                Node::Func(op) => self.call(op, &children[1..]),
                _ => unreachable!("parser only admits operators in head position"),
            },
            Node::Func(_) => unreachable!("bare symbols never evaluate"),
        }
    }

    fn call(&self, op: Op, args: &[Node]) -> Value {
        match op {
            Op::Add => self.arith(args, i64::wrapping_add),
            Op::Sub => self.arith(args, i64::wrapping_sub),
            Op::Mul => self.arith(args, i64::wrapping_mul),
            Op::Div => self.fraction(args, i64::wrapping_div),
            Op::Mod => self.fraction(args, i64::wrapping_rem),
            Op::Less => self.compare(args, |a, b| a < b),
            Op::Greater => self.compare(args, |a, b| a > b),
            Op::Equal => self.compare(args, |a, b| a == b),
            Op::If => self.cond(args),
            Op::And => self.all(args),
            Op::Or => self.any(args),
            Op::Not => self.negate(args),
            Op::Move => self.movement(args),
            Op::Wait => Value::Act(Action::Wait),
            Op::Shoot => self.volley(args),
            Op::ShootNearest => self.snipe(),
            Op::CanMove => self.passable(args),
            Op::EnemyVisible => Value::truth(self.state.visible_count(self.state.opposing()) > 0),
            Op::EnemyGoalVisible => Value::truth(self.state.goal_visible(self.state.opposing())),
            Op::OwnGoalVisible => Value::truth(self.state.goal_visible(self.state.team())),
            Op::VisibleEnemies => Value::Int(self.state.visible_count(self.state.opposing()) as i64),
            Op::VisibleAllies => Value::Int(self.state.visible_count(self.state.team()) as i64),
            Op::MyX => self.my_x(),
            Op::MyY => self.my_y(),
            Op::Tick => Value::Int(self.state.tick() as i64),
        }
    }

    /// evaluate a pair of integer operands, or surface whatever non-Int
    /// interrupted them
    fn pair(&self, args: &[Node]) -> Result<(i64, i64), Value> {
        let a = match self.eval(&args[0]) {
            Value::Int(n) => n,
            other => return Err(other),
        };
        let b = match self.eval(&args[1]) {
            Value::Int(n) => n,
            other => return Err(other),
        };
        Ok((a, b))
    }

    fn arith(&self, args: &[Node], f: fn(i64, i64) -> i64) -> Value {
        match self.pair(args) {
            Ok((a, b)) => Value::Int(f(a, b)),
            Err(other) => other,
        }
    }

    fn fraction(&self, args: &[Node], f: fn(i64, i64) -> i64) -> Value {
        match self.pair(args) {
            Ok((_, 0)) => Fault::DivisionByZero.into(),
            Ok((a, b)) => Value::Int(f(a, b)),
            Err(other) => other,
        }
    }

    fn compare(&self, args: &[Node], f: fn(&i64, &i64) -> bool) -> Value {
        match self.pair(args) {
            Ok((a, b)) => Value::truth(f(&a, &b)),
            Err(other) => other,
        }
    }

    /// positive is true; the untaken branch is never evaluated
    fn cond(&self, args: &[Node]) -> Value {
        match self.eval(&args[0]) {
            Value::Int(n) if n > 0 => self.eval(&args[1]),
            Value::Int(_) => self.eval(&args[2]),
            other => other,
        }
    }

    /// first falsy or non-Int stops the walk; full truth yields the last
    fn all(&self, args: &[Node]) -> Value {
        let mut last = Value::FALSE;
        for arg in args {
            match self.eval(arg) {
                Value::Int(0) => return Value::FALSE,
                Value::Int(n) => last = Value::Int(n),
                other => return other,
            }
        }
        last
    }

    /// first truthy or non-Int wins; full falsity yields zero
    fn any(&self, args: &[Node]) -> Value {
        for arg in args {
            match self.eval(arg) {
                Value::Int(n) if n > 0 => return Value::Int(n),
                Value::Int(_) => continue,
                other => return other,
            }
        }
        Value::FALSE
    }

    fn negate(&self, args: &[Node]) -> Value {
        match self.eval(&args[0]) {
            Value::Int(n) => Value::truth(n <= 0),
            other => other,
        }
    }

    /// a direction argument, remapped from the script's team-relative
    /// compass to the board's absolute one
    fn heading(&self, arg: &Node) -> Result<Direction, Value> {
        match self.eval(arg) {
            Value::Int(n) => Ok(Direction::from(n).absolute(self.state.team())),
            other => Err(other),
        }
    }

    fn movement(&self, args: &[Node]) -> Value {
        let from = self.state.actor().position;
        match self.heading(&args[0]) {
            Ok(dir) => Value::Act(Action::Move(self.state.arena().destination(from, dir))),
            Err(other) => other,
        }
    }

    fn passable(&self, args: &[Node]) -> Value {
        let from = self.state.actor().position;
        match self.heading(&args[0]) {
            Ok(dir) => Value::truth(self.state.empty(self.state.arena().destination(from, dir))),
            Err(other) => other,
        }
    }

    /// declare a shot at the map edge; the engine snaps it en route
    fn volley(&self, args: &[Node]) -> Value {
        let from = self.state.actor().position;
        match self.heading(&args[0]) {
            Ok(dir) => Value::Act(Action::Shoot(self.state.arena().edge(from, dir))),
            Err(other) => other,
        }
    }

    fn snipe(&self) -> Value {
        match self.state.nearest_target() {
            Some(target) => Value::Act(Action::Shoot(target)),
            None => Value::Act(Action::Wait),
        }
    }

    /// positions are rotated 90° so that x increasing is consistently
    /// east and y increasing consistently south from the bot's own point
    /// of view, looking toward the enemy goal, whichever team is asking
    fn my_x(&self) -> Value {
        let pos = self.state.actor().position.y as i64;
        match self.state.team() {
            Team::A => Value::Int(pos),
            Team::B => Value::Int(self.state.arena().height() as i64 - pos),
        }
    }

    fn my_y(&self) -> Value {
        let pos = self.state.actor().position.x as i64;
        match self.state.team() {
            Team::A => Value::Int(pos),
            Team::B => Value::Int(self.state.arena().width() as i64 - pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::arena::Arena;
    use crate::arena::point::Point;
    use crate::script::parse::parse;

    fn eval(source: &str, state: &State) -> Value {
        let node = parse(source).unwrap();
        Script::new(&node, state).eval(&node)
    }

    fn run(source: &str, state: &State) -> Action {
        let node = parse(source).unwrap();
        Script::new(&node, state).run()
    }

    #[test]
    fn arithmetic() {
        let arena = Arena::sample();
        let state = State::new(&arena);
        assert_eq!(eval("(+ 13 2)", &state), Value::Int(15));
        assert_eq!(eval("(- 2 13)", &state), Value::Int(-11));
        assert_eq!(eval("(* 6 7)", &state), Value::Int(42));
        assert_eq!(eval("(/ 7 2)", &state), Value::Int(3));
        assert_eq!(eval("(mod 7 2)", &state), Value::Int(1));
    }

    #[test]
    fn zero_divisors_are_soft_errors() {
        let arena = Arena::sample();
        let state = State::new(&arena);
        assert_eq!(
            eval("(/ 2 0)", &state),
            Value::Error(Fault::DivisionByZero)
        );
        assert_eq!(
            eval("(mod 2 0)", &state),
            Value::Error(Fault::DivisionByZero)
        );
        // and they coerce to a wait at the top, like any non-action
        assert_eq!(run("(/ 2 0)", &state), Action::Wait);
        assert_eq!(run("(+ 1 (/ 2 0))", &state), Action::Wait);
    }

    #[test]
    fn comparisons() {
        let arena = Arena::sample();
        let state = State::new(&arena);
        assert_eq!(eval("(< 1 2)", &state), Value::TRUE);
        assert_eq!(eval("(< 2 1)", &state), Value::FALSE);
        assert_eq!(eval("(> 2 1)", &state), Value::TRUE);
        assert_eq!(eval("(= 2 2)", &state), Value::TRUE);
        assert_eq!(eval("(= 1 2)", &state), Value::FALSE);
    }

    #[test]
    fn branches() {
        let arena = Arena::sample();
        let state = State::new(&arena);
        assert_eq!(eval("(if 4 1 2)", &state), Value::Int(1));
        assert_eq!(eval("(if 0 1 2)", &state), Value::Int(2));
        // the untaken branch never runs, so its faults never surface
        assert_eq!(eval("(if 1 7 (/ 1 0))", &state), Value::Int(7));
    }

    #[test]
    fn conjunction() {
        let arena = Arena::sample();
        let state = State::new(&arena);
        assert_eq!(eval("(and 1 2)", &state), Value::Int(2));
        assert_eq!(eval("(and 0 2)", &state), Value::FALSE);
        assert_eq!(eval("(and 2 0)", &state), Value::FALSE);
        // short-circuit: the second arm is never touched
        assert_eq!(eval("(and 0 (/ 1 0))", &state), Value::FALSE);
    }

    #[test]
    fn disjunction() {
        let arena = Arena::sample();
        let state = State::new(&arena);
        assert_eq!(eval("(or 0 0)", &state), Value::FALSE);
        assert_eq!(eval("(or 0 2)", &state), Value::Int(2));
        assert_eq!(eval("(or 2 0)", &state), Value::Int(2));
        assert_eq!(eval("(or 3 (/ 1 0))", &state), Value::Int(3));
    }

    #[test]
    fn negation() {
        let arena = Arena::sample();
        let state = State::new(&arena);
        assert_eq!(eval("(not 0)", &state), Value::TRUE);
        assert_eq!(eval("(not 33)", &state), Value::FALSE);
    }

    #[test]
    fn actions_propagate_through_integer_operators() {
        let arena = Arena::sample();
        let state = State::new(&arena);
        let value = eval("(+ (wait) 1)", &state);
        assert_eq!(value, Value::Act(Action::Wait));
        // which makes any script an action producer at the top level
        assert_eq!(run("(+ (wait) 1)", &state), Action::Wait);
    }

    #[test]
    fn relative_moves_rotate_per_team() {
        let arena = Arena::sample();
        let mut state = State::new(&arena);
        // slot 0 (team A) at its (0, 1) spawn: relative north is east
        state.focus(0);
        assert_eq!(
            run("(move 0)", &state),
            Action::Move(Point { x: 1, y: 1 })
        );
        // slot 6 (team B) at its (8, 1) spawn: relative north is west
        state.focus(6);
        assert_eq!(
            run("(move 0)", &state),
            Action::Move(Point { x: 7, y: 1 })
        );
        // direction indexes wrap modulo the compass
        state.focus(0);
        assert_eq!(run("(move 4)", &state), run("(move 0)", &state));
    }

    #[test]
    fn blocked_moves_stay_put() {
        let arena = Arena::sample();
        let mut state = State::new(&arena);
        // slot 0 at (0, 1): relative east is absolute south, toward (0, 2),
        // which holds a teammate; the arena allows it, the engine won't,
        // but can-move? already reports the square as taken
        state.focus(0);
        assert_eq!(eval("(can-move? 2)", &state), Value::FALSE);
        // relative west is absolute north, toward open (0, 0)
        assert_eq!(eval("(can-move? 3)", &state), Value::TRUE);
    }

    #[test]
    fn shots_declare_the_map_edge() {
        let arena = Arena::sample();
        let mut state = State::new(&arena);
        // slot 0 (team A) at (0, 1): relative north is the east edge
        state.focus(0);
        assert_eq!(
            run("(shoot 0)", &state),
            Action::Shoot(Point { x: 8, y: 1 })
        );
        // slot 6 (team B) at (8, 1): relative north is the west edge
        state.focus(6);
        assert_eq!(
            run("(shoot 0)", &state),
            Action::Shoot(Point { x: 0, y: 1 })
        );
    }

    #[test]
    fn snipers_pick_the_nearest_or_wait() {
        let arena = Arena::sample();
        let mut state = State::new(&arena);
        // the gap lets slot 0 glimpse the far spawns diagonally; with
        // those two dead, nothing across the wall is left to see
        state.kill_bot(8);
        state.kill_bot(9);
        state.focus(0);
        assert_eq!(run("(shoot-nearest)", &state), Action::Wait);
        // from the gap the whole equator lane is in view
        state.relocate(0, Point { x: 3, y: 3 });
        assert_eq!(
            run("(shoot-nearest)", &state),
            Action::Shoot(Point { x: 7, y: 3 })
        );
    }

    #[test]
    fn visibility_predicates() {
        let arena = Arena::sample();
        let mut state = State::new(&arena);
        state.focus(0);
        // the diagonal through the gap shows slot 0 the far spawns
        assert_eq!(eval("(enemy-visible?)", &state), Value::TRUE);
        assert_eq!(eval("(own-goal-visible?)", &state), Value::TRUE);
        // but the enemy goal hides behind the wall
        assert_eq!(eval("(enemy-goal-visible?)", &state), Value::FALSE);
        assert!(matches!(
            eval("(visible-allies-count)", &state),
            Value::Int(n) if n >= 2
        ));
        // dead enemies stop counting
        for slot in crate::BOTS_PER_TEAM..crate::BOTS_PER_TEAM * 2 {
            state.kill_bot(slot);
        }
        state.focus(0);
        assert_eq!(eval("(enemy-visible?)", &state), Value::FALSE);
        // walk to the gap and the enemy goal appears
        state.relocate(0, Point { x: 3, y: 3 });
        assert_eq!(eval("(enemy-goal-visible?)", &state), Value::TRUE);
        assert_eq!(eval("(enemy-visible?)", &state), Value::TRUE);
        assert_eq!(eval("(visible-enemies-count)", &state), Value::Int(1));
    }

    #[test]
    fn oriented_positions() {
        let arena = Arena::sample();
        let mut state = State::new(&arena);
        // team A reports (y, x) straight
        state.focus(0);
        assert_eq!(eval("(my-x-pos)", &state), Value::Int(1));
        assert_eq!(eval("(my-y-pos)", &state), Value::Int(0));
        // team B reports them flipped across the map
        state.focus(6);
        assert_eq!(eval("(my-x-pos)", &state), Value::Int(6));
        assert_eq!(eval("(my-y-pos)", &state), Value::Int(1));
    }

    #[test]
    fn clock() {
        let arena = Arena::sample();
        let mut state = State::new(&arena);
        assert_eq!(eval("(tick)", &state), Value::Int(0));
        state.advance();
        state.advance();
        assert_eq!(eval("(tick)", &state), Value::Int(2));
    }
}
