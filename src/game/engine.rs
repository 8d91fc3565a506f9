use super::action::Action;
use super::outcome::Outcome;
use super::state::State;
use crate::FRIENDLY_FIRE_PENALTY;
use crate::GOAL_REWARD;
use crate::KILL_REWARD;
use crate::MAX_TICKS_PER_GAME;
use crate::MatchId;
use crate::OWN_GOAL_PENALTY;
use crate::SHOT_DECAY;
use crate::SLOW_GAME_PENALTY;
use crate::Score;
use crate::ScriptId;
use crate::arena::activity::Activity;
use crate::arena::arena::Arena;
use crate::arena::point::Point;
use crate::arena::team::Team;
use crate::script::eval::Script;
use crate::script::node::Node;
use crate::viz::visualizer::Visualizer;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// slots act in this fixed interleave so neither team moves its whole
/// squad before the other gets a turn.
const TURN_ORDER: [usize; 10] = [0, 5, 1, 6, 2, 7, 3, 8, 4, 9];

/// one deterministic game between two scripts. the arena is borrowed and
/// left untouched; the match owns its own state, its own cell counters,
/// and a PRNG seeded from the match id, so replaying the same id over the
/// same scripts reproduces every action and every counter.
pub struct Match<'a> {
    id: MatchId,
    state: State<'a>,
    scripts: [Node; 2],
    pair: (ScriptId, ScriptId),
    activity: Activity,
    score: [Score; 2],
    rng: SmallRng,
    cap: usize,
}

impl<'a> Match<'a> {
    pub fn new(
        arena: &'a Arena,
        id: MatchId,
        a: (ScriptId, Node),
        b: (ScriptId, Node),
    ) -> Self {
        Self {
            id,
            state: State::new(arena),
            scripts: [a.1, b.1],
            pair: (a.0, b.0),
            activity: Activity::new(arena.width(), arena.height()),
            score: [0, 0],
            rng: SmallRng::seed_from_u64(id as u64),
            cap: MAX_TICKS_PER_GAME,
        }
    }

    /// override the tick budget, mostly for tests and calibration
    pub fn ticks(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    pub fn state(&self) -> &State<'a> {
        &self.state
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn outcome(&self) -> Outcome {
        Outcome {
            id: self.id,
            script_a: self.pair.0,
            script_b: self.pair.1,
            score_a: self.score[0],
            score_b: self.score[1],
            ticks: self.state.tick(),
        }
    }

    /// play to the end and report how it went
    pub fn run(&mut self, vis: &mut impl Visualizer) -> Outcome {
        vis.init(&self.state);
        loop {
            self.tick(vis);
            if self.state.finished(self.cap) {
                break;
            }
        }
        vis.finish();
        log::debug!(
            "match {}: {} vs {} scored {} - {} over {} ticks",
            self.id,
            self.pair.0,
            self.pair.1,
            self.score[0],
            self.score[1],
            self.state.tick()
        );
        self.outcome()
    }

    fn tick(&mut self, vis: &mut impl Visualizer) {
        for slot in TURN_ORDER {
            if !self.state.bots()[slot].alive {
                vis.idle();
                continue;
            }
            self.state.focus(slot);
            let team = self.state.team();
            let action = Script::new(&self.scripts[usize::from(team)], &self.state).run();
            self.resolve(slot, action);
            vis.update(&self.state, &action);
        }
        vis.tick_complete(&self.state);
        self.state.advance();
        if self.state.tick() >= self.cap {
            // nobody gets to dawdle their way to a draw
            self.score[0] -= SLOW_GAME_PENALTY;
            self.score[1] -= SLOW_GAME_PENALTY;
        }
    }

    fn resolve(&mut self, slot: usize, action: Action) {
        match action {
            Action::Wait => self.activity.waited(self.state.bots()[slot].position),
            Action::Move(to) => self.moved(slot, to),
            Action::Shoot(at) => self.fired(slot, at),
        }
    }

    /// walls and occupied squares swallow the move silently
    fn moved(&mut self, slot: usize, to: Point) {
        if self.state.empty(to) {
            self.state.relocate(slot, to);
            self.activity.moved(to);
        }
    }

    /// snap the declared target to the first occupant along the ray, then
    /// roll to hit: the chance decays linearly with Manhattan distance.
    fn fired(&mut self, slot: usize, declared: Point) {
        let from = self.state.bots()[slot].position;
        let shooter = self.state.bots()[slot].team;
        if let Some(target) = self.state.first_hit(from, declared) {
            let chance = 1.0 - SHOT_DECAY * from.distance(&target) as f64;
            if self.rng.random::<f64>() < chance {
                self.strike(shooter, target);
            }
        }
        self.activity.shot(from);
    }

    fn strike(&mut self, shooter: Team, target: Point) {
        if let Some(bot) = self.state.bot_at(target) {
            let (victim, side) = (bot.id, bot.team);
            self.state.kill_bot(victim);
            self.activity.killed(target);
            if side == shooter {
                self.score[usize::from(shooter)] -= FRIENDLY_FIRE_PENALTY;
            } else {
                self.score[usize::from(shooter)] += KILL_REWARD;
            }
        } else if let Some(goal) = self.state.goal_at(target) {
            let side = goal.team;
            self.state.kill_goal(side);
            self.activity.killed(target);
            if side == shooter {
                self.score[usize::from(shooter)] -= OWN_GOAL_PENALTY;
            } else {
                self.score[usize::from(shooter)] += GOAL_REWARD;
            }
        }
        // walls soak the rest
    }
}
