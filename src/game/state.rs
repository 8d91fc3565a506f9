use super::bot::Bot;
use super::goal::Goal;
use crate::BOTS_PER_TEAM;
use crate::arena::arena::Arena;
use crate::arena::line::Line;
use crate::arena::point::Point;
use crate::arena::team::Team;

/// the live state of one match: ten bots on their spawns, two goals, the
/// tick counter, and whose turn it currently is. everything scripts can
/// observe goes through the pure queries here.
pub struct State<'a> {
    arena: &'a Arena,
    bots: Vec<Bot>,
    goals: [Goal; 2],
    actor: usize,
    tick: usize,
}

impl<'a> State<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        let mut bots = Vec::with_capacity(BOTS_PER_TEAM * 2);
        for team in Team::BOTH {
            for (i, &spawn) in arena.spawns(team).iter().enumerate() {
                let id = i + usize::from(team) * BOTS_PER_TEAM;
                bots.push(Bot::new(id, team, spawn));
            }
        }
        bots.sort_by_key(|bot| bot.id);
        Self {
            arena,
            bots,
            goals: Team::BOTH.map(|team| Goal::new(team, arena.goal(team))),
            actor: 0,
            tick: 0,
        }
    }

    pub fn arena(&self) -> &Arena {
        self.arena
    }

    pub fn bots(&self) -> &[Bot] {
        &self.bots
    }

    pub fn goals(&self) -> &[Goal; 2] {
        &self.goals
    }

    pub fn tick(&self) -> usize {
        self.tick
    }

    /// whose turn it is. scripts evaluate relative to this bot.
    pub fn actor(&self) -> &Bot {
        &self.bots[self.actor]
    }

    pub fn team(&self) -> Team {
        self.actor().team
    }

    pub fn opposing(&self) -> Team {
        self.team().opponent()
    }

    /// the living bot on a cell, if any
    pub fn bot_at(&self, p: Point) -> Option<&Bot> {
        self.bots.iter().find(|bot| bot.alive && bot.position == p)
    }

    /// the goal on a cell, if any
    pub fn goal_at(&self, p: Point) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.position == p)
    }

    /// walkable and nobody living standing on it
    pub fn empty(&self, p: Point) -> bool {
        self.arena.walkable(p) && self.bot_at(p).is_none()
    }

    /// the first cell along the ray that could stop a shot: a wall, a
    /// goal, or a living bot. the shooter's own cell never counts.
    pub fn first_hit(&self, from: Point, toward: Point) -> Option<Point> {
        Line::new(from, toward).find(|&p| p != from && !self.empty(p))
    }

    /// of all living enemy bots and enemy goals the actor can see, the
    /// closest by Manhattan distance; bots win ties by turn order.
    pub fn nearest_target(&self) -> Option<Point> {
        let from = self.actor().position;
        let enemy = self.opposing();
        self.bots
            .iter()
            .filter(|bot| bot.team == enemy && bot.alive)
            .map(|bot| bot.position)
            .chain(
                self.goals
                    .iter()
                    .filter(|goal| goal.team == enemy && goal.alive)
                    .map(|goal| goal.position),
            )
            .filter(|&p| self.arena.visible(from, p))
            .min_by_key(|&p| from.distance(&p))
    }

    /// living bots and goals of a team the actor can see. the actor is on
    /// its own cell and counts itself among its allies.
    pub fn visible_count(&self, team: Team) -> usize {
        let from = self.actor().position;
        let bots = self
            .bots
            .iter()
            .filter(|bot| bot.team == team && bot.alive && self.arena.visible(from, bot.position))
            .count();
        let goals = self
            .goals
            .iter()
            .filter(|goal| {
                goal.team == team && goal.alive && self.arena.visible(from, goal.position)
            })
            .count();
        bots + goals
    }

    pub fn goal_visible(&self, team: Team) -> bool {
        let from = self.actor().position;
        self.goals
            .iter()
            .any(|goal| goal.team == team && self.arena.visible(from, goal.position))
    }

    pub fn alive(&self, team: Team) -> usize {
        self.bots
            .iter()
            .filter(|bot| bot.team == team && bot.alive)
            .count()
    }

    /// a match ends when a team is wiped out, a goal falls, or the clock
    /// runs out.
    pub fn finished(&self, cap: usize) -> bool {
        if Team::BOTH.iter().any(|&team| self.alive(team) == 0) {
            log::debug!(
                "a team died: A {}, B {}",
                self.alive(Team::A),
                self.alive(Team::B)
            );
            return true;
        }
        if self.goals.iter().any(|goal| !goal.alive) {
            log::debug!(
                "a goal died: A {}, B {}",
                self.goals[0].alive,
                self.goals[1].alive
            );
            return true;
        }
        if self.tick >= cap {
            log::debug!("game ran out of time");
            return true;
        }
        false
    }

    // engine-side mutations

    pub fn focus(&mut self, slot: usize) {
        self.actor = slot;
    }

    pub fn relocate(&mut self, slot: usize, to: Point) {
        self.bots[slot].position = to;
    }

    pub fn kill_bot(&mut self, slot: usize) {
        self.bots[slot].alive = false;
    }

    pub fn kill_goal(&mut self, team: Team) {
        self.goals[usize::from(team)].alive = false;
    }

    pub fn advance(&mut self) {
        self.tick += 1;
    }
}
