use crate::game::action::Action;
use crate::game::state::State;

/// tick hooks for anything that wants to watch a match play out. the
/// engine fires these uniformly: dead bots still produce an idle beat so
/// downstream animations run at a constant speed instead of accelerating
/// as the field thins out.
pub trait Visualizer {
    /// the initial state, before any bot has acted
    fn init(&mut self, _state: &State) {}
    /// one bot took its turn
    fn update(&mut self, _state: &State, _action: &Action) {}
    /// a dead bot's slot came and went
    fn idle(&mut self) {}
    /// every slot has acted; the tick counter is about to advance
    fn tick_complete(&mut self, _state: &State) {}
    /// the match is over; flush whatever output is owed
    fn finish(&mut self) {}
}

/// watches nothing. the training loop runs thousands of matches with this.
pub struct Null;

impl Visualizer for Null {}
