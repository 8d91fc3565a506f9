use super::generation::Generation;
use crate::MatchId;
use crate::arena::activity::Activity;
use crate::arena::arena::Arena;
use crate::editor::editor::Editor;
use crate::editor::simplify::simplify;
use crate::game::engine::Match;
use crate::save::disk::Disk;
use crate::script::parse::parse;
use crate::viz::heatmap;
use crate::viz::render::Frames;
use crate::viz::visualizer::Null;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use colored::Colorize;

/// drives the whole evolutionary loop for one scenario: breed a cohort,
/// play every scheduled match, persist results and cell statistics,
/// render the heat-map, repeat. here's where everything meets.
pub struct Trainer {
    arena: Arena,
    disk: Disk,
    editor: Editor,
    prior: Option<Generation>,
}

impl Trainer {
    /// open a scenario: load its arena and, if it has history, the most
    /// recent generation so breeding can continue from it.
    pub fn new(scenario: &str) -> Result<Self> {
        let disk = Disk::new(scenario)?;
        let arena = Arena::load(&disk.layout().arena())?;
        log::info!("loaded {}x{} arena", arena.width(), arena.height());
        let prior = match disk.latest()? {
            Some(latest) => Some(Generation::resume(latest, &disk)?),
            None => None,
        };
        Ok(Self {
            arena,
            disk,
            editor: Editor::new(),
            prior,
        })
    }

    /// add this many generations to the scenario
    pub fn train(&mut self, generations: usize) -> Result<()> {
        for _ in 0..generations {
            self.advance()?;
        }
        Ok(())
    }

    /// one full generation: seed, schedule, play, persist, render.
    fn advance(&mut self) -> Result<()> {
        let id = self.prior.as_ref().map(|g| g.id() + 1).unwrap_or(0);
        let mut generation = Generation::seed(id, self.prior.as_ref(), &mut self.editor, &mut self.disk)?;
        let matchups = generation.matchups().to_vec();
        let mut heat = Activity::new(self.arena.width(), self.arena.height());
        let progress = crate::progress(matchups.len());
        for (i, &(a, b)) in matchups.iter().enumerate() {
            let script_a = self.disk.script(id, a)?;
            let script_b = self.disk.script(id, b)?;
            let mut game = Match::new(&self.arena, i, (a, script_a), (b, script_b));
            let outcome = game.run(&mut Null);
            self.disk.append(id, &outcome)?;
            heat.merge(game.activity());
            generation.record(outcome);
            progress.inc(1);
        }
        progress.finish_and_clear();
        self.disk.write_cells(id, &heat)?;
        heatmap::render(&self.arena, &heat, &self.disk.layout().heatmap(id))?;
        self.crown(&generation)?;
        self.prior = Some(generation);
        Ok(())
    }

    /// log the podium and show off the champion in simplified form
    fn crown(&self, generation: &Generation) -> Result<()> {
        let rankings = generation.rankings();
        for (place, (id, score)) in rankings.iter().take(3).enumerate() {
            log::info!(
                "generation {} place {}: script {} averaging {:+.2}",
                generation.id(),
                place + 1,
                id,
                score
            );
        }
        if let Some(&(champion, score)) = rankings.first() {
            let code = self.disk.source(generation.id(), champion)?;
            let tree = parse(&code)
                .map_err(anyhow::Error::new)
                .with_context(|| format!("stored script {} is corrupt", champion))?;
            println!(
                "{} {} {} {:+.2}",
                "champion of generation".bold(),
                generation.id().to_string().bold(),
                format!("is script {} at", champion).bold(),
                score
            );
            println!("{}", simplify(&tree).pretty().cyan());
        }
        Ok(())
    }

    /// replay one recorded match, frame by frame, into its own directory.
    /// the engine is deterministic, so the replay is the match.
    pub fn replay(scenario: &str, era: usize, id: MatchId) -> Result<()> {
        let disk = Disk::new(scenario)?;
        let arena = Arena::load(&disk.layout().arena())?;
        let recorded = disk
            .outcomes(era)?
            .into_iter()
            .find(|outcome| outcome.id == id);
        let Some(recorded) = recorded else {
            bail!("no match {} recorded in generation {}", id, era);
        };
        let script_a = disk.script(era, recorded.script_a)?;
        let script_b = disk.script(era, recorded.script_b)?;
        let dir = disk.layout().frames(era, id);
        let mut frames = Frames::new(&dir)?;
        let mut game = Match::new(
            &arena,
            id,
            (recorded.script_a, script_a),
            (recorded.script_b, script_b),
        );
        let replayed = game.run(&mut frames);
        if replayed != recorded {
            log::warn!(
                "replay of match {} diverged from the record: {} vs {}",
                id,
                replayed.row(),
                recorded.row()
            );
        }
        println!("frames written to {}", dir.display());
        Ok(())
    }
}
