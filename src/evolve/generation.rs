use super::schedule;
use crate::KEEP_PERCENT;
use crate::MATCHES_PER_SCRIPT;
use crate::MUTATE_PERCENT;
use crate::RANDOM_PERCENT;
use crate::SCRIPTS_PER_GENERATION;
use crate::ScriptId;
use crate::editor::editor::Editor;
use crate::game::outcome::Outcome;
use crate::save::disk::Disk;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use rand::Rng;
use rand::seq::IndexedRandom;

/// a cohort of scripts bred and played together: its id, the scripts on
/// disk, the match-ups scheduled for them, and the results as they come
/// in. ranking and breeding for the next cohort both read from here.
pub struct Generation {
    id: usize,
    scripts: Vec<ScriptId>,
    matchups: Vec<(ScriptId, ScriptId)>,
    outcomes: Vec<Outcome>,
}

impl Generation {
    /// breed a new cohort. with no ancestor, the whole cohort is fresh
    /// random synthesis; otherwise the previous generation's best carry
    /// over verbatim and the rest are random, mutated, or spliced in
    /// roughly the configured proportions.
    pub fn seed(
        id: usize,
        prior: Option<&Generation>,
        editor: &mut Editor,
        disk: &mut Disk,
    ) -> Result<Self> {
        disk.prepare(id)?;
        let scripts = match prior {
            None => Self::populate(id, editor, disk)?,
            Some(prior) => Self::breed(id, prior, editor, disk)?,
        };
        let matchups = schedule::matchups(&scripts, MATCHES_PER_SCRIPT, editor.rng());
        log::info!(
            "generation {}: {} scripts, {} matches scheduled",
            id,
            scripts.len(),
            matchups.len()
        );
        Ok(Self {
            id,
            scripts,
            matchups,
            outcomes: Vec::new(),
        })
    }

    fn populate(id: usize, editor: &mut Editor, disk: &mut Disk) -> Result<Vec<ScriptId>> {
        log::info!(
            "generating {} new scripts for generation {}",
            SCRIPTS_PER_GENERATION,
            id
        );
        (0..SCRIPTS_PER_GENERATION)
            .map(|_| disk.create(id, &editor.random_script().pretty()))
            .collect()
    }

    fn breed(
        id: usize,
        prior: &Generation,
        editor: &mut Editor,
        disk: &mut Disk,
    ) -> Result<Vec<ScriptId>> {
        let best = prior.best();
        if best.is_empty() {
            bail!(
                "generation {} has no rankable scripts to breed from",
                prior.id
            );
        }
        let mut scripts = Vec::with_capacity(SCRIPTS_PER_GENERATION);
        for &keeper in &best {
            disk.adopt(prior.id, id, keeper)
                .with_context(|| format!("couldn't carry script {} forward", keeper))?;
            scripts.push(keeper);
        }
        while scripts.len() < SCRIPTS_PER_GENERATION {
            let roll = editor.rng().random::<f64>();
            let tree = if roll < RANDOM_PERCENT {
                editor.random_script()
            } else if roll < RANDOM_PERCENT + MUTATE_PERCENT {
                let donor = *best.choose(editor.rng()).expect("best set is not empty");
                let source = disk.source(prior.id, donor)?;
                editor
                    .mutate(&source)
                    .with_context(|| format!("stored script {} is corrupt", donor))?
            } else {
                let mother = *best.choose(editor.rng()).expect("best set is not empty");
                let father = *best.choose(editor.rng()).expect("best set is not empty");
                editor
                    .splice(&disk.source(prior.id, mother)?, &disk.source(prior.id, father)?)
                    .with_context(|| format!("stored scripts {}/{} corrupt", mother, father))?
            };
            scripts.push(disk.create(id, &tree.pretty())?);
        }
        log::info!(
            "generation {}: kept {} of generation {}, bred {} more",
            id,
            best.len(),
            prior.id,
            scripts.len() - best.len()
        );
        Ok(scripts)
    }

    /// rebuild a generation from what survives on disk, for resuming a
    /// scenario or ranking an old cohort.
    pub fn resume(id: usize, disk: &Disk) -> Result<Self> {
        Ok(Self {
            id,
            scripts: disk.ids(id)?,
            matchups: Vec::new(),
            outcomes: disk.outcomes(id)?,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn scripts(&self) -> &[ScriptId] {
        &self.scripts
    }

    pub fn matchups(&self) -> &[(ScriptId, ScriptId)] {
        &self.matchups
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    /// every script's average score over all its recorded matches, best
    /// first. a script scores as team A in some rows and team B in
    /// others; both count the same.
    pub fn rankings(&self) -> Vec<(ScriptId, f64)> {
        rank(&self.outcomes)
    }

    /// the top slice worth keeping, by average score
    pub fn best(&self) -> Vec<ScriptId> {
        let keep = (KEEP_PERCENT * self.scripts.len() as f64).floor() as usize;
        self.rankings()
            .into_iter()
            .take(keep)
            .map(|(id, _)| id)
            .collect()
    }
}

/// average per-match score per script, sorted best first; ties break
/// toward the older (smaller) id so rankings are reproducible.
pub fn rank(outcomes: &[Outcome]) -> Vec<(ScriptId, f64)> {
    use std::collections::HashMap;
    let mut totals: HashMap<ScriptId, (i64, usize)> = HashMap::new();
    for outcome in outcomes {
        let a = totals.entry(outcome.script_a).or_insert((0, 0));
        a.0 += outcome.score_a as i64;
        a.1 += 1;
        let b = totals.entry(outcome.script_b).or_insert((0, 0));
        b.0 += outcome.score_b as i64;
        b.1 += 1;
    }
    let mut rankings: Vec<(ScriptId, f64)> = totals
        .into_iter()
        .map(|(id, (total, games))| (id, total as f64 / games as f64))
        .collect();
    rankings.sort_by(|(a_id, a), (b_id, b)| {
        b.partial_cmp(a).expect("scores are finite").then(a_id.cmp(b_id))
    });
    rankings
}
