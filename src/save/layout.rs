use std::path::PathBuf;

/// the on-disk contract for one scenario. downstream tooling reads these
/// exact paths, so they are built in one place and nowhere else:
///
/// ```text
/// scenario/<scenario>/arena.png
/// scenario/<scenario>/gen_<N>/scripts/<id>.l
/// scenario/<scenario>/gen_<N>/results.csv
/// scenario/<scenario>/gen_<N>/cells.csv
/// ```
#[derive(Debug, Clone)]
pub struct Layout {
    scenario: String,
}

impl Layout {
    pub fn new(scenario: &str) -> Self {
        Self {
            scenario: scenario.to_string(),
        }
    }

    pub fn scenario(&self) -> PathBuf {
        PathBuf::from("scenario").join(&self.scenario)
    }

    pub fn arena(&self) -> PathBuf {
        self.scenario().join("arena.png")
    }

    pub fn generation(&self, era: usize) -> PathBuf {
        self.scenario().join(format!("gen_{}", era))
    }

    pub fn scripts(&self, era: usize) -> PathBuf {
        self.generation(era).join("scripts")
    }

    pub fn script(&self, era: usize, id: crate::ScriptId) -> PathBuf {
        self.scripts(era).join(format!("{}.l", id))
    }

    pub fn results(&self, era: usize) -> PathBuf {
        self.generation(era).join("results.csv")
    }

    pub fn cells(&self, era: usize) -> PathBuf {
        self.generation(era).join("cells.csv")
    }

    pub fn heatmap(&self, era: usize) -> PathBuf {
        self.generation(era).join("heatmap.png")
    }

    pub fn frames(&self, era: usize, id: crate::MatchId) -> PathBuf {
        self.generation(era).join(format!("match_{}", id))
    }

    pub fn report(&self) -> PathBuf {
        self.scenario().join("results.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_the_published_contract() {
        let layout = Layout::new("monkey");
        assert_eq!(
            layout.script(3, 1204).to_string_lossy(),
            "scenario/monkey/gen_3/scripts/1204.l"
        );
        assert_eq!(
            layout.results(0).to_string_lossy(),
            "scenario/monkey/gen_0/results.csv"
        );
        assert_eq!(
            layout.cells(12).to_string_lossy(),
            "scenario/monkey/gen_12/cells.csv"
        );
        assert_eq!(
            layout.arena().to_string_lossy(),
            "scenario/monkey/arena.png"
        );
    }
}
