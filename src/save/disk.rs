use super::layout::Layout;
use crate::ScriptId;
use crate::arena::activity::Activity;
use crate::game::outcome::Outcome;
use crate::script::node::Node;
use crate::script::parse::parse;
use anyhow::Context;
use anyhow::Result;
use std::io::Write;

/// every read and write the system performs, behind one façade. script
/// files are created exclusively so an id can never be silently reused;
/// results append; cell statistics truncate. any failure here is an
/// operator problem and aborts the run.
pub struct Disk {
    layout: Layout,
    next: ScriptId,
}

impl Disk {
    /// open a scenario, discovering where the id counter left off so new
    /// scripts keep ascending across restarts.
    pub fn new(scenario: &str) -> Result<Self> {
        let layout = Layout::new(scenario);
        let mut disk = Self { layout, next: 0 };
        if let Some(latest) = disk.latest()? {
            for era in 0..=latest {
                for id in disk.ids(era)? {
                    disk.next = disk.next.max(id + 1);
                }
            }
        }
        Ok(disk)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// make room for a generation's scripts
    pub fn prepare(&self, era: usize) -> Result<()> {
        let path = self.layout.scripts(era);
        std::fs::create_dir_all(&path)
            .with_context(|| format!("failed to create directory {}", path.display()))
    }

    /// write a brand-new script under the next ascending id
    pub fn create(&mut self, era: usize, code: &str) -> Result<ScriptId> {
        let id = self.next;
        self.next += 1;
        let path = self.layout.script(era, id);
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("couldn't create script {}", path.display()))?;
        file.write_all(code.as_bytes())
            .with_context(|| format!("couldn't write script {}", path.display()))?;
        Ok(id)
    }

    /// carry a surviving script into the next generation, verbatim and
    /// under the same id
    pub fn adopt(&self, from: usize, into: usize, id: ScriptId) -> Result<()> {
        let code = self.source(from, id)?;
        let path = self.layout.script(into, id);
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("couldn't create script {}", path.display()))?;
        file.write_all(code.as_bytes())
            .with_context(|| format!("couldn't write script {}", path.display()))?;
        Ok(())
    }

    /// a stored script's raw text
    pub fn source(&self, era: usize, id: ScriptId) -> Result<String> {
        let path = self.layout.script(era, id);
        std::fs::read_to_string(&path)
            .with_context(|| format!("couldn't read script {}", path.display()))
    }

    /// a stored script, parsed eagerly. the breeding loop must never
    /// write a malformed script, so failure here is a fatal integrity
    /// problem rather than something to shrug off.
    pub fn script(&self, era: usize, id: ScriptId) -> Result<Node> {
        let path = self.layout.script(era, id);
        parse(&self.source(era, id)?)
            .map_err(anyhow::Error::new)
            .with_context(|| format!("stored script {} is corrupt", path.display()))
    }

    /// all script ids present in a generation, ascending; a generation
    /// that never got scripts is just empty
    pub fn ids(&self, era: usize) -> Result<Vec<ScriptId>> {
        let path = self.layout.scripts(era);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        let entries = std::fs::read_dir(&path)
            .with_context(|| format!("couldn't list scripts in {}", path.display()))?;
        for entry in entries {
            let name = entry?.file_name();
            let name = name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".l") {
                let id = stem
                    .parse::<ScriptId>()
                    .with_context(|| format!("unparseable script name '{}'", name))?;
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// append one finished match, writing the header first if the file is
    /// fresh
    pub fn append(&self, era: usize, outcome: &Outcome) -> Result<()> {
        let path = self.layout.results(era);
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .with_context(|| format!("couldn't open {} for appending", path.display()))?;
        if file.metadata()?.len() == 0 {
            writeln!(file, "{}", Outcome::HEADER)?;
        }
        writeln!(file, "{}", outcome.row())
            .with_context(|| format!("couldn't write to {}", path.display()))
    }

    /// every recorded match of a generation
    pub fn outcomes(&self, era: usize) -> Result<Vec<Outcome>> {
        let path = self.layout.results(era);
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("couldn't read {}", path.display()))?;
        text.lines()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.parse())
            .collect()
    }

    /// the generation's aggregate cell statistics, truncating whatever a
    /// previous pass left behind. only cells with something to say get a
    /// row.
    pub fn write_cells(&self, era: usize, heat: &Activity) -> Result<()> {
        let path = self.layout.cells(era);
        let mut file = std::fs::File::create(&path)
            .with_context(|| format!("couldn't create {}", path.display()))?;
        writeln!(file, "x,y,moves,shots,kills,waits")?;
        for (point, count) in heat.rows() {
            writeln!(
                file,
                "{},{},{},{},{},{}",
                point.x, point.y, count.moves, count.shots, count.kills, count.waits
            )?;
        }
        Ok(())
    }

    /// the highest generation this scenario has bred so far
    pub fn latest(&self) -> Result<Option<usize>> {
        let dir = self.layout.scenario();
        if !dir.exists() {
            return Ok(None);
        }
        let mut latest = None;
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("couldn't list scenario {}", dir.display()))?
        {
            let name = entry?.file_name();
            let name = name.to_string_lossy();
            if let Some(n) = name.strip_prefix("gen_") {
                let n = n
                    .parse::<usize>()
                    .with_context(|| format!("unparseable name in scenario directory: {}", name))?;
                latest = latest.max(Some(n));
            }
        }
        Ok(latest)
    }
}

/// run a test body inside a throwaway working directory. disk paths are
/// all relative to the process cwd, so every test that touches the
/// filesystem serializes on one lock, wherever in the crate it lives.
#[cfg(test)]
pub fn sandbox<T>(test: impl FnOnce() -> T) -> T {
    use std::sync::Mutex;
    use std::sync::OnceLock;
    static CWD: OnceLock<Mutex<()>> = OnceLock::new();
    let guard = CWD.get_or_init(|| Mutex::new(())).lock().unwrap();
    let home = std::env::current_dir().unwrap();
    let scratch = std::env::temp_dir().join(format!(
        "roboarena-test-{}-{:?}",
        std::process::id(),
        std::thread::current().id()
    ));
    std::fs::create_dir_all(&scratch).unwrap();
    std::env::set_current_dir(&scratch).unwrap();
    let result = test();
    std::env::set_current_dir(&home).unwrap();
    std::fs::remove_dir_all(&scratch).ok();
    drop(guard);
    result
}
