use crate::editor::simplify::simplify;
use crate::evolve::generation::rank;
use crate::save::disk::Disk;
use crate::script::parse::parse;
use anyhow::Result;
use std::fmt::Write;

/// write the scenario's results.html: one row per generation with match
/// counts and the podium, plus the latest champion's script in simplified
/// form. plain static markup; a browser is the only dependency.
pub fn write(disk: &Disk) -> Result<()> {
    let Some(latest) = disk.latest()? else {
        anyhow::bail!("scenario has no generations to report on");
    };
    let mut body = String::new();
    let mut champion = None;
    for era in 0..=latest {
        let outcomes = disk.outcomes(era).unwrap_or_default();
        let rankings = rank(&outcomes);
        let podium = rankings
            .iter()
            .take(3)
            .map(|(id, score)| format!("{} ({:+.2})", id, score))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            era,
            disk.ids(era)?.len(),
            outcomes.len(),
            podium
        )?;
        if era == latest {
            champion = rankings.first().copied();
        }
    }
    let showcase = match champion {
        Some((id, score)) => {
            let tree = parse(&disk.source(latest, id)?).map_err(anyhow::Error::new)?;
            format!(
                "<h2>Reigning champion: script {} at {:+.2}</h2>\n<pre>{}</pre>",
                id,
                score,
                escape(&simplify(&tree).pretty())
            )
        }
        None => String::new(),
    };
    let html = format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">\
         <title>roboarena results</title>\
         <style>body{{font-family:monospace;margin:2em}}\
         table{{border-collapse:collapse}}\
         td,th{{border:1px solid #999;padding:0.3em 0.8em}}</style>\
         </head><body>\n<h1>Results</h1>\n\
         <table><tr><th>generation</th><th>scripts</th><th>matches</th>\
         <th>top scripts (avg score)</th></tr>\n{}</table>\n{}\n</body></html>\n",
        body, showcase
    );
    let path = disk.layout().report();
    std::fs::write(&path, html)?;
    log::info!("report written to {}", path.display());
    Ok(())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
