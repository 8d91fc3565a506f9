use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use roboarena::evolve::trainer::Trainer;
use roboarena::save::disk::Disk;
use roboarena::viz::report;

#[derive(Parser)]
#[command(about = "evolutionary tournaments for Lisp-driven grid robots")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// breed and play some more generations of a scenario
    Run {
        scenario: String,
        generations: usize,
    },
    /// replay one recorded match and dump its frames
    View {
        scenario: String,
        generation: usize,
        #[arg(value_name = "MATCH")]
        match_id: usize,
    },
    /// write the scenario's html results summary
    Results { scenario: String },
}

fn main() -> Result<()> {
    roboarena::init();
    match Args::parse().command {
        Command::Run {
            scenario,
            generations,
        } => Trainer::new(&scenario)?.train(generations),
        Command::View {
            scenario,
            generation,
            match_id,
        } => Trainer::replay(&scenario, generation, match_id),
        Command::Results { scenario } => report::write(&Disk::new(&scenario)?),
    }
}
