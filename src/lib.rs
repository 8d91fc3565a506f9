pub mod arena;
pub mod editor;
pub mod evolve;
pub mod game;
pub mod save;
pub mod script;
pub mod viz;

/// dimensional analysis types
pub type Score = i32;
pub type ScriptId = usize;
pub type MatchId = usize;

// match parameters
pub const BOTS_PER_TEAM: usize = 5;
pub const MAX_TICKS_PER_GAME: usize = 200;
pub const SHOT_DECAY: f64 = 0.03;

// scoring parameters
pub const KILL_REWARD: Score = 1;
pub const FRIENDLY_FIRE_PENALTY: Score = 2;
pub const GOAL_REWARD: Score = 10;
pub const OWN_GOAL_PENALTY: Score = 20;
pub const SLOW_GAME_PENALTY: Score = 5;

// evolution parameters
pub const SCRIPTS_PER_GENERATION: usize = 1000;
pub const MATCHES_PER_SCRIPT: usize = 5;
pub const KEEP_PERCENT: f64 = 0.20;
pub const RANDOM_PERCENT: f64 = 0.35;
pub const MUTATE_PERCENT: f64 = 0.30;
pub const SPLICE_PERCENT: f64 = 0.35;

// script size parameters
pub const MAX_EXPRS_PER_SCRIPT: usize = 1000;
pub const MIN_EXPRS_PER_SCRIPT: usize = 20;
pub const MUTATION_SIZE: usize = 10;
pub const INTEGER_PERCENT: f64 = 0.30;

/// trait for random generation, mainly (strictly?) for testing
pub trait Arbitrary {
    fn random() -> Self;
}

/// progress bar
pub fn progress(n: usize) -> indicatif::ProgressBar {
    let tick = std::time::Duration::from_secs(5);
    let style = "{spinner:.cyan} {elapsed} ~ {percent:>3}% {wide_bar:.cyan}";
    let style = indicatif::ProgressStyle::with_template(style).unwrap();
    let progress = indicatif::ProgressBar::new(n as u64);
    progress.set_style(style);
    progress.enable_steady_tick(tick);
    progress
}

/// initialize logging to terminal and file
pub fn init() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
