use roboarena::arena::arena::Arena;
use roboarena::editor::editor::Editor;
use roboarena::editor::simplify::simplify;
use roboarena::game::engine::Match;
use roboarena::script::parse::parse;
use roboarena::viz::visualizer::Null;

criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        parsing_a_synthesized_script,
        printing_a_synthesized_script,
        simplifying_a_synthesized_script,
        surveying_arena_visibility,
        playing_a_full_match,
}

fn sources(n: usize) -> Vec<String> {
    let mut editor = Editor::seeded(0xbeef);
    (0..n).map(|_| editor.random_script().pretty()).collect()
}

/// a 20x20 palette image: a wall down the middle with a gap, five spawns
/// and a goal per team
fn arena() -> Arena {
    let white = image::Rgba([255u8, 255, 255, 255]);
    let mut img = image::RgbaImage::from_pixel(20, 20, white);
    for y in 0..20 {
        img.put_pixel(10, y, image::Rgba([0, 0, 0, 255]));
    }
    img.put_pixel(10, 10, white);
    for i in 0..5 {
        img.put_pixel(1, 8 + i, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(18, 8 + i, image::Rgba([255, 128, 0, 255]));
    }
    img.put_pixel(0, 10, image::Rgba([0, 255, 0, 255]));
    img.put_pixel(19, 10, image::Rgba([128, 255, 0, 255]));
    Arena::decode(&img).expect("bench arena is well-formed")
}

fn parsing_a_synthesized_script(c: &mut criterion::Criterion) {
    let sources = sources(64);
    c.bench_function("parse 64 synthesized scripts", |b| {
        b.iter(|| {
            sources
                .iter()
                .map(|s| parse(s).expect("synthesized scripts parse"))
                .count()
        })
    });
}

fn printing_a_synthesized_script(c: &mut criterion::Criterion) {
    let trees: Vec<_> = sources(64)
        .iter()
        .map(|s| parse(s).unwrap())
        .collect();
    c.bench_function("pretty-print 64 scripts", |b| {
        b.iter(|| trees.iter().map(|t| t.pretty().len()).sum::<usize>())
    });
}

fn simplifying_a_synthesized_script(c: &mut criterion::Criterion) {
    let trees: Vec<_> = sources(64)
        .iter()
        .map(|s| parse(s).unwrap())
        .collect();
    c.bench_function("constant-fold 64 scripts", |b| {
        b.iter(|| trees.iter().map(|t| simplify(t).size()).sum::<usize>())
    });
}

fn surveying_arena_visibility(c: &mut criterion::Criterion) {
    c.bench_function("precompute visibility for the bench arena", |b| {
        b.iter(arena)
    });
}

fn playing_a_full_match(c: &mut criterion::Criterion) {
    let arena = arena();
    let aggro = parse("(if (enemy-visible?) (shoot-nearest) (move 0))").unwrap();
    let camper = parse("(if (enemy-visible?) (shoot-nearest) (wait))").unwrap();
    c.bench_function("play one 200-tick match", |b| {
        b.iter(|| {
            Match::new(&arena, 42, (1, aggro.clone()), (2, camper.clone()))
                .run(&mut Null)
                .ticks
        })
    });
}
