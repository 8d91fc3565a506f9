use crate::ScriptId;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// pair every script with opponents so that each plays at least `k`
/// matches: shuffle the ids into a ring, then sweep it round after round,
/// handing each still-hungry id one opponent per visit, preferring near
/// neighbors. the search takes a fresh pairing when it can, re-runs an
/// old pairing with the teams swapped when it must, and only then relaxes
/// the opponent's budget to `k + 1`. the same ordered pair is never
/// emitted twice, and `k` is a floor, not a cap: a few scripts may play
/// `k + 1` matches.
pub fn matchups(ids: &[ScriptId], k: usize, rng: &mut impl Rng) -> Vec<(ScriptId, ScriptId)> {
    assert!(ids.len() >= 2, "a cohort needs at least two scripts");
    let mut ring: Vec<ScriptId> = ids.to_vec();
    ring.shuffle(rng);
    let n = ring.len();
    let mut counts = vec![0usize; n];
    let mut played: HashSet<(ScriptId, ScriptId)> = HashSet::new();
    let mut pairs = Vec::new();
    loop {
        let mut paired = false;
        for i in 0..n {
            if counts[i] >= k {
                continue;
            }
            if let Some((j, pair)) = opponent(i, &ring, &counts, &played, k) {
                counts[i] += 1;
                counts[j] += 1;
                played.insert(pair);
                pairs.push(pair);
                paired = true;
            }
        }
        if counts.iter().all(|&c| c >= k) {
            break;
        }
        if !paired {
            log::warn!("matchup scheduling saturated with a hungry script left over");
            break;
        }
    }
    pairs
}

/// one opponent for the id at ring position `i`, or None if the ring is
/// exhausted. orientation matters: the returned pair is (scriptA,
/// scriptB) exactly as the match will seat them.
fn opponent(
    i: usize,
    ring: &[ScriptId],
    counts: &[usize],
    played: &HashSet<(ScriptId, ScriptId)>,
    k: usize,
) -> Option<(usize, (ScriptId, ScriptId))> {
    let n = ring.len();
    for cap in [k, k + 1] {
        for fresh in [true, false] {
            for step in 1..n {
                for j in [(i + step) % n, (i + n - step) % n] {
                    if j == i || counts[j] >= cap {
                        continue;
                    }
                    let forward = (ring[i], ring[j]);
                    let reverse = (ring[j], ring[i]);
                    if fresh {
                        if !played.contains(&forward) && !played.contains(&reverse) {
                            return Some((j, forward));
                        }
                    } else if !played.contains(&forward) {
                        return Some((j, forward));
                    } else if !played.contains(&reverse) {
                        return Some((j, reverse));
                    }
                }
            }
        }
    }
    None
}
