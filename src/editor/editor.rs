use crate::Arbitrary;
use crate::INTEGER_PERCENT;
use crate::MAX_EXPRS_PER_SCRIPT;
use crate::MIN_EXPRS_PER_SCRIPT;
use crate::MUTATION_SIZE;
use crate::script::node::Node;
use crate::script::op::Op;
use crate::script::parse::ParseError;
use crate::script::parse::parse;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;

/// the breeding operators: random synthesis, subtree mutation, cross-over
/// splicing, and size-bounded pruning. everything here runs between
/// generations and never inside a match, so this RNG is the crate's
/// second and last source of randomness.
pub struct Editor {
    rng: SmallRng,
}

impl Editor {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// fixed seed, for reproducible tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn rng(&mut self) -> &mut SmallRng {
        &mut self.rng
    }

    /// grow a random subtree, then wrap it in fresh expressions until the
    /// script is big enough to be interesting.
    pub fn random_script(&mut self) -> Node {
        let mut node = self.sprout();
        while node.size() < MIN_EXPRS_PER_SCRIPT {
            node = self.wrap(node);
        }
        node
    }

    /// a fresh subtree: an integer leaf some of the time, otherwise a
    /// uniformly chosen operator with recursively grown arguments. the
    /// mean branching factor is below one, so growth always peters out.
    fn sprout(&mut self) -> Node {
        if self.rng.random::<f64>() < INTEGER_PERCENT {
            Node::Int(self.random_int())
        } else {
            let op = *Op::ALL.choose(&mut self.rng).expect("operator table is not empty");
            let mut children = vec![Node::Func(op)];
            for _ in 0..op.arity() {
                children.push(self.sprout());
            }
            Node::Expr(children)
        }
    }

    /// wrap a tree inside some multi-argument expression, at a random
    /// argument slot, padding the other slots with fresh growth.
    fn wrap(&mut self, node: Node) -> Node {
        let op = loop {
            let op = *Op::ALL.choose(&mut self.rng).expect("operator table is not empty");
            if op.arity() > 0 {
                break op;
            }
        };
        let slot = self.rng.random_range(0..op.arity());
        let mut children = vec![Node::Func(op)];
        for _ in 1..op.arity() {
            let filler = self.sprout();
            children.push(filler);
        }
        children.insert(1 + slot, node);
        Node::Expr(children)
    }

    /// a curve that gives numbers between 0 and 49, with far more small
    /// ones than large: ⌊0.00005·(U·100)³⌋
    fn random_int(&mut self) -> i64 {
        let u = self.rng.random::<f64>() * 100.0;
        (0.00005 * u.powi(3)).floor() as i64
    }

    /// swap one random non-head subtree for fresh growth, then prune back
    /// under the size cap.
    pub fn mutate(&mut self, source: &str) -> Result<Node, ParseError> {
        let mut tree = parse(source)?;
        if let Some(path) = tree.locations().choose(&mut self.rng) {
            let mut graft = self.sprout();
            while graft.size() < MUTATION_SIZE {
                graft = self.wrap(graft);
            }
            tree.replace(path, graft);
        }
        Ok(self.prune(tree))
    }

    /// graft a random subtree of the donor into a random slot of the
    /// receiver, then prune. the graft is a deep copy, so the parents
    /// stay intact and nothing ends up aliased.
    pub fn splice(&mut self, receiver: &str, donor: &str) -> Result<Node, ParseError> {
        let mut tree = parse(receiver)?;
        let other = parse(donor)?;
        let cut = other.locations();
        let slots = tree.locations();
        if let (Some(from), Some(into)) = (cut.choose(&mut self.rng), slots.choose(&mut self.rng))
        {
            tree.replace(into, other.at(from).clone());
        }
        Ok(self.prune(tree))
    }

    /// shrink an oversized tree until it fits. each round replaces its
    /// largest replaceable subtree with something strictly smaller, so
    /// the size falls monotonically and the loop must terminate.
    pub fn prune(&mut self, mut tree: Node) -> Node {
        while tree.size() > MAX_EXPRS_PER_SCRIPT {
            let paths = tree.locations();
            let path = paths
                .iter()
                .max_by_key(|path| tree.at(path).size())
                .expect("oversized trees have replaceable locations");
            let room = tree.at(path).size();
            let graft = match self.sprout() {
                small if small.size() < room => small,
                _ => Node::Int(self.random_int()),
            };
            tree.replace(path, graft);
        }
        tree
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Arbitrary for Node {
    fn random() -> Self {
        Editor::new().random_script()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_scripts_reach_the_minimum_size() {
        let mut editor = Editor::seeded(1);
        for _ in 0..50 {
            let tree = editor.random_script();
            assert!(tree.size() >= MIN_EXPRS_PER_SCRIPT);
            assert!(tree.size() <= MAX_EXPRS_PER_SCRIPT * 4, "runaway growth");
        }
    }

    #[test]
    fn random_scripts_survive_the_parser() {
        let mut editor = Editor::seeded(2);
        for _ in 0..50 {
            let tree = editor.random_script();
            let reparsed = parse(&tree.pretty()).expect("synthesized script must parse");
            assert_eq!(reparsed, tree);
        }
    }

    /// parser round-trip: the printed form reparses to a tree with the
    /// same node count and the same pre-order operator/literal sequence.
    #[test]
    fn round_trip_preserves_structure() {
        let mut editor = Editor::seeded(3);
        for _ in 0..100 {
            let tree = editor.random_script();
            let reparsed = parse(&tree.pretty()).unwrap();
            assert_eq!(reparsed.size(), tree.size());
            assert_eq!(reparsed.preorder(), tree.preorder());
        }
    }

    #[test]
    fn random_ints_stay_on_the_curve() {
        let mut editor = Editor::seeded(4);
        for _ in 0..1000 {
            let n = editor.random_int();
            assert!((0..50).contains(&n));
        }
    }

    #[test]
    fn mutation_yields_a_different_valid_script() {
        let mut editor = Editor::seeded(5);
        let source = editor.random_script().pretty();
        let mut changed = 0;
        for _ in 0..10 {
            let mutant = editor.mutate(&source).unwrap();
            assert!(mutant.size() <= MAX_EXPRS_PER_SCRIPT);
            assert!(parse(&mutant.pretty()).is_ok());
            if mutant.pretty() != source {
                changed += 1;
            }
        }
        assert!(changed > 0, "ten mutations with no visible change");
    }

    #[test]
    fn mutation_rejects_garbage() {
        let mut editor = Editor::seeded(6);
        assert!(editor.mutate("(+ 1").is_err());
        assert!(editor.mutate("(frob 1 2)").is_err());
    }

    #[test]
    fn splices_combine_both_parents() {
        let mut editor = Editor::seeded(7);
        let mother = editor.random_script().pretty();
        let father = editor.random_script().pretty();
        for _ in 0..10 {
            let child = editor.splice(&mother, &father).unwrap();
            assert!(child.size() <= MAX_EXPRS_PER_SCRIPT);
            assert!(parse(&child.pretty()).is_ok());
        }
    }

    #[test]
    fn pruning_respects_the_cap() {
        let mut editor = Editor::seeded(8);
        // grow something enormous by repeated wrapping
        let mut tree = editor.random_script();
        while tree.size() <= MAX_EXPRS_PER_SCRIPT * 2 {
            tree = editor.wrap(tree);
        }
        let pruned = editor.prune(tree);
        assert!(pruned.size() <= MAX_EXPRS_PER_SCRIPT);
        assert!(parse(&pruned.pretty()).is_ok());
    }

    #[test]
    fn pruning_leaves_small_trees_alone() {
        let mut editor = Editor::seeded(9);
        let tree = parse("(+ 1 2)").unwrap();
        assert_eq!(editor.prune(tree.clone()), tree);
    }
}
