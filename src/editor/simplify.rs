use crate::script::node::Node;
use crate::script::op::Op;

/// constant folding, for human-readable output. stored scripts are never
/// simplified: evolution has to see the genome it actually bred, folded
/// dead code included.
pub fn simplify(node: &Node) -> Node {
    if let Some(n) = constant(node) {
        return Node::Int(n);
    }
    match node {
        Node::Expr(children) => {
            let op = node.op().expect("calls always have an operator head");
            let args = node.args();
            match op {
                // a constant condition picks its branch outright
                Op::If => match constant(&args[0]) {
                    Some(c) if c > 0 => simplify(&args[1]),
                    Some(_) => simplify(&args[2]),
                    None => rebuild(op, children),
                },
                // a constant-true first arm makes `and` its second arm,
                // and a constant-false first arm makes `or` its second
                Op::And => match constant(&args[0]) {
                    Some(c) if c > 0 => simplify(&args[1]),
                    Some(_) => Node::Int(0),
                    None => rebuild(op, children),
                },
                Op::Or => match constant(&args[0]) {
                    Some(0) => simplify(&args[1]),
                    Some(c) => Node::Int(c),
                    None => rebuild(op, children),
                },
                _ => rebuild(op, children),
            }
        }
        _ => node.clone(),
    }
}

fn rebuild(op: Op, children: &[Node]) -> Node {
    let mut rebuilt = vec![Node::Func(op)];
    rebuilt.extend(children[1..].iter().map(simplify));
    Node::Expr(rebuilt)
}

/// the folded integer value of a pure subtree, when it has one. stateful
/// operators never fold; division and modulus by a folded zero fold to
/// zero, which is deliberately more forgiving than the evaluator.
pub fn constant(node: &Node) -> Option<i64> {
    match node {
        Node::Int(n) => Some(*n),
        Node::Func(_) => None,
        Node::Expr(_) => {
            let args = node.args();
            match node.op().expect("calls always have an operator head") {
                Op::Add => two(args).map(|(a, b)| a.wrapping_add(b)),
                Op::Sub => two(args).map(|(a, b)| a.wrapping_sub(b)),
                Op::Mul => two(args).map(|(a, b)| a.wrapping_mul(b)),
                Op::Div => two(args).map(|(a, b)| if b == 0 { 0 } else { a.wrapping_div(b) }),
                Op::Mod => two(args).map(|(a, b)| if b == 0 { 0 } else { a.wrapping_rem(b) }),
                Op::Less => two(args).map(|(a, b)| (a < b) as i64),
                Op::Greater => two(args).map(|(a, b)| (a > b) as i64),
                Op::Equal => two(args).map(|(a, b)| (a == b) as i64),
                Op::If => constant(&args[0])
                    .and_then(|c| constant(if c > 0 { &args[1] } else { &args[2] })),
                Op::And => match constant(&args[0])? {
                    0 => Some(0),
                    _ => constant(&args[1]),
                },
                Op::Or => match constant(&args[0])? {
                    0 => constant(&args[1]),
                    c => Some(c),
                },
                Op::Not => constant(&args[0]).map(|n| (n <= 0) as i64),
                _ => None,
            }
        }
    }
}

fn two(args: &[Node]) -> Option<(i64, i64)> {
    Some((constant(&args[0])?, constant(&args[1])?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::arena::Arena;
    use crate::editor::editor::Editor;
    use crate::game::action::Action;
    use crate::game::state::State;
    use crate::script::eval::Script;
    use crate::script::parse::parse;
    use crate::script::value::Value;

    fn folded(source: &str) -> Node {
        simplify(&parse(source).unwrap())
    }

    #[test]
    fn arithmetic_folds() {
        assert_eq!(folded("(+ 2 2)"), Node::Int(4));
        assert_eq!(folded("(* (+ 1 2) (- 5 1))"), Node::Int(12));
        assert_eq!(folded("(< 1 2)"), Node::Int(1));
        assert_eq!(folded("(not 0)"), Node::Int(1));
    }

    #[test]
    fn constant_conditions_pick_their_branch() {
        let tree = folded("(if 1 (+ 2 2) (- 3 3))");
        assert_eq!(tree, Node::Int(4));
        assert_eq!(tree.pretty(), "4\n");
        assert_eq!(folded("(if 0 (+ 2 2) (- 3 3))"), Node::Int(0));
        // live conditions keep both branches, folded inside
        assert_eq!(
            folded("(if (tick) (+ 2 2) (- 3 3))"),
            parse("(if (tick) 4 0)").unwrap()
        );
    }

    #[test]
    fn conjunction_folds() {
        assert_eq!(folded("(and 0 (move 1))"), Node::Int(0));
        assert_eq!(folded("(and 2 (+ 1 2))"), Node::Int(3));
        // constant-true first arm leaves just the second
        assert_eq!(folded("(and 1 (move 1))"), parse("(move 1)").unwrap());
    }

    #[test]
    fn disjunction_folds() {
        assert_eq!(folded("(or 1 (my-x-pos))"), Node::Int(1));
        assert_eq!(folded("(or 0 (/ 2 0))"), Node::Int(0));
        assert_eq!(folded("(or 0 (my-x-pos))"), parse("(my-x-pos)").unwrap());
    }

    #[test]
    fn zero_divisors_fold_to_zero() {
        assert_eq!(folded("(/ 2 0)"), Node::Int(0));
        assert_eq!(folded("(mod 7 0)"), Node::Int(0));
        assert_eq!(folded("(/ 8 2)"), Node::Int(4));
    }

    #[test]
    fn stateful_operators_never_fold() {
        assert_eq!(constant(&parse("(my-x-pos)").unwrap()), None);
        assert_eq!(constant(&parse("(move 1)").unwrap()), None);
        assert_eq!(constant(&parse("(tick)").unwrap()), None);
        // but their arguments still simplify in place
        assert_eq!(folded("(move (+ 1 2))"), parse("(move 3)").unwrap());
    }

    /// simplifier soundness: whenever a subtree folds to v, evaluating it
    /// yields Int v, or something the run contract coerces to a Wait.
    #[test]
    fn folding_agrees_with_evaluation() {
        let arena = Arena::sample();
        let state = State::new(&arena);
        let mut editor = Editor::seeded(17);
        for _ in 0..200 {
            let tree = editor.random_script();
            if let Some(v) = constant(&tree) {
                match Script::new(&tree, &state).eval(&tree) {
                    Value::Int(n) => assert_eq!(n, v, "fold mismatch on {}", tree),
                    _ => assert_eq!(Script::new(&tree, &state).run(), Action::Wait),
                }
            }
        }
    }

    #[test]
    fn simplified_trees_still_parse() {
        let mut editor = Editor::seeded(18);
        for _ in 0..50 {
            let tree = editor.random_script();
            let slim = simplify(&tree);
            // folding can only shrink
            assert!(slim.size() <= tree.size());
            // negative folds can't round-trip the grammar; everything
            // else must
            if slim
                .preorder()
                .iter()
                .all(|n| !matches!(n, Node::Int(i) if *i < 0))
            {
                assert!(parse(&slim.pretty()).is_ok(), "unparseable: {}", slim);
            }
        }
    }
}
