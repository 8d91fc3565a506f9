use super::node::Node;
use super::op::Op;

/// compact single-line form, used in logs and error text
impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Int(n) => write!(f, "{}", n),
            Node::Func(op) => write!(f, "{}", op),
            Node::Expr(children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Node {
    /// the layout form every script file and report uses. calls whose
    /// arguments are all atoms or zero-arg calls stay on one line; anything
    /// bigger breaks its arguments onto lines aligned to the column after
    /// the operator name. `if` is the traditional Lisp exception: its
    /// branches indent two spaces under the `if`. always ends in a newline.
    pub fn pretty(&self) -> String {
        format!("{}\n", self.layout(0))
    }

    fn layout(&self, indent: usize) -> String {
        match self {
            Node::Int(n) => n.to_string(),
            Node::Func(op) => op.to_string(),
            Node::Expr(children) => {
                let op = match children[0] {
                    Node::Func(op) => op,
                    _ => unreachable!("parser only admits operators in head position"),
                };
                if self.flat() {
                    self.to_string()
                } else if op == Op::If {
                    let column = indent + op.name().len() + 2;
                    format!(
                        "({} {}\n{}{}\n{}{})",
                        op,
                        children[1].layout(column),
                        " ".repeat(indent + 2),
                        children[2].layout(indent + 2),
                        " ".repeat(indent + 2),
                        children[3].layout(indent + 2),
                    )
                } else {
                    let column = indent + op.name().len() + 2;
                    let mut out = format!("({}", op);
                    for (i, arg) in children[1..].iter().enumerate() {
                        match i {
                            0 => out.push(' '),
                            _ => {
                                out.push('\n');
                                out.push_str(&" ".repeat(column));
                            }
                        }
                        out.push_str(&arg.layout(column));
                    }
                    out.push(')');
                    out
                }
            }
        }
    }

    /// atoms, and calls whose arguments are all atoms or zero-arg calls
    fn flat(&self) -> bool {
        match self {
            Node::Int(_) | Node::Func(_) => true,
            Node::Expr(children) => children[1..].iter().all(|child| match child {
                Node::Int(_) | Node::Func(_) => true,
                Node::Expr(inner) => inner.len() == 1,
            }),
        }
    }
}
