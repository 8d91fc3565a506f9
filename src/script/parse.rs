use super::node::Node;
use super::op::Op;

/// why a script failed to parse. stored scripts are parsed eagerly when a
/// match loads, so any of these in a stored script is a fatal integrity
/// problem: the evolution loop must never write one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Unterminated,
    Trailing(String),
    EmptyList,
    NonFunctionHead,
    SymbolArgument(String),
    StraySymbol(String),
    UnknownFunction(String),
    Arity { op: Op, got: usize },
    BadInt(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Unterminated => write!(f, "unterminated expression"),
            ParseError::Trailing(rest) => write!(f, "trailing input after script: '{}'", rest),
            ParseError::EmptyList => write!(f, "found an empty list"),
            ParseError::NonFunctionHead => write!(f, "non-symbol in function position"),
            ParseError::SymbolArgument(name) => {
                write!(f, "symbol '{}' passed as function argument", name)
            }
            ParseError::StraySymbol(name) => {
                write!(f, "bare symbol '{}' is not a script", name)
            }
            ParseError::UnknownFunction(name) => write!(f, "no such function: '{}'", name),
            ParseError::Arity { op, got } => write!(
                f,
                "wrong number of arguments to '{}': got {}, expected {}",
                op,
                got,
                op.arity()
            ),
            ParseError::BadInt(text) => write!(f, "couldn't read integer literal '{}'", text),
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Int(i64),
    Symbol(String),
}

/// whitespace separates; parens self-delimit; digit runs are integers;
/// any other run is a symbol looked up in the operator table later.
fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            c if c.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        digits.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let n = digits
                    .parse::<i64>()
                    .map_err(|_| ParseError::BadInt(digits.clone()))?;
                tokens.push(Token::Int(n));
            }
            _ => {
                let mut name = String::new();
                while let Some(&s) = chars.peek() {
                    if s.is_whitespace() || s == '(' || s == ')' {
                        break;
                    }
                    name.push(s);
                    chars.next();
                }
                tokens.push(Token::Symbol(name));
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    at: usize,
}

impl Parser {
    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.at).cloned();
        self.at += 1;
        token
    }

    fn node(&mut self) -> Result<Node, ParseError> {
        match self.next() {
            None => Err(ParseError::Unterminated),
            Some(Token::Int(n)) => Ok(Node::Int(n)),
            Some(Token::Symbol(name)) => match Op::resolve(&name) {
                Some(op) => Ok(Node::Func(op)),
                None => Err(ParseError::UnknownFunction(name)),
            },
            Some(Token::Close) => Err(ParseError::Trailing(")".to_string())),
            Some(Token::Open) => self.call(),
        }
    }

    /// read children until the closing paren, then run the shape checks:
    /// a call is a Func head plus exactly arity non-symbol arguments.
    fn call(&mut self) -> Result<Node, ParseError> {
        let mut children = Vec::new();
        loop {
            match self.tokens.get(self.at) {
                None => return Err(ParseError::Unterminated),
                Some(Token::Close) => {
                    self.at += 1;
                    break;
                }
                Some(_) => children.push(self.node()?),
            }
        }
        if children.is_empty() {
            return Err(ParseError::EmptyList);
        }
        let op = match children[0] {
            Node::Func(op) => op,
            _ => return Err(ParseError::NonFunctionHead),
        };
        for child in &children[1..] {
            if let Node::Func(inner) = child {
                return Err(ParseError::SymbolArgument(inner.name().to_string()));
            }
        }
        if children.len() != 1 + op.arity() {
            return Err(ParseError::Arity {
                op,
                got: children.len() - 1,
            });
        }
        Ok(Node::Expr(children))
    }
}

/// parse one script: a single top-level expression or integer literal.
pub fn parse(source: &str) -> Result<Node, ParseError> {
    let mut parser = Parser {
        tokens: lex(source)?,
        at: 0,
    };
    let node = parser.node()?;
    if let Node::Func(op) = node {
        return Err(ParseError::StraySymbol(op.name().to_string()));
    }
    if parser.at < parser.tokens.len() {
        let rest = parser.tokens[parser.at..]
            .iter()
            .map(|t| match t {
                Token::Open => "(".to_string(),
                Token::Close => ")".to_string(),
                Token::Int(n) => n.to_string(),
                Token::Symbol(s) => s.clone(),
            })
            .collect::<Vec<_>>()
            .join(" ");
        return Err(ParseError::Trailing(rest));
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_addition() {
        let node = parse("(+ 1 32)").unwrap();
        match &node {
            Node::Expr(children) => {
                assert_eq!(children.len(), 3);
                assert_eq!(children[0], Node::Func(Op::Add));
                assert_eq!(children[1], Node::Int(1));
                assert_eq!(children[2], Node::Int(32));
            }
            _ => panic!("expected a call"),
        }
        assert_eq!(node.op(), Some(Op::Add));
        assert_eq!(Op::Add.arity(), 2);
    }

    #[test]
    fn nested_call() {
        let node = parse("(+ 1 (* 22 3))").unwrap();
        assert_eq!(node.op(), Some(Op::Add));
        assert_eq!(node.args()[0], Node::Int(1));
        assert_eq!(node.args()[1].op(), Some(Op::Mul));
        assert_eq!(node.args()[1].args(), &[Node::Int(22), Node::Int(3)]);
    }

    #[test]
    fn bare_integer_is_a_script() {
        assert_eq!(parse("  42\n"), Ok(Node::Int(42)));
    }

    #[test]
    fn whitespace_is_insignificant() {
        assert_eq!(parse("(+ 1 2)"), parse(" (  +   1\n\t2 ) \n"));
    }

    #[test]
    fn unterminated() {
        assert_eq!(parse("(+ 1 2"), Err(ParseError::Unterminated));
        assert_eq!(parse(""), Err(ParseError::Unterminated));
    }

    #[test]
    fn int_in_function_position() {
        assert_eq!(parse("(1 + 2)"), Err(ParseError::NonFunctionHead));
    }

    #[test]
    fn expr_in_function_position() {
        assert_eq!(parse("((+ 1 2) 3)"), Err(ParseError::NonFunctionHead));
    }

    #[test]
    fn empty_list() {
        assert_eq!(parse("(+ 1 ())"), Err(ParseError::EmptyList));
    }

    #[test]
    fn symbol_as_argument() {
        assert_eq!(
            parse("(+ wait 2)"),
            Err(ParseError::SymbolArgument("wait".to_string()))
        );
    }

    #[test]
    fn unknown_function() {
        assert_eq!(
            parse("(foo 22)"),
            Err(ParseError::UnknownFunction("foo".to_string()))
        );
    }

    #[test]
    fn bare_symbol() {
        assert_eq!(
            parse("wait"),
            Err(ParseError::StraySymbol("wait".to_string()))
        );
    }

    #[test]
    fn trailing_garbage() {
        assert!(matches!(parse("(wait) 7"), Err(ParseError::Trailing(_))));
    }

    #[test]
    fn negative_literals_are_not_integers() {
        // '-' lexes as a symbol start, and "-12" is no operator
        assert_eq!(
            parse("(+ -12 2)"),
            Err(ParseError::UnknownFunction("-12".to_string()))
        );
    }

    /// for every operator and every wrong argument count, parsing fails
    /// with an arity error naming that operator.
    #[test]
    fn arity_is_enforced_everywhere() {
        for op in Op::ALL {
            for got in 0..=4 {
                if got == op.arity() {
                    continue;
                }
                let args = vec!["1"; got].join(" ");
                let source = if args.is_empty() {
                    format!("({})", op.name())
                } else {
                    format!("({} {})", op.name(), args)
                };
                assert_eq!(
                    parse(&source),
                    Err(ParseError::Arity { op, got }),
                    "no arity error for {}",
                    source
                );
            }
        }
    }

    #[test]
    fn correct_arity_parses_everywhere() {
        for op in Op::ALL {
            let args = vec!["1"; op.arity()].join(" ");
            let source = if args.is_empty() {
                format!("({})", op.name())
            } else {
                format!("({} {})", op.name(), args)
            };
            assert!(parse(&source).is_ok(), "failed to parse {}", source);
        }
    }
}
