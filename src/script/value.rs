use crate::game::action::Action;

/// soft evaluation failures. these never abort a match; at the top level
/// they coerce to a Wait like any other non-action.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Fault {
    DivisionByZero,
}

/// what evaluating a subtree yields. the language is dynamically typed
/// over a single scalar domain; anything that is not an Int propagates
/// through the integer operators unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Act(Action),
    Error(Fault),
}

impl Value {
    pub const TRUE: Value = Value::Int(1);
    pub const FALSE: Value = Value::Int(0);

    pub fn truth(flag: bool) -> Self {
        if flag { Value::TRUE } else { Value::FALSE }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<Action> for Value {
    fn from(action: Action) -> Self {
        Value::Act(action)
    }
}

impl From<Fault> for Value {
    fn from(fault: Fault) -> Self {
        Value::Error(fault)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Act(action) => write!(f, "{}", action),
            Value::Error(Fault::DivisionByZero) => write!(f, "division by zero"),
        }
    }
}
