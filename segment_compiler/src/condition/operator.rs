use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Operator token as written in a condition line
///
/// `=` and `==` are distinct tokens with identical semantics; the parser
/// keeps the spelling so conditions echo back exactly as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "==")]
    DoubleEquals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<=")]
    LessThanOrEqual,
}

/// Order in which operator tokens are tested at each position of a line.
///
/// Two-character tokens must come first: testing `>` before `>=` would split
/// `stock_quantity >= 5` into field `stock_quantity` and value `= 5`.
pub const OPERATOR_DETECTION_ORDER: [Operator; 7] = [
    Operator::GreaterThanOrEqual,
    Operator::LessThanOrEqual,
    Operator::NotEquals,
    Operator::DoubleEquals,
    Operator::Equals,
    Operator::GreaterThan,
    Operator::LessThan,
];

impl Operator {
    /// Parse operator from its exact token
    pub fn parse(s: &str) -> Option<Self> {
        OPERATOR_DETECTION_ORDER
            .iter()
            .copied()
            .find(|op| op.token() == s)
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::DoubleEquals => "==",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThanOrEqual => "<=",
        }
    }

    /// Semantic comparison this token stands for
    pub fn comparison(&self) -> Comparison {
        match self {
            Self::Equals | Self::DoubleEquals => Comparison::Eq,
            Self::NotEquals => Comparison::Ne,
            Self::GreaterThan => Comparison::Gt,
            Self::LessThan => Comparison::Lt,
            Self::GreaterThanOrEqual => Comparison::Ge,
            Self::LessThanOrEqual => Comparison::Le,
        }
    }

    pub fn is_equality(&self) -> bool {
        matches!(self.comparison(), Comparison::Eq | Comparison::Ne)
    }

    pub fn is_range(&self) -> bool {
        !self.is_equality()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Normalized comparison used by compiled store queries and residual predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Comparison {
    /// Decide the comparison from `actual.partial_cmp(expected)`.
    ///
    /// An unordered result (NaN) only satisfies `Ne`.
    pub fn holds(&self, ordering: Option<Ordering>) -> bool {
        match ordering {
            Some(ordering) => match self {
                Self::Eq => ordering == Ordering::Equal,
                Self::Ne => ordering != Ordering::Equal,
                Self::Gt => ordering == Ordering::Greater,
                Self::Lt => ordering == Ordering::Less,
                Self::Ge => ordering != Ordering::Less,
                Self::Le => ordering != Ordering::Greater,
            },
            None => matches!(self, Self::Ne),
        }
    }

    /// Compare two values of the same ordered type
    pub fn evaluate<T: PartialOrd + ?Sized>(&self, actual: &T, expected: &T) -> bool {
        self.holds(actual.partial_cmp(expected))
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
