//! Field policy: the closed schema of fields a rule may reference
//!
//! Every field has a semantic type, the operators it accepts, and whether
//! its conditions are pushed down to the record store or evaluated after
//! retrieval. The table is consulted uniformly by the compiler; nothing else
//! decides field legality.

pub mod error;

pub use error::{PolicyError, PolicyResult};

use crate::condition::{Condition, Operator};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields a rule may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Price,
    StockStatus,
    StockQuantity,
    Category,
    Tags,
    OnSale,
    CreatedAt,
    Title,
    Id,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::StockStatus => "stock_status",
            Self::StockQuantity => "stock_quantity",
            Self::Category => "category",
            Self::Tags => "tags",
            Self::OnSale => "on_sale",
            Self::CreatedAt => "created_at",
            Self::Title => "title",
            Self::Id => "id",
        }
    }

    pub fn spec(&self) -> &'static FieldSpec {
        // Table order matches the enum order
        &FIELD_POLICY[*self as usize]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Semantic type a field's conditions are interpreted as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Number persisted as text; compared numerically after retrieval
    TextEncodedNumber,
    Integer,
    Number,
    String,
    EnumeratedString,
    StringSet,
    Boolean,
    Date,
}

impl FieldType {
    /// Human readable description of the value this type expects
    pub fn expected_value(&self) -> &'static str {
        match self {
            Self::TextEncodedNumber | Self::Integer | Self::Number => "a number",
            Self::String | Self::EnumeratedString | Self::StringSet => "a string",
            Self::Boolean => "true/false",
            Self::Date => "a date",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::TextEncodedNumber | Self::Integer | Self::Number
        )
    }
}

const ALL_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::DoubleEquals,
    Operator::NotEquals,
    Operator::GreaterThan,
    Operator::LessThan,
    Operator::GreaterThanOrEqual,
    Operator::LessThanOrEqual,
];

const EQUALITY_OPERATORS: &[Operator] =
    &[Operator::Equals, Operator::DoubleEquals, Operator::NotEquals];

const BOOLEAN_OPERATORS: &[Operator] = &[Operator::Equals, Operator::DoubleEquals];

/// Policy entry for one field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    pub field_type: FieldType,
    pub allowed_operators: &'static [Operator],
    /// Whether conditions on this field execute inside the record store
    pub pushdown: bool,
}

impl FieldSpec {
    pub fn name(&self) -> &'static str {
        self.field.as_str()
    }

    pub fn allows(&self, operator: Operator) -> bool {
        self.allowed_operators.contains(&operator)
    }

    pub fn check_operator(&self, operator: Operator) -> PolicyResult<()> {
        if self.allows(operator) {
            Ok(())
        } else {
            Err(PolicyError::unsupported_operator(self.name(), operator))
        }
    }
}

/// The closed field schema, in [`Field`] declaration order
///
/// `created_at` lists every operator; range operators additionally require
/// the value to parse as a date, which the compiler checks.
pub static FIELD_POLICY: [FieldSpec; 9] = [
    FieldSpec {
        field: Field::Price,
        field_type: FieldType::TextEncodedNumber,
        allowed_operators: ALL_OPERATORS,
        pushdown: false,
    },
    FieldSpec {
        field: Field::StockStatus,
        field_type: FieldType::EnumeratedString,
        allowed_operators: EQUALITY_OPERATORS,
        pushdown: true,
    },
    FieldSpec {
        field: Field::StockQuantity,
        field_type: FieldType::Integer,
        allowed_operators: ALL_OPERATORS,
        pushdown: true,
    },
    FieldSpec {
        field: Field::Category,
        field_type: FieldType::String,
        allowed_operators: EQUALITY_OPERATORS,
        pushdown: true,
    },
    FieldSpec {
        field: Field::Tags,
        field_type: FieldType::StringSet,
        allowed_operators: EQUALITY_OPERATORS,
        pushdown: true,
    },
    FieldSpec {
        field: Field::OnSale,
        field_type: FieldType::Boolean,
        allowed_operators: BOOLEAN_OPERATORS,
        pushdown: true,
    },
    FieldSpec {
        field: Field::CreatedAt,
        field_type: FieldType::Date,
        allowed_operators: ALL_OPERATORS,
        pushdown: true,
    },
    FieldSpec {
        field: Field::Title,
        field_type: FieldType::String,
        allowed_operators: EQUALITY_OPERATORS,
        pushdown: true,
    },
    FieldSpec {
        field: Field::Id,
        field_type: FieldType::Number,
        allowed_operators: ALL_OPERATORS,
        pushdown: true,
    },
];

/// Names of every allowed field, in table order
pub fn allowed_field_names() -> Vec<&'static str> {
    FIELD_POLICY.iter().map(FieldSpec::name).collect()
}

/// Look up a field by its exact (case-sensitive) name
pub fn lookup(name: &str) -> PolicyResult<&'static FieldSpec> {
    FIELD_POLICY
        .iter()
        .find(|spec| spec.name() == name)
        .ok_or_else(|| PolicyError::unknown_field(name, allowed_field_names()))
}

/// Check a condition's field and operator against the table
pub fn validate(condition: &Condition) -> PolicyResult<&'static FieldSpec> {
    let spec = lookup(&condition.field)?;
    spec.check_operator(condition.operator)?;
    Ok(spec)
}
