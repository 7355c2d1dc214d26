//! Structured queries: an AND of field filters, one optional order and a limit.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    /// Field equals any element of the array operand.
    In,
    /// Field is an array containing the operand.
    ArrayContains,
}

impl FilterOp {
    /// The Firestore `FieldFilter.Operator` name.
    pub fn firestore_name(&self) -> &'static str {
        match self {
            FilterOp::Eq => "EQUAL",
            FilterOp::Lt => "LESS_THAN",
            FilterOp::Le => "LESS_THAN_OR_EQUAL",
            FilterOp::Gt => "GREATER_THAN",
            FilterOp::Ge => "GREATER_THAN_OR_EQUAL",
            FilterOp::In => "IN",
            FilterOp::ArrayContains => "ARRAY_CONTAINS",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<u32>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: &str, op: FilterOp, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.filter(field, FilterOp::Eq, value)
    }

    /// Match any of `values`; a single value becomes a plain equality.
    pub fn any_of(self, field: &str, values: &[String]) -> Self {
        match values {
            [single] => self.eq(field, single.as_str()),
            _ => self.filter(field, FilterOp::In, values.to_vec()),
        }
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
