// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! LIMIT/OFFSET clause body.

use crate::expression::Expression;
use crate::{Builder, Clause, ClauseItem, ClauseName};

/// Writes its own `LIMIT` keyword (the slot keyword is suppressed on merge).
/// Nothing is emitted unless `limit` is positive; the offset only renders
/// alongside a positive limit.
///
/// Merge is field-wise: zero inherits a positive previous value, a negative
/// contribution resets the field to zero for the session, a positive one
/// overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limit {
    pub limit: i64,
    pub offset: i64,
}

impl Limit {
    pub fn build(&self, builder: &mut dyn Builder) {
        if self.limit > 0 {
            builder.write_str("LIMIT ");
            builder.write_str(&self.limit.to_string());

            if self.offset > 0 {
                builder.write_str(" OFFSET ");
                builder.write_str(&self.offset.to_string());
            }
        }
    }
}

impl ClauseItem for Limit {
    fn name(&self) -> ClauseName {
        ClauseName::Limit
    }

    fn merge_into(mut self, clause: &mut Clause) {
        clause.name = None;

        if let Some(Expression::Limit(prev)) = clause.expression.take() {
            if self.limit == 0 && prev.limit > 0 {
                self.limit = prev.limit;
            } else if self.limit < 0 {
                self.limit = 0;
            }

            if self.offset == 0 && prev.offset > 0 {
                self.offset = prev.offset;
            } else if self.offset < 0 {
                self.offset = 0;
            }
        }

        clause.expression = Some(Expression::Limit(self));
    }
}
