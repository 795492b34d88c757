// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! DELETE clause body.

use crate::expression::Expression;
use crate::{Builder, Clause, ClauseItem, ClauseName};

/// Writes `DELETE[ <modifier>]` itself; the slot keyword is suppressed so
/// the token is not emitted twice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Delete {
    pub modifier: Option<String>,
}

impl Delete {
    pub fn build(&self, builder: &mut dyn Builder) {
        builder.write_str("DELETE");

        if let Some(modifier) = &self.modifier {
            builder.write_byte(' ');
            builder.write_str(modifier);
        }
    }
}

impl ClauseItem for Delete {
    fn name(&self) -> ClauseName {
        ClauseName::Delete
    }

    fn merge_into(self, clause: &mut Clause) {
        clause.name = None;
        clause.expression = Some(Expression::Delete(self));
    }
}
