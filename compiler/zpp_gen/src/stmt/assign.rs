//! Assignments and compound assignments.

use zpp_diagnostic::ErrorCode;
use zpp_ir::{Assign, AssignOp, AssignTarget, Pos};

use crate::context::Generator;
use crate::error::{self, GenError, GenResult};
use crate::value::RealData;

impl Generator {
    /// Store into the place the target was loaded from. Compound operators
    /// read the same place first.
    pub(super) fn eval_assign(&mut self, assign: &Assign, pos: Pos) -> GenResult<()> {
        let AssignTarget::Place(target) = &assign.target else {
            if assign.op != AssignOp::Set {
                return Err(GenError::new(
                    ErrorCode::InvalidAssignmentTarget,
                    "discard statement only accepts `=` as operator",
                    pos,
                ));
            }
            self.eval_expr_stmt(&assign.value)?;
            return Ok(());
        };

        let place = self.eval_expr(target, None)?;
        let Some(ptr) = self.place_of(&place) else {
            return Err(error::cannot_assign(target.pos));
        };
        if place.readonly {
            return Err(error::immutable_write(pos));
        }

        let value = self.eval_expr(&assign.value, Some(place.ty))?;
        self.expect_type(place.ty, &value, assign.value.pos)?;

        let stored = match assign.op.binary_op() {
            None => value.value,
            Some(op) => {
                self.expect_numeric(&place, target.pos)?;
                let current = self.builder().emit_load(place.ty, ptr.clone());
                let current = RealData::runtime(place.ty, current);
                self.emit_binary_op(op, &current, &value, None).value
            }
        };
        self.builder().emit_store(ptr, stored);
        Ok(())
    }
}
