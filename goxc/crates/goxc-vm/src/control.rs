//! Structural control-flow resolution.
//!
//! The IR encodes branches as structured markers, not jump offsets. This
//! module resolves each branching instruction to its structurally
//! matching partner in one pass over a function's code:
//!
//! - `IF` -> its `ELSE` (taken when the test is zero)
//! - `ELSE` -> its `ENDIF` (skips the alternative after the consequence)
//! - `CBREAK` -> the `ENDLOOP` of the innermost enclosing loop
//! - `CONTINUE` -> the `LOOP` of the innermost enclosing loop
//! - `ENDLOOP` -> its `LOOP`
//!
//! Matching respects nesting depth, so loops inside loops and ifs inside
//! ifs resolve to their own markers.

use goxc_ir::Instr;
use rustc_hash::FxHashMap;

use crate::RuntimeError;

/// Jump table for one function: branching instruction index -> index of
/// its matching marker.
pub(crate) struct ControlMap {
    targets: FxHashMap<usize, usize>,
}

impl ControlMap {
    /// Resolves all control-flow pairs in `code`, or fails if the
    /// structure is unbalanced.
    pub fn build(code: &[Instr]) -> Result<ControlMap, RuntimeError> {
        let mut targets = FxHashMap::default();
        // (IF index, ELSE index once seen)
        let mut if_stack: Vec<(usize, Option<usize>)> = Vec::new();
        // (LOOP index, CBREAK indices awaiting the ENDLOOP)
        let mut loop_stack: Vec<(usize, Vec<usize>)> = Vec::new();

        for (index, instr) in code.iter().enumerate() {
            match instr {
                Instr::If => if_stack.push((index, None)),
                Instr::Else => {
                    let (if_index, else_slot) =
                        if_stack.last_mut().ok_or(RuntimeError::UnmatchedLabel {
                            op: "ELSE",
                            target: "IF",
                        })?;
                    if else_slot.is_some() {
                        return Err(RuntimeError::UnmatchedLabel {
                            op: "ELSE",
                            target: "IF",
                        });
                    }
                    *else_slot = Some(index);
                    targets.insert(*if_index, index);
                }
                Instr::EndIf => {
                    let (_, else_slot) = if_stack.pop().ok_or(RuntimeError::UnmatchedLabel {
                        op: "ENDIF",
                        target: "IF",
                    })?;
                    let else_index = else_slot.ok_or(RuntimeError::UnmatchedLabel {
                        op: "IF",
                        target: "ELSE",
                    })?;
                    targets.insert(else_index, index);
                }
                Instr::Loop => loop_stack.push((index, Vec::new())),
                Instr::CBreak => {
                    let (_, breaks) = loop_stack.last_mut().ok_or(RuntimeError::UnmatchedLabel {
                        op: "CBREAK",
                        target: "ENDLOOP",
                    })?;
                    breaks.push(index);
                }
                Instr::Continue => {
                    let (loop_index, _) =
                        loop_stack.last().ok_or(RuntimeError::UnmatchedLabel {
                            op: "CONTINUE",
                            target: "LOOP",
                        })?;
                    targets.insert(index, *loop_index);
                }
                Instr::EndLoop => {
                    let (loop_index, breaks) =
                        loop_stack.pop().ok_or(RuntimeError::UnmatchedLabel {
                            op: "ENDLOOP",
                            target: "LOOP",
                        })?;
                    targets.insert(index, loop_index);
                    for break_index in breaks {
                        targets.insert(break_index, index);
                    }
                }
                _ => {}
            }
        }

        if !if_stack.is_empty() {
            return Err(RuntimeError::UnmatchedLabel {
                op: "IF",
                target: "ENDIF",
            });
        }
        if !loop_stack.is_empty() {
            return Err(RuntimeError::UnmatchedLabel {
                op: "LOOP",
                target: "ENDLOOP",
            });
        }

        Ok(ControlMap { targets })
    }

    /// Matching target for the branching instruction at `index`.
    pub fn target(&self, index: usize) -> Option<usize> {
        self.targets.get(&index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goxc_ir::Instr::*;

    #[test]
    fn test_simple_if() {
        // IF @0, ELSE @1, ENDIF @2
        let map = ControlMap::build(&[If, Else, EndIf]).unwrap();
        assert_eq!(map.target(0), Some(1));
        assert_eq!(map.target(1), Some(2));
    }

    #[test]
    fn test_nested_if_matches_inner_first() {
        // IF @0, IF @1, ELSE @2, ENDIF @3, ELSE @4, ENDIF @5
        let map = ControlMap::build(&[If, If, Else, EndIf, Else, EndIf]).unwrap();
        assert_eq!(map.target(1), Some(2));
        assert_eq!(map.target(2), Some(3));
        assert_eq!(map.target(0), Some(4));
        assert_eq!(map.target(4), Some(5));
    }

    #[test]
    fn test_simple_loop() {
        // LOOP @0, CBREAK @1, ENDLOOP @2
        let map = ControlMap::build(&[Loop, CBreak, EndLoop]).unwrap();
        assert_eq!(map.target(1), Some(2));
        assert_eq!(map.target(2), Some(0));
    }

    #[test]
    fn test_nested_loops() {
        // LOOP @0, CBREAK @1, LOOP @2, CBREAK @3, CONTINUE @4, ENDLOOP @5, ENDLOOP @6
        let map =
            ControlMap::build(&[Loop, CBreak, Loop, CBreak, Continue, EndLoop, EndLoop]).unwrap();
        // outer CBREAK exits the outer loop, inner the inner
        assert_eq!(map.target(1), Some(6));
        assert_eq!(map.target(3), Some(5));
        // CONTINUE rewinds the inner loop
        assert_eq!(map.target(4), Some(2));
        assert_eq!(map.target(5), Some(2));
        assert_eq!(map.target(6), Some(0));
    }

    #[test]
    fn test_if_inside_loop() {
        // LOOP @0, CBREAK @1, IF @2, CBREAK @3, ELSE @4, ENDIF @5, ENDLOOP @6
        let map =
            ControlMap::build(&[Loop, CBreak, If, CBreak, Else, EndIf, EndLoop]).unwrap();
        // a CBREAK inside an IF still targets the loop's ENDLOOP
        assert_eq!(map.target(3), Some(6));
        assert_eq!(map.target(2), Some(4));
    }

    #[test]
    fn test_unbalanced_structures_fail() {
        assert!(ControlMap::build(&[If, Else]).is_err());
        assert!(ControlMap::build(&[Else]).is_err());
        assert!(ControlMap::build(&[If, EndIf]).is_err()); // ELSE is mandatory
        assert!(ControlMap::build(&[Loop]).is_err());
        assert!(ControlMap::build(&[EndLoop]).is_err());
        assert!(ControlMap::build(&[CBreak]).is_err());
        assert!(ControlMap::build(&[Continue]).is_err());
    }
}
