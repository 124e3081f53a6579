//! The stack machine.
//!
//! Fetch/dispatch interpreter over a compiled module. The program
//! counter advances before dispatch; branching instructions overwrite it
//! with `matching index + 1`, which lands execution just past the
//! matching marker (or just past `LOOP` when rewinding).

use std::io::Write;

use goxc_ir::{Instr, IrFunction, Module};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::control::ControlMap;
use crate::{RuntimeError, Value};

/// One pending function activation.
struct Frame<'a> {
    func: &'a IrFunction,
    locals: FxHashMap<String, Value>,
    pc: usize,
    control: ControlMap,
}

/// Outcome of a single dispatch step.
enum Step {
    Continue,
    Finished,
}

/// Stack-machine interpreter over a compiled [`Module`].
///
/// Program output (`PRINTI`/`PRINTB`/`PRINTF`) goes to the supplied
/// writer, so tests can capture it.
pub struct StackMachine<'a, W: Write> {
    module: &'a Module,
    out: W,
    stack: Vec<Value>,
    globals: IndexMap<String, Value>,
    frames: Vec<Frame<'a>>,
    /// Sparse memory image. Unset addresses read as zero.
    memory: FxHashMap<i64, Value>,
    /// Upper bound of the grown address space, moved by `GROW`.
    memory_top: i64,
}

impl<'a, W: Write> StackMachine<'a, W> {
    /// Creates a machine over a module, writing program output to `out`.
    pub fn new(module: &'a Module, out: W) -> Self {
        Self {
            module,
            out,
            stack: Vec::new(),
            globals: IndexMap::new(),
            frames: Vec::new(),
            memory: FxHashMap::default(),
            memory_top: 0,
        }
    }

    /// Runs the module's `main` to completion and returns its result.
    pub fn run(&mut self) -> Result<Value, RuntimeError> {
        for global in self.module.globals.values() {
            self.globals
                .insert(global.name.clone(), Value::zero(global.ty));
        }

        let main = self
            .module
            .function("main")
            .ok_or(RuntimeError::MissingMain)?;
        self.push_frame(main, Vec::new())?;

        loop {
            if let Step::Finished = self.step()? {
                return self.pop("program result");
            }
        }
    }

    /// Executes one instruction of the current frame.
    fn step(&mut self) -> Result<Step, RuntimeError> {
        let frame = self.frames.last_mut().expect("a frame is running");

        // Falling off the end of the code behaves like RET.
        if frame.pc >= frame.func.code.len() {
            return Ok(self.return_frame());
        }

        let instr = frame.func.code[frame.pc].clone();
        frame.pc += 1;

        match instr {
            Instr::ConstI(v) => self.stack.push(Value::Int(v)),
            Instr::ConstF(v) => self.stack.push(Value::Float(v)),

            Instr::AddI => self.binop_int("ADDI", |a, b| Ok(a.wrapping_add(b)))?,
            Instr::SubI => self.binop_int("SUBI", |a, b| Ok(a.wrapping_sub(b)))?,
            Instr::MulI => self.binop_int("MULI", |a, b| Ok(a.wrapping_mul(b)))?,
            Instr::DivI => self.binop_int("DIVI", |a, b| {
                if b == 0 {
                    Err(RuntimeError::DivideByZero)
                } else {
                    Ok(a.wrapping_div(b))
                }
            })?,
            Instr::AndI => self.binop_int("ANDI", |a, b| Ok(a & b))?,
            Instr::OrI => self.binop_int("ORI", |a, b| Ok(a | b))?,
            Instr::LtI => self.binop_int("LTI", |a, b| Ok(i64::from(a < b)))?,
            Instr::LeI => self.binop_int("LEI", |a, b| Ok(i64::from(a <= b)))?,
            Instr::GtI => self.binop_int("GTI", |a, b| Ok(i64::from(a > b)))?,
            Instr::GeI => self.binop_int("GEI", |a, b| Ok(i64::from(a >= b)))?,
            Instr::EqI => self.binop_int("EQI", |a, b| Ok(i64::from(a == b)))?,
            Instr::NeI => self.binop_int("NEI", |a, b| Ok(i64::from(a != b)))?,

            Instr::AddF => self.binop_float("ADDF", |a, b| Value::Float(a + b))?,
            Instr::SubF => self.binop_float("SUBF", |a, b| Value::Float(a - b))?,
            Instr::MulF => self.binop_float("MULF", |a, b| Value::Float(a * b))?,
            Instr::DivF => self.binop_float("DIVF", |a, b| Value::Float(a / b))?,
            Instr::LtF => self.binop_float("LTF", |a, b| Value::Int(i64::from(a < b)))?,
            Instr::LeF => self.binop_float("LEF", |a, b| Value::Int(i64::from(a <= b)))?,
            Instr::GtF => self.binop_float("GTF", |a, b| Value::Int(i64::from(a > b)))?,
            Instr::GeF => self.binop_float("GEF", |a, b| Value::Int(i64::from(a >= b)))?,
            Instr::EqF => self.binop_float("EQF", |a, b| Value::Int(i64::from(a == b)))?,
            Instr::NeF => self.binop_float("NEF", |a, b| Value::Int(i64::from(a != b)))?,

            Instr::ItoF => {
                let v = self.pop_int("ITOF")?;
                self.stack.push(Value::Float(v as f64));
            }
            Instr::FtoI => {
                let v = self.pop_float("FTOI")?;
                self.stack.push(Value::Int(v as i64));
            }

            Instr::PrintI => {
                let v = self.pop("PRINTI")?;
                writeln!(self.out, "{}", v)?;
            }
            Instr::PrintF => {
                let v = self.pop("PRINTF")?;
                writeln!(self.out, "{}", v)?;
            }
            Instr::PrintB => {
                let v = self.pop_int("PRINTB")?;
                let c = char::from_u32(v as u32).unwrap_or(char::REPLACEMENT_CHARACTER);
                write!(self.out, "{}", c)?;
            }

            Instr::PeekI | Instr::PeekB => {
                let addr = self.pop_int("PEEK")?;
                let value = self.memory.get(&addr).copied().unwrap_or(Value::Int(0));
                self.stack.push(value);
            }
            Instr::PeekF => {
                let addr = self.pop_int("PEEKF")?;
                let value = self.memory.get(&addr).copied().unwrap_or(Value::Float(0.0));
                self.stack.push(value);
            }
            Instr::PokeI => {
                let value = self.pop_int("POKEI")?;
                let addr = self.pop_int("POKEI")?;
                self.memory.insert(addr, Value::Int(value));
            }
            Instr::PokeF => {
                let value = self.pop_float("POKEF")?;
                let addr = self.pop_int("POKEF")?;
                self.memory.insert(addr, Value::Float(value));
            }
            Instr::PokeB => {
                let value = self.pop_int("POKEB")?;
                let addr = self.pop_int("POKEB")?;
                self.memory.insert(addr, Value::Int(value & 0xFF));
            }
            Instr::Grow => {
                let amount = self.pop_int("GROW")?;
                self.memory_top = self.memory_top.wrapping_add(amount);
                self.stack.push(Value::Int(self.memory_top));
            }

            Instr::LocalGet(name) => {
                let frame = self.frames.last().expect("a frame is running");
                let value = frame
                    .locals
                    .get(&name)
                    .copied()
                    .ok_or(RuntimeError::UndeclaredLocal(name))?;
                self.stack.push(value);
            }
            Instr::LocalSet(name) => {
                let value = self.pop("LOCAL_SET")?;
                let frame = self.frames.last_mut().expect("a frame is running");
                frame.locals.insert(name, value);
            }
            Instr::GlobalGet(name) => {
                let value = self
                    .globals
                    .get(&name)
                    .copied()
                    .ok_or(RuntimeError::UndeclaredGlobal(name))?;
                self.stack.push(value);
            }
            Instr::GlobalSet(name) => {
                let value = self.pop("GLOBAL_SET")?;
                self.globals.insert(name, value);
            }

            Instr::Call(name) => {
                let func = self
                    .module
                    .function(&name)
                    .ok_or_else(|| RuntimeError::UndefinedFunction(name.clone()))?;
                if func.imported {
                    return Err(RuntimeError::ImportedCall(name));
                }

                // Arguments come off in reverse push order.
                let mut args = Vec::with_capacity(func.arity());
                for _ in 0..func.arity() {
                    args.push(self.pop("CALL")?);
                }
                args.reverse();
                self.push_frame(func, args)?;
            }
            Instr::Ret => return Ok(self.return_frame()),

            Instr::If => {
                let test = self.pop_int("IF")?;
                if test == 0 {
                    self.jump_past_match("IF", "ELSE")?;
                }
            }
            Instr::Else => self.jump_past_match("ELSE", "ENDIF")?,
            Instr::EndIf => {}
            Instr::Loop => {}
            Instr::CBreak => {
                // Exit-on-false: zero leaves the loop.
                let test = self.pop_int("CBREAK")?;
                if test == 0 {
                    self.jump_past_match("CBREAK", "ENDLOOP")?;
                }
            }
            Instr::Continue => self.jump_past_match("CONTINUE", "LOOP")?,
            Instr::EndLoop => self.jump_past_match("ENDLOOP", "LOOP")?,
        }

        Ok(Step::Continue)
    }

    /// Enters a function: fresh locals (declared locals zeroed, then
    /// parameters bound in source order), pc at the start, and the
    /// control-flow table resolved.
    fn push_frame(
        &mut self,
        func: &'a IrFunction,
        args: Vec<Value>,
    ) -> Result<(), RuntimeError> {
        let control = ControlMap::build(&func.code)?;

        let mut locals = FxHashMap::default();
        for (name, ty) in &func.locals {
            locals.insert(name.clone(), Value::zero(*ty));
        }
        for (name, value) in func.param_names.iter().zip(args) {
            locals.insert(name.clone(), value);
        }

        self.frames.push(Frame {
            func,
            locals,
            pc: 0,
            control,
        });
        Ok(())
    }

    /// Unwinds one frame. The call's result stays on the value stack.
    fn return_frame(&mut self) -> Step {
        self.frames.pop();
        if self.frames.is_empty() {
            Step::Finished
        } else {
            Step::Continue
        }
    }

    /// Moves the pc of the current frame one past the marker matching
    /// the instruction just fetched.
    fn jump_past_match(
        &mut self,
        op: &'static str,
        target_name: &'static str,
    ) -> Result<(), RuntimeError> {
        let frame = self.frames.last_mut().expect("a frame is running");
        let index = frame.pc - 1;
        let target = frame
            .control
            .target(index)
            .ok_or(RuntimeError::UnmatchedLabel {
                op,
                target: target_name,
            })?;
        frame.pc = target + 1;
        Ok(())
    }

    fn pop(&mut self, op: &'static str) -> Result<Value, RuntimeError> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow(op))
    }

    fn pop_int(&mut self, op: &'static str) -> Result<i64, RuntimeError> {
        match self.pop(op)? {
            Value::Int(v) => Ok(v),
            Value::Float(_) => Err(RuntimeError::ExpectedInt(op)),
        }
    }

    fn pop_float(&mut self, op: &'static str) -> Result<f64, RuntimeError> {
        match self.pop(op)? {
            Value::Float(v) => Ok(v),
            Value::Int(_) => Err(RuntimeError::ExpectedFloat(op)),
        }
    }

    fn binop_int(
        &mut self,
        op: &'static str,
        apply: impl FnOnce(i64, i64) -> Result<i64, RuntimeError>,
    ) -> Result<(), RuntimeError> {
        let b = self.pop_int(op)?;
        let a = self.pop_int(op)?;
        self.stack.push(Value::Int(apply(a, b)?));
        Ok(())
    }

    fn binop_float(
        &mut self,
        op: &'static str,
        apply: impl FnOnce(f64, f64) -> Value,
    ) -> Result<(), RuntimeError> {
        let b = self.pop_float(op)?;
        let a = self.pop_float(op)?;
        self.stack.push(apply(a, b));
        Ok(())
    }
}
