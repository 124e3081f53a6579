//! IR module model.
//!
//! A [`Module`] owns the compiled artifact: named globals and named
//! functions, both in declaration order. Each [`IrFunction`] is a flat,
//! ordered instruction list over a two-type value model: `I` covers int,
//! bool, and char; `F` covers float.

use indexmap::IndexMap;
use std::fmt;

use goxc_par::TypeName;

/// Low-level IR value type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IrType {
    /// Integer class (int, bool, char)
    I,
    /// Float class
    F,
}

impl IrType {
    /// Maps a source type to its IR representation.
    pub fn of(ty: TypeName) -> IrType {
        match ty {
            TypeName::Float => IrType::F,
            TypeName::Int | TypeName::Char | TypeName::Bool => IrType::I,
        }
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::I => f.write_str("I"),
            IrType::F => f.write_str("F"),
        }
    }
}

/// A module-level global variable.
#[derive(Clone, Debug)]
pub struct IrGlobal {
    pub name: String,
    pub ty: IrType,
}

/// One stack-machine instruction.
///
/// Binary operators pop two values and push one. `PEEK*` pops an address
/// and pushes the value stored there; `POKE*` pops a value, then an
/// address (the address is pushed first, the value second).
#[derive(Clone, Debug, PartialEq)]
pub enum Instr {
    // Integer operations
    ConstI(i64),
    AddI,
    SubI,
    MulI,
    DivI,
    AndI,
    OrI,
    LtI,
    LeI,
    GtI,
    GeI,
    EqI,
    NeI,
    PrintI,
    PeekI,
    PokeI,
    ItoF,

    // Float operations
    ConstF(f64),
    AddF,
    SubF,
    MulF,
    DivF,
    LtF,
    LeF,
    GtF,
    GeF,
    EqF,
    NeF,
    PrintF,
    PeekF,
    PokeF,
    FtoI,

    // Byte operations (values travel as integers)
    PrintB,
    PeekB,
    PokeB,

    // Variable access
    LocalGet(String),
    LocalSet(String),
    GlobalGet(String),
    GlobalSet(String),

    // Calls and structured control flow
    Call(String),
    Ret,
    If,
    Else,
    EndIf,
    Loop,
    CBreak,
    Continue,
    EndLoop,

    // Memory
    Grow,
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::ConstI(v) => write!(f, "CONSTI {}", v),
            Instr::AddI => f.write_str("ADDI"),
            Instr::SubI => f.write_str("SUBI"),
            Instr::MulI => f.write_str("MULI"),
            Instr::DivI => f.write_str("DIVI"),
            Instr::AndI => f.write_str("ANDI"),
            Instr::OrI => f.write_str("ORI"),
            Instr::LtI => f.write_str("LTI"),
            Instr::LeI => f.write_str("LEI"),
            Instr::GtI => f.write_str("GTI"),
            Instr::GeI => f.write_str("GEI"),
            Instr::EqI => f.write_str("EQI"),
            Instr::NeI => f.write_str("NEI"),
            Instr::PrintI => f.write_str("PRINTI"),
            Instr::PeekI => f.write_str("PEEKI"),
            Instr::PokeI => f.write_str("POKEI"),
            Instr::ItoF => f.write_str("ITOF"),
            Instr::ConstF(v) => write!(f, "CONSTF {:?}", v),
            Instr::AddF => f.write_str("ADDF"),
            Instr::SubF => f.write_str("SUBF"),
            Instr::MulF => f.write_str("MULF"),
            Instr::DivF => f.write_str("DIVF"),
            Instr::LtF => f.write_str("LTF"),
            Instr::LeF => f.write_str("LEF"),
            Instr::GtF => f.write_str("GTF"),
            Instr::GeF => f.write_str("GEF"),
            Instr::EqF => f.write_str("EQF"),
            Instr::NeF => f.write_str("NEF"),
            Instr::PrintF => f.write_str("PRINTF"),
            Instr::PeekF => f.write_str("PEEKF"),
            Instr::PokeF => f.write_str("POKEF"),
            Instr::FtoI => f.write_str("FTOI"),
            Instr::PrintB => f.write_str("PRINTB"),
            Instr::PeekB => f.write_str("PEEKB"),
            Instr::PokeB => f.write_str("POKEB"),
            Instr::LocalGet(name) => write!(f, "LOCAL_GET {}", name),
            Instr::LocalSet(name) => write!(f, "LOCAL_SET {}", name),
            Instr::GlobalGet(name) => write!(f, "GLOBAL_GET {}", name),
            Instr::GlobalSet(name) => write!(f, "GLOBAL_SET {}", name),
            Instr::Call(name) => write!(f, "CALL {}", name),
            Instr::Ret => f.write_str("RET"),
            Instr::If => f.write_str("IF"),
            Instr::Else => f.write_str("ELSE"),
            Instr::EndIf => f.write_str("ENDIF"),
            Instr::Loop => f.write_str("LOOP"),
            Instr::CBreak => f.write_str("CBREAK"),
            Instr::Continue => f.write_str("CONTINUE"),
            Instr::EndLoop => f.write_str("ENDLOOP"),
            Instr::Grow => f.write_str("GROW"),
        }
    }
}

/// One compiled function: parameters, locals, and the instruction list.
///
/// `param_names` and `param_types` are parallel. An `imported` function
/// has no executable code.
#[derive(Clone, Debug)]
pub struct IrFunction {
    pub name: String,
    pub param_names: Vec<String>,
    pub param_types: Vec<IrType>,
    pub return_type: IrType,
    pub imported: bool,
    pub locals: IndexMap<String, IrType>,
    pub code: Vec<Instr>,
}

impl IrFunction {
    pub fn new(
        name: impl Into<String>,
        param_names: Vec<String>,
        param_types: Vec<IrType>,
        return_type: IrType,
        imported: bool,
    ) -> Self {
        Self {
            name: name.into(),
            param_names,
            param_types,
            return_type,
            imported,
            locals: IndexMap::new(),
            code: Vec::new(),
        }
    }

    /// Registers a local variable.
    pub fn new_local(&mut self, name: impl Into<String>, ty: IrType) {
        self.locals.insert(name.into(), ty);
    }

    /// Appends one instruction.
    pub fn emit(&mut self, instr: Instr) {
        self.code.push(instr);
    }

    /// Number of parameters (the arity used by `CALL`).
    pub fn arity(&self) -> usize {
        self.param_names.len()
    }
}

impl fmt::Display for IrFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "func {}(", self.name)?;
        for (i, (name, ty)) in self.param_names.iter().zip(&self.param_types).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, ty)?;
        }
        write!(f, ") -> {}", self.return_type)?;
        if self.imported {
            return writeln!(f, " [imported]");
        }
        writeln!(f)?;

        for (name, ty) in &self.locals {
            writeln!(f, "    local {}: {}", name, ty)?;
        }
        for instr in &self.code {
            writeln!(f, "    {}", instr)?;
        }
        Ok(())
    }
}

/// The compiled artifact: globals plus functions, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Module {
    pub globals: IndexMap<String, IrGlobal>,
    pub functions: IndexMap<String, IrFunction>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a module-level global.
    pub fn add_global(&mut self, name: impl Into<String>, ty: IrType) {
        let name = name.into();
        self.globals.insert(
            name.clone(),
            IrGlobal { name, ty },
        );
    }

    /// Adds a compiled function, keyed by name.
    pub fn add_function(&mut self, function: IrFunction) {
        self.functions.insert(function.name.clone(), function);
    }

    /// Looks up a function by name.
    pub fn function(&self, name: &str) -> Option<&IrFunction> {
        self.functions.get(name)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for global in self.globals.values() {
            writeln!(f, "global {}: {}", global.name, global.ty)?;
        }
        for function in self.functions.values() {
            write!(f, "{}", function)?;
        }
        Ok(())
    }
}
