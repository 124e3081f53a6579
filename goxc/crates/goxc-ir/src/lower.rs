//! AST to IR lowering.
//!
//! Expressions push their value and then their operator; statements chain
//! expression lowerings with variable, control-flow, and call
//! instructions. Opcode selection is typed: the lowerer recomputes each
//! expression's source type from the module's globals, the enclosing
//! function's parameters and locals, and the function signature table,
//! then picks the `I` or `F` variant.
//!
//! Top-level code becomes a synthetic `main`: first the initializers of
//! all directly declared globals in declaration order, then the
//! free-standing top-level statements, then `CONSTI 0; RET`. Every
//! lowered function body gets the same `CONSTI 0; RET` epilogue, so all
//! executable functions end in `RET`.
//!
//! Lowering assumes the program already passed the semantic checker.

use goxc_par::{
    AssignStmt, BinOp, Expr, FuncDecl, Location, PrintStmt, Program, Stmt, TypeName, UnOp,
    VarDecl,
};
use goxc_sem::{check_binop, check_unaryop};
use rustc_hash::FxHashMap;

use crate::ir::{Instr, IrFunction, IrType, Module};

/// Signature entry for the lowerer's function table.
struct FuncSig {
    return_type: TypeName,
}

/// Per-function lowering context: the source types of everything
/// addressable as a local (parameters plus every `var` in the body).
#[derive(Default)]
struct FuncCtx {
    locals: FxHashMap<String, TypeName>,
}

/// Module-wide lowering state.
struct IrGen {
    /// Source types of module globals.
    globals: FxHashMap<String, TypeName>,
    /// Signatures of all declared functions.
    functions: FxHashMap<String, FuncSig>,
}

/// Lowers a validated program into an IR module.
pub fn generate(program: &Program) -> Module {
    let mut gen = IrGen {
        globals: FxHashMap::default(),
        functions: FxHashMap::default(),
    };
    let mut module = Module::new();

    // Register function signatures first so global initializers can call
    // forward-declared functions.
    for stmt in program {
        if let Stmt::Func(decl) = stmt {
            gen.functions.insert(
                decl.name.clone(),
                FuncSig {
                    return_type: decl.return_type,
                },
            );
        }
    }

    // Register every global, including `var` declarations nested inside
    // top-level `if`/`while` bodies; those execute in the global scope.
    gen.collect_globals(program, &mut module);

    let mut main = IrFunction::new("main", Vec::new(), Vec::new(), IrType::I, false);
    let main_ctx = FuncCtx::default();

    // Global initializers, in declaration order.
    for stmt in program {
        if let Stmt::Var(decl) = stmt {
            if let Some(init) = &decl.init {
                gen.lower_expr(init, &mut main, &main_ctx);
                main.emit(Instr::GlobalSet(decl.name.clone()));
            }
        }
    }

    // Free-standing top-level statements; function declarations become
    // their own IR functions.
    let mut user_functions = Vec::new();
    for stmt in program {
        match stmt {
            Stmt::Var(_) => {}
            Stmt::Func(decl) => user_functions.push(gen.lower_function(decl)),
            other => gen.lower_stmt(other, &mut main, &main_ctx),
        }
    }

    main.emit(Instr::ConstI(0));
    main.emit(Instr::Ret);

    module.add_function(main);
    for function in user_functions {
        module.add_function(function);
    }
    module
}

impl IrGen {
    /// Walks the top-level statement tree and declares every `var` it
    /// finds as a module global. Only functions introduce a new scope,
    /// so their bodies are not entered.
    fn collect_globals(&mut self, stmts: &[Stmt], module: &mut Module) {
        for stmt in stmts {
            match stmt {
                Stmt::Var(decl) => {
                    let ty = self.var_type(decl, None);
                    self.globals.insert(decl.name.clone(), ty);
                    module.add_global(decl.name.clone(), IrType::of(ty));
                }
                Stmt::If(stmt) => {
                    self.collect_globals(&stmt.then_branch, module);
                    self.collect_globals(&stmt.else_branch, module);
                }
                Stmt::While(stmt) => self.collect_globals(&stmt.body, module),
                _ => {}
            }
        }
    }

    /// Resolves a declaration's source type: the annotation if present,
    /// otherwise the initializer's type.
    fn var_type(&self, decl: &VarDecl, ctx: Option<&FuncCtx>) -> TypeName {
        if let Some(ty) = decl.ty {
            return ty;
        }
        let empty = FuncCtx::default();
        let ctx = ctx.unwrap_or(&empty);
        decl.init
            .as_ref()
            .map(|init| self.expr_type(init, ctx))
            .unwrap_or(TypeName::Int)
    }

    /// Lowers one user function.
    fn lower_function(&self, decl: &FuncDecl) -> IrFunction {
        let param_names: Vec<String> = decl.params.iter().map(|p| p.name.clone()).collect();
        let param_types: Vec<IrType> = decl.params.iter().map(|p| IrType::of(p.ty)).collect();
        let mut func = IrFunction::new(
            decl.name.clone(),
            param_names,
            param_types,
            IrType::of(decl.return_type),
            decl.imported,
        );

        if decl.imported {
            return func;
        }

        let mut ctx = FuncCtx::default();
        for param in &decl.params {
            ctx.locals.insert(param.name.clone(), param.ty);
        }
        // GoxLang scoping is function-level, so every `var` in the body
        // (however deeply nested in if/while) is one local. Registering
        // them up front keeps local/global selection independent of
        // statement order.
        self.collect_locals(&decl.body, &mut ctx, &mut func);

        for stmt in &decl.body {
            self.lower_stmt(stmt, &mut func, &ctx);
        }

        func.emit(Instr::ConstI(0));
        func.emit(Instr::Ret);
        func
    }

    /// Registers every `var` declared in a function body, in textual
    /// order so later inferences can see earlier locals.
    fn collect_locals(&self, stmts: &[Stmt], ctx: &mut FuncCtx, func: &mut IrFunction) {
        for stmt in stmts {
            match stmt {
                Stmt::Var(decl) => {
                    let ty = self.var_type(decl, Some(ctx));
                    ctx.locals.insert(decl.name.clone(), ty);
                    func.new_local(decl.name.clone(), IrType::of(ty));
                }
                Stmt::If(stmt) => {
                    self.collect_locals(&stmt.then_branch, ctx, func);
                    self.collect_locals(&stmt.else_branch, ctx, func);
                }
                Stmt::While(stmt) => self.collect_locals(&stmt.body, ctx, func),
                _ => {}
            }
        }
    }

    fn lower_stmt(&self, stmt: &Stmt, func: &mut IrFunction, ctx: &FuncCtx) {
        match stmt {
            Stmt::Assign(assign) => self.lower_assignment(assign, func, ctx),
            Stmt::Print(print) => self.lower_print(print, func, ctx),
            Stmt::If(stmt) => {
                self.lower_expr(&stmt.condition, func, ctx);
                func.emit(Instr::If);
                for stmt in &stmt.then_branch {
                    self.lower_stmt(stmt, func, ctx);
                }
                func.emit(Instr::Else);
                for stmt in &stmt.else_branch {
                    self.lower_stmt(stmt, func, ctx);
                }
                func.emit(Instr::EndIf);
            }
            Stmt::While(stmt) => {
                // CBREAK exits when the test is false, so the condition
                // feeds it directly.
                func.emit(Instr::Loop);
                self.lower_expr(&stmt.condition, func, ctx);
                func.emit(Instr::CBreak);
                for stmt in &stmt.body {
                    self.lower_stmt(stmt, func, ctx);
                }
                func.emit(Instr::EndLoop);
            }
            Stmt::Break { .. } => {
                // Unconditional exit through exit-on-false CBREAK.
                func.emit(Instr::ConstI(0));
                func.emit(Instr::CBreak);
            }
            Stmt::Continue { .. } => func.emit(Instr::Continue),
            Stmt::Return(stmt) => {
                self.lower_expr(&stmt.expr, func, ctx);
                func.emit(Instr::Ret);
            }
            Stmt::Var(decl) => {
                // Local declaration: the slot is already registered; emit
                // the initializer in place. (Top-level declarations are
                // handled by the synthetic main's prologue and never
                // reach here directly, but a `var` nested in a top-level
                // if/while initializes its global here.)
                if let Some(init) = &decl.init {
                    self.lower_expr(init, func, ctx);
                    func.emit(self.set_instr(&decl.name, ctx));
                }
            }
            Stmt::Func(_) => {
                // Function declarations only exist at top level (the
                // checker rejects nested ones) and are lowered by the
                // module pass, never inline.
            }
            Stmt::Expr(stmt) => {
                self.lower_expr(&stmt.expr, func, ctx);
            }
        }
    }

    fn lower_assignment(&self, assign: &AssignStmt, func: &mut IrFunction, ctx: &FuncCtx) {
        match &assign.target {
            Location::Named { name, .. } => {
                self.lower_expr(&assign.value, func, ctx);
                func.emit(self.set_instr(name, ctx));
            }
            Location::Memory { address, .. } => {
                // POKEI pops the value, then the address: address first,
                // value second.
                self.lower_expr(address, func, ctx);
                self.lower_expr(&assign.value, func, ctx);
                func.emit(Instr::PokeI);
            }
        }
    }

    fn lower_print(&self, print: &PrintStmt, func: &mut IrFunction, ctx: &FuncCtx) {
        self.lower_expr(&print.expr, func, ctx);
        match self.expr_type(&print.expr, ctx) {
            TypeName::Char => func.emit(Instr::PrintB),
            TypeName::Float => func.emit(Instr::PrintF),
            TypeName::Int | TypeName::Bool => func.emit(Instr::PrintI),
        }
    }

    fn lower_expr(&self, expr: &Expr, func: &mut IrFunction, ctx: &FuncCtx) {
        match expr {
            Expr::Int(v) => func.emit(Instr::ConstI(*v)),
            Expr::Float(v) => func.emit(Instr::ConstF(*v)),
            Expr::Char(c) => func.emit(Instr::ConstI(*c as i64)),
            Expr::Bool(b) => func.emit(Instr::ConstI(i64::from(*b))),
            Expr::Binary(binary) => {
                let operand_ty = self.expr_type(&binary.left, ctx);
                self.lower_expr(&binary.left, func, ctx);
                self.lower_expr(&binary.right, func, ctx);
                func.emit(binop_instr(binary.op, IrType::of(operand_ty)));
            }
            Expr::Unary(unary) => {
                self.lower_expr(&unary.expr, func, ctx);
                match unary.op {
                    UnOp::Pos => {}
                    UnOp::Neg => match IrType::of(self.expr_type(&unary.expr, ctx)) {
                        IrType::I => {
                            func.emit(Instr::ConstI(-1));
                            func.emit(Instr::MulI);
                        }
                        IrType::F => {
                            func.emit(Instr::ConstF(-1.0));
                            func.emit(Instr::MulF);
                        }
                    },
                    UnOp::Not => {
                        func.emit(Instr::ConstI(-1));
                        func.emit(Instr::MulI);
                    }
                    UnOp::Grow => func.emit(Instr::Grow),
                }
            }
            Expr::Cast(cast) => {
                self.lower_expr(&cast.expr, func, ctx);
                let from = IrType::of(self.expr_type(&cast.expr, ctx));
                let to = IrType::of(cast.target);
                match (from, to) {
                    (IrType::I, IrType::F) => func.emit(Instr::ItoF),
                    (IrType::F, IrType::I) => func.emit(Instr::FtoI),
                    // Same representation class: reinterpretation only.
                    _ => {}
                }
            }
            Expr::Call(call) => {
                for arg in &call.args {
                    self.lower_expr(arg, func, ctx);
                }
                func.emit(Instr::Call(call.name.clone()));
            }
            Expr::Location(location) => match location.as_ref() {
                Location::Named { name, .. } => func.emit(self.get_instr(name, ctx)),
                Location::Memory { address, .. } => {
                    self.lower_expr(address, func, ctx);
                    func.emit(Instr::PeekI);
                }
            },
        }
    }

    /// Read instruction for a name: local if the enclosing function
    /// declares it, otherwise global.
    fn get_instr(&self, name: &str, ctx: &FuncCtx) -> Instr {
        if ctx.locals.contains_key(name) {
            Instr::LocalGet(name.to_string())
        } else {
            Instr::GlobalGet(name.to_string())
        }
    }

    /// Write instruction for a name, same selection as `get_instr`.
    fn set_instr(&self, name: &str, ctx: &FuncCtx) -> Instr {
        if ctx.locals.contains_key(name) {
            Instr::LocalSet(name.to_string())
        } else {
            Instr::GlobalSet(name.to_string())
        }
    }

    /// Recomputes an expression's source type. Mirrors the semantic
    /// checker's rules; lowering only runs on checked programs, so
    /// failures cannot happen and default to int.
    fn expr_type(&self, expr: &Expr, ctx: &FuncCtx) -> TypeName {
        match expr {
            Expr::Int(_) => TypeName::Int,
            Expr::Float(_) => TypeName::Float,
            Expr::Char(_) => TypeName::Char,
            Expr::Bool(_) => TypeName::Bool,
            Expr::Binary(binary) => {
                let left = self.expr_type(&binary.left, ctx);
                let right = self.expr_type(&binary.right, ctx);
                check_binop(binary.op, left, right).unwrap_or(TypeName::Int)
            }
            Expr::Unary(unary) => {
                let ty = self.expr_type(&unary.expr, ctx);
                check_unaryop(unary.op, ty).unwrap_or(TypeName::Int)
            }
            Expr::Cast(cast) => cast.target,
            Expr::Call(call) => self
                .functions
                .get(&call.name)
                .map(|sig| sig.return_type)
                .unwrap_or(TypeName::Int),
            Expr::Location(location) => match location.as_ref() {
                Location::Named { name, .. } => ctx
                    .locals
                    .get(name)
                    .or_else(|| self.globals.get(name))
                    .copied()
                    .unwrap_or(TypeName::Int),
                Location::Memory { .. } => TypeName::Int,
            },
        }
    }
}

/// Opcode for a binary operator over the given operand class. Char and
/// bool operands travel as integers, so they reuse the `I` variants.
fn binop_instr(op: BinOp, operand: IrType) -> Instr {
    match (op, operand) {
        (BinOp::Add, IrType::I) => Instr::AddI,
        (BinOp::Sub, IrType::I) => Instr::SubI,
        (BinOp::Mul, IrType::I) => Instr::MulI,
        (BinOp::Div, IrType::I) => Instr::DivI,
        (BinOp::Lt, IrType::I) => Instr::LtI,
        (BinOp::Le, IrType::I) => Instr::LeI,
        (BinOp::Gt, IrType::I) => Instr::GtI,
        (BinOp::Ge, IrType::I) => Instr::GeI,
        (BinOp::Eq, IrType::I) => Instr::EqI,
        (BinOp::Ne, IrType::I) => Instr::NeI,
        (BinOp::Add, IrType::F) => Instr::AddF,
        (BinOp::Sub, IrType::F) => Instr::SubF,
        (BinOp::Mul, IrType::F) => Instr::MulF,
        (BinOp::Div, IrType::F) => Instr::DivF,
        (BinOp::Lt, IrType::F) => Instr::LtF,
        (BinOp::Le, IrType::F) => Instr::LeF,
        (BinOp::Gt, IrType::F) => Instr::GtF,
        (BinOp::Ge, IrType::F) => Instr::GeF,
        (BinOp::Eq, IrType::F) => Instr::EqF,
        (BinOp::Ne, IrType::F) => Instr::NeF,
        // Logical operators only type-check on bools, which are I-class
        // 0/1 values; bitwise AND/OR implements them exactly.
        (BinOp::And, _) => Instr::AndI,
        (BinOp::Or, _) => Instr::OrI,
    }
}
