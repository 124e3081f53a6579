//! Two-pass semantic checker.
//!
//! Pass 1 hoists top-level declarations into the global scope: every
//! function signature and every explicitly typed global. This is what
//! makes forward references legal. Pass 2 walks the whole program,
//! type-checking statements and expressions; globals declared without a
//! type annotation get their type inferred from the initializer here.
//!
//! The checker never stops early: every problem it can find lands in the
//! diagnostic handler, and the driver skips IR generation if any did.

use goxc_par::{
    AssignStmt, CallExpr, Expr, FuncDecl, IfStmt, Location, Program, ReturnStmt, Stmt, TypeName,
    VarDecl, WhileStmt,
};
use goxc_util::Handler;

use crate::scope::{ScopeTree, Symbol};
use crate::types::{cast_allowed, check_binop, check_unaryop};

/// The function whose body is currently being checked.
struct CurrentFunction {
    name: String,
    return_type: TypeName,
}

/// Semantic checker. Create one per program via [`Checker::check`].
pub struct Checker<'a> {
    handler: &'a Handler,
    scopes: ScopeTree,
    current_function: Option<CurrentFunction>,
    /// Number of `while` statements textually enclosing the current
    /// statement, for validating `break`/`continue`.
    loop_depth: u32,
    /// Line of the statement being checked, used for expression
    /// diagnostics that have no better anchor.
    stmt_line: u32,
}

impl<'a> Checker<'a> {
    /// Runs both passes over a program, reporting into `handler`.
    pub fn check(program: &Program, handler: &'a Handler) {
        let mut checker = Checker {
            handler,
            scopes: ScopeTree::new(),
            current_function: None,
            loop_depth: 0,
            stmt_line: 0,
        };

        checker.hoist_declarations(program);

        for stmt in program {
            checker.check_stmt(stmt);
        }
    }

    /// Pass 1: register top-level functions and explicitly typed globals
    /// so later statements can reference them before their declaration.
    /// Globals that need type inference are registered during pass 2,
    /// once their initializer has been typed.
    fn hoist_declarations(&mut self, program: &Program) {
        for stmt in program {
            match stmt {
                Stmt::Func(decl) => {
                    self.scopes.define(
                        decl.name.clone(),
                        Symbol::Func {
                            params: decl.params.iter().map(|p| p.ty).collect(),
                            return_type: decl.return_type,
                            imported: decl.imported,
                        },
                    );
                }
                Stmt::Var(decl) => {
                    if let Some(ty) = decl.ty {
                        self.scopes.define(
                            decl.name.clone(),
                            Symbol::Var {
                                ty,
                                is_const: decl.is_const,
                            },
                        );
                    }
                }
                _ => {}
            }
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign(assign) => self.check_assignment(assign),
            Stmt::Print(print) => {
                self.stmt_line = print.line;
                self.expr_type(&print.expr);
            }
            Stmt::If(stmt) => self.check_if(stmt),
            Stmt::While(stmt) => self.check_while(stmt),
            Stmt::Break { line } => {
                if self.loop_depth == 0 {
                    self.handler.error_at(*line, "'break' outside of a loop");
                }
            }
            Stmt::Continue { line } => {
                if self.loop_depth == 0 {
                    self.handler.error_at(*line, "'continue' outside of a loop");
                }
            }
            Stmt::Return(stmt) => self.check_return(stmt),
            Stmt::Var(decl) => self.check_var_decl(decl),
            Stmt::Func(decl) => self.check_func_decl(decl),
            Stmt::Expr(stmt) => {
                self.stmt_line = stmt.line;
                self.expr_type(&stmt.expr);
            }
        }
    }

    fn check_assignment(&mut self, assign: &AssignStmt) {
        self.stmt_line = assign.line;
        match &assign.target {
            Location::Named { name, line } => {
                let target_ty = match self.scopes.resolve(name) {
                    None => {
                        self.handler
                            .error_at(*line, format!("undeclared variable '{}'", name));
                        None
                    }
                    Some(Symbol::Var { is_const: true, .. }) | Some(Symbol::Param { .. }) => {
                        self.handler.error_at(
                            *line,
                            format!("cannot assign to constant or parameter '{}'", name),
                        );
                        None
                    }
                    Some(Symbol::Func { .. }) => {
                        self.handler
                            .error_at(*line, format!("'{}' is a function, not a variable", name));
                        None
                    }
                    Some(Symbol::Var { ty, is_const: false }) => Some(*ty),
                };

                let value_ty = self.expr_type(&assign.value);
                if let (Some(target), Some(value)) = (target_ty, value_ty) {
                    if target != value {
                        self.handler.error_at(
                            *line,
                            format!("cannot assign type '{}' to '{}'", value, target),
                        );
                    }
                }
            }
            Location::Memory { address, line } => {
                if let Some(ty) = self.expr_type(address) {
                    if ty != TypeName::Int {
                        self.handler.error_at(
                            *line,
                            format!("memory address must be int, found '{}'", ty),
                        );
                    }
                }
                if let Some(ty) = self.expr_type(&assign.value) {
                    if ty != TypeName::Int {
                        self.handler.error_at(
                            *line,
                            format!("memory write value must be int, found '{}'", ty),
                        );
                    }
                }
            }
        }
    }

    fn check_if(&mut self, stmt: &IfStmt) {
        self.stmt_line = stmt.line;
        if let Some(ty) = self.expr_type(&stmt.condition) {
            if ty != TypeName::Bool {
                self.handler.error_at(
                    stmt.line,
                    format!("if condition must be bool, found '{}'", ty),
                );
            }
        }
        for stmt in &stmt.then_branch {
            self.check_stmt(stmt);
        }
        for stmt in &stmt.else_branch {
            self.check_stmt(stmt);
        }
    }

    fn check_while(&mut self, stmt: &WhileStmt) {
        self.stmt_line = stmt.line;
        if let Some(ty) = self.expr_type(&stmt.condition) {
            if ty != TypeName::Bool {
                self.handler.error_at(
                    stmt.line,
                    format!("while condition must be bool, found '{}'", ty),
                );
            }
        }
        self.loop_depth += 1;
        for stmt in &stmt.body {
            self.check_stmt(stmt);
        }
        self.loop_depth -= 1;
    }

    fn check_return(&mut self, stmt: &ReturnStmt) {
        self.stmt_line = stmt.line;
        let expr_ty = self.expr_type(&stmt.expr);

        let Some(function) = &self.current_function else {
            self.handler
                .error_at(stmt.line, "'return' outside of a function");
            return;
        };

        if let Some(ty) = expr_ty {
            if ty != function.return_type {
                self.handler.error_at(
                    stmt.line,
                    format!(
                        "function '{}' must return '{}', but returns '{}'",
                        function.name, function.return_type, ty
                    ),
                );
            }
        }
    }

    /// Validates a declaration and binds it in the current scope. The
    /// declared type and the initializer must agree; with no declared
    /// type the initializer's type is inferred.
    fn check_var_decl(&mut self, decl: &VarDecl) {
        self.stmt_line = decl.line;

        if decl.is_const && decl.init.is_none() {
            self.handler.error_at(
                decl.line,
                format!("constant '{}' must have an initializer", decl.name),
            );
        }

        let init_ty = decl.init.as_ref().and_then(|init| self.expr_type(init));

        let resolved = match (decl.ty, &decl.init, init_ty) {
            (Some(declared), Some(_), Some(init)) => {
                if declared != init {
                    self.handler.error_at(
                        decl.line,
                        format!(
                            "incompatible type in initialization of '{}': declared '{}', found '{}'",
                            decl.name, declared, init
                        ),
                    );
                }
                Some(declared)
            }
            // Initializer failed to type; the error is already reported.
            (Some(declared), _, _) => Some(declared),
            (None, Some(_), Some(init)) => Some(init),
            (None, Some(_), None) => None,
            (None, None, _) => {
                self.handler.error_at(
                    decl.line,
                    format!(
                        "cannot determine type of '{}': no type annotation or initializer",
                        decl.name
                    ),
                );
                None
            }
        };

        if let Some(ty) = resolved {
            self.scopes.define(
                decl.name.clone(),
                Symbol::Var {
                    ty,
                    is_const: decl.is_const,
                },
            );
        }
    }

    /// Checks a function body in a fresh child scope holding the
    /// parameters. `return` statements are validated against the declared
    /// return type; the loop counter does not cross the function
    /// boundary.
    fn check_func_decl(&mut self, decl: &FuncDecl) {
        self.stmt_line = decl.line;

        if self.current_function.is_some() {
            self.handler.error_at(
                decl.line,
                format!(
                    "function '{}' declared inside a function; functions must be top-level",
                    decl.name
                ),
            );
        }

        // Top-level functions are already hoisted; defining again is
        // harmless.
        self.scopes.define(
            decl.name.clone(),
            Symbol::Func {
                params: decl.params.iter().map(|p| p.ty).collect(),
                return_type: decl.return_type,
                imported: decl.imported,
            },
        );

        self.scopes.enter_scope();
        for param in &decl.params {
            self.scopes
                .define(param.name.clone(), Symbol::Param { ty: param.ty });
        }

        let previous_function = self.current_function.replace(CurrentFunction {
            name: decl.name.clone(),
            return_type: decl.return_type,
        });
        let previous_depth = std::mem::replace(&mut self.loop_depth, 0);

        for stmt in &decl.body {
            self.check_stmt(stmt);
        }

        self.loop_depth = previous_depth;
        self.current_function = previous_function;
        self.scopes.exit_scope();
    }

    /// Types an expression, reporting problems as it goes. Returns `None`
    /// when the type could not be determined; the cause has already been
    /// reported, so callers stay quiet about `None`.
    fn expr_type(&mut self, expr: &Expr) -> Option<TypeName> {
        match expr {
            Expr::Int(_) => Some(TypeName::Int),
            Expr::Float(_) => Some(TypeName::Float),
            Expr::Char(_) => Some(TypeName::Char),
            Expr::Bool(_) => Some(TypeName::Bool),
            Expr::Binary(binary) => {
                let left = self.expr_type(&binary.left);
                let right = self.expr_type(&binary.right);
                let (left, right) = (left?, right?);
                match check_binop(binary.op, left, right) {
                    Some(result) => Some(result),
                    None => {
                        self.handler.error_at(
                            self.stmt_line,
                            format!(
                                "invalid binary operation: '{}' {} '{}'",
                                left, binary.op, right
                            ),
                        );
                        None
                    }
                }
            }
            Expr::Unary(unary) => {
                let ty = self.expr_type(&unary.expr)?;
                match check_unaryop(unary.op, ty) {
                    Some(result) => Some(result),
                    None => {
                        self.handler.error_at(
                            self.stmt_line,
                            format!("invalid unary operation: {} '{}'", unary.op, ty),
                        );
                        None
                    }
                }
            }
            Expr::Cast(cast) => {
                if let Some(from) = self.expr_type(&cast.expr) {
                    if !cast_allowed(from, cast.target) {
                        self.handler.error_at(
                            self.stmt_line,
                            format!("cannot cast '{}' to '{}'", from, cast.target),
                        );
                    }
                }
                Some(cast.target)
            }
            Expr::Call(call) => self.check_call(call),
            Expr::Location(location) => match location.as_ref() {
                Location::Named { name, line } => match self.scopes.resolve(name) {
                    None => {
                        self.handler
                            .error_at(*line, format!("undeclared name '{}'", name));
                        None
                    }
                    Some(symbol) => match symbol.value_type() {
                        Some(ty) => Some(ty),
                        None => {
                            self.handler.error_at(
                                *line,
                                format!("'{}' is a function, not a variable", name),
                            );
                            None
                        }
                    },
                },
                Location::Memory { address, line } => {
                    if let Some(ty) = self.expr_type(address) {
                        if ty != TypeName::Int {
                            self.handler.error_at(
                                *line,
                                format!("memory address must be int, found '{}'", ty),
                            );
                        }
                    }
                    // Raw memory reads are integer-valued.
                    Some(TypeName::Int)
                }
            },
        }
    }

    fn check_call(&mut self, call: &CallExpr) -> Option<TypeName> {
        let (params, return_type) = match self.scopes.resolve(&call.name) {
            None => {
                self.handler
                    .error_at(call.line, format!("undefined function '{}'", call.name));
                return None;
            }
            Some(Symbol::Func {
                params,
                return_type,
                ..
            }) => (params.clone(), *return_type),
            Some(_) => {
                self.handler
                    .error_at(call.line, format!("'{}' is not a function", call.name));
                return None;
            }
        };

        if call.args.len() != params.len() {
            self.handler.error_at(
                call.line,
                format!(
                    "wrong number of arguments to '{}': expected {}, found {}",
                    call.name,
                    params.len(),
                    call.args.len()
                ),
            );
            return Some(return_type);
        }

        for (index, (arg, param_ty)) in call.args.iter().zip(&params).enumerate() {
            if let Some(arg_ty) = self.expr_type(arg) {
                if arg_ty != *param_ty {
                    self.handler.error_at(
                        call.line,
                        format!(
                            "argument {} to '{}' must be '{}', found '{}'",
                            index + 1,
                            call.name,
                            param_ty,
                            arg_ty
                        ),
                    );
                }
            }
        }

        Some(return_type)
    }
}
