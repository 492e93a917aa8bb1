//! Stack-machine bytecode for Horner trees.
//!
//! A [`Program`] is a post-order linearization of a [`Horner`] tree. It is
//! compiled once and then evaluated many times against different argument
//! vectors without walking the tree or allocating beyond the reusable stack.
//!
//! Two compilers exist:
//! - [`Program::value`] evaluates the polynomial itself.
//! - [`Program::derivative`] evaluates a derivative of the polynomial. The
//!   product rule is applied while emitting code, so no differentiated
//!   polynomial is ever materialized.
//!
//! # Stack Depth Tracking
//!
//! The compiler tracks the stack depth of every emitted instruction, so the
//! evaluator can size its stack exactly once per program.

use std::fmt;

use dashu::integer::IBig;

use crate::horner::Horner;
use crate::monomial::Var;
use crate::polynomial::Polynomial;
use crate::term::coefficient_to_f64;

/// A single stack-machine instruction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Instruction {
    /// Push a constant.
    Const(f64),
    /// Push `args[var]^power`.
    Load {
        /// Variable index.
        var: Var,
        /// Non-negative integer power.
        power: u32,
    },
    /// Push `args[slot]`, the derivative value paired with a variable.
    Der {
        /// Argument slot holding the derivative.
        slot: Var,
    },
    /// Pop two values, push their product.
    Mul,
    /// Pop two values, push their sum.
    Add,
}

/// Which derivative a derivative program computes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Differentiation {
    /// Partial derivative with respect to one variable.
    Partial(Var),
    /// Total derivative `Σ_v ∂P/∂x_v · args[v + shadow_offset]`.
    ///
    /// Mirrors [`Polynomial::total_derivative`] with the same offset.
    Total {
        /// Distance between a variable and its derivative slot.
        shadow_offset: Var,
    },
}

/// A compiled polynomial evaluator.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    instructions: Vec<Instruction>,
    max_stack: usize,
}

/// Emission state: instructions plus running stack depth.
#[derive(Default)]
struct Emitter {
    instructions: Vec<Instruction>,
    depth: usize,
    max_stack: usize,
}

impl Emitter {
    fn push(&mut self, instr: Instruction) {
        self.instructions.push(instr);
        self.depth += 1;
        self.max_stack = self.max_stack.max(self.depth);
    }

    fn combine(&mut self, instr: Instruction) {
        debug_assert!(self.depth >= 2, "binary instruction on short stack");
        self.instructions.push(instr);
        self.depth -= 1;
    }

    fn value(&mut self, node: &Horner) {
        match node {
            Horner::Constant(c) => self.push(Instruction::Const(coefficient_to_f64(c))),
            Horner::Node {
                var,
                power,
                factor,
                left,
                right,
            } => {
                self.push(Instruction::Load {
                    var: *var,
                    power: *power,
                });
                if *factor != IBig::ONE {
                    self.push(Instruction::Const(coefficient_to_f64(factor)));
                    self.combine(Instruction::Mul);
                }
                if let Some(left) = left {
                    self.value(left);
                    self.combine(Instruction::Mul);
                }
                if let Some(right) = right {
                    self.value(right);
                    self.combine(Instruction::Add);
                }
            }
        }
    }

    /// Emits code for the derivative of `node`.
    ///
    /// Returns false (and emits nothing) when the derivative is identically
    /// zero.
    ///
    /// `d/dt [f * x^p * L + R] = f * p * x^(p-1) * dx * L + f * x^p * dL + dR`
    fn derivative(&mut self, node: &Horner, wrt: Differentiation) -> bool {
        let Horner::Node {
            var,
            power,
            factor,
            left,
            right,
        } = node
        else {
            return false;
        };

        let mut pushed = false;

        let direct = match wrt {
            Differentiation::Partial(x) => *var == x,
            Differentiation::Total { .. } => true,
        };
        if direct {
            self.push(Instruction::Const(coefficient_to_f64(&(factor * IBig::from(*power)))));
            if *power > 1 {
                self.push(Instruction::Load {
                    var: *var,
                    power: *power - 1,
                });
                self.combine(Instruction::Mul);
            }
            if let Differentiation::Total { shadow_offset } = wrt {
                self.push(Instruction::Der {
                    slot: *var + shadow_offset,
                });
                self.combine(Instruction::Mul);
            }
            if let Some(left) = left {
                self.value(left);
                self.combine(Instruction::Mul);
            }
            pushed = true;
        }

        if let Some(left) = left {
            if self.derivative(left, wrt) {
                self.push(Instruction::Load {
                    var: *var,
                    power: *power,
                });
                self.combine(Instruction::Mul);
                if *factor != IBig::ONE {
                    self.push(Instruction::Const(coefficient_to_f64(factor)));
                    self.combine(Instruction::Mul);
                }
                if pushed {
                    self.combine(Instruction::Add);
                }
                pushed = true;
            }
        }

        if let Some(right) = right {
            if self.derivative(right, wrt) {
                if pushed {
                    self.combine(Instruction::Add);
                }
                pushed = true;
            }
        }

        pushed
    }

    fn finish(mut self) -> Program {
        if self.instructions.is_empty() {
            self.push(Instruction::Const(0.0));
        }
        debug_assert_eq!(self.depth, 1);
        Program {
            instructions: self.instructions,
            max_stack: self.max_stack,
        }
    }
}

impl Program {
    /// Compiles the value program of a Horner tree.
    ///
    /// `None` (the zero polynomial) compiles to a program returning 0.
    #[must_use]
    pub fn value(tree: Option<&Horner>) -> Self {
        let mut emitter = Emitter::default();
        if let Some(tree) = tree {
            emitter.value(tree);
        }
        emitter.finish()
    }

    /// Compiles a derivative program of a Horner tree.
    #[must_use]
    pub fn derivative(tree: Option<&Horner>, wrt: Differentiation) -> Self {
        let mut emitter = Emitter::default();
        if let Some(tree) = tree {
            emitter.derivative(tree, wrt);
        }
        emitter.finish()
    }

    /// Factorizes a polynomial and compiles its value program.
    #[must_use]
    pub fn compile(p: &Polynomial) -> Self {
        let tree = Horner::factorize(p);
        let program = Self::value(tree.as_ref());
        tracing::trace!(
            target: "leibniz::bytecode",
            terms = p.len(),
            nodes = tree.as_ref().map_or(0, Horner::size),
            instructions = program.len(),
            "polynomial_compiled"
        );
        program
    }

    /// Returns the instruction list.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Returns the number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    ///
    /// Compiled programs always have at least one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns the maximum stack depth reached during evaluation.
    #[must_use]
    pub const fn max_stack(&self) -> usize {
        self.max_stack
    }

    /// Evaluates the program with a freshly allocated stack.
    #[must_use]
    pub fn eval(&self, args: &[f64]) -> f64 {
        let mut stack = Vec::with_capacity(self.max_stack);
        self.eval_with(args, &mut stack)
    }

    /// Evaluates the program reusing `stack` as scratch space.
    ///
    /// # Panics
    ///
    /// Panics if a variable or derivative slot is out of range for `args`.
    pub fn eval_with(&self, args: &[f64], stack: &mut Vec<f64>) -> f64 {
        stack.clear();
        stack.reserve(self.max_stack);

        for instr in &self.instructions {
            match *instr {
                Instruction::Const(c) => stack.push(c),
                Instruction::Load { var, power } => {
                    stack.push(num_traits::pow(args[var as usize], power as usize));
                }
                Instruction::Der { slot } => stack.push(args[slot as usize]),
                Instruction::Mul => {
                    let rhs = pop(stack);
                    *top(stack) *= rhs;
                }
                Instruction::Add => {
                    let rhs = pop(stack);
                    *top(stack) += rhs;
                }
            }
        }

        debug_assert_eq!(stack.len(), 1, "program left {} values", stack.len());
        pop(stack)
    }
}

fn pop(stack: &mut Vec<f64>) -> f64 {
    match stack.pop() {
        Some(x) => x,
        None => unreachable!("compiled program underflowed its stack"),
    }
}

fn top(stack: &mut [f64]) -> &mut f64 {
    match stack.last_mut() {
        Some(x) => x,
        None => unreachable!("compiled program underflowed its stack"),
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(c) => write!(f, "CONST {c}"),
            Self::Load { var, power } => write!(f, "LOAD x{var}^{power}"),
            Self::Der { slot } => write!(f, "DER {slot}"),
            Self::Mul => write!(f, "MULT"),
            Self::Add => write!(f, "ADD"),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, instr) in self.instructions.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{instr}")?;
        }
        Ok(())
    }
}
