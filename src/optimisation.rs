//! A thin layer over the HiGHS row-wise problem used to assemble and solve the host model.
//!
//! The host model adds its own decision variables and constraints through [`Problem`]; the RPS
//! policy only adds rows built from [`LinearExpr`]s over those variables.
use anyhow::{Result, anyhow, ensure};
use highs::{HighsModelStatus, RowProblem, Sense};
use indexmap::IndexMap;
use std::ops::{Add, AddAssign, Mul, RangeBounds};

/// A decision variable in the optimisation.
///
/// Note that this type does **not** include the value of the variable; it just refers to a
/// particular column of the problem, in the order in which columns were added.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(usize);

impl Variable {
    /// The index of the column in the problem
    pub fn index(self) -> usize {
        self.0
    }
}

/// A linear combination of decision variables.
///
/// Terms for the same variable are merged, so each variable appears at most once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearExpr {
    terms: IndexMap<Variable, f64>,
}

impl LinearExpr {
    /// Create an empty expression (equal to zero)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `coeff * var` to the expression
    pub fn add_term(&mut self, var: Variable, coeff: f64) {
        *self.terms.entry(var).or_insert(0.0) += coeff;
    }

    /// Iterate over the variable terms of the expression
    pub fn iter_terms(&self) -> impl Iterator<Item = (Variable, f64)> + '_ {
        self.terms.iter().map(|(var, coeff)| (*var, *coeff))
    }

    /// Get the coefficient for `var` (zero if the variable does not appear)
    pub fn coefficient(&self, var: Variable) -> f64 {
        self.terms.get(&var).copied().unwrap_or(0.0)
    }

    /// Whether the expression has any variable terms
    pub fn has_terms(&self) -> bool {
        !self.terms.is_empty()
    }

    /// Evaluate the expression, using `value_of` to look up the value of each variable
    pub fn evaluate<F>(&self, value_of: F) -> f64
    where
        F: Fn(Variable) -> f64,
    {
        self.terms
            .iter()
            .map(|(var, coeff)| coeff * value_of(*var))
            .sum::<f64>()
    }
}

impl AddAssign<&LinearExpr> for LinearExpr {
    fn add_assign(&mut self, rhs: &LinearExpr) {
        for (var, coeff) in rhs.iter_terms() {
            self.add_term(var, coeff);
        }
    }
}

impl Add for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: LinearExpr) -> LinearExpr {
        self += &rhs;
        self
    }
}

impl Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(mut self, rhs: f64) -> LinearExpr {
        for coeff in self.terms.values_mut() {
            *coeff *= rhs;
        }
        self
    }
}

/// The optimisation problem, built row by row
#[derive(Default)]
pub struct Problem {
    inner: RowProblem,
    columns: Vec<highs::Col>,
}

impl Problem {
    /// Create a new, empty problem
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a decision variable with the given objective coefficient and bounds
    pub fn add_variable<B>(&mut self, cost: f64, bounds: B) -> Variable
    where
        B: RangeBounds<f64>,
    {
        let col = self.inner.add_column(cost, bounds);
        self.columns.push(col);
        Variable(self.columns.len() - 1)
    }

    /// Add a constraint row: the sum of `coeff * var` terms must lie within `bounds`
    pub fn add_row<B, I>(&mut self, bounds: B, terms: I)
    where
        B: RangeBounds<f64>,
        I: IntoIterator<Item = (Variable, f64)>,
    {
        let row: Vec<_> = terms
            .into_iter()
            .map(|(var, coeff)| (self.columns[var.0], coeff))
            .collect();
        self.inner.add_row(bounds, row);
    }

    /// Add a constraint requiring `expr` to lie within `bounds`.
    ///
    /// Terms with a zero coefficient are dropped.
    pub fn add_constraint<B>(&mut self, expr: &LinearExpr, bounds: B)
    where
        B: RangeBounds<f64>,
    {
        let terms = expr
            .iter_terms()
            .filter(|(_, coeff)| *coeff != 0.0)
            .collect::<Vec<_>>();
        self.add_row(bounds, terms);
    }

    /// The number of constraint rows added so far
    pub fn num_rows(&self) -> usize {
        self.inner.num_rows()
    }

    /// Solve the problem with HiGHS.
    ///
    /// # Returns
    ///
    /// The optimal solution or an error if the problem could not be solved to optimality.
    pub fn solve(self, sense: Sense) -> Result<Solution> {
        let mut model = self.inner.optimise(sense);
        model.set_option("output_flag", false);

        let solved = model
            .try_solve()
            .map_err(|status| anyhow!("Could not solve: {status:?}"))?;
        let status = solved.status();
        ensure!(
            matches!(status, HighsModelStatus::Optimal),
            "Could not solve: {status:?}"
        );

        let solution = solved.get_solution();
        Ok(Solution {
            columns: solution.columns().to_vec(),
            dual_rows: solution.dual_rows().to_vec(),
        })
    }
}

/// The solution to an optimisation problem
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    columns: Vec<f64>,
    dual_rows: Vec<f64>,
}

impl Solution {
    /// Create a solution from raw column values and row duals
    pub fn new(columns: Vec<f64>, dual_rows: Vec<f64>) -> Self {
        Self { columns, dual_rows }
    }

    /// The value of a decision variable
    pub fn value(&self, var: Variable) -> f64 {
        self.columns[var.0]
    }

    /// Evaluate an expression against this solution
    pub fn evaluate(&self, expr: &LinearExpr) -> f64 {
        expr.evaluate(|var| self.value(var))
    }

    /// The dual values for each row, in the order in which rows were added
    pub fn dual_rows(&self) -> &[f64] {
        &self.dual_rows
    }
}
