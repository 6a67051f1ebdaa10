//! Immutable symbolic expressions over the polar variables ρ and θ.
//!
//! Every polynomial in this crate stores its closed form as an [`Expr`]. The tree
//! is small and acyclic: constants, the two variables, n-ary sums and products,
//! non-negative integer powers, and `cos`/`sin` of a sub-expression. Evaluation,
//! differentiation and expansion are plain recursive functions over the tree.
//!
//! The smart constructors ([`Expr::sum`], [`Expr::product`], [`Expr::pow`], ...)
//! keep trees in a light canonical form: nested sums/products are flattened,
//! constants are folded, and identities (`x + 0`, `x * 1`, `x^0`, `x * 0`) are
//! removed. Rendering follows the usual computer-algebra conventions, so
//! `Radial(4, 2)` prints as `4*rho**4 - 3*rho**2`.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Free variable of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Normalized radius, `0 ≤ ρ ≤ 1` on the unit disk.
    Rho,
    /// Polar angle in radians.
    Theta,
}

impl Variable {
    pub fn name(self) -> &'static str {
        match self {
            Variable::Rho => "rho",
            Variable::Theta => "theta",
        }
    }

    fn latex(self) -> &'static str {
        match self {
            Variable::Rho => "\\rho",
            Variable::Theta => "\\theta",
        }
    }
}

/// Symbolic expression tree.
///
/// Build through the smart constructors ([`Expr::sum`], [`Expr::product`], ...),
/// which keep the tree flat and fold constants.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric constant
    Const(f64),
    /// Free variable ρ or θ
    Var(Variable),
    /// Sum of two or more terms
    Sum(Vec<Expr>),
    /// Product of two or more factors, constant coefficient first
    Product(Vec<Expr>),
    /// Base raised to a non-negative integer power
    Pow(Box<Expr>, u32),
    /// Cosine of the argument
    Cos(Box<Expr>),
    /// Sine of the argument
    Sin(Box<Expr>),
}

impl Expr {
    pub fn zero() -> Self {
        Expr::Const(0.0)
    }

    pub fn one() -> Self {
        Expr::Const(1.0)
    }

    pub fn constant(c: f64) -> Self {
        Expr::Const(c)
    }

    pub fn var(v: Variable) -> Self {
        Expr::Var(v)
    }

    /// Sum of `terms`, flattened, with constant terms folded into a single
    /// trailing constant.
    pub fn sum(terms: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(terms.len());
        let mut constant = 0.0;
        for term in terms {
            match term {
                Expr::Const(c) => constant += c,
                Expr::Sum(inner) => {
                    for t in inner {
                        match t {
                            Expr::Const(c) => constant += c,
                            other => flat.push(other),
                        }
                    }
                }
                other => flat.push(other),
            }
        }
        if constant != 0.0 {
            flat.push(Expr::Const(constant));
        }
        match flat.len() {
            0 => Expr::zero(),
            1 => flat.pop().unwrap_or_else(Expr::zero),
            _ => Expr::Sum(flat),
        }
    }

    /// Product of `factors`, flattened, with constants folded into a single
    /// leading coefficient. Any zero factor collapses the product to zero.
    pub fn product(factors: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(factors.len());
        let mut coefficient = 1.0;
        for factor in factors {
            match factor {
                Expr::Const(c) => coefficient *= c,
                Expr::Product(inner) => {
                    for f in inner {
                        match f {
                            Expr::Const(c) => coefficient *= c,
                            other => flat.push(other),
                        }
                    }
                }
                other => flat.push(other),
            }
        }
        if coefficient == 0.0 {
            return Expr::zero();
        }
        if flat.is_empty() {
            return Expr::Const(coefficient);
        }
        if coefficient == 1.0 && flat.len() == 1 {
            return flat.pop().unwrap_or_else(Expr::one);
        }
        if coefficient != 1.0 {
            flat.insert(0, Expr::Const(coefficient));
        }
        Expr::Product(flat)
    }

    pub fn pow(base: Expr, exponent: u32) -> Self {
        match (base, exponent) {
            (_, 0) => Expr::one(),
            (b, 1) => b,
            (Expr::Const(c), k) => Expr::Const(c.powi(k as i32)),
            (Expr::Pow(b, j), k) => Expr::Pow(b, j * k),
            (b, k) => Expr::Pow(Box::new(b), k),
        }
    }

    pub fn cos(arg: Expr) -> Self {
        match arg {
            Expr::Const(c) => Expr::Const(c.cos()),
            a => Expr::Cos(Box::new(a)),
        }
    }

    pub fn sin(arg: Expr) -> Self {
        match arg {
            Expr::Const(c) => Expr::Const(c.sin()),
            a => Expr::Sin(Box::new(a)),
        }
    }

    /// `c * self`.
    pub fn scale(self, c: f64) -> Self {
        Expr::product(vec![Expr::Const(c), self])
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(c) if *c == 0.0)
    }

    /// Numeric value with ρ and θ bound to the given values.
    ///
    /// Variables absent from the expression are ignored, so a radial
    /// expression can be evaluated with any θ.
    pub fn evaluate(&self, rho: f64, theta: f64) -> f64 {
        match self {
            Expr::Const(c) => *c,
            Expr::Var(Variable::Rho) => rho,
            Expr::Var(Variable::Theta) => theta,
            Expr::Sum(terms) => terms.iter().map(|t| t.evaluate(rho, theta)).sum(),
            Expr::Product(factors) => factors.iter().map(|f| f.evaluate(rho, theta)).product(),
            Expr::Pow(base, k) => base.evaluate(rho, theta).powi(*k as i32),
            Expr::Cos(arg) => arg.evaluate(rho, theta).cos(),
            Expr::Sin(arg) => arg.evaluate(rho, theta).sin(),
        }
    }

    /// Symbolic partial derivative with respect to `v`.
    pub fn derivative(&self, v: Variable) -> Expr {
        match self {
            Expr::Const(_) => Expr::zero(),
            Expr::Var(w) => {
                if *w == v {
                    Expr::one()
                } else {
                    Expr::zero()
                }
            }
            Expr::Sum(terms) => Expr::sum(terms.iter().map(|t| t.derivative(v)).collect()),
            // Product rule: Σ_i f_i' Π_{j≠i} f_j
            Expr::Product(factors) => {
                let mut terms = Vec::with_capacity(factors.len());
                for (i, f) in factors.iter().enumerate() {
                    let df = f.derivative(v);
                    if df.is_zero() {
                        continue;
                    }
                    let mut parts = Vec::with_capacity(factors.len());
                    parts.push(df);
                    parts.extend(
                        factors
                            .iter()
                            .enumerate()
                            .filter(|&(j, _)| j != i)
                            .map(|(_, g)| g.clone()),
                    );
                    terms.push(Expr::product(parts));
                }
                Expr::sum(terms)
            }
            Expr::Pow(base, k) => Expr::product(vec![
                Expr::Const(*k as f64),
                Expr::pow((**base).clone(), k - 1),
                base.derivative(v),
            ]),
            Expr::Cos(arg) => Expr::product(vec![
                Expr::Const(-1.0),
                Expr::sin((**arg).clone()),
                arg.derivative(v),
            ]),
            Expr::Sin(arg) => Expr::product(vec![Expr::cos((**arg).clone()), arg.derivative(v)]),
        }
    }

    /// Distribute products over sums, recursively.
    ///
    /// Powers of sums are left untouched; no polynomial in this crate builds one.
    pub fn expand(&self) -> Expr {
        match self {
            Expr::Const(_) | Expr::Var(_) => self.clone(),
            Expr::Sum(terms) => Expr::sum(terms.iter().map(Expr::expand).collect()),
            Expr::Product(factors) => {
                let mut partials: Vec<Vec<Expr>> = vec![Vec::new()];
                for factor in factors.iter().map(Expr::expand) {
                    match factor {
                        Expr::Sum(terms) => {
                            let mut next = Vec::with_capacity(partials.len() * terms.len());
                            for partial in &partials {
                                for term in &terms {
                                    let mut p = partial.clone();
                                    p.push(term.clone());
                                    next.push(p);
                                }
                            }
                            partials = next;
                        }
                        other => partials.iter_mut().for_each(|p| p.push(other.clone())),
                    }
                }
                Expr::sum(partials.into_iter().map(Expr::product).collect())
            }
            Expr::Pow(base, k) => Expr::pow(base.expand(), *k),
            Expr::Cos(arg) => Expr::cos(arg.expand()),
            Expr::Sin(arg) => Expr::sin(arg.expand()),
        }
    }

    /// LaTeX rendering, e.g. `4 \rho^{4} - 3 \rho^{2}`.
    pub fn to_latex(&self) -> String {
        let mut out = String::new();
        write_latex(self, &mut out);
        out
    }

    /// Split a leading negative sign off a term: `-3*x` becomes `(true, 3*x)`.
    fn split_sign(&self) -> (bool, Expr) {
        match self {
            Expr::Const(c) if *c < 0.0 => (true, Expr::Const(-c)),
            Expr::Product(factors) => match factors.first() {
                Some(Expr::Const(c)) if *c < 0.0 => {
                    let mut rest = factors.clone();
                    rest[0] = Expr::Const(-c);
                    (true, Expr::product(rest))
                }
                _ => (false, self.clone()),
            },
            _ => (false, self.clone()),
        }
    }
}

fn format_number(c: f64) -> String {
    if c.fract() == 0.0 && c.abs() < 1e15 {
        format!("{}", c as i64)
    } else {
        format!("{}", c)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(c) => write!(f, "{}", format_number(*c)),
            Expr::Var(v) => write!(f, "{}", v.name()),
            Expr::Sum(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    let (negative, magnitude) = term.split_sign();
                    match (i, negative) {
                        (0, true) => write!(f, "-{}", magnitude)?,
                        (0, false) => write!(f, "{}", magnitude)?,
                        (_, true) => write!(f, " - {}", magnitude)?,
                        (_, false) => write!(f, " + {}", magnitude)?,
                    }
                }
                Ok(())
            }
            Expr::Product(factors) => {
                let mut first = true;
                for factor in factors {
                    if first {
                        if let Expr::Const(c) = factor {
                            if *c == -1.0 {
                                write!(f, "-")?;
                                continue;
                            }
                        }
                    } else {
                        write!(f, "*")?;
                    }
                    first = false;
                    match factor {
                        Expr::Sum(_) => write!(f, "({})", factor)?,
                        _ => write!(f, "{}", factor)?,
                    }
                }
                Ok(())
            }
            Expr::Pow(base, k) => match **base {
                Expr::Var(_) | Expr::Cos(_) | Expr::Sin(_) => write!(f, "{}**{}", base, k),
                _ => write!(f, "({})**{}", base, k),
            },
            Expr::Cos(arg) => write!(f, "cos({})", arg),
            Expr::Sin(arg) => write!(f, "sin({})", arg),
        }
    }
}

fn write_latex(e: &Expr, out: &mut String) {
    match e {
        Expr::Const(c) => out.push_str(&format_number(*c)),
        Expr::Var(v) => out.push_str(v.latex()),
        Expr::Sum(terms) => {
            for (i, term) in terms.iter().enumerate() {
                let (negative, magnitude) = term.split_sign();
                match (i, negative) {
                    (0, true) => out.push('-'),
                    (0, false) => {}
                    (_, true) => out.push_str(" - "),
                    (_, false) => out.push_str(" + "),
                }
                write_latex(&magnitude, out);
            }
        }
        Expr::Product(factors) => {
            let mut first = true;
            for factor in factors {
                if first {
                    if let Expr::Const(c) = factor {
                        if *c == -1.0 {
                            out.push('-');
                            continue;
                        }
                    }
                } else {
                    out.push(' ');
                }
                first = false;
                if let Expr::Sum(_) = factor {
                    out.push_str("\\left(");
                    write_latex(factor, out);
                    out.push_str("\\right)");
                } else {
                    write_latex(factor, out);
                }
            }
        }
        Expr::Pow(base, k) => {
            match **base {
                Expr::Var(_) => write_latex(base, out),
                _ => {
                    out.push_str("\\left(");
                    write_latex(base, out);
                    out.push_str("\\right)");
                }
            }
            out.push_str(&format!("^{{{}}}", k));
        }
        Expr::Cos(arg) | Expr::Sin(arg) => {
            out.push_str(if matches!(e, Expr::Cos(_)) {
                "\\cos{\\left("
            } else {
                "\\sin{\\left("
            });
            write_latex(arg, out);
            out.push_str(" \\right)}");
        }
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::sum(vec![self, rhs])
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::sum(vec![self, -rhs])
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::product(vec![self, rhs])
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self.scale(-1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rho() -> Expr {
        Expr::var(Variable::Rho)
    }

    fn theta() -> Expr {
        Expr::var(Variable::Theta)
    }

    #[test]
    fn test_constructors_fold_identities() {
        assert_eq!(Expr::sum(vec![]), Expr::zero());
        assert_eq!(Expr::sum(vec![rho(), Expr::zero()]), rho());
        assert_eq!(Expr::product(vec![Expr::one(), rho()]), rho());
        assert_eq!(Expr::product(vec![Expr::zero(), rho()]), Expr::zero());
        assert_eq!(Expr::pow(rho(), 0), Expr::one());
        assert_eq!(Expr::pow(rho(), 1), rho());
        assert_eq!(Expr::pow(Expr::pow(rho(), 2), 3), Expr::pow(rho(), 6));
        assert_eq!(Expr::cos(Expr::zero()), Expr::one());
    }

    #[test]
    fn test_display() {
        let e = Expr::pow(rho(), 4).scale(4.0) - Expr::pow(rho(), 2).scale(3.0);
        assert_eq!(e.to_string(), "4*rho**4 - 3*rho**2");

        let e = Expr::pow(rho(), 2).scale(2.0) - Expr::one();
        assert_eq!(e.to_string(), "2*rho**2 - 1");

        let e = Expr::cos(theta().scale(3.0));
        assert_eq!(e.to_string(), "cos(3*theta)");

        let e = -Expr::sin(theta());
        assert_eq!(e.to_string(), "-sin(theta)");
    }

    #[test]
    fn test_latex() {
        let e = Expr::pow(rho(), 4).scale(4.0) - Expr::pow(rho(), 2).scale(3.0);
        assert_eq!(e.to_latex(), "4 \\rho^{4} - 3 \\rho^{2}");
        let e = Expr::cos(theta().scale(3.0));
        assert_eq!(e.to_latex(), "\\cos{\\left(3 \\theta \\right)}");
    }

    #[test]
    fn test_evaluate() {
        let e = Expr::pow(rho(), 2).scale(2.0) - Expr::one();
        assert!((e.evaluate(0.5, 0.0) - (-0.5)).abs() < 1e-15);
        let e = rho() * Expr::cos(theta());
        assert!((e.evaluate(2.0, std::f64::consts::PI) + 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_derivative_polynomial() {
        // d/dρ (4ρ⁴ - 3ρ²) = 16ρ³ - 6ρ
        let e = Expr::pow(rho(), 4).scale(4.0) - Expr::pow(rho(), 2).scale(3.0);
        let d = e.derivative(Variable::Rho);
        assert_eq!(d.to_string(), "16*rho**3 - 6*rho");
        assert!(e.derivative(Variable::Theta).is_zero());
    }

    #[test]
    fn test_derivative_trig() {
        let e = Expr::cos(theta().scale(3.0));
        let d = e.derivative(Variable::Theta);
        assert_eq!(d.to_string(), "-3*sin(3*theta)");
        let t = 0.3_f64;
        assert!((d.evaluate(0.0, t) + 3.0 * (3.0 * t).sin()).abs() < 1e-14);

        let e = Expr::sin(theta().scale(2.0));
        let d = e.derivative(Variable::Theta);
        assert!((d.evaluate(0.0, t) - 2.0 * (2.0 * t).cos()).abs() < 1e-14);
    }

    #[test]
    fn test_expand_distributes() {
        let r = Expr::pow(rho(), 4).scale(4.0) - Expr::pow(rho(), 2).scale(3.0);
        let e = (r * Expr::cos(theta().scale(2.0))).expand();
        assert_eq!(
            e.to_string(),
            "4*rho**4*cos(2*theta) - 3*rho**2*cos(2*theta)"
        );
        let (p, t) = (0.7_f64, 1.1_f64);
        let direct = (4.0 * p.powi(4) - 3.0 * p * p) * (2.0 * t).cos();
        assert!((e.evaluate(p, t) - direct).abs() < 1e-14);
    }
}
