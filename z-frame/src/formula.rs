//! Formula binding between the angles.
//!
//! A user expression is parsed into an AST once, and evaluated against the
//! current angles. Nothing is executed beyond the arithmetic below.
//!
//! + Operators: `+ - * / ^ ( ) ,`
//! + Functions: `sin cos tan sqrt abs min max pow`
//! + Constants and variables: `PI angle1 angle2 angle3`
//!
//! Variables are in degrees, trigonometric functions take radians.
//!
//! ```
//! use z_frame::{formula::Formula, Angles};
//!
//! let f = Formula::parse("angle1 * 0.5 + max(angle3, 10)").unwrap();
//! assert_eq!(f.eval(&Angles::new(20., 0., 5.)).unwrap(), 20.);
//! ```
use crate::{round_half, Angles, Joint, Limits};

/// Maximum nesting depth of parentheses, function arguments and unary
/// operators.
pub const MAX_DEPTH: usize = 128;
/// Maximum number of operators and function calls in a formula.
pub const MAX_OPS: usize = 256;

/// Error of parsing or evaluating a formula.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaError {
    /// Empty formula
    Empty,
    /// Unexpected character at the byte position
    Lex(usize, char),
    /// Syntax error
    Parse(String),
    /// Unknown identifier
    Unknown(String),
    /// Wrong number of function arguments
    Arity(&'static str, &'static str, usize),
    /// The result is NaN or infinite
    NonFinite,
    /// Nested deeper than [`MAX_DEPTH`] or longer than [`MAX_OPS`]
    TooComplex,
}

impl std::fmt::Display for FormulaError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty formula"),
            Self::Lex(pos, c) => write!(f, "unexpected character '{c}' at {pos}"),
            Self::Parse(msg) => write!(f, "syntax error: {msg}"),
            Self::Unknown(name) => write!(f, "unknown identifier '{name}'"),
            Self::Arity(name, expected, got) => {
                write!(f, "{name}() takes {expected} argument(s), got {got}")
            }
            Self::NonFinite => write!(f, "result is not a finite number"),
            Self::TooComplex => write!(
                f,
                "formula exceeds {MAX_DEPTH} nesting levels or {MAX_OPS} operations"
            ),
        }
    }
}

impl std::error::Error for FormulaError {}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
    Comma,
}

fn lex(src: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();
    while let Some(&(pos, c)) = chars.peek() {
        match c {
            _ if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut end = pos;
                let mut prev = c;
                while let Some(&(i, c)) = chars.peek() {
                    let exp_sign = matches!(c, '+' | '-') && matches!(prev, 'e' | 'E');
                    if !(c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E') || exp_sign) {
                        break;
                    }
                    end = i + c.len_utf8();
                    prev = c;
                    chars.next();
                }
                let num = src[pos..end]
                    .parse()
                    .map_err(|_| FormulaError::Parse(format!("invalid number '{}'", &src[pos..end])))?;
                tokens.push(Token::Num(num));
            }
            _ if c.is_alphabetic() || c == '_' => {
                let mut end = pos;
                while let Some(&(i, c)) = chars.peek() {
                    if !(c.is_alphanumeric() || c == '_') {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                tokens.push(Token::Ident(src[pos..end].to_string()));
            }
            '+' | '-' | '*' | '/' | '^' => {
                tokens.push(Token::Op(c));
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            ',' => {
                tokens.push(Token::Comma);
                chars.next();
            }
            _ => return Err(FormulaError::Lex(pos, c)),
        }
    }
    Ok(tokens)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Func {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Abs,
    Min,
    Max,
    Pow,
}

impl Func {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "sqrt" => Self::Sqrt,
            "abs" => Self::Abs,
            "min" => Self::Min,
            "max" => Self::Max,
            "pow" => Self::Pow,
            _ => None?,
        })
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sqrt => "sqrt",
            Self::Abs => "abs",
            Self::Min => "min",
            Self::Max => "max",
            Self::Pow => "pow",
        }
    }

    fn check_arity(&self, n: usize) -> Result<(), FormulaError> {
        let (ok, expected) = match self {
            Self::Min | Self::Max => (n >= 1, "at least 1"),
            Self::Pow => (n == 2, "2"),
            _ => (n == 1, "1"),
        };
        if ok {
            Ok(())
        } else {
            Err(FormulaError::Arity(self.name(), expected, n))
        }
    }

    fn call(&self, args: &[f64]) -> f64 {
        match self {
            Self::Sin => args[0].sin(),
            Self::Cos => args[0].cos(),
            Self::Tan => args[0].tan(),
            Self::Sqrt => args[0].sqrt(),
            Self::Abs => args[0].abs(),
            Self::Min => args.iter().copied().fold(f64::INFINITY, f64::min),
            Self::Max => args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::Pow => args[0].powf(args[1]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Expression tree of a formula.
#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Num(f64),
    Var(Joint),
    Neg(Box<Expr>),
    Bin(BinOp, Box<Expr>, Box<Expr>),
    Call(Func, Vec<Expr>),
}

impl Expr {
    fn eval(&self, a: &Angles) -> f64 {
        match self {
            Self::Num(v) => *v,
            Self::Var(joint) => a[*joint],
            Self::Neg(e) => -e.eval(a),
            Self::Bin(op, lhs, rhs) => {
                let (lhs, rhs) = (lhs.eval(a), rhs.eval(a));
                match op {
                    BinOp::Add => lhs + rhs,
                    BinOp::Sub => lhs - rhs,
                    BinOp::Mul => lhs * rhs,
                    BinOp::Div => lhs / rhs,
                    BinOp::Pow => lhs.powf(rhs),
                }
            }
            Self::Call(func, args) => {
                let args = args.iter().map(|e| e.eval(a)).collect::<Vec<_>>();
                func.call(&args)
            }
        }
    }
}

// Recursive descent over the token list
//
// expr  := term (('+' | '-') term)*
// term  := unary (('*' | '/') unary)*
// unary := ('-' | '+') unary | power
// power := atom ('^' unary)?
// atom  := number | ident | ident '(' expr (',' expr)* ')' | '(' expr ')'
//
// `depth` bounds the parser recursion and `ops` bounds the tree height, so
// parsing, evaluating and dropping stay within a fixed stack.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    ops: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }

    fn eat(&mut self, t: &Token) -> bool {
        if self.peek() == Some(t) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, t: Token, what: &str) -> Result<(), FormulaError> {
        if self.eat(&t) {
            Ok(())
        } else {
            Err(FormulaError::Parse(format!("expected {what}")))
        }
    }

    // Count one more operator or function call
    fn op(&mut self) -> Result<(), FormulaError> {
        self.ops += 1;
        if self.ops > MAX_OPS {
            Err(FormulaError::TooComplex)
        } else {
            Ok(())
        }
    }

    // Parse one level deeper
    fn nest<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, FormulaError>,
    ) -> Result<T, FormulaError> {
        if self.depth == MAX_DEPTH {
            return Err(FormulaError::TooComplex);
        }
        self.depth += 1;
        let t = f(self)?;
        self.depth -= 1;
        Ok(t)
    }

    // Left-associative chain
    fn chain(
        &mut self,
        op: fn(&Token) -> Option<BinOp>,
        operand: fn(&mut Self) -> Result<Expr, FormulaError>,
    ) -> Result<Expr, FormulaError> {
        let mut lhs = operand(self)?;
        while let Some(op) = self.peek().and_then(op) {
            self.pos += 1;
            self.op()?;
            lhs = Expr::Bin(op, Box::new(lhs), Box::new(operand(self)?));
        }
        Ok(lhs)
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let op = |t: &Token| match t {
            Token::Op('+') => Some(BinOp::Add),
            Token::Op('-') => Some(BinOp::Sub),
            _ => None,
        };
        self.chain(op, Self::term)
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let op = |t: &Token| match t {
            Token::Op('*') => Some(BinOp::Mul),
            Token::Op('/') => Some(BinOp::Div),
            _ => None,
        };
        self.chain(op, Self::unary)
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        if self.eat(&Token::Op('-')) {
            self.op()?;
            Ok(Expr::Neg(Box::new(self.nest(Self::unary)?)))
        } else if self.eat(&Token::Op('+')) {
            self.nest(Self::unary)
        } else {
            self.power()
        }
    }

    fn power(&mut self) -> Result<Expr, FormulaError> {
        let base = self.atom()?;
        if self.eat(&Token::Op('^')) {
            self.op()?;
            let exp = self.nest(Self::unary)?;
            Ok(Expr::Bin(BinOp::Pow, Box::new(base), Box::new(exp)))
        } else {
            Ok(base)
        }
    }

    fn atom(&mut self) -> Result<Expr, FormulaError> {
        match self.bump() {
            Some(Token::Num(v)) => Ok(Expr::Num(v)),
            Some(Token::LParen) => {
                let e = self.nest(Self::expr)?;
                self.expect(Token::RParen, "')'")?;
                Ok(e)
            }
            Some(Token::Ident(name)) => self.ident(name),
            Some(t) => Err(FormulaError::Parse(format!("unexpected {t:?}"))),
            None => Err(FormulaError::Parse("unexpected end".to_string())),
        }
    }

    fn ident(&mut self, name: String) -> Result<Expr, FormulaError> {
        let lower = name.to_ascii_lowercase();
        if let Some(func) = Func::from_name(&lower) {
            self.op()?;
            self.expect(Token::LParen, &format!("'(' after {lower}"))?;
            let mut args = vec![self.nest(Self::expr)?];
            while self.eat(&Token::Comma) {
                args.push(self.nest(Self::expr)?);
            }
            self.expect(Token::RParen, "')'")?;
            func.check_arity(args.len())?;
            return Ok(Expr::Call(func, args));
        }
        match lower.as_str() {
            "pi" => Ok(Expr::Num(std::f64::consts::PI)),
            _ => Joint::ALL
                .into_iter()
                .find(|j| j.name() == lower)
                .map(Expr::Var)
                .ok_or(FormulaError::Unknown(name)),
        }
    }
}

/// A parsed formula over `angle1`, `angle2` and `angle3`.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    src: String,
    expr: Expr,
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.src)
    }
}

impl std::str::FromStr for Formula {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Formula {
    /// Parse a formula.
    pub fn parse(src: &str) -> Result<Self, FormulaError> {
        let tokens = lex(src)?;
        if tokens.is_empty() {
            return Err(FormulaError::Empty);
        }
        let mut parser = Parser { tokens, pos: 0, depth: 0, ops: 0 };
        let expr = parser.expr()?;
        if let Some(t) = parser.peek() {
            return Err(FormulaError::Parse(format!("unexpected {t:?}")));
        }
        Ok(Self { src: src.trim().to_string(), expr })
    }

    /// Source text of the formula.
    pub fn as_str(&self) -> &str {
        &self.src
    }

    /// Evaluate the formula with the angles.
    pub fn eval(&self, angles: &Angles) -> Result<f64, FormulaError> {
        let v = self.expr.eval(angles);
        if v.is_finite() {
            Ok(v)
        } else {
            Err(FormulaError::NonFinite)
        }
    }
}

/// A formula deriving the angle of a joint from the others.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// The derived joint
    pub target: Joint,
    /// The formula
    pub formula: Formula,
}

impl Binding {
    /// Create a binding.
    pub fn new(target: Joint, src: &str) -> Result<Self, FormulaError> {
        Ok(Self { target, formula: Formula::parse(src)? })
    }

    /// Derive the target angle, rounded to a half degree and clamped.
    /// Return true if the angle changed.
    pub fn apply(&self, angles: &mut Angles, limits: &Limits) -> Result<bool, FormulaError> {
        let v = limits.clamp(self.target, round_half(self.formula.eval(angles)?));
        if v == angles[self.target] {
            return Ok(false);
        }
        angles[self.target] = v;
        Ok(true)
    }
}
