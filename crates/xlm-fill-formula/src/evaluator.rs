//! Arithmetic evaluator
//!
//! A recursive descent evaluator for the fully substituted expressions that
//! macro sheets build characters from: numeric literals, `+ - * /`, unary
//! signs and parentheses. Nothing else is accepted; in particular any letter
//! left in the text means a reference or function call slipped through, and
//! the expression is refused before it is tokenized.

use std::borrow::Cow;
use std::fmt;

use lazy_regex::{regex, Captures};

use crate::error::{FormulaError, FormulaResult};

/// Character written for positions that are not known yet
pub const PLACEHOLDER: char = ' ';

/// Deepest parenthesis / unary sign nesting `evaluate` accepts
pub const MAX_NESTING_DEPTH: usize = 256;

/// The four operators a character term can combine its cells with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Parse an operator character
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            _ => None,
        }
    }

    /// The operator's symbol
    pub fn as_char(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    fn apply(&self, left: f64, right: f64) -> FormulaResult<f64> {
        match self {
            Operator::Add => Ok(left + right),
            Operator::Subtract => Ok(left - right),
            Operator::Multiply => Ok(left * right),
            Operator::Divide if right == 0.0 => {
                Err(FormulaError::Evaluation("division by zero".into()))
            }
            Operator::Divide => Ok(left / right),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Evaluate an arithmetic expression
///
/// # Example
/// ```rust
/// use xlm_fill_formula::evaluate;
///
/// assert_eq!(evaluate("1+2*3").unwrap(), 7.0);
/// assert_eq!(evaluate("7/2").unwrap(), 3.5);
/// assert!(evaluate("CHAR(65)").is_err());
/// assert!(evaluate("1/0").is_err());
/// ```
pub fn evaluate(expression: &str) -> FormulaResult<f64> {
    if expression.chars().any(char::is_alphabetic) {
        return Err(FormulaError::Evaluation(format!(
            "expression with letters: '{}'",
            expression
        )));
    }

    let normalized = normalize_numeric_literals(expression);
    let mut evaluator = ArithmeticEvaluator::new(&normalized)?;
    let value = evaluator.parse_additive()?;

    if !matches!(evaluator.current_token(), Token::Eof) {
        return Err(FormulaError::Evaluation(format!(
            "unexpected {:?} in '{}'",
            evaluator.current_token(),
            expression
        )));
    }

    if !value.is_finite() {
        return Err(FormulaError::Evaluation(format!(
            "non-finite result for '{}'",
            expression
        )));
    }

    Ok(value)
}

/// Rewrite integer literals as floats (`12` becomes `12.0`)
///
/// Literals that already carry a decimal point are left alone.
pub fn normalize_numeric_literals(expression: &str) -> Cow<'_, str> {
    regex!(r"[0-9.]+").replace_all(expression, |caps: &Captures| {
        let literal = &caps[0];
        if literal.contains('.') {
            literal.to_string()
        } else {
            format!("{}.0", literal)
        }
    })
}

/// Format a value so it re-enters the evaluator unchanged
///
/// Whole numbers keep a fractional part (`65.0`). Magnitudes are always
/// written out in full, never in exponent form.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}.0", value)
    } else {
        format!("{}", value)
    }
}

/// Turn an evaluated number into the character it encodes
///
/// The value is truncated toward zero; anything outside a byte maps to the
/// placeholder.
pub fn char_from_value(value: f64) -> char {
    let code = value.trunc();
    if (0.0..=255.0).contains(&code) {
        char::from(code as u8)
    } else {
        PLACEHOLDER
    }
}

/// Compute the character `left <op> right` encodes
pub fn compute_char(left: &str, op: Operator, right: &str) -> FormulaResult<char> {
    let value = evaluate(&format!("{}{}{}", left, op, right))?;
    Ok(char_from_value(value))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
    Eof,
}

struct ArithmeticEvaluator<'a> {
    input: &'a str,
    pos: usize,
    current_token: Token,
    depth: usize,
}

impl<'a> ArithmeticEvaluator<'a> {
    fn new(input: &'a str) -> FormulaResult<Self> {
        let mut evaluator = Self {
            input,
            pos: 0,
            current_token: Token::Eof,
            depth: 0,
        };
        evaluator.advance_token()?;
        Ok(evaluator)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.current_token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        self.skip_whitespace();

        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            c if c.is_ascii_digit() || c == '.' => return self.scan_number(),
            c => {
                return Err(FormulaError::Evaluation(format!(
                    "unexpected character '{}' in '{}'",
                    c, self.input
                )))
            }
        };

        self.advance();
        Ok(token)
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_digit() || c == '.')
        {
            self.advance();
        }

        let literal = &self.input[start..self.pos];
        literal
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| FormulaError::Evaluation(format!("invalid number '{}'", literal)))
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> Token {
        self.current_token
    }

    fn enter(&mut self) -> FormulaResult<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(FormulaError::Evaluation(
                "expression nested too deeply".into(),
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = self.current_token;
        self.advance_token()?;
        Ok(token)
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Unary: -, +
    // 4. Primary: literals, parentheses

    fn parse_additive(&mut self) -> FormulaResult<f64> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => Operator::Add,
                Token::Minus => Operator::Subtract,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_multiplicative()?;
            left = op.apply(left, right)?;
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<f64> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => Operator::Multiply,
                Token::Slash => Operator::Divide,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_unary()?;
            left = op.apply(left, right)?;
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<f64> {
        match self.current_token() {
            Token::Minus => {
                self.consume()?;
                self.enter()?;
                let value = -self.parse_unary()?;
                self.leave();
                Ok(value)
            }
            Token::Plus => {
                self.consume()?;
                self.enter()?;
                let value = self.parse_unary()?;
                self.leave();
                Ok(value)
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> FormulaResult<f64> {
        match self.current_token() {
            Token::Number(n) => {
                self.consume()?;
                Ok(n)
            }

            Token::LeftParen => {
                self.consume()?;
                self.enter()?;
                let value = self.parse_additive()?;
                self.leave();
                if self.current_token() != Token::RightParen {
                    return Err(FormulaError::Evaluation(format!(
                        "expected ')' in '{}'",
                        self.input
                    )));
                }
                self.consume()?;
                Ok(value)
            }

            token => Err(FormulaError::Evaluation(format!(
                "unexpected {:?} in '{}'",
                token, self.input
            ))),
        }
    }
}
