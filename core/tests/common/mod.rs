//! Test host for emitted scripts.
//!
//! Evaluates the subset of JavaScript the emitter produces: the program
//! IIFE, `(callee)(args...)` calls, numbers, booleans, `null`, template
//! strings, `Symbol.for("...")` and hashed identifiers bound by a small
//! prelude. Values print the way the runtime's `string` function prints them.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use conscript::{Namespace, compile, make_symbol};

pub type Native = fn(&[Value]) -> Result<Value, String>;

#[derive(Clone, Debug)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
    /// A registry symbol; the name keeps its leading colon
    Keyword(String),
    Null,
    Pair(Rc<(Value, Value)>),
    Function(&'static str, Native),
}

// Mirrors `===`: pairs compare by identity, keywords by registry name
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Pair(a), Value::Pair(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a, _), Value::Function(b, _)) => a == b,
            _ => false,
        }
    }
}

thread_local! {
    static OUTPUT: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Everything `print` wrote since the last call, oldest first.
pub fn take_output() -> Vec<String> {
    OUTPUT.with(|out| out.borrow_mut().drain(..).collect())
}

// ============================================================================
// Prelude
// ============================================================================

pub const NAMES: &[&str] = &[
    "+", "-", "*", "=", "not", "list", "cons", "car", "cdr", "print", "string",
];

fn native(name: &str) -> Native {
    match name {
        "+" => add,
        "-" => sub,
        "*" => mul,
        "=" => strict_eq,
        "not" => not,
        "list" => list,
        "cons" => cons,
        "car" => car,
        "cdr" => cdr,
        "print" => print,
        _ => string,
    }
}

pub fn global_namespace() -> Namespace {
    Namespace::with_globals(NAMES.iter().copied())
}

pub fn prelude() -> HashMap<String, Value> {
    NAMES
        .iter()
        .map(|name| (make_symbol(name), Value::Function(name, native(name))))
        .collect()
}

fn numbers(args: &[Value]) -> Result<Vec<f64>, String> {
    args.iter()
        .map(|v| match v {
            Value::Number(n) => Ok(*n),
            other => Err(format!("expected number, got {other:?}")),
        })
        .collect()
}

fn add(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Number(numbers(args)?.iter().sum()))
}

fn sub(args: &[Value]) -> Result<Value, String> {
    let nums = numbers(args)?;
    match nums.split_first() {
        Some((first, [])) => Ok(Value::Number(-first)),
        Some((first, rest)) => Ok(Value::Number(rest.iter().fold(*first, |acc, n| acc - n))),
        None => Err("- needs arguments".to_string()),
    }
}

fn mul(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Number(numbers(args)?.iter().product()))
}

fn strict_eq(args: &[Value]) -> Result<Value, String> {
    match args {
        [a, b] => Ok(Value::Bool(a == b)),
        _ => Err("= takes two arguments".to_string()),
    }
}

fn not(args: &[Value]) -> Result<Value, String> {
    let falsy = match args.first().unwrap_or(&Value::Null) {
        Value::Bool(b) => !b,
        Value::Null => true,
        Value::Number(n) => *n == 0.0 || n.is_nan(),
        Value::Str(s) => s.is_empty(),
        _ => false,
    };
    Ok(Value::Bool(falsy))
}

fn list(args: &[Value]) -> Result<Value, String> {
    Ok(args
        .iter()
        .rev()
        .fold(Value::Null, |tail, head| Value::Pair(Rc::new((head.clone(), tail)))))
}

fn cons(args: &[Value]) -> Result<Value, String> {
    match args {
        [head, tail] => Ok(Value::Pair(Rc::new((head.clone(), tail.clone())))),
        _ => Err("cons takes two arguments".to_string()),
    }
}

fn car(args: &[Value]) -> Result<Value, String> {
    match args.first() {
        Some(Value::Pair(pair)) => Ok(pair.0.clone()),
        other => Err(format!("car: expected pair, got {other:?}")),
    }
}

fn cdr(args: &[Value]) -> Result<Value, String> {
    match args.first() {
        Some(Value::Pair(pair)) => Ok(pair.1.clone()),
        other => Err(format!("cdr: expected pair, got {other:?}")),
    }
}

fn print(args: &[Value]) -> Result<Value, String> {
    let text = print_string(args.first().unwrap_or(&Value::Null), true);
    OUTPUT.with(|out| out.borrow_mut().push(text));
    Ok(Value::Null)
}

fn string(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Str(print_string(args.first().unwrap_or(&Value::Null), false)))
}

// ============================================================================
// Printing
// ============================================================================

pub fn print_string(value: &Value, with_quotes: bool) -> String {
    match value {
        Value::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
        Value::Number(n) => n.to_string(),
        Value::Str(s) if with_quotes => format!("\"{s}\""),
        Value::Str(s) => s.clone(),
        Value::Keyword(k) => k.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "nil".to_string(),
        Value::Pair(_) => print_list(value),
        Value::Function(name, _) => format!("<function {name}>"),
    }
}

fn print_list(list: &Value) -> String {
    let mut items = Vec::new();
    let mut current = list.clone();
    while let Value::Pair(pair) = current {
        items.push(print_string(&pair.0, false));
        match &pair.1 {
            next @ Value::Pair(_) => current = next.clone(),
            Value::Null => break,
            tail => {
                items.push(print_string(tail, false));
                break;
            }
        }
    }
    format!("'({})", items.join(", "))
}

// ============================================================================
// Evaluator
// ============================================================================

struct Host<'a> {
    chars: Vec<char>,
    pos: usize,
    globals: &'a HashMap<String, Value>,
}

impl Host<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Result<char, String> {
        let c = self.peek().ok_or("unexpected end of script")?;
        self.pos += 1;
        Ok(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.pos + i) == Some(&c))
    }

    fn expect(&mut self, s: &str) -> Result<(), String> {
        self.skip_ws();
        if self.starts_with(s) {
            self.pos += s.chars().count();
            Ok(())
        } else {
            let rest: String = self.chars[self.pos..].iter().take(20).collect();
            Err(format!("expected {s:?} at {}, found {rest:?}", self.pos))
        }
    }

    fn run_program(&mut self) -> Result<Value, String> {
        self.expect("(() => {")?;
        loop {
            self.skip_ws();
            if self.starts_with("return ") {
                self.pos += "return ".len();
                let result = self.eval_expr()?;
                self.expect(";")?;
                self.expect("})();")?;
                self.skip_ws();
                if self.pos != self.chars.len() {
                    return Err("trailing text after program".to_string());
                }
                return Ok(result);
            }
            self.eval_expr()?;
            self.expect(";")?;
        }
    }

    fn eval_expr(&mut self) -> Result<Value, String> {
        self.skip_ws();
        let mut value = self.eval_primary()?;
        loop {
            self.skip_ws();
            if self.peek() != Some('(') {
                return Ok(value);
            }
            let args = self.eval_args()?;
            value = match value {
                Value::Function(_, f) => f(&args)?,
                other => return Err(format!("{other:?} is not a function")),
            };
        }
    }

    fn eval_args(&mut self) -> Result<Vec<Value>, String> {
        self.expect("(")?;
        let mut args = Vec::new();
        self.skip_ws();
        if self.peek() == Some(')') {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.eval_expr()?);
            self.skip_ws();
            match self.bump()? {
                ',' => continue,
                ')' => return Ok(args),
                c => return Err(format!("unexpected {c:?} in argument list")),
            }
        }
    }

    /// Cook a template literal the way JavaScript does: raw CR and CRLF read
    /// as LF, escapes translate, and `${` opens a substitution.
    fn eval_template(&mut self) -> Result<Value, String> {
        let mut s = String::new();
        loop {
            match self.bump()? {
                '`' => return Ok(Value::Str(s)),
                '$' if self.peek() == Some('{') => {
                    return Err("template substitution in string literal".to_string());
                }
                '\r' => {
                    if self.peek() == Some('\n') {
                        self.pos += 1;
                    }
                    s.push('\n');
                }
                '\\' => s.push(match self.bump()? {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'b' => '\u{8}',
                    'f' => '\u{c}',
                    'v' => '\u{b}',
                    '0' => '\0',
                    c => c,
                }),
                c => s.push(c),
            }
        }
    }

    fn eval_primary(&mut self) -> Result<Value, String> {
        match self.peek().ok_or("unexpected end of script")? {
            '(' => {
                self.pos += 1;
                let value = self.eval_expr()?;
                self.expect(")")?;
                Ok(value)
            }
            '`' => {
                self.pos += 1;
                self.eval_template()
            }
            c if c.is_ascii_digit() || c == '-' || c == '+' => {
                let start = self.pos;
                self.pos += 1;
                while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
                    self.pos += 1;
                }
                let text: String = self.chars[start..self.pos].iter().collect();
                text.parse().map(Value::Number).map_err(|e| format!("{text}: {e}"))
            }
            c if c == '$' || c.is_alphabetic() => {
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|c| c == '$' || c == '_' || c == '.' || c.is_alphanumeric())
                {
                    self.pos += 1;
                }
                let ident: String = self.chars[start..self.pos].iter().collect();
                match ident.as_str() {
                    "null" => Ok(Value::Null),
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "Symbol.for" => {
                        self.expect("(\"")?;
                        let mut name = String::new();
                        loop {
                            match self.bump()? {
                                '\\' => name.push(self.bump()?),
                                '"' => break,
                                c => name.push(c),
                            }
                        }
                        self.expect(")")?;
                        Ok(Value::Keyword(name))
                    }
                    other => self
                        .globals
                        .get(other)
                        .cloned()
                        .ok_or_else(|| format!("{other} is not defined")),
                }
            }
            c => Err(format!("unexpected {c:?} in script")),
        }
    }
}

/// Run an emitted script against the test prelude.
pub fn execute(code: &str) -> Result<Value, String> {
    let globals = prelude();
    let mut host = Host {
        chars: code.chars().collect(),
        pos: 0,
        globals: &globals,
    };
    host.run_program()
}

/// Compile against the test prelude's namespace, then run.
pub fn run(source: &str) -> Result<Value, String> {
    let ns = global_namespace();
    let code = compile(source, "test", &ns).map_err(|e| e.to_string())?;
    execute(&code)
}
