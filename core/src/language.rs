use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;

use crate::error::{CompileError, Result};
use crate::lexer::Token;
use crate::location::SourceLocation;

// ============================================================================
// Parse Tree
// ============================================================================

/// A node of the parse tree the reader builds.
///
/// Lists are chains of [`Pair`]s. A chain ends either in `Nil` (a proper
/// list) or in any other form (an improper, dotted list).
#[derive(Debug, Clone)]
pub enum Form {
    Nil,
    Atom(Token),
    Pair(Rc<Pair>),
}

/// Two-slot cons cell.
///
/// The tail is mutable so lists can be grown one element at a time, but only
/// while it is still `Nil`. Once reading finishes a pair is treated as frozen.
#[derive(Debug)]
pub struct Pair {
    pub head: Form,
    tail: RefCell<Form>,
    /// Location of the opening paren, for pairs that came from source text
    pub location: Option<SourceLocation>,
}

impl Pair {
    pub fn new(head: Form, tail: Form, location: Option<SourceLocation>) -> Self {
        Pair {
            head,
            tail: RefCell::new(tail),
            location,
        }
    }

    pub fn tail(&self) -> Form {
        self.tail.borrow().clone()
    }
}

// Unlink the chain one pair at a time so long lists do not drop recursively.
impl Drop for Pair {
    fn drop(&mut self) {
        let mut next = mem::replace(self.tail.get_mut(), Form::Nil);
        while let Form::Pair(pair) = next {
            match Rc::try_unwrap(pair) {
                Ok(mut pair) => next = mem::replace(pair.tail.get_mut(), Form::Nil),
                Err(_) => break,
            }
        }
    }
}

impl PartialEq for Pair {
    fn eq(&self, other: &Self) -> bool {
        self.head == other.head && self.location == other.location && self.tail() == other.tail()
    }
}

// Walks tails in a loop; only heads recurse, and their depth is bounded by
// the reader's nesting limit.
impl PartialEq for Form {
    fn eq(&self, other: &Self) -> bool {
        let mut left = self.clone();
        let mut right = other.clone();
        loop {
            let (next_left, next_right) = match (&left, &right) {
                (Form::Nil, Form::Nil) => return true,
                (Form::Atom(a), Form::Atom(b)) => return a == b,
                (Form::Pair(a), Form::Pair(b)) => {
                    if Rc::ptr_eq(a, b) {
                        return true;
                    }
                    if a.head != b.head || a.location != b.location {
                        return false;
                    }
                    (a.tail(), b.tail())
                }
                _ => return false,
            };
            left = next_left;
            right = next_right;
        }
    }
}

pub fn cons(head: Form, tail: Form) -> Form {
    Form::Pair(Rc::new(Pair::new(head, tail, None)))
}

impl Form {
    pub fn is_pair(&self) -> bool {
        matches!(self, Form::Pair(_))
    }

    pub fn as_pair(&self) -> Option<&Rc<Pair>> {
        match self {
            Form::Pair(pair) => Some(pair),
            _ => None,
        }
    }

    /// Append `value` at the end of this list.
    ///
    /// Walks to the last pair; fails if the chain ends in anything but `Nil`,
    /// or if `self` is not a pair at all.
    pub fn append(&self, value: Form) -> Result<()> {
        let Form::Pair(first) = self else {
            return Err(invalid_append(&value, None));
        };

        let mut current = Rc::clone(first);
        loop {
            let next = match &*current.tail.borrow() {
                Form::Nil => None,
                Form::Pair(next) => Some(Rc::clone(next)),
                Form::Atom(_) => return Err(invalid_append(&value, first.location.clone())),
            };

            match next {
                Some(next) => current = next,
                None => {
                    *current.tail.borrow_mut() = cons(value, Form::Nil);
                    return Ok(());
                }
            }
        }
    }

    /// Iterate a list: each head in turn, then a dotted tail if there is one.
    ///
    /// `Nil` yields nothing; an atom yields itself once.
    pub fn iter(&self) -> FormIter {
        FormIter {
            rest: match self {
                Form::Nil => None,
                other => Some(other.clone()),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Form::Nil)
    }

    /// The `n`th element as seen by [`Form::iter`].
    pub fn get(&self, n: usize) -> Option<Form> {
        self.iter().nth(n)
    }

    /// The source location of this form, if it has one.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Form::Nil => None,
            Form::Atom(token) => Some(&token.location),
            Form::Pair(pair) => pair
                .location
                .as_ref()
                .or_else(|| pair.head.location()),
        }
    }
}

fn invalid_append(value: &Form, location: Option<SourceLocation>) -> CompileError {
    CompileError::InvalidAppend {
        value: value.to_string(),
        location,
    }
}

pub struct FormIter {
    rest: Option<Form>,
}

impl Iterator for FormIter {
    type Item = Form;

    fn next(&mut self) -> Option<Form> {
        match self.rest.take()? {
            Form::Pair(pair) => {
                self.rest = match pair.tail() {
                    Form::Nil => None,
                    tail => Some(tail),
                };
                Some(pair.head.clone())
            }
            // Dotted tail: yield it and stop
            other => Some(other),
        }
    }
}

/// Builds a proper list in order while holding the last pair, so each push
/// is constant time. The builder owns the only handle on the last pair, so
/// its tail is always `Nil` when pushed onto.
pub struct ListBuilder {
    first: Rc<Pair>,
    last: Rc<Pair>,
}

impl ListBuilder {
    /// Start a list whose first element is `head`.
    pub fn new(head: Form, location: Option<SourceLocation>) -> Self {
        let first = Rc::new(Pair::new(head, Form::Nil, location));
        ListBuilder {
            last: Rc::clone(&first),
            first,
        }
    }

    pub fn push(&mut self, value: Form) {
        let pair = Rc::new(Pair::new(value, Form::Nil, None));
        *self.last.tail.borrow_mut() = Form::Pair(Rc::clone(&pair));
        self.last = pair;
    }

    pub fn finish(self) -> Form {
        Form::Pair(self.first)
    }
}

impl FromIterator<Form> for Form {
    fn from_iter<I: IntoIterator<Item = Form>>(iter: I) -> Self {
        let mut iter = iter.into_iter();
        let Some(first) = iter.next() else {
            return Form::Nil;
        };

        let mut builder = ListBuilder::new(first, None);
        for form in iter {
            builder.push(form);
        }
        builder.finish()
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Form::Nil => write!(f, "nil"),
            Form::Atom(token) => write!(f, "{}", token.text),
            Form::Pair(_) => {
                write!(f, "(")?;
                let mut current = self.clone();
                while let Form::Pair(ref cell) = current {
                    write!(f, "{}", cell.head)?;
                    match cell.tail() {
                        Form::Nil => break,
                        next @ Form::Pair(_) => {
                            write!(f, " ")?;
                            current = next;
                        }
                        other => {
                            write!(f, " . {other}")?;
                            break;
                        }
                    }
                }
                write!(f, ")")
            }
        }
    }
}
