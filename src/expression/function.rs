//! Built-in scalar functions and their argument contracts.
//!
//! Every function declares one type per argument position. A value bound to a
//! `?` placeholder must carry exactly that type. Values produced inside the
//! statement (literals, nested calls) may additionally use the types listed in
//! [`ScalarFunction::accepted_types`]. NULL is always accepted and yields NULL.

use crate::access::{DataType, Value};
use crate::expression::date::{format_date, DateParser};
use crate::expression::{CompileError, CompileResult};

/// Static description of a function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: &'static str,
    pub arg_types: &'static [DataType],
    pub return_type: DataType,
}

/// Settings shared by function evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunctionContext {
    pub date_parser: DateParser,
}

/// Built-in scalar functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarFunction {
    /// `TO_DATE(text)`: parse `yyyy-M-d[ H:mm:ss]` into a date
    ToDate,
    /// `TO_CHAR(date)`: render a date as `yyyy-MM-dd HH:mm:ss`
    ToChar,
    /// `TO_NUMBER(text)`: parse a decimal number
    ToNumber,
}

impl ScalarFunction {
    pub const ALL: [ScalarFunction; 3] = [
        ScalarFunction::ToDate,
        ScalarFunction::ToChar,
        ScalarFunction::ToNumber,
    ];

    /// Find a function by case-insensitive name
    pub fn lookup(name: &str) -> Option<ScalarFunction> {
        Self::ALL
            .into_iter()
            .find(|func| func.name().eq_ignore_ascii_case(name))
    }

    /// Like [`ScalarFunction::lookup`] but fails for unknown names
    pub fn resolve(name: &str) -> CompileResult<ScalarFunction> {
        Self::lookup(name).ok_or_else(|| CompileError::UnknownFunction {
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &'static str {
        self.signature().name
    }

    pub fn signature(&self) -> FunctionSignature {
        match self {
            ScalarFunction::ToDate => FunctionSignature {
                name: "TO_DATE",
                arg_types: &[DataType::Varchar],
                return_type: DataType::Date,
            },
            ScalarFunction::ToChar => FunctionSignature {
                name: "TO_CHAR",
                arg_types: &[DataType::Date],
                return_type: DataType::Varchar,
            },
            ScalarFunction::ToNumber => FunctionSignature {
                name: "TO_NUMBER",
                arg_types: &[DataType::Varchar],
                return_type: DataType::Double,
            },
        }
    }

    /// Types accepted at `position` for values produced inside the statement
    pub fn accepted_types(&self, position: usize) -> &'static [DataType] {
        match (self, position) {
            (ScalarFunction::ToDate, 0) => &[DataType::Varchar, DataType::Date],
            (ScalarFunction::ToChar, 0) => &[DataType::Date],
            (ScalarFunction::ToNumber, 0) => &[DataType::Varchar],
            _ => &[],
        }
    }

    pub fn check_arity(&self, actual: usize) -> CompileResult<()> {
        let expected = self.signature().arg_types.len();
        if actual != expected {
            return Err(CompileError::ArgumentCount {
                function: self.name().to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Check a value supplied through a bind parameter at `position` (0-based).
    ///
    /// Positions beyond the signature are left to [`ScalarFunction::check_arity`].
    pub fn check_bound_argument(&self, position: usize, value: &Value) -> CompileResult<()> {
        let (Some(expected), Some(actual)) = (
            self.signature().arg_types.get(position).copied(),
            value.data_type(),
        ) else {
            return Ok(());
        };
        if actual != expected {
            return Err(self.mismatch(position, actual));
        }
        Ok(())
    }

    /// Check a value produced inside the statement at `position` (0-based)
    pub fn check_argument(&self, position: usize, value: &Value) -> CompileResult<()> {
        match value.data_type() {
            None => Ok(()),
            Some(actual) if self.accepted_types(position).contains(&actual) => Ok(()),
            Some(actual) => Err(self.mismatch(position, actual)),
        }
    }

    /// Evaluate the function over fully typed argument values
    pub fn evaluate(&self, args: &[Value], context: &FunctionContext) -> CompileResult<Value> {
        self.check_arity(args.len())?;
        for (position, arg) in args.iter().enumerate() {
            self.check_argument(position, arg)?;
        }
        if args.iter().any(Value::is_null) {
            return Ok(Value::Null);
        }

        match (self, &args[0]) {
            (ScalarFunction::ToDate, Value::String(text)) => {
                Ok(Value::Date(context.date_parser.parse(text)?))
            }
            (ScalarFunction::ToDate, Value::Date(date)) => Ok(Value::Date(*date)),
            (ScalarFunction::ToChar, Value::Date(date)) => Ok(Value::String(format_date(date))),
            (ScalarFunction::ToNumber, Value::String(text)) => parse_number(text),
            (_, other) => Err(self.mismatch(0, other.data_type().unwrap_or(DataType::Varchar))),
        }
    }

    fn mismatch(&self, position: usize, actual: DataType) -> CompileError {
        let expected = self
            .signature()
            .arg_types
            .get(position)
            .copied()
            .unwrap_or(actual);
        CompileError::TypeMismatch {
            function: self.name().to_string(),
            position: position + 1,
            expected,
            actual,
        }
    }
}

fn parse_number(text: &str) -> CompileResult<Value> {
    let fail = |reason: String| CompileError::Parse {
        input: text.to_string(),
        target: DataType::Double,
        reason,
    };
    let number = text.trim().parse::<f64>().map_err(|e| fail(e.to_string()))?;
    if !number.is_finite() {
        return Err(fail("not a finite number".to_string()));
    }
    Ok(Value::Double(number))
}
