//! Built-in native modules.
//!
//! - `Core` (`stitch.core`): `Print`, `Len`, `Str`, `Int`, `Double`, `Type`
//! - `Math` (`stitch.math`): `Abs`, `Max`, `Min`, `Pow`, `Sqrt`, `Floor`, `Ceiling`

use stitch_foundation::{Error, ErrorKind, ModuleRef, NativeModule, Result, Value};

/// Name of the core module.
pub const CORE_MODULE: &str = "stitch.core";
/// Name of the math module.
pub const MATH_MODULE: &str = "stitch.math";

/// Returns a reference to the core module.
#[must_use]
pub fn core_module() -> ModuleRef {
    ModuleRef::new(CoreModule)
}

/// Returns a reference to the math module.
#[must_use]
pub fn math_module() -> ModuleRef {
    ModuleRef::new(MathModule)
}

/// Checks that a native function received exactly `expected` arguments.
///
/// # Errors
///
/// Returns an arity mismatch otherwise.
pub fn expect_arity(function: &str, args: &[Value], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(Error::arity_mismatch(function, expected.to_string(), args.len()))
    }
}

fn number(function: &str, value: &Value) -> Result<f64> {
    value.as_number().ok_or_else(|| {
        Error::type_mismatch("number", value.type_name())
            .with_context(stitch_foundation::ErrorContext::new().with_frame(function))
    })
}

/// General-purpose functions, imported by default.
pub struct CoreModule;

impl CoreModule {
    const FUNCTIONS: &'static [&'static str] = &["Print", "Len", "Str", "Int", "Double", "Type"];
}

impl NativeModule for CoreModule {
    fn name(&self) -> &str {
        CORE_MODULE
    }

    fn namespace(&self) -> &str {
        "Core"
    }

    fn has_function(&self, function: &str) -> bool {
        Self::FUNCTIONS.contains(&function)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn call(&self, function: &str, args: &[Value]) -> Result<Value> {
        match function {
            "Print" => {
                let line: Vec<String> = args.iter().map(ToString::to_string).collect();
                println!("{}", line.join(" "));
                Ok(Value::Null)
            }
            "Len" => {
                expect_arity(function, args, 1)?;
                match &args[0] {
                    Value::String(s) => Ok(Value::Int(s.chars().count() as i64)),
                    Value::List(items) => Ok(Value::Int(items.len() as i64)),
                    other => Err(Error::type_mismatch("string or list", other.type_name())),
                }
            }
            "Str" => {
                expect_arity(function, args, 1)?;
                Ok(Value::string(args[0].to_string()))
            }
            "Int" => {
                expect_arity(function, args, 1)?;
                match &args[0] {
                    Value::Int(n) => Ok(Value::Int(*n)),
                    Value::Float(f) if f.is_finite() => Ok(Value::Int(f.trunc() as i64)),
                    Value::String(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
                        Error::invalid_argument(format!("cannot convert {s:?} to int"))
                    }),
                    other => Err(Error::type_mismatch("number or string", other.type_name())),
                }
            }
            "Double" => {
                expect_arity(function, args, 1)?;
                match &args[0] {
                    Value::String(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| {
                        Error::invalid_argument(format!("cannot convert {s:?} to double"))
                    }),
                    other => number(function, other).map(Value::Float),
                }
            }
            "Type" => {
                expect_arity(function, args, 1)?;
                Ok(Value::string(args[0].type_name()))
            }
            _ => Err(Error::undefined_function(format!("Core.{function}"))),
        }
    }
}

/// Numeric functions.
pub struct MathModule;

impl MathModule {
    const FUNCTIONS: &'static [&'static str] =
        &["Abs", "Max", "Min", "Pow", "Sqrt", "Floor", "Ceiling"];
}

impl NativeModule for MathModule {
    fn name(&self) -> &str {
        MATH_MODULE
    }

    fn namespace(&self) -> &str {
        "Math"
    }

    fn has_function(&self, function: &str) -> bool {
        Self::FUNCTIONS.contains(&function)
    }

    fn call(&self, function: &str, args: &[Value]) -> Result<Value> {
        match function {
            "Abs" => {
                expect_arity(function, args, 1)?;
                match &args[0] {
                    Value::Int(n) => n
                        .checked_abs()
                        .map(Value::Int)
                        .ok_or_else(|| Error::new(ErrorKind::Overflow)),
                    other => number(function, other).map(|n| Value::Float(n.abs())),
                }
            }
            "Max" | "Min" => {
                expect_arity(function, args, 2)?;
                let pick_max = function == "Max";
                match (&args[0], &args[1]) {
                    (Value::Int(a), Value::Int(b)) => {
                        Ok(Value::Int(if pick_max { *a.max(b) } else { *a.min(b) }))
                    }
                    (a, b) => {
                        let (a, b) = (number(function, a)?, number(function, b)?);
                        Ok(Value::Float(if pick_max { a.max(b) } else { a.min(b) }))
                    }
                }
            }
            "Pow" => {
                expect_arity(function, args, 2)?;
                let (base, exp) = (number(function, &args[0])?, number(function, &args[1])?);
                Ok(Value::Float(base.powf(exp)))
            }
            "Sqrt" => {
                expect_arity(function, args, 1)?;
                let n = number(function, &args[0])?;
                if n < 0.0 {
                    return Err(Error::invalid_argument(format!(
                        "cannot take the square root of {n}"
                    )));
                }
                Ok(Value::Float(n.sqrt()))
            }
            "Floor" => {
                expect_arity(function, args, 1)?;
                number(function, &args[0]).map(|n| Value::Float(n.floor()))
            }
            "Ceiling" => {
                expect_arity(function, args, 1)?;
                number(function, &args[0]).map(|n| Value::Float(n.ceil()))
            }
            _ => Err(Error::undefined_function(format!("Math.{function}"))),
        }
    }
}
