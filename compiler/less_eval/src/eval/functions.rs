//! Built-in functions.
//!
//! Calls to names not listed here are kept as plain CSS function calls with
//! their arguments evaluated.

use less_ir::{Color, Expr, Printer};

use crate::errors::{invalid_operation, wrong_arg_count, LessResult};

/// Apply a built-in function to evaluated arguments.
///
/// Returns `Ok(None)` when `name` is not a built-in.
pub(super) fn call_builtin(
    name: &str,
    args: &[Expr],
    printer: &Printer<'_>,
) -> LessResult<Option<Expr>> {
    let value = match name.to_ascii_lowercase().as_str() {
        "iscolor" => test_type(name, args, |e| matches!(e, Expr::Color(_)))?,
        "isnumber" => test_type(name, args, |e| matches!(e, Expr::Dimension { .. }))?,
        "isstring" => test_type(name, args, |e| matches!(e, Expr::Quoted(_)))?,
        "iskeyword" => test_type(name, args, |e| matches!(e, Expr::Keyword(_)))?,
        "isurl" => test_type(name, args, |e| matches!(e, Expr::Url(_)))?,
        "ispixel" => test_type(name, args, |e| has_unit(e, "px"))?,
        "isem" => test_type(name, args, |e| has_unit(e, "em"))?,
        "ispercentage" => test_type(name, args, |e| has_unit(e, "%"))?,
        "isunit" => {
            let [value, unit] = args else {
                return Err(wrong_arg_count(name, 2, args.len()));
            };
            Expr::Boolean(has_unit(value, &unit_text(unit, printer)))
        }
        "percentage" => {
            let [value] = args else {
                return Err(wrong_arg_count(name, 1, args.len()));
            };
            Expr::dimension(number(name, value, printer)? * 100.0, Some("%"))
        }
        "unit" => match args {
            [value] => Expr::dimension(number(name, value, printer)?, None),
            [value, unit] => {
                let unit = unit_text(unit, printer);
                let unit = (!unit.is_empty()).then_some(unit.as_str());
                Expr::dimension(number(name, value, printer)?, unit)
            }
            _ => return Err(wrong_arg_count(name, 2, args.len())),
        },
        "rgb" => {
            let [r, g, b] = args else {
                return Err(wrong_arg_count(name, 3, args.len()));
            };
            Expr::Color(Color::clamped(
                channel(name, r, printer)?,
                channel(name, g, printer)?,
                channel(name, b, printer)?,
                1.0,
            ))
        }
        "rgba" => {
            let [r, g, b, a] = args else {
                return Err(wrong_arg_count(name, 4, args.len()));
            };
            Expr::Color(Color::clamped(
                channel(name, r, printer)?,
                channel(name, g, printer)?,
                channel(name, b, printer)?,
                alpha(name, a, printer)?,
            ))
        }
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn test_type(name: &str, args: &[Expr], test: impl Fn(&Expr) -> bool) -> LessResult<Expr> {
    match args {
        [value] => Ok(Expr::Boolean(test(value))),
        _ => Err(wrong_arg_count(name, 1, args.len())),
    }
}

fn has_unit(value: &Expr, expected: &str) -> bool {
    matches!(value, Expr::Dimension { unit: Some(unit), .. } if unit == expected)
}

/// Unit named by an argument: a keyword, a string or a dimension's own unit.
fn unit_text(unit: &Expr, printer: &Printer<'_>) -> String {
    match unit {
        Expr::Quoted(quoted) => printer.quoted_content(quoted),
        Expr::Dimension { unit, .. } => unit.clone().unwrap_or_default(),
        other => printer.expr(other),
    }
}

fn number(name: &str, value: &Expr, printer: &Printer<'_>) -> LessResult<f64> {
    match value {
        Expr::Dimension { value, .. } => Ok(*value),
        other => Err(invalid_operation(format!(
            "{name}() expects a number, found {}",
            printer.expr(other)
        ))),
    }
}

/// Color channel; percentages scale to `0..=255`.
fn channel(name: &str, value: &Expr, printer: &Printer<'_>) -> LessResult<f64> {
    let n = number(name, value, printer)?;
    Ok(if has_unit(value, "%") { n * 2.55 } else { n })
}

fn alpha(name: &str, value: &Expr, printer: &Printer<'_>) -> LessResult<f64> {
    let n = number(name, value, printer)?;
    Ok(if has_unit(value, "%") { n / 100.0 } else { n })
}
