//! Arithmetic capability: add, subtract, multiply, divide on two numbers.

use crate::adapters::registry::{AdapterError, CapabilityAdapter};
use crate::plan::types::{Capability, StepValue};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::str::FromStr;
use strum::{Display, EnumString};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ArithmeticError {
    #[error("unsupported operation: '{0}' (supported: add, subtract, multiply, divide)")]
    UnsupportedOperator(String),
    #[error("division by zero")]
    DivisionByZero,
}

/// Supported operators, with the spellings the planner tends to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Operator {
    #[strum(to_string = "add", serialize = "addition", serialize = "+")]
    Add,
    #[strum(to_string = "subtract", serialize = "subtraction", serialize = "-")]
    Subtract,
    #[strum(to_string = "multiply", serialize = "multiplication", serialize = "*")]
    Multiply,
    #[strum(to_string = "divide", serialize = "division", serialize = "/")]
    Divide,
}

/// Perform one calculation. Pure; the only failure is divide-by-zero.
pub fn calculate(op: Operator, a: f64, b: f64) -> Result<f64, ArithmeticError> {
    match op {
        Operator::Add => Ok(a + b),
        Operator::Subtract => Ok(a - b),
        Operator::Multiply => Ok(a * b),
        Operator::Divide => {
            if b == 0.0 {
                Err(ArithmeticError::DivisionByZero)
            } else {
                Ok(a / b)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct CalculateParams {
    op: String,
    a: f64,
    b: f64,
}

pub struct CalculatorAdapter;

impl CalculatorAdapter {
    pub fn new() -> Self {
        CalculatorAdapter
    }
}

impl Default for CalculatorAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CapabilityAdapter for CalculatorAdapter {
    fn capability(&self) -> Capability {
        Capability::Calculate
    }

    async fn execute(&self, arguments: &Map<String, Value>) -> Result<StepValue, AdapterError> {
        let params: CalculateParams = serde_json::from_value(Value::Object(arguments.clone()))
            .map_err(|e| AdapterError::InvalidArguments(e.to_string()))?;

        let op = Operator::from_str(params.op.trim())
            .map_err(|_| ArithmeticError::UnsupportedOperator(params.op.clone()))?;

        let result = calculate(op, params.a, params.b)?;
        log::debug!("[CALC] {} {} {} = {}", params.a, op, params.b, result);
        Ok(StepValue::Number(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_operations() {
        assert_eq!(calculate(Operator::Add, 10.0, 20.0).unwrap(), 30.0);
        assert_eq!(calculate(Operator::Subtract, 10.0, 4.0).unwrap(), 6.0);
        assert_eq!(calculate(Operator::Multiply, 12.0, 12.0).unwrap(), 144.0);
        assert_eq!(calculate(Operator::Multiply, 5.0, 0.0).unwrap(), 0.0);
        assert_eq!(calculate(Operator::Divide, 10.0, 4.0).unwrap(), 2.5);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            calculate(Operator::Divide, 10.0, 0.0),
            Err(ArithmeticError::DivisionByZero)
        );
    }

    #[test]
    fn test_operator_aliases() {
        assert_eq!(Operator::from_str("add").unwrap(), Operator::Add);
        assert_eq!(Operator::from_str("Addition").unwrap(), Operator::Add);
        assert_eq!(Operator::from_str("+").unwrap(), Operator::Add);
        assert_eq!(Operator::from_str("MULTIPLY").unwrap(), Operator::Multiply);
        assert_eq!(Operator::from_str("*").unwrap(), Operator::Multiply);
        assert_eq!(Operator::from_str("division").unwrap(), Operator::Divide);
        assert!(Operator::from_str("modulo").is_err());
    }

    #[tokio::test]
    async fn test_adapter_executes_calculation() {
        let adapter = CalculatorAdapter::new();
        let arguments = serde_json::json!({"op": "add", "a": 10, "b": 20});
        let Value::Object(arguments) = arguments else { unreachable!() };

        let value = adapter.execute(&arguments).await.unwrap();
        assert_eq!(value, StepValue::Number(30.0));
    }

    #[tokio::test]
    async fn test_adapter_rejects_unsupported_operator() {
        let adapter = CalculatorAdapter::new();
        let arguments = serde_json::json!({"op": "exponent", "a": 2, "b": 8});
        let Value::Object(arguments) = arguments else { unreachable!() };

        let error = adapter.execute(&arguments).await.unwrap_err();
        assert!(matches!(
            error,
            AdapterError::Arithmetic(ArithmeticError::UnsupportedOperator(_))
        ));
    }

    #[tokio::test]
    async fn test_adapter_rejects_malformed_arguments() {
        let adapter = CalculatorAdapter::new();
        let arguments = serde_json::json!({"op": "add", "a": "ten"});
        let Value::Object(arguments) = arguments else { unreachable!() };

        let error = adapter.execute(&arguments).await.unwrap_err();
        assert!(matches!(error, AdapterError::InvalidArguments(_)));
    }
}
