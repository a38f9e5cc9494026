mod error;
mod scope;
mod value;

pub use error::RuntimeError;
pub use scope::{Environment, ScopeId};
pub use value::{ObjectValue, RuntimeValue, TypeValue};

use crate::parser::{
    BinaryOperator, ComparisonOperator, Expression, Program, Statement, TypeDeclaration,
};
use crate::stack::ensure_sufficient_stack;
use tracing::{debug, trace};
use value::walk_members;

/// Every property of a freshly instantiated object starts out with this
/// value; instantiation does not bind arguments to properties.
const PLACEHOLDER_PROPERTY_VALUE: i64 = 12;

/// A node the tree-walker knows how to run.
pub trait Evaluate {
    fn evaluate(&self, env: &mut Environment, scope: ScopeId) -> Result<RuntimeValue, RuntimeError>;
}

/// Evaluates `node` in `scope`. Evaluation stops at the first error.
///
/// # Panics
///
/// Integer division or remainder by zero panics, as it does for `i64`.
pub fn evaluate(
    node: &impl Evaluate,
    env: &mut Environment,
    scope: ScopeId,
) -> Result<RuntimeValue, RuntimeError> {
    node.evaluate(env, scope)
}

impl Evaluate for Program {
    /// Runs the statements in order over one shared scope; the result is the
    /// value of the last one, or `null` for an empty program.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = self.body.len()))]
    fn evaluate(&self, env: &mut Environment, scope: ScopeId) -> Result<RuntimeValue, RuntimeError> {
        let mut last = RuntimeValue::Null;
        for statement in &self.body {
            last = statement.evaluate(env, scope)?;
        }
        debug!(result = %last, "evaluated program");
        Ok(last)
    }
}

impl Evaluate for Statement {
    fn evaluate(&self, env: &mut Environment, scope: ScopeId) -> Result<RuntimeValue, RuntimeError> {
        match self {
            Statement::VariableDeclaration(name, value) => {
                let value = match value {
                    Some(expr) => expr.evaluate(env, scope)?,
                    None => RuntimeValue::Null,
                };
                env.declare(scope, name.as_str(), value)
            }
            Statement::TypeDeclaration(decl) => evaluate_type_declaration(decl, env, scope),
            Statement::Expression(expr) => expr.evaluate(env, scope),
        }
    }
}

impl Evaluate for Expression {
    fn evaluate(&self, env: &mut Environment, scope: ScopeId) -> Result<RuntimeValue, RuntimeError> {
        ensure_sufficient_stack(|| self.evaluate_node(env, scope))
    }
}

impl Expression {
    fn evaluate_node(&self, env: &mut Environment, scope: ScopeId) -> Result<RuntimeValue, RuntimeError> {
        match self {
            Expression::NumericLiteral(value) => Ok(RuntimeValue::Number(*value)),
            Expression::NullLiteral => Ok(RuntimeValue::Null),
            Expression::Identifier(name) => env.get(scope, name.as_str()),
            Expression::Assignment(assignee, value) => {
                evaluate_assignment(assignee, value, env, scope)
            }
            Expression::BinaryOperation(op, operands) => {
                let (lhs, rhs) = operands.as_ref();
                let lhs = lhs.evaluate(env, scope)?;
                let rhs = rhs.evaluate(env, scope)?;
                Ok(arithmetic(*op, &lhs, &rhs))
            }
            Expression::Comparison(op, operands) => {
                let (lhs, rhs) = operands.as_ref();
                let lhs = lhs.evaluate(env, scope)?;
                let rhs = rhs.evaluate(env, scope)?;
                Ok(compare(*op, &lhs, &rhs))
            }
            Expression::Member(..) => {
                let path = MemberPath::of(self);
                match path.root {
                    Expression::Identifier(root) => {
                        env.resolve_member(scope, root.as_str(), &path.keys)
                    }
                    root => walk_members(root.evaluate(env, scope)?, &path.keys),
                }
            }
            Expression::Call(callee, args) => evaluate_call(callee, args, env, scope),
        }
    }
}

fn evaluate_type_declaration(
    decl: &TypeDeclaration,
    env: &mut Environment,
    scope: ScopeId,
) -> Result<RuntimeValue, RuntimeError> {
    let typ = TypeValue {
        name: decl.name.as_str().to_string(),
        properties: decl
            .properties
            .iter()
            .map(|property| property.0.as_str().to_string())
            .collect(),
    };
    env.declare(scope, decl.name.as_str(), RuntimeValue::Type(typ))
}

fn evaluate_assignment(
    assignee: &Expression,
    value: &Expression,
    env: &mut Environment,
    scope: ScopeId,
) -> Result<RuntimeValue, RuntimeError> {
    let value = value.evaluate(env, scope)?;
    match assignee {
        Expression::Member(_, property) => {
            let path = MemberPath::of(assignee);
            let Expression::Identifier(root) = path.root else {
                return Err(RuntimeError::InvalidMemberAccess {
                    property: property.to_string(),
                });
            };
            let container = env.resolve_container(scope, root.as_str(), &path.keys)?;
            container.set(property.as_str(), value.clone());
            trace!(property = %property, %value, "assigned property");
            Ok(value)
        }
        Expression::Identifier(name) => env.assign(scope, name.as_str(), value),
        other => Err(RuntimeError::InvalidAssignmentTarget {
            target: describe(other),
        }),
    }
}

/// Instantiates a type. The callee is evaluated but not invoked: the type
/// comes from the first argument, or from the callee when the first
/// argument is not a type.
fn evaluate_call(
    callee: &Expression,
    args: &[Expression],
    env: &mut Environment,
    scope: ScopeId,
) -> Result<RuntimeValue, RuntimeError> {
    let callee = callee.evaluate(env, scope)?;
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(arg.evaluate(env, scope)?);
    }

    let typ = match (values.into_iter().next(), callee) {
        (Some(RuntimeValue::Type(typ)), _) | (_, RuntimeValue::Type(typ)) => typ,
        (Some(other), _) | (None, other) => {
            return Err(RuntimeError::TypeInstantiationExpectedType {
                found: other.kind(),
            })
        }
    };

    let mut object = ObjectValue::new(typ.name.as_str(), env.child(scope));
    for property in &typ.properties {
        object.set(property, RuntimeValue::Number(PLACEHOLDER_PROPERTY_VALUE));
    }
    trace!(type_name = %typ.name, "instantiated object");
    Ok(RuntimeValue::Object(object))
}

/// Integer arithmetic on two numbers; any other pairing yields `null`.
fn arithmetic(op: BinaryOperator, lhs: &RuntimeValue, rhs: &RuntimeValue) -> RuntimeValue {
    let (RuntimeValue::Number(l), RuntimeValue::Number(r)) = (lhs, rhs) else {
        return RuntimeValue::Null;
    };
    let result = match op {
        BinaryOperator::Plus => l.wrapping_add(*r),
        BinaryOperator::Minus => l.wrapping_sub(*r),
        BinaryOperator::Times => l.wrapping_mul(*r),
        BinaryOperator::Divide => l / r,
        BinaryOperator::Modulo => l % r,
    };
    RuntimeValue::Number(result)
}

/// Integer comparison on two numbers; any other pairing yields `null`.
fn compare(op: ComparisonOperator, lhs: &RuntimeValue, rhs: &RuntimeValue) -> RuntimeValue {
    let (RuntimeValue::Number(l), RuntimeValue::Number(r)) = (lhs, rhs) else {
        return RuntimeValue::Null;
    };
    let result = match op {
        ComparisonOperator::Equal => l == r,
        ComparisonOperator::NotEqual => l != r,
        ComparisonOperator::GreaterThan => l > r,
        ComparisonOperator::GreaterThanEqual => l >= r,
        ComparisonOperator::LessThan => l < r,
        ComparisonOperator::LessThanEqual => l <= r,
    };
    RuntimeValue::Boolean(result)
}

/// A dotted access `root.a.b` flattened into its root and `["a", "b"]`.
struct MemberPath<'e> {
    root: &'e Expression,
    keys: Vec<&'e str>,
}

impl<'e> MemberPath<'e> {
    fn of(expr: &'e Expression) -> Self {
        let mut keys = Vec::new();
        let mut current = expr;
        while let Expression::Member(object, property) = current {
            keys.push(property.as_str());
            current = object;
        }
        keys.reverse();
        Self {
            root: current,
            keys,
        }
    }
}

fn describe(expr: &Expression) -> &'static str {
    match expr {
        Expression::Assignment(..) => "assignment",
        Expression::BinaryOperation(..) => "arithmetic expression",
        Expression::Comparison(..) => "comparison",
        Expression::Member(..) => "member access",
        Expression::Call(..) => "call",
        Expression::Identifier(_) => "identifier",
        Expression::NumericLiteral(_) => "number",
        Expression::NullLiteral => "null",
    }
}

/// A session that keeps one global scope alive across many units, the way
/// an interactive driver replays line after line.
#[derive(Debug, Default)]
pub struct Interpreter {
    env: Environment,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn global(&self) -> ScopeId {
        self.env.global()
    }

    pub fn evaluate(&mut self, program: &Program) -> Result<RuntimeValue, RuntimeError> {
        let global = self.env.global();
        program.evaluate(&mut self.env, global)
    }

    /// Tokenizes, parses and evaluates `source` against the session scope.
    pub fn run(&mut self, source: &str) -> Result<RuntimeValue, crate::Error> {
        let tokens = crate::tokenize(source)?;
        let program = crate::parse(&tokens)?;
        Ok(self.evaluate(&program)?)
    }
}
