use std::rc::Rc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mython::ast::{ArithmeticOp, Expression, Statement};
use mython::interpreter::Interpreter;
use mython::runtime::{Class, Comparator, Method};

fn var(name: &str) -> Expression {
    Expression::Variable(vec![name.to_string()])
}

fn fib_call(arg: Expression) -> Expression {
    Expression::MethodCall {
        object: Box::new(var("self")),
        method: "fib".to_string(),
        args: vec![arg],
    }
}

fn sub(lhs: Expression, rhs: i64) -> Expression {
    Expression::Arithmetic {
        op: ArithmeticOp::Sub,
        lhs: Box::new(lhs),
        rhs: Box::new(Expression::Number(rhs)),
    }
}

/// `class Math` with a recursive `fib`, called from the top level.
fn fib_program(n: i64) -> Vec<Statement> {
    let body = Statement::MethodBody(Box::new(Statement::Compound(vec![
        Statement::IfElse {
            condition: Expression::Comparison {
                op: Comparator::Less,
                lhs: Box::new(var("n")),
                rhs: Box::new(Expression::Number(2)),
            },
            then_body: Box::new(Statement::Return(var("n"))),
            else_body: None,
        },
        Statement::Return(Expression::Arithmetic {
            op: ArithmeticOp::Add,
            lhs: Box::new(fib_call(sub(var("n"), 1))),
            rhs: Box::new(fib_call(sub(var("n"), 2))),
        }),
    ])));
    let class = Rc::new(Class::new(
        "Math",
        vec![Method::new("fib", vec!["n".to_string()], body)],
        None,
    ));
    vec![
        Statement::ClassDefinition(Rc::clone(&class)),
        Statement::Print(vec![Expression::MethodCall {
            object: Box::new(Expression::NewInstance {
                class,
                args: Vec::new(),
            }),
            method: "fib".to_string(),
            args: vec![Expression::Number(n)],
        }]),
    ]
}

fn bench_interpreter(c: &mut Criterion) {
    let program = fib_program(15);
    let interpreter = Interpreter::new();

    c.bench_function("interpreter_recursive_fib", |b| {
        b.iter(|| {
            let output = interpreter.run(black_box(&program)).expect("run");
            black_box(output);
        })
    });
}

criterion_group!(benches, bench_interpreter);
criterion_main!(benches);
