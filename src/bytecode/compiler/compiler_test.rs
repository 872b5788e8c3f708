use std::rc::Rc;

use crate::{
    ast::Expression,
    bytecode::{blob::Blob, compiler::Compiler, instruction::Instruction},
    intern::Interner,
};

fn compile(names: &Interner, expression: &Expression) -> Rc<Blob> {
    Compiler::new(names)
        .compile(expression)
        .expect("compile failed")
}

#[test]
fn literals_compile_to_pushes() {
    let names = Interner::new();

    let blob = compile(&names, &Expression::integer(42));
    assert_eq!(blob.instructions, vec![Instruction::PushInteger(42)]);

    let blob = compile(&names, &Expression::nil());
    assert_eq!(blob.instructions, vec![Instruction::PushNil]);
}

#[test]
fn declare_emits_value_then_declaration() {
    let mut names = Interner::new();
    let x = names.intern("x");

    let blob = compile(&names, &Expression::declare(x, Expression::integer(1)));
    assert_eq!(
        blob.instructions,
        vec![Instruction::PushInteger(1), Instruction::DeclareVariable(x)]
    );
}

#[test]
fn empty_block_compiles_to_push_nil() {
    let names = Interner::new();

    let blob = compile(&names, &Expression::block(vec![]));
    assert_eq!(blob.instructions, vec![Instruction::PushNil]);
}

#[test]
fn block_pops_every_statement_but_the_last() {
    let names = Interner::new();

    let blob = compile(
        &names,
        &Expression::block(vec![
            Expression::integer(1),
            Expression::integer(2),
            Expression::integer(3),
        ]),
    );
    assert_eq!(
        blob.instructions,
        vec![
            Instruction::BlockStart,
            Instruction::PushInteger(1),
            Instruction::Pop,
            Instruction::PushInteger(2),
            Instruction::Pop,
            Instruction::PushInteger(3),
            Instruction::BlockEnd,
        ]
    );
}

#[test]
fn if_targets_are_patched_to_absolute_positions() {
    let names = Interner::new();

    let blob = compile(
        &names,
        &Expression::if_else(
            Expression::nil(),
            Expression::integer(1),
            Expression::integer(2),
        ),
    );
    // 0 PUSH_NIL, 1 IF 4, 2 PUSH_INTEGER 1, 3 ELSE 5, 4 PUSH_INTEGER 2
    assert_eq!(
        blob.instructions,
        vec![
            Instruction::PushNil,
            Instruction::If(4),
            Instruction::PushInteger(1),
            Instruction::Else(5),
            Instruction::PushInteger(2),
        ]
    );
}

#[test]
fn call_compiles_arguments_before_callee() {
    let mut names = Interner::new();
    let f = names.intern("f");

    let blob = compile(
        &names,
        &Expression::call(
            Expression::variable(f),
            vec![Expression::integer(1), Expression::integer(2)],
        ),
    );
    assert_eq!(
        blob.instructions,
        vec![
            Instruction::PushInteger(1),
            Instruction::PushInteger(2),
            Instruction::PushVariable(f),
            Instruction::Call(2),
        ]
    );
}

#[test]
fn lambda_compiles_body_into_child_blob() {
    let mut names = Interner::new();
    let a = names.intern("a");

    let blob = compile(
        &names,
        &Expression::lambda(vec![a], Expression::variable(a)),
    );
    assert_eq!(blob.instructions.len(), 1);
    match &blob.instructions[0] {
        Instruction::PushFunction(child) => {
            assert_eq!(child.params, vec![a]);
            assert_eq!(child.instructions, vec![Instruction::PushVariable(a)]);
        }
        other => panic!("expected PushFunction, got {:?}", other),
    }
}

#[test]
fn duplicate_lambda_parameters_are_rejected() {
    let mut names = Interner::new();
    let a = names.intern("a");

    let err = Compiler::new(&names)
        .compile(&Expression::lambda(vec![a, a], Expression::nil()))
        .unwrap_err();
    assert_eq!(err.to_string(), "duplicate parameter `a`");
}

#[test]
fn debug_print_leaves_value_emission_intact() {
    let names = Interner::new();

    let blob = compile(&names, &Expression::debug_print(Expression::integer(7)));
    assert_eq!(
        blob.instructions,
        vec![Instruction::PushInteger(7), Instruction::DebugPrint]
    );
}

#[test]
fn recompilation_is_deterministic() {
    let mut names = Interner::new();
    let f = names.intern("f");
    let a = names.intern("a");

    let program = Expression::block(vec![
        Expression::declare(
            f,
            Expression::lambda(
                vec![a],
                Expression::if_else(
                    Expression::variable(a),
                    Expression::integer(1),
                    Expression::nil(),
                ),
            ),
        ),
        Expression::call(Expression::variable(f), vec![Expression::integer(9)]),
    ]);

    let first = compile(&names, &program);
    let second = compile(&names, &program);
    // Same length and operand sequence; blob pointer identity differs.
    assert_eq!(first.instructions, second.instructions);
    assert!(!Rc::ptr_eq(&first, &second));
}
