use std::{env, process};

use sable::{
    ast::Expression,
    bytecode::compiler::Compiler,
    intern::Interner,
    runtime::{gc::GcMode, vm::VM},
};

/// Builds the demo program: literals, scoping, branching, and a closure
/// called twice.
fn demo_program(names: &mut Interner) -> Expression {
    let x = names.intern("x");
    let f = names.intern("f");
    let a = names.intern("a");

    Expression::block(vec![
        Expression::debug_print(Expression::integer(124124)),
        Expression::debug_print(Expression::integer(7)),
        Expression::debug_print(Expression::if_else(
            Expression::nil(),
            Expression::integer(11111),
            Expression::integer(222222),
        )),
        Expression::declare(x, Expression::integer(55371)),
        Expression::debug_print(Expression::variable(x)),
        Expression::declare(
            f,
            Expression::lambda(
                vec![a],
                Expression::block(vec![Expression::debug_print(Expression::variable(a))]),
            ),
        ),
        Expression::call(Expression::variable(f), vec![Expression::integer(777777)]),
        Expression::call(
            Expression::variable(f),
            vec![Expression::integer(9999999999)],
        ),
        Expression::debug_print(Expression::nil()),
    ])
}

fn print_help() {
    println!("Usage: sable [options]");
    println!();
    println!("Runs the built-in demo program.");
    println!();
    println!("Options:");
    println!("  --dump        print the compiled bytecode to stderr before running");
    println!("  --trace       trace each instruction to stderr as it executes");
    println!("  --gc-stress   collect before every instruction instead of on threshold");
    println!("  -h, --help    show this help");
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return;
    }
    let dump = args.iter().any(|arg| arg == "--dump");
    let trace = args.iter().any(|arg| arg == "--trace");
    let gc_stress = args.iter().any(|arg| arg == "--gc-stress");

    let mut names = Interner::new();
    let program = demo_program(&mut names);

    let blob = match Compiler::new(&names).compile(&program) {
        Ok(blob) => blob,
        Err(err) => {
            eprintln!("compile error: {}", err);
            process::exit(1);
        }
    };

    if dump {
        eprintln!("{}", blob.disassemble(&names));
    }

    let mut vm = VM::new(blob, &names);
    vm.set_trace(trace);
    if gc_stress {
        vm.set_gc_mode(GcMode::Debug);
    }

    if let Err(err) = vm.run() {
        eprintln!("runtime error: {}", err);
        process::exit(1);
    }
}
