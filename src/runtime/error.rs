/// Fatal runtime errors.
///
/// The VM makes no attempt to unwind or continue: the first error aborts the
/// run and propagates to the host as-is.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("undefined name `{name}`")]
    UndefinedName { name: String },
    #[error("name `{name}` already declared in this scope")]
    Redeclaration { name: String },
    #[error("not callable: {type_name}")]
    NotCallable { type_name: &'static str },
    #[error("wrong number of arguments: want={want}, got={got}")]
    WrongArity { want: usize, got: usize },
    #[error("invalid instruction: {op}")]
    InvalidInstruction { op: &'static str },
    #[error("stack underflow")]
    StackUnderflow,
}
