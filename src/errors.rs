use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("syntax error on line: {line}")]
    SyntaxError { line: usize },

    #[error("register out of range on line {line}: {name}")]
    RegisterOutOfRange { line: usize, name: String },

    #[error("immediate out of range for {field} on line {line}: {value}")]
    ImmediateOutOfRange {
        line: usize,
        field: &'static str,
        value: i64,
    },

    #[error("misaligned branch target on line {line}: {value}")]
    MisalignedBranchTarget { line: usize, value: i64 },

    #[error("unknown label \"{name}\" on line {line}")]
    UnknownGlobalLabel { line: usize, name: String },

    #[error("unknown local label {name}{direction} on line {line}")]
    UnknownLocalLabel {
        line: usize,
        name: u32,
        direction: char,
    },

    #[error(
        "pass divergence at instruction {index}: pass 1 pc 0x{pass1_pc:08x}, pass 2 pc 0x{pass2_pc:08x}"
    )]
    PassDivergence {
        index: usize,
        pass1_pc: u32,
        pass2_pc: u32,
    },

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}
