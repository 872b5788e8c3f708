use super::VM;

impl VM<'_> {
    /// Emits the instruction about to execute, plus stack depths, to stderr.
    ///
    /// The trace is a diagnostic stream: it shares no sink with
    /// `DEBUG_PRINT` output, so enabling it never perturbs program output.
    pub(super) fn trace_instruction(&self) {
        let instruction = self.pc.current();
        eprintln!(
            "IP={:04} {}",
            self.pc.index(),
            instruction.describe(self.names)
        );
        let items: Vec<String> = self.eval.iter().map(|value| value.to_string()).collect();
        eprintln!(
            "  eval: [{}]  env depth: {}  ret depth: {}",
            items.join(", "),
            self.env.len(),
            self.ret.len()
        );
    }
}
