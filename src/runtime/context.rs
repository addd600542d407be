/// Evaluator-side services. Currently just the output stream.
pub trait Context {
    fn output(&mut self) -> &mut String;
}

/// Collects everything the program prints.
#[derive(Debug, Default)]
pub struct SimpleContext {
    output: String,
}

impl SimpleContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_output(self) -> String {
        self.output
    }
}

impl Context for SimpleContext {
    fn output(&mut self) -> &mut String {
        &mut self.output
    }
}

/// Swallows output. Used while rendering values inside `print`, so that
/// `print` statements executed by a nested `__str__` never reach program
/// output.
#[derive(Debug, Default)]
pub struct DummyContext {
    output: String,
}

impl DummyContext {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Context for DummyContext {
    fn output(&mut self) -> &mut String {
        &mut self.output
    }
}
