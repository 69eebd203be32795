//! Ordered container of modules

use super::Module;
use crate::Tensor;

/// Applies its modules in order
#[derive(Default)]
pub struct Sequential {
    modules: Vec<Box<dyn Module>>,
}

impl Sequential {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a module (builder style)
    pub fn with(mut self, module: impl Module + 'static) -> Self {
        self.push(module);
        self
    }

    pub fn push(&mut self, module: impl Module + 'static) {
        self.modules.push(Box::new(module));
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Keep only the first `len` modules
    pub fn truncate(&mut self, len: usize) {
        self.modules.truncate(len);
    }

    /// Stop gradient tracking on every parameter
    pub fn freeze(&mut self) {
        for param in self.parameters_mut() {
            param.set_requires_grad(false);
        }
    }

    /// Names of the contained modules, in order
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name()).collect()
    }
}

impl Module for Sequential {
    fn forward(&self, input: &Tensor) -> Tensor {
        self.modules.iter().fold(input.clone(), |x, module| module.forward(&x))
    }

    fn parameters(&self) -> Vec<&Tensor> {
        self.modules.iter().flat_map(|m| m.parameters()).collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        self.modules.iter_mut().flat_map(|m| m.parameters_mut()).collect()
    }

    fn name(&self) -> &str {
        "Sequential"
    }
}
