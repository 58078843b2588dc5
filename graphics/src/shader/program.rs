//! Linked program handle with a diagnostic name.

use crate::context::RenderContext;
use crate::types::{ProgramHandle, UniformLocation};

/// A linked GPU program.
///
/// Owns the handle; the GPU object is released through [`ShaderProgram::delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderProgram {
    handle: ProgramHandle,
    name: String,
}

impl ShaderProgram {
    pub fn new(handle: ProgramHandle, name: impl Into<String>) -> Self {
        Self {
            handle,
            name: name.into(),
        }
    }

    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    /// Human-readable name, used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve a uniform against this program.
    pub fn uniform_location(&self, ctx: &dyn RenderContext, name: &str) -> UniformLocation {
        let location = ctx.uniform_location(self.handle, name);
        if location.is_absent() {
            log::trace!("Program {:?}: uniform {} is absent", self.name, name);
        }
        location
    }

    pub fn bind(&self, ctx: &mut dyn RenderContext) {
        ctx.use_program(Some(self.handle));
    }

    pub fn unbind(&self, ctx: &mut dyn RenderContext) {
        ctx.use_program(None);
    }

    /// Delete the GPU program.
    pub fn delete(self, ctx: &mut dyn RenderContext) {
        log::debug!("Deleting program {:?}", self.name);
        ctx.delete_program(self.handle);
    }
}
