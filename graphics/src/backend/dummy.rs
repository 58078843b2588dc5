//! Dummy render context for testing and development.
//!
//! This backend doesn't perform actual GPU operations. It keeps uploaded
//! vertex bytes, remembers every uniform value per program, and records
//! each call in order so tests can assert on exactly what a component
//! asked the GPU to do.

use std::collections::HashMap;

use tessera_core::math::Mat4;
use tessera_core::mesh::{PrimitiveTopology, VertexFormat};

use crate::context::RenderContext;
use crate::error::GraphicsError;
use crate::types::{BufferHandle, BufferUsage, FogState, ProgramHandle, UniformLocation};

/// A uniform value as uploaded through the context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4([f32; 16]),
}

/// One call made against a [`DummyContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    UseProgram(Option<ProgramHandle>),
    Uniform {
        /// Program bound when the uniform was set.
        program: Option<ProgramHandle>,
        location: UniformLocation,
        value: UniformValue,
    },
    Upload {
        buffer: BufferHandle,
        len: usize,
        usage: BufferUsage,
    },
    Draw {
        buffer: BufferHandle,
        topology: PrimitiveTopology,
        first: u32,
        count: u32,
        stride: usize,
    },
    ReleaseBuffer(BufferHandle),
    DeleteProgram(ProgramHandle),
}

#[derive(Debug)]
struct DummyProgram {
    name: String,
    uniforms: Vec<String>,
}

#[derive(Debug)]
struct DummyBuffer {
    data: Vec<u8>,
    usage: BufferUsage,
}

/// Dummy render context.
#[derive(Debug)]
pub struct DummyContext {
    programs: HashMap<u64, DummyProgram>,
    buffers: HashMap<u64, DummyBuffer>,
    uniform_values: HashMap<(u64, i32), UniformValue>,
    bound: Option<ProgramHandle>,
    projection: Mat4,
    fog: FogState,
    calls: Vec<RecordedCall>,
    next_id: u64,
    uploads_left: Option<usize>,
}

impl Default for DummyContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyContext {
    /// Create a new dummy context with an identity projection and no fog.
    pub fn new() -> Self {
        Self {
            programs: HashMap::new(),
            buffers: HashMap::new(),
            uniform_values: HashMap::new(),
            bound: None,
            projection: Mat4::identity(),
            fog: FogState::default(),
            calls: Vec::new(),
            next_id: 1,
            uploads_left: None,
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// "Link" a program declaring the given uniforms.
    ///
    /// Locations are assigned in declaration order starting at zero.
    pub fn create_program(&mut self, name: &str, uniforms: &[&str]) -> ProgramHandle {
        let id = self.allocate_id();
        log::trace!(
            "DummyContext: creating program {:?} with {} uniforms",
            name,
            uniforms.len()
        );
        self.programs.insert(
            id,
            DummyProgram {
                name: name.to_string(),
                uniforms: uniforms.iter().map(|u| u.to_string()).collect(),
            },
        );
        ProgramHandle::from_raw(id)
    }

    /// Name a program was created with.
    pub fn program_name(&self, program: ProgramHandle) -> Option<&str> {
        self.programs.get(&program.raw()).map(|p| p.name.as_str())
    }

    /// Whether a program is still alive.
    pub fn has_program(&self, program: ProgramHandle) -> bool {
        self.programs.contains_key(&program.raw())
    }

    /// Currently bound program.
    pub fn bound_program(&self) -> Option<ProgramHandle> {
        self.bound
    }

    pub fn set_projection_matrix(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    pub fn set_fog_state(&mut self, fog: FogState) {
        self.fog = fog;
    }

    /// Make uploads fail with [`GraphicsError::OutOfMemory`] after `n` more
    /// successful ones.
    pub fn fail_uploads_after(&mut self, n: usize) {
        self.uploads_left = Some(n);
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    /// Drain the recorded calls.
    pub fn take_calls(&mut self) -> Vec<RecordedCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Bytes of a live uploaded buffer.
    pub fn uploaded(&self, buffer: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&buffer.raw()).map(|b| b.data.as_slice())
    }

    /// Usage flags a live buffer was uploaded with.
    pub fn buffer_usage(&self, buffer: BufferHandle) -> Option<BufferUsage> {
        self.buffers.get(&buffer.raw()).map(|b| b.usage)
    }

    /// Number of buffers uploaded and not yet released.
    pub fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Last value uploaded for a named uniform of a program.
    pub fn last_uniform(&self, program: ProgramHandle, name: &str) -> Option<UniformValue> {
        let location = self.uniform_location(program, name);
        if location.is_absent() {
            return None;
        }
        self.uniform_values
            .get(&(program.raw(), location.raw()))
            .copied()
    }

    /// Draw calls recorded so far.
    pub fn draw_calls(&self) -> impl Iterator<Item = &RecordedCall> {
        self.calls
            .iter()
            .filter(|call| matches!(call, RecordedCall::Draw { .. }))
    }

    fn record_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        log::trace!("DummyContext: uniform {} = {:?}", location.raw(), value);
        if let Some(program) = self.bound {
            self.uniform_values
                .insert((program.raw(), location.raw()), value);
        }
        self.calls.push(RecordedCall::Uniform {
            program: self.bound,
            location,
            value,
        });
    }
}

impl RenderContext for DummyContext {
    fn name(&self) -> &'static str {
        "Dummy"
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> UniformLocation {
        self.programs
            .get(&program.raw())
            .and_then(|p| p.uniforms.iter().position(|u| u == name))
            .map(|index| UniformLocation::from_raw(index as i32))
            .unwrap_or(UniformLocation::ABSENT)
    }

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        log::trace!("DummyContext: use program {:?}", program);
        self.bound = program;
        self.calls.push(RecordedCall::UseProgram(program));
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        log::trace!("DummyContext: deleting program {:?}", program);
        self.programs.remove(&program.raw());
        self.uniform_values.retain(|(id, _), _| *id != program.raw());
        if self.bound == Some(program) {
            self.bound = None;
        }
        self.calls.push(RecordedCall::DeleteProgram(program));
    }

    fn set_uniform_i32(&mut self, location: UniformLocation, value: i32) {
        self.record_uniform(location, UniformValue::Int(value));
    }

    fn set_uniform_f32(&mut self, location: UniformLocation, value: f32) {
        self.record_uniform(location, UniformValue::Float(value));
    }

    fn set_uniform_vec2(&mut self, location: UniformLocation, value: [f32; 2]) {
        self.record_uniform(location, UniformValue::Vec2(value));
    }

    fn set_uniform_vec3(&mut self, location: UniformLocation, value: [f32; 3]) {
        self.record_uniform(location, UniformValue::Vec3(value));
    }

    fn set_uniform_vec4(&mut self, location: UniformLocation, value: [f32; 4]) {
        self.record_uniform(location, UniformValue::Vec4(value));
    }

    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &[f32; 16]) {
        self.record_uniform(location, UniformValue::Mat4(*value));
    }

    fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    fn fog_state(&self) -> FogState {
        self.fog
    }

    fn upload_vertices(
        &mut self,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<BufferHandle, GraphicsError> {
        if let Some(left) = self.uploads_left.as_mut() {
            if *left == 0 {
                log::trace!("DummyContext: simulated out of memory");
                return Err(GraphicsError::OutOfMemory);
            }
            *left -= 1;
        }
        if !usage.contains(BufferUsage::VERTEX) {
            return Err(GraphicsError::InvalidParameter(format!(
                "buffer usage {usage:?} lacks VERTEX"
            )));
        }

        let id = self.allocate_id();
        let buffer = BufferHandle::from_raw(id);
        log::trace!(
            "DummyContext: uploading buffer {} ({} bytes, {:?})",
            id,
            data.len(),
            usage
        );
        self.buffers.insert(
            id,
            DummyBuffer {
                data: data.to_vec(),
                usage,
            },
        );
        self.calls.push(RecordedCall::Upload {
            buffer,
            len: data.len(),
            usage,
        });
        Ok(buffer)
    }

    fn draw_arrays(
        &mut self,
        buffer: BufferHandle,
        format: &VertexFormat,
        topology: PrimitiveTopology,
        first: u32,
        count: u32,
    ) -> Result<(), GraphicsError> {
        let stored = self.buffers.get(&buffer.raw()).ok_or_else(|| {
            GraphicsError::InvalidParameter(format!("unknown buffer {}", buffer.raw()))
        })?;
        let stride = format.stride();
        let end = (first as usize + count as usize) * stride;
        if end > stored.data.len() {
            return Err(GraphicsError::InvalidParameter(format!(
                "draw reads {} bytes from a {} byte buffer",
                end,
                stored.data.len()
            )));
        }

        log::trace!(
            "DummyContext: draw {:?} first={} count={} stride={}",
            topology,
            first,
            count,
            stride
        );
        self.calls.push(RecordedCall::Draw {
            buffer,
            topology,
            first,
            count,
            stride,
        });
        Ok(())
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        log::trace!("DummyContext: releasing buffer {}", buffer.raw());
        self.buffers.remove(&buffer.raw());
        self.calls.push(RecordedCall::ReleaseBuffer(buffer));
    }
}
