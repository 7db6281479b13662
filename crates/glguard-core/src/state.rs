//! Scoped capability state.
//!
//! [`StateScope`] tracks changes made to the host's global capability bits
//! and reverts them when the scope ends, giving an exception-safe way to
//! reconfigure the pipeline for a stretch of work. The first touch of a
//! capability snapshots the live host value; [`reset`](StateScope::reset)
//! restores every snapshot that still differs, and
//! [`commit`](StateScope::commit) makes the present state the new restore
//! baseline.
//!
//! The scope never assumes a capability's value beyond what it observed:
//! untouched capabilities are never snapshotted and never restored.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use gl::types::GLenum;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::api::GlApi;

/// A global boolean toggle affecting rendering behavior.
///
/// The texture-target variants cover the fixed-function paths where the
/// target itself is enabled around parameter updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, FromPrimitive)]
#[repr(u32)]
pub enum Capability {
    LineSmooth = gl::LINE_SMOOTH,
    CullFace = gl::CULL_FACE,
    DepthTest = gl::DEPTH_TEST,
    StencilTest = gl::STENCIL_TEST,
    Dither = gl::DITHER,
    Blend = gl::BLEND,
    ScissorTest = gl::SCISSOR_TEST,
    Texture1D = gl::TEXTURE_1D,
    Texture2D = gl::TEXTURE_2D,
    Texture3D = gl::TEXTURE_3D,
    PolygonOffsetFill = gl::POLYGON_OFFSET_FILL,
    Multisample = gl::MULTISAMPLE,
    SampleAlphaToCoverage = gl::SAMPLE_ALPHA_TO_COVERAGE,
    SampleCoverage = gl::SAMPLE_COVERAGE,
    TextureCubeMap = gl::TEXTURE_CUBE_MAP,
    ProgramPointSize = gl::PROGRAM_POINT_SIZE,
    FramebufferSrgb = gl::FRAMEBUFFER_SRGB,
}

impl Capability {
    pub fn raw(self) -> GLenum {
        self as GLenum
    }

    pub fn from_raw(raw: GLenum) -> Option<Self> {
        Self::from_u32(raw)
    }
}

#[derive(Debug, Clone, Copy)]
struct CapabilityRecord {
    /// Host value observed the first time this scope touched the capability.
    initial: bool,
    /// Last value this scope set.
    current: bool,
}

/// Records and reverts changes to the host's capability bits.
///
/// Setters chain:
///
/// ```ignore
/// let mut pipeline = StateScope::new(&gl);
/// pipeline.enable(Capability::Blend).disable(Capability::DepthTest);
/// // changes revert when `pipeline` drops
/// ```
pub struct StateScope<'g> {
    gl: &'g dyn GlApi,
    changes: BTreeMap<Capability, CapabilityRecord>,
}

impl<'g> StateScope<'g> {
    pub fn new(gl: &'g dyn GlApi) -> Self {
        Self {
            gl,
            changes: BTreeMap::new(),
        }
    }

    pub fn enable(&mut self, cap: Capability) -> &mut Self {
        self.set(cap, true)
    }

    pub fn disable(&mut self, cap: Capability) -> &mut Self {
        self.set(cap, false)
    }

    /// Apply `enabled`, snapshotting the live host value on first touch.
    ///
    /// Repeat touches only reach the host when the requested value differs
    /// from the last one set; `current` updates regardless.
    pub fn set(&mut self, cap: Capability, enabled: bool) -> &mut Self {
        match self.changes.entry(cap) {
            Entry::Vacant(slot) => {
                let initial = self.gl.is_enabled(cap.raw());
                slot.insert(CapabilityRecord {
                    initial,
                    current: enabled,
                });
                apply(self.gl, cap, enabled);
            }
            Entry::Occupied(mut slot) => {
                let record = slot.get_mut();
                if record.current != enabled {
                    record.current = enabled;
                    apply(self.gl, cap, enabled);
                }
            }
        }
        self
    }

    /// Restore every touched capability whose value still differs from its
    /// snapshot, then forget all records. Idempotent.
    pub fn reset(&mut self) -> &mut Self {
        for (&cap, record) in &self.changes {
            if record.initial != record.current {
                apply(self.gl, cap, record.initial);
            }
        }
        self.changes.clear();
        self
    }

    /// Make the present state the new restore baseline without touching the
    /// host: `reset` and the drop become no-ops for everything set so far,
    /// while further changes keep being tracked.
    pub fn commit(&mut self) -> &mut Self {
        for record in self.changes.values_mut() {
            record.initial = record.current;
        }
        self
    }

    /// Number of capabilities this scope has touched.
    pub fn tracked(&self) -> usize {
        self.changes.len()
    }
}

impl Drop for StateScope<'_> {
    fn drop(&mut self) {
        self.reset();
    }
}

fn apply(gl: &dyn GlApi, cap: Capability, enabled: bool) {
    if enabled {
        gl.enable(cap.raw());
    } else {
        gl.disable(cap.raw());
    }
}
