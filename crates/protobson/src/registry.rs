//! Type-to-codec registry and the contexts codecs run in.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use protobson_wire::{ValueReader, ValueWriter};

use crate::codecs::native;
use crate::descriptor::TypeDescriptor;
use crate::error::CodecError;
use crate::field::{Field, FieldRef};
use crate::options::EncodeOptions;

/// A paired encode/decode routine bound to one or more type descriptors.
///
/// Codecs hold no per-call state. Composite codecs re-enter the registry
/// through the context for nested values.
pub trait Codec: fmt::Debug + Send + Sync {
    /// Writes `val` as exactly one BSON value.
    fn encode(
        &self,
        ctx: &EncodeContext<'_>,
        vw: ValueWriter<'_>,
        val: FieldRef<'_>,
    ) -> Result<(), CodecError>;

    /// Reads one BSON value into a field of type `ty`.
    fn decode(
        &self,
        ctx: &DecodeContext<'_>,
        vr: ValueReader<'_>,
        ty: TypeDescriptor,
    ) -> Result<Field, CodecError>;
}

/// State shared by every codec taking part in one encode call.
#[derive(Debug, Clone, Copy)]
pub struct EncodeContext<'r> {
    registry: &'r Registry,
    options: EncodeOptions,
}

impl<'r> EncodeContext<'r> {
    pub fn new(registry: &'r Registry, options: EncodeOptions) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> EncodeOptions {
        self.options
    }

    pub fn lookup_encoder(&self, ty: TypeDescriptor) -> Result<&'r dyn Codec, CodecError> {
        self.registry.lookup_encoder(ty)
    }

    /// Encodes `val` with the codec bound to its runtime type.
    pub fn encode(&self, vw: ValueWriter<'_>, val: FieldRef<'_>) -> Result<(), CodecError> {
        self.lookup_encoder(val.descriptor())?.encode(self, vw, val)
    }
}

/// State shared by every codec taking part in one decode call.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'r> {
    registry: &'r Registry,
}

impl<'r> DecodeContext<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn lookup_decoder(&self, ty: TypeDescriptor) -> Result<&'r dyn Codec, CodecError> {
        self.registry.lookup_decoder(ty)
    }

    /// Decodes into type `ty` with the codec bound to it.
    pub fn decode(&self, vr: ValueReader<'_>, ty: TypeDescriptor) -> Result<Field, CodecError> {
        self.lookup_decoder(ty)?.decode(self, vr, ty)
    }
}

/// Accumulates codec bindings; consumed by [`RegistryBuilder::build`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    codecs: HashMap<TypeDescriptor, Arc<dyn Codec>>,
}

impl RegistryBuilder {
    /// An empty builder with no bindings at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder pre-populated with the native scalar codecs.
    pub fn with_defaults() -> Self {
        native::register_defaults(Self::new())
    }

    /// Binds `codec` to `ty`. A later binding for the same descriptor
    /// replaces the earlier one.
    pub fn register(mut self, ty: TypeDescriptor, codec: Arc<dyn Codec>) -> Self {
        if let Some(previous) = self.codecs.insert(ty, codec) {
            tracing::warn!(%ty, ?previous, "codec registered twice; keeping the later one");
        }
        self
    }

    pub fn build(self) -> Registry {
        tracing::debug!(codecs = self.codecs.len(), "codec registry built");
        Registry {
            codecs: Arc::new(self.codecs),
        }
    }
}

/// Immutable type-to-codec table. Cheap to clone and safe to share across
/// threads.
#[derive(Debug, Clone)]
pub struct Registry {
    codecs: Arc<HashMap<TypeDescriptor, Arc<dyn Codec>>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::with_defaults()
    }

    /// Native codecs plus every well-known type codec.
    pub fn default_with_well_known() -> Self {
        crate::register(RegistryBuilder::with_defaults()).build()
    }

    pub fn lookup_encoder(&self, ty: TypeDescriptor) -> Result<&dyn Codec, CodecError> {
        self.lookup(ty)
    }

    pub fn lookup_decoder(&self, ty: TypeDescriptor) -> Result<&dyn Codec, CodecError> {
        self.lookup(ty)
    }

    fn lookup(&self, ty: TypeDescriptor) -> Result<&dyn Codec, CodecError> {
        self.codecs
            .get(&ty)
            .map(|codec| codec.as_ref())
            .ok_or(CodecError::UnregisteredType(ty))
    }

    pub fn contains(&self, ty: TypeDescriptor) -> bool {
        self.codecs.contains_key(&ty)
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}
