use crate::{
    domain::{CollisionPolicy, KeyTransform},
    format::OutputFormat,
};

/// Rendering options, passed explicitly to every renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatOptions {
    pub format: OutputFormat,
    pub transform: KeyTransform,
    pub on_collision: CollisionPolicy,
}

impl FormatOptions {
    pub fn new(format: OutputFormat, transform: KeyTransform, on_collision: CollisionPolicy) -> Self {
        Self {
            format,
            transform,
            on_collision,
        }
    }

    /// Same options with an identity key transform, for keys already transformed at fetch time.
    pub fn without_transform(&self) -> Self {
        Self {
            transform: KeyTransform::default(),
            ..self.clone()
        }
    }
}
