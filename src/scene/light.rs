use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Uniform light from every direction.
    Ambient,
    /// Parallel rays travelling from `direction` towards the origin.
    Directional { direction: Vec3 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    #[must_use]
    pub fn new_ambient(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Ambient,
        }
    }

    /// Creates a directional light. `direction` is normalized here.
    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32, direction: Vec3) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Directional {
                direction: direction.normalize_or_zero(),
            },
        }
    }

    #[must_use]
    pub fn direction(&self) -> Option<Vec3> {
        match self.kind {
            LightKind::Directional { direction } => Some(direction),
            LightKind::Ambient => None,
        }
    }
}
