//! Surface description of meshes.
//!
//! Materials are stored once in a [`MaterialLibrary`] and referenced by
//! [`MaterialId`] from scene nodes. Changing a material changes every node
//! that references it.

/// An sRGB colour with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from a `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    pub fn to_hex(&self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        channel(self.r) << 16 | channel(self.g) << 8 | channel(self.b)
    }

    /// Convert to linear rgb for shading.
    pub fn to_linear(&self) -> [f32; 3] {
        fn linear(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [linear(self.r), linear(self.g), linear(self.b)]
    }
}

/// A colour map and how often it repeats across the uv range.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureMap {
    /// Where the image is loaded from, also used as its cache key.
    pub source: String,
    pub repeat: [f32; 2],
}

/// Physically based surface parameters of a mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub map: Option<TextureMap>,
}

impl Material {
    /// A standard material of colour `0xRRGGBB`, fully rough and not metallic.
    pub fn standard(hex: u32) -> Self {
        Self {
            color: Color::from_hex(hex),
            ..Default::default()
        }
    }

    /// A white material sampling `source`, repeated `repeat` times.
    pub fn textured(source: &str, repeat: [f32; 2]) -> Self {
        Self {
            map: Some(TextureMap {
                source: source.to_string(),
                repeat,
            }),
            ..Default::default()
        }
    }

    pub fn roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness;
        self
    }

    pub fn emissive(mut self, hex: u32, intensity: f32) -> Self {
        self.emissive = Color::from_hex(hex);
        self.emissive_intensity = intensity;
        self
    }

    pub fn transparent(mut self, opacity: f32) -> Self {
        self.transparent = true;
        self.opacity = opacity;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            emissive: Color::BLACK,
            emissive_intensity: 1.0,
            roughness: 1.0,
            metalness: 0.0,
            opacity: 1.0,
            transparent: false,
            map: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(usize);

/// Owner of all materials of a scene.
#[derive(Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(idx, material)| (MaterialId(idx), material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_through_channels() {
        let colour = Color::from_hex(0x8b4513);
        assert_eq!(colour.to_hex(), 0x8b4513);
        assert_eq!(Color::from_hex(0xff0000), Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn linear_conversion_keeps_extremes() {
        assert_eq!(Color::WHITE.to_linear(), [1.0, 1.0, 1.0]);
        assert_eq!(Color::BLACK.to_linear(), [0.0, 0.0, 0.0]);
        let mid = Color::new(0.5, 0.5, 0.5).to_linear()[0];
        assert!((mid - 0.214).abs() < 1e-3);
    }
}
