//! Scene container: the material arena plus the root shape list.

use std::fmt;

use crate::{
    error::{ConfigResult, ConfigurationError},
    hittable::{HitRecord, Hittable, Shape, ShapeList},
    Material,
};
use glint_math::{Interval, Ray};

/// Handle to a material stored in a [`Scene`].
///
/// Many spheres can share one material by holding the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(usize);

impl MaterialId {
    /// Wrap a raw arena index.
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position of the material in its scene's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the integrator needs to trace rays: geometry and materials.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    materials: Vec<Material>,
    shapes: ShapeList,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material and get the handle shapes use to refer to it.
    pub fn add_material(&mut self, material: impl Into<Material>) -> MaterialId {
        let id = MaterialId::from_index(self.materials.len());
        self.materials.push(material.into());
        id
    }

    /// Add a shape. Every material it references must already be registered.
    pub fn add(&mut self, shape: impl Into<Shape>) -> ConfigResult<()> {
        let shape = shape.into();
        let mut unknown = None;
        shape.visit_materials(&mut |id| {
            if id.index() >= self.materials.len() && unknown.is_none() {
                unknown = Some(id);
            }
        });
        if let Some(id) = unknown {
            return Err(ConfigurationError::UnknownMaterial(id));
        }

        self.shapes.add(shape);
        Ok(())
    }

    /// Look up a material by handle.
    ///
    /// Ids stored in this scene's shapes are always valid here.
    #[inline]
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.index()]
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Number of top-level shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl Hittable for Scene {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.shapes.hit(ray, ray_t)
    }
}
