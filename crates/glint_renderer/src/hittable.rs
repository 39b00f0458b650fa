//! Hittable trait, HitRecord, and the shape variants it is implemented for.

use crate::{MaterialId, Sphere};
use glint_math::{Interval, Ray, Vec3};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub position: Vec3,
    /// Unit surface normal, pointing out of the surface
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: MaterialId,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest intersection of `ray` with this object whose `t` lies in
    /// `ray_t`, or `None`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;
}

/// Every kind of geometry a scene can hold.
///
/// Lists nest, so a group of spheres can be treated as a single shape.
#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    List(ShapeList),
}

impl Shape {
    /// Call `f` with every material referenced by this shape.
    pub fn visit_materials<F: FnMut(MaterialId)>(&self, f: &mut F) {
        match self {
            Shape::Sphere(sphere) => f(sphere.material()),
            Shape::List(list) => {
                for object in &list.objects {
                    object.visit_materials(f);
                }
            }
        }
    }
}

impl Hittable for Shape {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        match self {
            Shape::Sphere(sphere) => sphere.hit(ray, ray_t),
            Shape::List(list) => list.hit(ray, ray_t),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<ShapeList> for Shape {
    fn from(list: ShapeList) -> Self {
        Shape::List(list)
    }
}

/// An ordered list of shapes, tested by brute force.
#[derive(Debug, Clone, Default)]
pub struct ShapeList {
    objects: Vec<Shape>,
}

impl ShapeList {
    /// Create a new empty shape list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Into<Shape>) {
        self.objects.push(object.into());
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl FromIterator<Shape> for ShapeList {
    fn from_iter<I: IntoIterator<Item = Shape>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}

impl Hittable for ShapeList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}
