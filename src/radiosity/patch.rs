//! The patch: a quad surface element carrying radiometric state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vecutils::{BLACK, Rgb, rgb_add, rgb_mul};
use crate::{Point, Quad, Vector};

/// Stable handle of a patch inside a [`SceneState`](super::SceneState) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatchId(pub usize);

impl PatchId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A gathering link: the owning patch receives energy from `partner`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub partner: PatchId,
    pub form_factor: f64,
}

#[derive(Debug, Clone)]
pub struct Patch {
    quad: Quad,
    centroid: Point,
    normal: Vector,
    area: f64,
    pub reflectance: Rgb,
    pub irradiance: Rgb,
    /// Flat-solver state.
    pub radiosity: Rgb,
    /// Hierarchical-solver state after pull.
    pub brightness: Rgb,
    /// Hierarchical-solver accumulator for gather and push.
    pub gathered_brightness: Rgb,
    parent: Option<PatchId>,
    children: Option<[PatchId; 4]>,
    links: Vec<Link>,
}

impl Patch {
    /// Creates a patch from its quad. Degenerate quads get a zero normal.
    pub fn new(quad: Quad, irradiance: Rgb, reflectance: Rgb) -> Self {
        Self {
            centroid: quad.centroid(),
            normal: quad.normal().unwrap_or(Vector::zero()),
            area: quad.area(),
            quad,
            reflectance,
            irradiance,
            radiosity: BLACK,
            brightness: BLACK,
            gathered_brightness: BLACK,
            parent: None,
            children: None,
            links: Vec::new(),
        }
    }

    pub fn quad(&self) -> &Quad {
        &self.quad
    }

    pub fn vertices(&self) -> &[Point; 4] {
        self.quad.vertices()
    }

    pub fn centroid(&self) -> Point {
        self.centroid
    }

    pub fn normal(&self) -> Vector {
        self.normal
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn parent(&self) -> Option<PatchId> {
        self.parent
    }

    pub fn children(&self) -> Option<&[PatchId; 4]> {
        self.children.as_ref()
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Subdivision stops at or below the area threshold.
    pub fn can_subdivide(&self, area_threshold: f64) -> bool {
        self.area > area_threshold
    }

    /// Links in the order they were created.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn influencing_partners(&self) -> impl Iterator<Item = PatchId> + '_ {
        self.links.iter().map(|l| l.partner)
    }

    pub fn influencing_partner_form_factors(&self) -> impl Iterator<Item = f64> + '_ {
        self.links.iter().map(|l| l.form_factor)
    }

    /// Color shown for this patch after a flat solve.
    pub fn radiosity_color(&self) -> Rgb {
        rgb_add(self.irradiance, rgb_mul(self.reflectance, self.radiosity))
    }

    /// Color shown for this patch after a hierarchical solve.
    pub fn brightness_color(&self) -> Rgb {
        rgb_add(self.irradiance, rgb_mul(self.reflectance, self.brightness))
    }

    pub(super) fn set_parent(&mut self, parent: PatchId) {
        self.parent = Some(parent);
    }

    pub(super) fn set_children(&mut self, children: [PatchId; 4]) {
        self.children = Some(children);
    }

    pub(super) fn push_link(&mut self, link: Link) {
        self.links.push(link);
    }
}
