//! Handle geometry for the transformation gizmo.
//!
//! Every mode gets its own family of handles: arrows for translation, quarter
//! rings for rotation and cube-tipped shafts for scale. Each family carries a
//! center sphere. Handles are built in gizmo-local coordinates (x east, y
//! north, z up, unit = metre) and tagged with their [`GizmoAxis`], whose
//! [`GizmoAxis::tag`] is what the host attaches to the pick id.

use std::f32::consts::{FRAC_PI_2, TAU};

use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};

use crate::gizmo::{GizmoAxis, GizmoMode};

/// Vertex layout shared by all handle meshes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct HandleVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// One pickable piece of the gizmo.
#[derive(Debug, Clone)]
pub struct HandlePrimitive {
    /// Which handle this is.
    pub axis: GizmoAxis,
    /// The family this handle belongs to.
    pub mode: GizmoMode,
    /// Current display color.
    pub color: [f32; 4],
    /// Whether the host should draw and pick this handle.
    pub show: bool,
    pub vertices: Vec<HandleVertex>,
    pub indices: Vec<u32>,
}

impl HandlePrimitive {
    /// The id string the host attaches to this handle for picking.
    pub fn pick_id(&self) -> &'static str {
        self.axis.tag()
    }
}

/// Builds gizmo handle meshes from overall dimensions.
#[derive(Debug, Clone, Copy)]
pub struct GizmoPrimitiveBuilder {
    /// Handle length along each axis.
    pub length: f32,
    /// Shaft radius.
    pub radius: f32,
    /// Tessellation around circular cross sections.
    pub segments: u32,
    /// Angular extent of each rotation ring, in radians.
    pub ring_sweep: f32,
}

impl Default for GizmoPrimitiveBuilder {
    fn default() -> Self {
        Self::new(10.0, 0.15)
    }
}

impl GizmoPrimitiveBuilder {
    pub fn new(length: f32, radius: f32) -> Self {
        Self {
            length,
            radius,
            segments: 16,
            ring_sweep: FRAC_PI_2,
        }
    }

    /// Sets the angular extent of the rotation rings.
    #[must_use]
    pub fn with_ring_sweep(mut self, radians: f32) -> Self {
        self.ring_sweep = radians.clamp(0.0, TAU);
        self
    }

    /// Builds the handles for one mode: three axes followed by the center.
    pub fn build(&self, mode: GizmoMode) -> Vec<HandlePrimitive> {
        let mut handles: Vec<HandlePrimitive> = [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z]
            .into_iter()
            .map(|axis| {
                let mut mesh = MeshBuilder::default();
                match mode {
                    GizmoMode::Translate => self.arrow(&mut mesh),
                    GizmoMode::Rotate => self.ring(&mut mesh),
                    GizmoMode::Scale => self.cube_shaft(&mut mesh),
                }
                mesh.rotate(z_to_axis(axis));
                mesh.into_handle(axis, mode)
            })
            .collect();

        let mut center = MeshBuilder::default();
        center.sphere(self.radius * 4.0, self.segments);
        handles.push(center.into_handle(GizmoAxis::Center, mode));
        handles
    }

    /// Builds all three families; only the translation family starts visible.
    pub fn build_all(&self) -> GizmoPrimitives {
        let mut primitives = GizmoPrimitives {
            handles: GizmoMode::ALL
                .into_iter()
                .flat_map(|mode| self.build(mode))
                .collect(),
            mode: GizmoMode::Translate,
        };
        primitives.set_mode(GizmoMode::Translate);
        primitives
    }

    fn arrow(&self, mesh: &mut MeshBuilder) {
        let shaft_end = self.length * 0.8;
        mesh.cylinder(self.radius, 0.0, shaft_end, self.segments);
        mesh.cone(self.radius * 3.0, shaft_end, self.length, self.segments);
    }

    fn cube_shaft(&self, mesh: &mut MeshBuilder) {
        let half = self.radius * 2.5;
        mesh.cylinder(self.radius, 0.0, self.length - 2.0 * half, self.segments);
        mesh.cuboid(Vec3::new(0.0, 0.0, self.length - half), half);
    }

    fn ring(&self, mesh: &mut MeshBuilder) {
        mesh.torus_segment(
            self.length,
            self.radius,
            self.ring_sweep,
            self.segments * 4,
            self.segments,
        );
    }
}

/// Rotation taking the +Z build axis onto `axis`.
fn z_to_axis(axis: GizmoAxis) -> Quat {
    match axis {
        GizmoAxis::X => Quat::from_rotation_y(FRAC_PI_2),
        GizmoAxis::Y => Quat::from_rotation_x(-FRAC_PI_2),
        GizmoAxis::Z | GizmoAxis::Center => Quat::IDENTITY,
    }
}

/// All handle families of a gizmo, with exactly one family shown.
#[derive(Debug, Clone)]
pub struct GizmoPrimitives {
    handles: Vec<HandlePrimitive>,
    mode: GizmoMode,
}

impl GizmoPrimitives {
    /// The family currently shown.
    pub fn mode(&self) -> GizmoMode {
        self.mode
    }

    /// Shows the handles of `mode` and hides every other family.
    pub fn set_mode(&mut self, mode: GizmoMode) {
        self.mode = mode;
        for handle in &mut self.handles {
            handle.show = handle.mode == mode;
        }
    }

    /// Every handle, shown or not.
    pub fn handles(&self) -> &[HandlePrimitive] {
        &self.handles
    }

    /// Handles of the active family.
    pub fn visible(&self) -> impl Iterator<Item = &HandlePrimitive> {
        self.handles.iter().filter(|h| h.show)
    }

    /// The visible handle for `axis`.
    pub fn handle(&self, axis: GizmoAxis) -> Option<&HandlePrimitive> {
        self.handles
            .iter()
            .find(|h| h.show && h.axis == axis)
    }

    /// Color of the visible handle for `axis`.
    pub fn color(&self, axis: GizmoAxis) -> Option<[f32; 4]> {
        self.handle(axis).map(|h| h.color)
    }

    /// Recolors the visible handle for `axis`.
    pub fn set_color(&mut self, axis: GizmoAxis, color: [f32; 4]) {
        if let Some(handle) = self
            .handles
            .iter_mut()
            .find(|h| h.show && h.axis == axis)
        {
            handle.color = color;
        }
    }
}

/// Accumulates triangles for one handle.
#[derive(Default)]
struct MeshBuilder {
    vertices: Vec<HandleVertex>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    fn base(&self) -> u32 {
        u32::try_from(self.vertices.len()).unwrap_or(u32::MAX)
    }

    fn push(&mut self, position: Vec3, normal: Vec3) {
        self.vertices.push(HandleVertex {
            position: position.to_array(),
            normal: normal.normalize_or_zero().to_array(),
        });
    }

    fn quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }

    /// Open cylinder along +Z from `z0` to `z1`.
    fn cylinder(&mut self, radius: f32, z0: f32, z1: f32, segments: u32) {
        let base = self.base();
        for i in 0..=segments {
            let theta = TAU * i as f32 / segments as f32;
            let dir = Vec3::new(theta.cos(), theta.sin(), 0.0);
            self.push(dir * radius + Vec3::Z * z0, dir);
            self.push(dir * radius + Vec3::Z * z1, dir);
        }
        for i in 0..segments {
            let a = base + i * 2;
            self.quad(a, a + 2, a + 3, a + 1);
        }
    }

    /// Cone along +Z with its base at `z0` and apex at `z1`.
    fn cone(&mut self, radius: f32, z0: f32, z1: f32, segments: u32) {
        let base = self.base();
        let slope = radius / (z1 - z0).max(f32::EPSILON);
        for i in 0..=segments {
            let theta = TAU * i as f32 / segments as f32;
            let dir = Vec3::new(theta.cos(), theta.sin(), 0.0);
            let normal = dir + Vec3::Z * slope;
            self.push(dir * radius + Vec3::Z * z0, normal);
            self.push(Vec3::Z * z1, normal);
        }
        for i in 0..segments {
            let a = base + i * 2;
            self.indices.extend_from_slice(&[a, a + 2, a + 1]);
        }
        // Base disc.
        let center = self.base();
        self.push(Vec3::Z * z0, Vec3::NEG_Z);
        for i in 0..segments {
            let a = base + i * 2;
            self.indices.extend_from_slice(&[center, a + 2, a]);
        }
    }

    /// Axis-aligned cube.
    fn cuboid(&mut self, center: Vec3, half: f32) {
        for normal in [
            Vec3::X,
            Vec3::NEG_X,
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::Z,
            Vec3::NEG_Z,
        ] {
            let u = normal.any_orthonormal_vector();
            let v = normal.cross(u);
            let base = self.base();
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                self.push(center + (normal + u * su + v * sv) * half, normal);
            }
            self.quad(base, base + 1, base + 2, base + 3);
        }
    }

    /// UV sphere at the origin.
    fn sphere(&mut self, radius: f32, segments: u32) {
        let rings = (segments / 2).max(2);
        let base = self.base();
        for r in 0..=rings {
            let phi = std::f32::consts::PI * r as f32 / rings as f32;
            for s in 0..=segments {
                let theta = TAU * s as f32 / segments as f32;
                let dir = Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
                self.push(dir * radius, dir);
            }
        }
        let stride = segments + 1;
        for r in 0..rings {
            for s in 0..segments {
                let a = base + r * stride + s;
                self.quad(a, a + stride, a + stride + 1, a + 1);
            }
        }
    }

    /// Partial torus around +Z, starting at +X and sweeping counter-clockwise.
    fn torus_segment(&mut self, major: f32, minor: f32, sweep: f32, arcs: u32, sides: u32) {
        let base = self.base();
        for i in 0..=arcs {
            let theta = sweep * i as f32 / arcs as f32;
            let radial = Vec3::new(theta.cos(), theta.sin(), 0.0);
            for j in 0..=sides {
                let phi = TAU * j as f32 / sides as f32;
                let normal = radial * phi.cos() + Vec3::Z * phi.sin();
                self.push(radial * major + normal * minor, normal);
            }
        }
        let stride = sides + 1;
        for i in 0..arcs {
            for j in 0..sides {
                let a = base + i * stride + j;
                self.quad(a, a + stride, a + stride + 1, a + 1);
            }
        }
    }

    fn rotate(&mut self, rotation: Quat) {
        for vertex in &mut self.vertices {
            vertex.position = (rotation * Vec3::from_array(vertex.position)).to_array();
            vertex.normal = (rotation * Vec3::from_array(vertex.normal)).to_array();
        }
    }

    fn into_handle(self, axis: GizmoAxis, mode: GizmoMode) -> HandlePrimitive {
        HandlePrimitive {
            axis,
            mode,
            color: axis.color(),
            show: true,
            vertices: self.vertices,
            indices: self.indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent_along(handle: &HandlePrimitive, dir: Vec3) -> f32 {
        handle
            .vertices
            .iter()
            .map(|v| Vec3::from_array(v.position).dot(dir))
            .fold(f32::MIN, f32::max)
    }

    #[test]
    fn test_each_family_has_four_handles() {
        let builder = GizmoPrimitiveBuilder::new(10.0, 0.2);
        for mode in GizmoMode::ALL {
            let handles = builder.build(mode);
            let axes: Vec<_> = handles.iter().map(|h| h.axis).collect();
            assert_eq!(axes, GizmoAxis::ALL.to_vec());
            assert!(handles.iter().all(|h| h.mode == mode));
            assert!(handles.iter().all(|h| !h.indices.is_empty()));
        }
    }

    #[test]
    fn test_arrows_point_along_their_axis() {
        let handles = GizmoPrimitiveBuilder::new(10.0, 0.2).build(GizmoMode::Translate);
        for handle in handles.iter().take(3) {
            let dir = handle.axis.direction().unwrap().as_vec3();
            assert!((extent_along(handle, dir) - 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_indices_in_range() {
        let handles = GizmoPrimitiveBuilder::default().build(GizmoMode::Scale);
        for handle in handles {
            let count = handle.vertices.len() as u32;
            assert!(handle.indices.iter().all(|&i| i < count));
            assert_eq!(handle.indices.len() % 3, 0);
        }
    }

    #[test]
    fn test_rings_lie_around_their_axis() {
        let builder = GizmoPrimitiveBuilder::new(10.0, 0.2);
        let handles = builder.build(GizmoMode::Rotate);
        let x_ring = &handles[0];
        for vertex in &x_ring.vertices {
            let p = Vec3::from_array(vertex.position);
            // Distance from the x axis stays within the tube around the major radius.
            let radial = Vec3::new(0.0, p.y, p.z).length();
            assert!((radial - 10.0).abs() <= 0.2 + 1e-4);
            assert!(p.x.abs() <= 0.2 + 1e-4);
        }
    }

    #[test]
    fn test_colors_follow_axis_convention() {
        let handles = GizmoPrimitiveBuilder::default().build(GizmoMode::Translate);
        assert_eq!(handles[0].color, [1.0, 0.2, 0.2, 1.0]);
        assert_eq!(handles[1].pick_id(), "y");
        assert_eq!(handles[3].pick_id(), "center");
    }

    #[test]
    fn test_only_one_family_visible() {
        let mut primitives = GizmoPrimitiveBuilder::default().build_all();
        assert_eq!(primitives.visible().count(), 4);
        for mode in GizmoMode::ALL {
            primitives.set_mode(mode);
            assert!(primitives.visible().all(|h| h.mode == mode));
            assert_eq!(primitives.visible().count(), 4);
        }
    }

    #[test]
    fn test_recolor_only_touches_visible_family() {
        let mut primitives = GizmoPrimitiveBuilder::default().build_all();
        primitives.set_color(GizmoAxis::X, [0.0; 4]);
        assert_eq!(primitives.color(GizmoAxis::X), Some([0.0; 4]));

        primitives.set_mode(GizmoMode::Rotate);
        assert_eq!(primitives.color(GizmoAxis::X), Some(GizmoAxis::X.color()));
    }
}
