//! Software renderer: per-frame orchestration of the rasterizer.
//!
//! A frame is a fixed sequence: clear both buffers, draw the viewport axes,
//! draw every scene object (models, then inactive-camera proxies, then
//! light proxies), then hand the finished color buffer to the presenter.
//! When anti-aliasing is on, everything rasterizes at twice the viewport
//! resolution and resolves down at the end of the frame.

use cgmath::{ElementWise, InnerSpace, Matrix, Matrix3, Matrix4, SquareMatrix, Vector2, Vector3};

use crate::math::{from_homogeneous, to_homogeneous};
use crate::scene::light::Light;
use crate::scene::mesh::MeshModel;
use crate::scene::Scene;

use super::framebuffer::FrameBuffer;
use super::raster::{draw_line, draw_line_flat, fill_triangle, perspective_depth};
use super::settings::{FogSettings, RenderSettings, ShadingMode};

/// World-space length of the normal visualization segments.
const NORMAL_VIZ_LENGTH: f32 = 0.3;
/// Wireframe and overlay lines are pulled slightly toward the viewer so
/// they win depth ties against the fill of the same triangle.
const LINE_DEPTH_BIAS: f32 = 1e-3;

const AXES_COLOR: Vector3<f32> = Vector3::new(1.0, 1.0, 0.0);
const BOUNDS_COLOR: Vector3<f32> = Vector3::new(0.2, 0.9, 0.3);
const VERTEX_NORMAL_COLOR: Vector3<f32> = Vector3::new(0.2, 0.8, 0.9);
const FACE_NORMAL_COLOR: Vector3<f32> = Vector3::new(0.9, 0.3, 0.8);

pub struct SoftwareRenderer {
    width: usize,
    height: usize,
    frame: FrameBuffer,
    resolved: FrameBuffer,
}

impl SoftwareRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            frame: FrameBuffer::new(width, height),
            resolved: FrameBuffer::new(width, height),
        }
    }

    /// Resizes the render target to a new viewport.
    pub fn set_viewport(&mut self, width: usize, height: usize) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn viewport(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Renders one frame and returns the finished viewport-sized buffer.
    pub fn render(&mut self, scene: &Scene, settings: &RenderSettings) -> &FrameBuffer {
        let supersample = settings.anti_alias;
        let (fw, fh) = if supersample {
            (self.width * 2, self.height * 2)
        } else {
            (self.width, self.height)
        };
        self.frame.resize(fw, fh);
        self.frame.clear(settings.clear_color);

        if settings.draw_axes {
            draw_axes(&mut self.frame);
        }

        if let Some(camera) = scene.active_camera() {
            let ctx = DrawContext {
                view: camera.view(),
                projection: camera.projection(),
                eye: camera.eye,
                parent: scene.world_transform(),
                lights: scene.lights(),
                settings,
            };

            for model in scene.models() {
                draw_model(&mut self.frame, &ctx, model);
            }
            for (i, other) in scene.cameras().iter().enumerate() {
                if i != scene.active_camera_index() {
                    draw_model(&mut self.frame, &ctx, other.proxy());
                }
            }
            for light in scene.lights() {
                draw_model(&mut self.frame, &ctx, light.proxy());
            }
        } else {
            log::debug!("no active camera, frame is clear color only");
        }

        if supersample {
            self.resolved.resize(self.width, self.height);
            self.frame.resolve_into(&mut self.resolved);
            &self.resolved
        } else {
            &self.frame
        }
    }
}

/// Everything a single model draw needs, borrowed for the duration of the
/// frame.
struct DrawContext<'a> {
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    eye: Vector3<f32>,
    parent: Matrix4<f32>,
    lights: &'a [Light],
    settings: &'a RenderSettings,
}

/// Viewport center axes, drawn under everything else.
fn draw_axes(fb: &mut FrameBuffer) {
    let (w, h) = (fb.width() as f32, fb.height() as f32);
    draw_line_flat(
        fb,
        Vector2::new(0.0, h * 0.5),
        Vector2::new(w - 1.0, h * 0.5),
        AXES_COLOR,
    );
    draw_line_flat(
        fb,
        Vector2::new(w * 0.5, 0.0),
        Vector2::new(w * 0.5, h - 1.0),
        AXES_COLOR,
    );
}

/// Projects a world-space point to the screen.
///
/// The returned vector is pixel x/y plus the positive view-space distance
/// used for depth testing. Points on or behind the eye plane return `None`
/// and cull the primitives they belong to.
fn project(
    fb: &FrameBuffer,
    ctx: &DrawContext,
    world_pos: Vector3<f32>,
) -> Option<Vector3<f32>> {
    let view_pos = ctx.view * to_homogeneous(world_pos, 1.0);
    let depth = -view_pos.z;
    if depth <= 0.0 {
        return None;
    }

    let clip = ctx.projection * view_pos;
    if clip.w.abs() < f32::EPSILON {
        return None;
    }
    let ndc = from_homogeneous(clip);

    Some(Vector3::new(
        (ndc.x + 1.0) * 0.5 * fb.width() as f32,
        (1.0 - ndc.y) * 0.5 * fb.height() as f32,
        depth,
    ))
}

/// Rotation-and-scale part of the world matrix, inverse-transposed so
/// normals stay perpendicular under non-uniform scale.
fn normal_matrix(world: Matrix4<f32>) -> Matrix3<f32> {
    let linear = Matrix3::from_cols(
        world.x.truncate(),
        world.y.truncate(),
        world.z.truncate(),
    );
    linear
        .invert()
        .map(|inv| inv.transpose())
        .unwrap_or(linear)
}

/// Combined illumination from every light. With no lights in the scene the
/// base color passes through unscaled.
fn total_illumination(
    lights: &[Light],
    point: Vector3<f32>,
    normal: Vector3<f32>,
    eye: Vector3<f32>,
) -> Vector3<f32> {
    if lights.is_empty() {
        return Vector3::new(1.0, 1.0, 1.0);
    }
    lights
        .iter()
        .fold(Vector3::new(0.0, 0.0, 0.0), |acc, light| {
            acc + light.illuminate(point, normal, eye)
        })
}

/// Fog blend factor: 1 at the near plane (no fog), falling linearly to 0 at
/// the far plane (full fog color).
pub(crate) fn fog_factor(z: f32, near: f32, far: f32) -> f32 {
    if far <= near {
        return 1.0;
    }
    ((far - z.abs()) / (far - near)).clamp(0.0, 1.0)
}

fn apply_fog(color: Vector3<f32>, z: f32, fog: &FogSettings) -> Vector3<f32> {
    if !fog.enabled {
        return color;
    }
    let factor = fog_factor(z, fog.near, fog.far);
    fog.color * (1.0 - factor) + color * factor
}

fn draw_model(fb: &mut FrameBuffer, ctx: &DrawContext, model: &MeshModel) {
    let world = ctx.parent * model.world_transform();
    let normals_to_world = normal_matrix(world);

    for triangle in model.triangles() {
        let world_pos = triangle.map(|v| from_homogeneous(world * to_homogeneous(v.position, 1.0)));
        let world_normals = triangle.map(|v| {
            let n = normals_to_world * v.normal;
            if n.magnitude2() > 0.0 {
                n.normalize()
            } else {
                v.normal
            }
        });

        // All three corners must land in front of the eye plane
        let screen = [
            project(fb, ctx, world_pos[0]),
            project(fb, ctx, world_pos[1]),
            project(fb, ctx, world_pos[2]),
        ];
        let (Some(s0), Some(s1), Some(s2)) = (screen[0], screen[1], screen[2]) else {
            continue;
        };
        let screen = [s0, s1, s2];

        if model.flags.fill {
            fill_shaded(fb, ctx, model, &screen, &world_pos, &world_normals);
        }

        if model.flags.wireframe {
            let biased = screen.map(|s| Vector3::new(s.x, s.y, s.z * (1.0 - LINE_DEPTH_BIAS)));
            draw_line(fb, biased[0], biased[1], model.color);
            draw_line(fb, biased[1], biased[2], model.color);
            draw_line(fb, biased[2], biased[0], model.color);
        }

        if model.flags.vertex_normals {
            for (p, n) in world_pos.iter().zip(world_normals.iter()) {
                draw_world_segment(fb, ctx, *p, *p + *n * NORMAL_VIZ_LENGTH, VERTEX_NORMAL_COLOR);
            }
        }

        if model.flags.face_normals {
            let centroid = (world_pos[0] + world_pos[1] + world_pos[2]) / 3.0;
            let edge1 = world_pos[1] - world_pos[0];
            let edge2 = world_pos[2] - world_pos[0];
            let cross = edge1.cross(edge2);
            if cross.magnitude2() > 0.0 {
                let n = cross.normalize();
                draw_world_segment(fb, ctx, centroid, centroid + n * NORMAL_VIZ_LENGTH, FACE_NORMAL_COLOR);
            }
        }
    }

    if model.flags.bounding_box {
        draw_bounding_box(fb, ctx, model, world);
    }
}

/// Shading dispatch for one triangle's fill.
fn fill_shaded(
    fb: &mut FrameBuffer,
    ctx: &DrawContext,
    model: &MeshModel,
    screen: &[Vector3<f32>; 3],
    world_pos: &[Vector3<f32>; 3],
    world_normals: &[Vector3<f32>; 3],
) {
    let depths = (screen[0].z, screen[1].z, screen[2].z);
    let fog = &ctx.settings.fog;
    let material = model.material;

    // Marble mode blends two colors by a barycentric parameter, otherwise
    // the base color is uniform
    let base_color = move |l0: f32| -> Vector3<f32> {
        match material.marble {
            Some([a, b]) => a * (1.0 - l0) + b * l0,
            None => model.color,
        }
    };

    match ctx.settings.shading {
        ShadingMode::Flat => {
            let edge1 = world_pos[1] - world_pos[0];
            let edge2 = world_pos[2] - world_pos[0];
            let cross = edge1.cross(edge2);
            if cross.magnitude2() == 0.0 {
                return;
            }
            let face_normal = cross.normalize();
            let centroid = (world_pos[0] + world_pos[1] + world_pos[2]) / 3.0;
            let lit = total_illumination(ctx.lights, centroid, face_normal, ctx.eye);

            fill_triangle(fb, screen, |l0, l1, l2| {
                let color = lit.mul_element_wise(base_color(l0));
                let z = perspective_depth((l0, l1, l2), depths);
                apply_fog(color, z, fog)
            });
        }
        ShadingMode::Gouraud => {
            // Illumination once per vertex; the colors interpolate
            let vertex_lit = [0, 1, 2].map(|i| {
                total_illumination(ctx.lights, world_pos[i], world_normals[i], ctx.eye)
            });

            fill_triangle(fb, screen, |l0, l1, l2| {
                let lit = vertex_lit[0] * l0 + vertex_lit[1] * l1 + vertex_lit[2] * l2;
                let color = lit.mul_element_wise(base_color(l0));
                let z = perspective_depth((l0, l1, l2), depths);
                apply_fog(color, z, fog)
            });
        }
        ShadingMode::Phong => {
            let eye = ctx.eye;
            let lights = ctx.lights;
            let positions = *world_pos;
            let normals = *world_normals;

            fill_triangle(fb, screen, |l0, l1, l2| {
                let point = positions[0] * l0 + positions[1] * l1 + positions[2] * l2;
                let mut normal = normals[0] * l0 + normals[1] * l1 + normals[2] * l2;
                if normal.magnitude2() > 0.0 {
                    normal = normal.normalize();
                }
                // Flip interpolated normals to face the viewer
                if normal.dot(eye - point) < 0.0 {
                    normal = -normal;
                }
                let lit = total_illumination(lights, point, normal, eye);
                let color = lit.mul_element_wise(base_color(l0));
                let z = perspective_depth((l0, l1, l2), depths);
                apply_fog(color, z, fog)
            });
        }
    }
}

/// Projects and draws a world-space segment with the overlay depth bias.
fn draw_world_segment(
    fb: &mut FrameBuffer,
    ctx: &DrawContext,
    from: Vector3<f32>,
    to: Vector3<f32>,
    color: Vector3<f32>,
) {
    let (Some(a), Some(b)) = (project(fb, ctx, from), project(fb, ctx, to)) else {
        return;
    };
    let bias = 1.0 - LINE_DEPTH_BIAS;
    draw_line(
        fb,
        Vector3::new(a.x, a.y, a.z * bias),
        Vector3::new(b.x, b.y, b.z * bias),
        color,
    );
}

/// The model's bounding box as twelve world-space segments.
fn draw_bounding_box(
    fb: &mut FrameBuffer,
    ctx: &DrawContext,
    model: &MeshModel,
    world: Matrix4<f32>,
) {
    let corners = model
        .bounds()
        .corners()
        .map(|c| from_homogeneous(world * to_homogeneous(c, 1.0)));

    // Corner indices encode lo/hi per axis as bits (x + 2y + 4z); edges
    // connect corners differing in exactly one bit
    const EDGES: [(usize, usize); 12] = [
        (0, 1),
        (2, 3),
        (4, 5),
        (6, 7),
        (0, 2),
        (1, 3),
        (4, 6),
        (5, 7),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];

    for (i, j) in EDGES {
        draw_world_segment(fb, ctx, corners[i], corners[j], BOUNDS_COLOR);
    }
}
