// src/ui/panel.rs
//! Pre-built editing panels for the viewer.
//!
//! One window for scene content (model/camera/light selection plus the
//! editor for whichever entity is selected) and one for renderer settings.
//! Panels write straight into the [`Scene`] and [`RenderSettings`] the app
//! owns; invalid camera parameters are rejected by the setters and the
//! previous projection stays in effect.

use cgmath::Vector3;
use imgui::{TreeNodeFlags, Ui};

use crate::render::settings::{RenderSettings, ShadingMode};
use crate::scene::camera::ProjectionKind;
use crate::scene::light::LightKind;
use crate::scene::mesh::MeshModel;
use crate::scene::Scene;

/// Top-level panel set: scene editor plus renderer settings.
pub fn viewer_panel(ui: &Ui, scene: &mut Scene, settings: &mut RenderSettings) {
    let display_size = ui.io().display_size;
    // Guard against invalid display size that could cause crashes
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }

    let panel_width = (display_size[0] * 0.28).clamp(340.0, 460.0);
    let panel_height = (display_size[1] * 0.9).max(480.0);

    ui.window("Scene")
        .size([panel_width, panel_height], imgui::Condition::FirstUseEver)
        .position([16.0, 16.0], imgui::Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            model_section(ui, scene);
            ui.separator();
            camera_section(ui, scene);
            ui.separator();
            light_section(ui, scene);
        });

    ui.window("Renderer")
        .size([panel_width, 320.0], imgui::Condition::FirstUseEver)
        .position(
            [display_size[0] - panel_width - 16.0, 16.0],
            imgui::Condition::FirstUseEver,
        )
        .resizable(true)
        .collapsible(true)
        .build(|| {
            renderer_section(ui, scene, settings);
        });
}

fn model_section(ui: &Ui, scene: &mut Scene) {
    if !ui.collapsing_header("Models", TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }

    let names: Vec<String> = scene.models().iter().map(|m| m.name().to_string()).collect();
    if names.is_empty() {
        ui.text("No models loaded");
        return;
    }

    let active = scene.active_model_index();
    ui.child_window("model_list")
        .size([0.0, 90.0])
        .border(true)
        .build(|| {
            for (i, name) in names.iter().enumerate() {
                if ui
                    .selectable_config(name)
                    .selected(i == active)
                    .build()
                {
                    scene.set_active_model_index(i);
                }
            }
        });

    if let Some(model) = scene.active_model_mut() {
        model_editor(ui, model);
    }
}

fn model_editor(ui: &Ui, model: &mut MeshModel) {
    transform_sliders(
        ui,
        "model",
        &mut model.translation,
        &mut model.rotation,
        &mut model.scale,
    );

    if ui.collapsing_header("Appearance", TreeNodeFlags::empty()) {
        color_sliders(ui, "model_color", "Color", &mut model.color);

        ui.slider("Ambient", 0.0, 1.0, &mut model.material.ambient);
        ui.slider("Diffuse", 0.0, 1.0, &mut model.material.diffuse);
        ui.slider("Specular", 0.0, 1.0, &mut model.material.specular);
        ui.slider("Shininess", 1.0, 128.0, &mut model.material.shininess);

        let mut marble = model.material.marble.is_some();
        if ui.checkbox("Marble", &mut marble) {
            model.material.marble = marble.then(|| {
                [
                    Vector3::new(0.9, 0.9, 0.85),
                    Vector3::new(0.25, 0.22, 0.2),
                ]
            });
        }
        if let Some(colors) = model.material.marble.as_mut() {
            color_sliders(ui, "marble_a", "Marble A", &mut colors[0]);
            color_sliders(ui, "marble_b", "Marble B", &mut colors[1]);
        }
    }

    if ui.collapsing_header("Display", TreeNodeFlags::empty()) {
        ui.checkbox("Fill", &mut model.flags.fill);
        ui.checkbox("Wireframe", &mut model.flags.wireframe);
        ui.checkbox("Bounding box", &mut model.flags.bounding_box);
        ui.checkbox("Vertex normals", &mut model.flags.vertex_normals);
        ui.checkbox("Face normals", &mut model.flags.face_normals);
    }
}

fn camera_section(ui: &Ui, scene: &mut Scene) {
    if !ui.collapsing_header("Cameras", TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }

    let count = scene.camera_count();
    if count == 0 {
        ui.text("No cameras");
        return;
    }

    let active = scene.active_camera_index();
    for i in 0..count {
        if i > 0 {
            ui.same_line();
        }
        let label = format!("camera{}", i);
        if ui.radio_button_bool(&label, i == active) {
            scene.set_active_camera_index(i);
        }
    }

    let Some(camera) = scene.active_camera_mut() else {
        return;
    };

    let mut moved = false;
    moved |= vec3_sliders(ui, "cam_eye", "Eye", &mut camera.eye, -20.0, 20.0);
    moved |= vec3_sliders(ui, "cam_at", "At", &mut camera.at, -20.0, 20.0);
    if moved {
        camera.refresh_view();
    }

    let mut is_orth = camera.kind == ProjectionKind::Orthographic;
    if ui.radio_button_bool("Orthographic", is_orth) {
        is_orth = true;
    }
    ui.same_line();
    if ui.radio_button_bool("Perspective", !is_orth) {
        is_orth = false;
    }

    let mut fovy = camera.fovy;
    let mut height = camera.height;
    let mut aspect = camera.aspect;
    let mut near = camera.near;
    let mut far = camera.far;

    let mut changed = false;
    if is_orth {
        changed |= ui.slider("Height", 0.1, 20.0, &mut height);
    } else {
        changed |= ui.slider("Fov Y", 1.0, 179.0, &mut fovy);
    }
    ui.checkbox("Lock aspect", &mut camera.aspect_locked);
    if camera.aspect_locked {
        changed |= ui.slider("Aspect", 0.1, 4.0, &mut aspect);
    } else {
        ui.text(format!("Aspect (derived): {:.3}", camera.display_aspect()));
        let f = camera.frustum();
        let (mut top, mut bottom, mut left, mut right) = (f.top, f.bottom, f.left, f.right);
        let mut bounds_changed = false;
        bounds_changed |= ui.slider("Top", -10.0, 10.0, &mut top);
        bounds_changed |= ui.slider("Bottom", -10.0, 10.0, &mut bottom);
        bounds_changed |= ui.slider("Left", -10.0, 10.0, &mut left);
        bounds_changed |= ui.slider("Right", -10.0, 10.0, &mut right);
        if bounds_changed {
            // Rejected edits keep the previous frustum
            let _ = camera.set_frustum_bounds(top, bottom, left, right);
        }
    }
    changed |= ui.slider("Near", 0.01, 50.0, &mut near);
    changed |= ui.slider("Far", 0.1, 500.0, &mut far);

    let kind_changed = is_orth != (camera.kind == ProjectionKind::Orthographic);
    if changed || kind_changed {
        let result = if is_orth {
            camera.set_orthographic(height, aspect, near, far)
        } else {
            camera.set_perspective(fovy, aspect, near, far)
        };
        if let Err(err) = result {
            log::debug!("rejected camera edit: {err}");
        }
    }

    if ui.button("Zoom in") {
        let _ = camera.set_zoom(0.9);
    }
    ui.same_line();
    if ui.button("Zoom out") {
        let _ = camera.set_zoom(1.1);
    }
}

fn light_section(ui: &Ui, scene: &mut Scene) {
    if !ui.collapsing_header("Lights", TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }

    let count = scene.light_count();
    if count == 0 {
        ui.text("No lights");
        return;
    }

    let active = scene.active_light_index();
    for i in 0..count {
        if i > 0 {
            ui.same_line();
        }
        let label = format!("light{}", i);
        if ui.radio_button_bool(&label, i == active) {
            scene.set_active_light_index(i);
        }
    }

    let Some(light) = scene.active_light_mut() else {
        return;
    };

    let mut is_point = light.kind == LightKind::Point;
    if ui.radio_button_bool("Point", is_point) {
        is_point = true;
    }
    ui.same_line();
    if ui.radio_button_bool("Directional", !is_point) {
        is_point = false;
    }
    light.kind = if is_point {
        LightKind::Point
    } else {
        LightKind::Directional
    };

    vec3_sliders(
        ui,
        "light_pos",
        "Position",
        &mut light.proxy_mut().translation,
        -20.0,
        20.0,
    );

    color_sliders(ui, "light_color", "Color", &mut light.color);
    ui.slider("Ka", 0.0, 1.0, &mut light.ambient);
    ui.slider("Kd", 0.0, 1.0, &mut light.diffuse);
    ui.slider("Ks", 0.0, 1.0, &mut light.specular);
    ui.slider("Shine", 1.0, 128.0, &mut light.shininess);
}

fn renderer_section(ui: &Ui, scene: &mut Scene, settings: &mut RenderSettings) {
    ui.text("Shading");
    ui.radio_button("Flat", &mut settings.shading, ShadingMode::Flat);
    ui.same_line();
    ui.radio_button("Gouraud", &mut settings.shading, ShadingMode::Gouraud);
    ui.same_line();
    ui.radio_button("Phong", &mut settings.shading, ShadingMode::Phong);

    ui.separator();
    ui.checkbox("Anti-aliasing (2x)", &mut settings.anti_alias);
    ui.checkbox("Axes", &mut settings.draw_axes);
    color_sliders(ui, "clear_color", "Background", &mut settings.clear_color);

    ui.separator();
    ui.checkbox("Fog", &mut settings.fog.enabled);
    if settings.fog.enabled {
        color_sliders(ui, "fog_color", "Fog color", &mut settings.fog.color);
        ui.slider("Fog near", 0.1, 50.0, &mut settings.fog.near);
        ui.slider("Fog far", 0.5, 200.0, &mut settings.fog.far);
        if settings.fog.far <= settings.fog.near {
            settings.fog.far = settings.fog.near + 0.1;
        }
    }

    ui.separator();
    if ui.collapsing_header("World transform", TreeNodeFlags::empty()) {
        transform_sliders(
            ui,
            "world",
            &mut scene.translation,
            &mut scene.rotation,
            &mut scene.scale,
        );
    }
}

/// Position/rotation/scale slider block shared by the model editor and the
/// scene-level world transform.
fn transform_sliders(
    ui: &Ui,
    id: &str,
    translation: &mut Vector3<f32>,
    rotation: &mut Vector3<f32>,
    scale: &mut Vector3<f32>,
) {
    if ui.collapsing_header("Transform", TreeNodeFlags::DEFAULT_OPEN) {
        vec3_sliders(ui, &format!("{id}_pos"), "Position", translation, -10.0, 10.0);
        vec3_sliders(ui, &format!("{id}_rot"), "Rotation", rotation, -180.0, 180.0);
        vec3_sliders(ui, &format!("{id}_scale"), "Scale", scale, 0.01, 5.0);

        if ui.button("Reset") {
            *translation = Vector3::new(0.0, 0.0, 0.0);
            *rotation = Vector3::new(0.0, 0.0, 0.0);
            *scale = Vector3::new(1.0, 1.0, 1.0);
        }
    }
}

fn vec3_sliders(
    ui: &Ui,
    id: &str,
    label: &str,
    value: &mut Vector3<f32>,
    min: f32,
    max: f32,
) -> bool {
    ui.text(label);
    let mut changed = false;
    ui.columns(3, id, false);
    ui.set_next_item_width(-1.0);
    changed |= ui.slider(format!("##{id}_x"), min, max, &mut value.x);
    ui.next_column();
    ui.set_next_item_width(-1.0);
    changed |= ui.slider(format!("##{id}_y"), min, max, &mut value.y);
    ui.next_column();
    ui.set_next_item_width(-1.0);
    changed |= ui.slider(format!("##{id}_z"), min, max, &mut value.z);
    ui.columns(1, "", false);
    changed
}

fn color_sliders(ui: &Ui, id: &str, label: &str, color: &mut Vector3<f32>) -> bool {
    let mut rgb = [color.x, color.y, color.z];
    let changed = ui.color_edit3(format!("{label}##{id}"), &mut rgb);
    if changed {
        *color = Vector3::new(rgb[0], rgb[1], rgb[2]);
    }
    changed
}
