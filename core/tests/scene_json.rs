use std::{
    fs,
    path::{Path, PathBuf},
};

use glam::{Vec2, Vec3};
use novo_core::{
    render::{record::FrameRecorder, RenderContext, LIGHT_COLORS},
    scene::{
        camera::Camera,
        entity::{Light, Mesh, MeshKind, Transform},
        resource::{Material, ResourceKind, Resources},
        Scene, SceneError,
    },
};
use palette::LinSrgb;

fn temp_root(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("novo-it-{}-{}", tag, uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn populate(root: &Path) -> (Resources, Scene) {
    fs::create_dir_all(root.join("shaders")).unwrap();
    fs::write(root.join("shaders/flat.vert"), "void main() {}").unwrap();
    fs::write(root.join("shaders/flat.frag"), "void main() {}").unwrap();
    fs::write(root.join("shiny.json"), r#"{ "shininess": 64.0 }"#).unwrap();
    image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]))
        .save(root.join("crate.png"))
        .unwrap();

    let mut resources = Resources::new(root);
    resources.install_builtins();
    let flat = resources
        .load_shader("flat", "shaders/flat.vert", "shaders/flat.frag")
        .unwrap();
    let shiny = resources.load_material("shiny", "shiny.json").unwrap();
    let rough = resources.add_material(
        "rough",
        Material {
            specular_factor: 0.2,
            ..Default::default()
        },
    );
    let texture = resources.load_texture("crate", "crate.png").unwrap();
    let lit = resources.shader(Resources::LIT_SHADER).unwrap();
    let light_shader = resources.shader(Resources::LIGHT_SHADER).unwrap();

    let mut scene = Scene::new("Round trip");
    let mut floor = Mesh::new(
        MeshKind::Plane,
        lit,
        texture,
        rough,
        Transform::default().with_scale(Vec3::new(10., 1., 10.)),
    );
    floor.set_uv(Vec2::new(5., 5.));
    scene.add_object_named(floor, "Floor");

    let mut box_ = Mesh::new(
        MeshKind::Box,
        flat,
        texture,
        shiny,
        Transform::default()
            .with_position(Vec3::new(0., 1., 0.))
            .with_rotation(Vec3::new(0., 45., 0.)),
    );
    box_.set_visible(false);
    scene.add_object(box_);

    scene.add_object_named(
        Mesh::new(
            MeshKind::Triangle {
                a: Vec3::ZERO,
                b: Vec3::X,
                c: Vec3::Y,
            },
            lit,
            texture,
            shiny,
            Transform::default(),
        ),
        "Sail",
    );

    scene.add_light_named(
        Light::new(
            LinSrgb::new(1., 0.5, 0.25),
            light_shader,
            Transform::default().with_position(Vec3::new(2., 3., 4.)),
        ),
        "Lamp",
    );

    (resources, scene)
}

#[test]
fn save_then_load_reproduces_scene() {
    let root = temp_root("roundtrip");
    let (resources, scene) = populate(&root);

    let json = scene.save_to_json(&resources, "scene.json").unwrap();
    assert_eq!(json["name"], "Round trip");
    assert_eq!(json["objects"].as_array().unwrap().len(), 4);
    assert_eq!(json["objects"][3]["type.id"], "Light");
    assert!(root.join("scene.json").exists());

    let mut loaded_resources = Resources::new(&root);
    loaded_resources.install_builtins();
    let mut loaded = Scene::default();
    loaded
        .load_from_json(&mut loaded_resources, "scene.json")
        .unwrap();

    assert_eq!(loaded.name(), "Round trip");
    assert_eq!(loaded.object_count(), 3);
    assert_eq!(loaded.light_count(), 1);

    for ((_, a, name_a), (_, b, name_b)) in scene.objects().zip(loaded.objects()) {
        assert_eq!(name_a, name_b);
        assert_eq!(a.kind(), b.kind());
        assert_eq!(a.transform(), b.transform());
        assert_eq!(a.uv(), b.uv());
        assert_eq!(a.is_visible(), b.is_visible());
        assert_eq!(a.geometry(), b.geometry());
        assert_eq!(
            resources.shader_name(a.shader()),
            loaded_resources.shader_name(b.shader())
        );
        assert_eq!(
            resources.texture_name(a.texture()),
            loaded_resources.texture_name(b.texture())
        );
        assert_eq!(
            resources.material_by_id(a.material()),
            loaded_resources.material_by_id(b.material())
        );
    }

    let (_, lamp, name) = loaded.lights().next().unwrap();
    assert_eq!(name, "Lamp");
    assert_eq!(lamp.color(), LinSrgb::new(1., 0.5, 0.25));
    assert_eq!(lamp.position(), Vec3::new(2., 3., 4.));

    fs::remove_dir_all(root).unwrap();
}

#[test]
fn edited_materials_survive_a_round_trip() {
    let root = temp_root("materials");
    let (mut resources, scene) = populate(&root);

    let shiny = resources.material("shiny").unwrap();
    resources.material_by_id_mut(shiny).unwrap().shininess = 99.;
    let default = resources.material(Resources::DEFAULT_MATERIAL).unwrap();
    resources.material_by_id_mut(default).unwrap().ambient_factor = 0.5;

    let json = scene.save_to_json(&resources, "scene.json").unwrap();
    let records = json["materials"].as_array().unwrap();
    let shiny_record = records.iter().find(|m| m["name"] == "shiny").unwrap();
    assert!(shiny_record.get("path").is_none());
    assert!(records.iter().any(|m| m["name"] == Resources::DEFAULT_MATERIAL));

    let mut loaded_resources = Resources::new(&root);
    loaded_resources.install_builtins();
    Scene::default()
        .load_from_json(&mut loaded_resources, "scene.json")
        .unwrap();

    let shiny = loaded_resources.material("shiny").unwrap();
    assert_eq!(loaded_resources.material_by_id(shiny).unwrap().shininess, 99.);
    let default = loaded_resources
        .material(Resources::DEFAULT_MATERIAL)
        .unwrap();
    assert_eq!(
        loaded_resources.material_by_id(default).unwrap().ambient_factor,
        0.5
    );
    // The file on disk is untouched.
    assert_eq!(
        fs::read_to_string(root.join("shiny.json")).unwrap(),
        r#"{ "shininess": 64.0 }"#
    );

    fs::remove_dir_all(root).unwrap();
}

#[test]
fn unknown_texture_is_a_missing_reference() {
    let root = temp_root("missing");
    fs::write(
        root.join("broken.json"),
        r#"{
            "name": "Broken",
            "objects": [
                { "name": "Ok", "type.id": "Plane" },
                { "name": "Crate", "type.id": "Box", "texture": "nope" }
            ]
        }"#,
    )
    .unwrap();

    let mut resources = Resources::new(&root);
    resources.install_builtins();
    let mut scene = Scene::default();
    let err = scene
        .load_from_json(&mut resources, "broken.json")
        .unwrap_err();

    match err {
        SceneError::MissingReference { object, kind, name } => {
            assert_eq!(object, "Crate");
            assert_eq!(kind, ResourceKind::Texture);
            assert_eq!(name, "nope");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(scene.object_count(), 0);

    fs::remove_dir_all(root).unwrap();
}

#[test]
fn missing_scene_file_is_io_error() {
    let mut resources = Resources::new(temp_root("nofile"));
    let err = Scene::default()
        .load_from_json(&mut resources, "absent.json")
        .unwrap_err();
    assert!(matches!(err, SceneError::Io { .. }));
}

#[test]
fn loaded_scene_renders() {
    let root = temp_root("render");
    let (resources, scene) = populate(&root);
    scene.save_to_json(&resources, "scene.json").unwrap();

    let mut resources = Resources::new(&root);
    resources.install_builtins();
    let mut loaded = Scene::default();
    loaded.load_from_json(&mut resources, "scene.json").unwrap();

    let camera = Camera::default();
    let mut recorder = FrameRecorder::default();
    recorder.begin_frame();
    loaded.render(&mut RenderContext::new(&mut recorder, &camera, &resources));

    // The hidden box pushes light state but issues no draw.
    assert_eq!(recorder.array_writes(LIGHT_COLORS), 3);
    let lit = resources.shader(Resources::LIT_SHADER).unwrap();
    assert_eq!(recorder.draws_with(lit), 2);
    assert_eq!(recorder.unbracketed_writes(), 0);

    fs::remove_dir_all(root).unwrap();
}
