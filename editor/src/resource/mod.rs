use glam::Vec3;
use novo_core::scene::{
    entity::{Light, Mesh, MeshKind, Transform},
    resource::{ResourceResult, Resources},
    Scene,
};
use palette::LinSrgb;

/// A floor, a crate, a triangle and two lights, using built-in resources only.
pub fn load_primitives(resources: &Resources) -> ResourceResult<Scene> {
    let lit = resources.shader(Resources::LIT_SHADER)?;
    let light_shader = resources.shader(Resources::LIGHT_SHADER)?;
    let white = resources.texture(Resources::WHITE_TEXTURE)?;
    let material = resources.material(Resources::DEFAULT_MATERIAL)?;

    let mut scene = Scene::new("Primitives");

    let mut floor = Mesh::new(
        MeshKind::Plane,
        lit,
        white,
        material,
        Transform::default()
            .with_position(Vec3::new(0., -1., 0.))
            .with_scale(Vec3::new(10., 1., 10.)),
    );
    floor.set_uv(glam::Vec2::splat(10.));
    scene.add_object_named(floor, "Floor");

    scene.add_object_named(
        Mesh::new(
            MeshKind::Box,
            lit,
            white,
            material,
            Transform::default()
                .with_position(Vec3::new(0., 0., 5.))
                .with_rotation(Vec3::new(0., 30., 0.)),
        ),
        "Crate",
    );

    scene.add_object(Mesh::new(
        MeshKind::Triangle {
            a: Vec3::new(-1., -1., 0.),
            b: Vec3::new(1., -1., 0.),
            c: Vec3::new(0., 1., 0.),
        },
        lit,
        white,
        material,
        Transform::default().with_position(Vec3::new(3., 0., 6.)),
    ));

    scene.add_light(Light::new(
        LinSrgb::new(1., 0.9, 0.8),
        light_shader,
        Transform::default()
            .with_position(Vec3::new(2., 3., 2.))
            .with_scale(Vec3::splat(0.1)),
    ));
    scene.add_light(Light::new(
        LinSrgb::new(0.2, 0.3, 1.),
        light_shader,
        Transform::default()
            .with_position(Vec3::new(-3., 2., 7.))
            .with_scale(Vec3::splat(0.1)),
    ));

    log::info!(
        "Built scene `{}` with {} objects and {} lights.",
        scene.name(),
        scene.object_count(),
        scene.light_count()
    );
    Ok(scene)
}
