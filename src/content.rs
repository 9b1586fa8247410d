//! The furniture of the living room, built from primitives.
//!
//! Everything sits in one `Room` group: a sofa facing the TV wall, a coffee
//! table with a flower arrangement, the TV and a floor lamp in the corner.
//! The ground plane is added separately by [`add_ground`].

use std::f32::consts::PI;

use cgmath::{Quaternion, Rad, Rotation3, Vector3};

use crate::{
    config::RoomConfig,
    data_structures::{
        instance::Transform,
        material::{Material, MaterialId, MaterialLibrary},
        scene_graph::{NodeId, SceneGraph},
        shape::Shape,
    },
};

/// Nodes and materials the frame effects need to reach after construction.
#[derive(Clone, Debug)]
pub struct RoomHandles {
    pub room: NodeId,
    pub lamp_bulb: Option<NodeId>,
    pub lamp_base_y: f32,
    pub tv_screen: Option<NodeId>,
    pub tv_screen_material: Option<MaterialId>,
    /// Shared by the table top and the four legs.
    pub wood: MaterialId,
}

#[derive(Clone, Copy)]
enum Shadows {
    Both,
    Receive,
    Off,
}

struct Builder<'a> {
    scene: &'a mut SceneGraph,
    materials: &'a mut MaterialLibrary,
}

impl Builder<'_> {
    fn material(&mut self, material: Material) -> MaterialId {
        self.materials.add(material)
    }

    fn mesh(
        &mut self,
        parent: NodeId,
        name: &str,
        shape: Shape,
        material: MaterialId,
        local: Transform,
        shadows: Shadows,
    ) -> NodeId {
        let id = self.scene.add_mesh(parent, name, shape, material, local);
        match shadows {
            Shadows::Both => self.scene.set_shadows(id, true, true),
            Shadows::Receive => self.scene.set_shadows(id, false, true),
            Shadows::Off => self.scene.set_shadows(id, false, false),
        }
        id
    }

    /// Mesh with a material of its own.
    fn part(
        &mut self,
        parent: NodeId,
        name: &str,
        shape: Shape,
        material: Material,
        local: Transform,
        shadows: Shadows,
    ) -> NodeId {
        let material = self.material(material);
        self.mesh(parent, name, shape, material, local, shadows)
    }
}

fn rotated_z(angle: f32, local: Transform) -> Transform {
    Transform {
        rotation: Quaternion::from_angle_z(Rad(angle)),
        ..local
    }
}

/// Build the room under the scene root.
pub fn build_living_room(
    scene: &mut SceneGraph,
    materials: &mut MaterialLibrary,
    config: &RoomConfig,
) -> RoomHandles {
    let root = scene.root();
    let room = scene.add_group(root, "Room", Transform::new());
    let mut b = Builder {
        scene: &mut *scene,
        materials: &mut *materials,
    };

    let wood = b.material(
        Material::textured(&config.wood_texture_url, [2.0, 2.0])
            .roughness(0.8)
            .metalness(0.2),
    );

    let sofa = b.scene.add_group(
        room,
        "Sofa",
        Transform {
            rotation: Quaternion::from_angle_y(Rad(PI)),
            ..Transform::at(0.0, -0.5, 2.2)
        },
    );
    build_sofa(&mut b, sofa);

    b.mesh(
        room,
        "Table Top",
        Shape::cuboid(2.0, 0.1, 1.2),
        wood,
        Transform::at(0.0, 0.5, 0.5),
        Shadows::Both,
    );
    let legs = [[-0.9, 0.0, 1.0], [0.9, 0.0, 1.0], [-0.9, 0.0, 0.0], [0.9, 0.0, 0.0]];
    for (i, [x, y, z]) in legs.into_iter().enumerate() {
        b.mesh(
            room,
            &format!("Table Leg {}", i + 1),
            Shape::cylinder(0.05, 0.05, 0.5, 8),
            wood,
            Transform::at(x, y, z),
            Shadows::Both,
        );
    }

    b.part(
        room,
        "Wall",
        Shape::cuboid(10.0, 4.0, 0.1),
        Material::standard(0xf0f0f0).roughness(0.8).metalness(0.05),
        Transform::at(0.0, 1.5, -5.0),
        Shadows::Receive,
    );
    b.part(
        room,
        "TV Body",
        Shape::cuboid(2.6, 1.3, 0.13),
        Material::standard(0x222222).metalness(0.7).roughness(0.4),
        Transform::at(0.0, 1.45, -4.7),
        Shadows::Both,
    );
    let tv_screen_material =
        b.material(Material::standard(0x1e90ff).emissive(0x1e90ff, 0.7));
    let tv_screen = b.mesh(
        room,
        "TV Screen",
        Shape::cuboid(2.2, 1.05, 0.03),
        tv_screen_material,
        Transform::at(0.0, 1.45, -4.63),
        Shadows::Off,
    );
    b.part(
        room,
        "TV Stand",
        Shape::cylinder(0.05, 0.05, 0.2, 12),
        Material::standard(0x444444),
        Transform::at(0.0, 0.85, -4.7),
        Shadows::Both,
    );

    b.part(
        room,
        "Lamp Stand",
        Shape::cylinder(0.05, 0.05, 1.2, 16),
        Material::standard(0xaaaaaa).metalness(0.8).roughness(0.3),
        Transform::at(-2.5, 0.6, 2.5),
        Shadows::Both,
    );
    let lamp_base_y = 1.25;
    let lamp_bulb = b.part(
        room,
        "Lamp Bulb",
        Shape::sphere(0.15, 16, 16),
        Material::standard(0xffffcc).emissive(0xffff99, 1.2),
        Transform::at(-2.5, lamp_base_y, 2.5),
        Shadows::Off,
    );
    b.part(
        room,
        "Lamp Shade",
        Shape::cone(0.25, 0.3, 16),
        Material::standard(0xffe4b5)
            .metalness(0.2)
            .roughness(0.7)
            .transparent(0.7),
        Transform::at(-2.5, 1.45, 2.5),
        Shadows::Off,
    );

    build_flower(&mut b, room);

    log::info!("Room content built with {} nodes", scene.len());
    RoomHandles {
        room,
        lamp_bulb: Some(lamp_bulb),
        lamp_base_y,
        tv_screen: Some(tv_screen),
        tv_screen_material: Some(tv_screen_material),
        wood,
    }
}

fn build_sofa(b: &mut Builder, sofa: NodeId) {
    b.part(
        sofa,
        "Sofa Seat",
        Shape::cuboid(2.6, 0.25, 1.1),
        Material::standard(0x6b4f2c).roughness(0.7),
        Transform::at(0.0, 0.5, 0.0),
        Shadows::Both,
    );
    b.part(
        sofa,
        "Sofa Back",
        Shape::cuboid(2.6, 0.7, 0.18),
        Material::standard(0x7c5c36).roughness(0.7),
        Transform::at(0.0, 0.97, -0.46),
        Shadows::Both,
    );
    for (name, x) in [("Sofa Left Arm", -1.21), ("Sofa Right Arm", 1.21)] {
        b.part(
            sofa,
            name,
            Shape::cuboid(0.18, 0.45, 1.1),
            Material::standard(0x7c5c36).roughness(0.7),
            Transform::at(x, 0.72, 0.0),
            Shadows::Both,
        );
    }
    for i in -1..=1 {
        b.part(
            sofa,
            &format!("Sofa Cushion {}", i + 2),
            Shape::cuboid(0.75, 0.18, 0.95),
            Material::standard(0x8d6e4a).roughness(0.6),
            Transform::at(i as f32 * 0.8, 0.67, 0.0),
            Shadows::Both,
        );
    }
    b.part(
        sofa,
        "Pillow 1",
        Shape::cuboid(0.32, 0.13, 0.32),
        Material::standard(0xfaf0e6).roughness(0.7),
        rotated_z(0.12, Transform::at(-1.05, 0.75, 0.25)),
        Shadows::Both,
    );
    b.part(
        sofa,
        "Pillow 2",
        Shape::cuboid(0.32, 0.13, 0.32),
        Material::standard(0xadd8e6).roughness(0.7),
        rotated_z(-0.1, Transform::at(1.05, 0.75, -0.18)),
        Shadows::Both,
    );
}

fn build_flower(b: &mut Builder, room: NodeId) {
    b.part(
        room,
        "Flower Vase",
        Shape::cylinder(0.07, 0.12, 0.18, 18),
        Material::standard(0xadd8e6).roughness(0.5).metalness(0.3),
        Transform::at(0.0, 0.67, 0.5),
        Shadows::Both,
    );
    b.part(
        room,
        "Flower Stem",
        Shape::cylinder(0.025, 0.025, 0.35, 12),
        Material::standard(0x228b22).roughness(0.5),
        Transform::at(0.0, 0.77, 0.5),
        Shadows::Both,
    );
    b.part(
        room,
        "Flower Blossom",
        Shape::sphere(0.09, 16, 16),
        Material::standard(0xff69b4).roughness(0.4),
        Transform::at(0.0, 0.97, 0.5),
        Shadows::Both,
    );
    for i in 0..5 {
        let angle = i as f32 / 5.0 * PI * 2.0;
        let (x, z) = (angle.cos() * 0.13, angle.sin() * 0.13);
        b.part(
            room,
            &format!("Petal {}", i + 1),
            Shape::sphere(0.07, 12, 12),
            Material::standard(0xffb6c1).roughness(0.5),
            Transform {
                scale: Vector3::new(1.0, 0.5, 1.2),
                ..Transform::at(x, 0.97, 0.5 + z)
            },
            Shadows::Both,
        );
    }
    b.part(
        room,
        "Flower Center",
        Shape::sphere(0.035, 12, 12),
        Material::standard(0xffe066).roughness(0.3),
        Transform::at(0.0, 0.99, 0.5),
        Shadows::Both,
    );
}

/// The grey floor every piece stands on.
pub fn add_ground(scene: &mut SceneGraph, materials: &mut MaterialLibrary) -> NodeId {
    let material = materials.add(Material::standard(0x808080).roughness(0.8).metalness(0.2));
    let root = scene.root();
    let ground = scene.add_mesh(
        root,
        "Ground",
        Shape::plane(20.0, 20.0),
        material,
        Transform {
            rotation: Quaternion::from_angle_x(Rad(-PI / 2.0)),
            ..Transform::at(0.0, -0.5, 0.0)
        },
    );
    scene.set_shadows(ground, false, true);
    ground
}
