//! End-to-end shadow volume tests.
//!
//! These tests run the whole per-light sequence (build topology, classify
//! light facing, extract the silhouette, extrude the vertex buffer) over a
//! small "open book" mesh: one triangle lying in the XZ plane and one folded
//! straight down from the shared spine edge.

use glam::{Vec3, Vec4};

use umbra_engine::buffer::{
    BufferUsage, HardwareIndexBuffer, HardwareVertexBuffer, IndexFormat, LockMode,
};
use umbra_engine::mesh::{EdgeData, EdgeListBuilder};
use umbra_engine::scene::{Light, LightType, PointLight};
use umbra_engine::shadow::{
    extrude_vertices, generate_shadow_volume, update_edge_list_light_facing, ShadowRenderable,
    EXTRUSION_DISTANCE,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn book_positions() -> Vec<Vec3> {
    vec![
        Vec3::new(0.0, 0.0, 0.0),  // spine start
        Vec3::new(1.0, 0.0, 0.0),  // spine end
        Vec3::new(0.5, 0.0, -1.0), // flat page corner
        Vec3::new(0.5, -1.0, 0.0), // folded page corner
    ]
}

/// Flat page (normal +Y) and folded page (normal +Z) sharing the spine.
fn book_topology() -> EdgeData {
    let mut builder = EdgeListBuilder::new();
    let set = builder.add_vertex_set(book_positions());
    builder.add_triangles(set, &[0, 1, 2, 1, 0, 3]).unwrap();
    builder.build()
}

/// A light that faces the flat page but not the folded one.
fn side_light() -> Light {
    Light::Point(PointLight::new(
        Vec3::new(0.5, 5.0, -1.0),
        Vec3::ONE,
        1.0,
        50.0,
    ))
}

#[test]
fn test_point_light_full_pass() {
    init_logging();
    let mut topology = book_topology();
    let light = side_light();

    update_edge_list_light_facing(&mut topology, light.shadow_volume_vector());
    assert!(topology.triangles[0].light_facing);
    assert!(!topology.triangles[1].light_facing);

    // Worst-case sizing: every edge of the open book is a silhouette edge
    // here (one lit/unlit boundary plus four lit or unlit rims).
    let capacity = topology.max_silhouette_indices(LightType::Point);
    assert_eq!(capacity, 30);

    let mut index_buffer =
        HardwareIndexBuffer::new(IndexFormat::Uint16, capacity, BufferUsage::INDEX);
    let mut renderables = vec![ShadowRenderable::new(0)];
    generate_shadow_volume(
        &topology,
        &mut index_buffer,
        light.light_type(),
        &mut renderables,
    );

    assert_eq!(renderables[0].index_start(), 0);
    assert_eq!(renderables[0].index_count(), capacity);

    // The spine edge is declared by the lit triangle as 0 -> 1, so its quad
    // comes out as (1, 0, 4) + (4, 5, 1), far indices offset by the four
    // original vertices.
    let lock = index_buffer.lock(LockMode::ReadOnly);
    assert_eq!(&lock.as_u16()[..6], &[1, 0, 4, 4, 5, 1]);
}

#[test]
fn test_directional_light_halves_the_output() {
    init_logging();
    let mut topology = book_topology();
    // Sun shining along -Y: flat page lit, folded page edge-on (unlit).
    let light = Vec4::new(0.0, 1.0, 0.0, 0.0);

    update_edge_list_light_facing(&mut topology, light);
    assert!(topology.triangles[0].light_facing);
    assert!(!topology.triangles[1].light_facing);

    let capacity = topology.max_silhouette_indices(LightType::Directional);
    assert_eq!(capacity, 15);

    let mut index_buffer =
        HardwareIndexBuffer::new(IndexFormat::Uint16, capacity, BufferUsage::INDEX);
    let mut renderables = vec![ShadowRenderable::new(0)];
    generate_shadow_volume(
        &topology,
        &mut index_buffer,
        LightType::Directional,
        &mut renderables,
    );

    // One triangle per silhouette edge, no far caps.
    assert_eq!(renderables[0].index_count(), 15);
    let lock = index_buffer.lock(LockMode::ReadOnly);
    assert_eq!(&lock.as_u16()[..3], &[1, 0, 4]);
}

#[test]
fn test_extrusion_fills_far_half_away_from_point_light() {
    init_logging();
    let near = book_positions();
    let mut shadow_vertices: Vec<Vec3> = near.clone();
    shadow_vertices.extend(std::iter::repeat(Vec3::ZERO).take(near.len()));
    let mut vertex_buffer =
        HardwareVertexBuffer::from_positions(&shadow_vertices, BufferUsage::VERTEX);

    let light = side_light();
    extrude_vertices(
        &mut vertex_buffer,
        near.len(),
        light.shadow_volume_vector(),
        EXTRUSION_DISTANCE,
    );

    let light_position = Vec3::new(0.5, 5.0, -1.0);
    let lock = vertex_buffer.lock(LockMode::ReadOnly);
    let positions = lock.positions();
    for (i, original) in near.iter().enumerate() {
        assert_eq!(positions[i], *original, "near half must be untouched");

        let far = positions[i + near.len()];
        let expected = *original + (*original - light_position).normalize() * EXTRUSION_DISTANCE;
        assert!(
            (far - expected).length() < 1.0,
            "vertex {} extruded to {:?}, expected {:?}",
            i,
            far,
            expected
        );
    }
}

#[test]
fn test_directional_extrusion_follows_packed_vector() {
    init_logging();
    let mut vertex_buffer = HardwareVertexBuffer::from_positions(
        &[Vec3::ZERO, Vec3::ZERO],
        BufferUsage::VERTEX,
    );

    extrude_vertices(
        &mut vertex_buffer,
        1,
        Vec4::new(0.0, -1.0, 0.0, 0.0),
        EXTRUSION_DISTANCE,
    );

    let lock = vertex_buffer.lock(LockMode::ReadOnly);
    assert_eq!(
        lock.positions()[1],
        Vec3::new(0.0, -EXTRUSION_DISTANCE, 0.0)
    );
}

#[test]
fn test_silhouette_flips_when_the_light_crosses_the_page() {
    init_logging();
    let mut topology = book_topology();

    // Below the flat page: the folded page is lit instead, so the spine edge
    // emits with reversed winding.
    let light = Light::Point(PointLight::new(
        Vec3::new(0.5, -0.5, 2.0),
        Vec3::ONE,
        1.0,
        50.0,
    ));
    update_edge_list_light_facing(&mut topology, light.shadow_volume_vector());
    assert!(!topology.triangles[0].light_facing);
    assert!(topology.triangles[1].light_facing);

    let mut index_buffer = HardwareIndexBuffer::new(
        IndexFormat::Uint16,
        topology.max_silhouette_indices(LightType::Point),
        BufferUsage::INDEX,
    );
    let mut renderables = vec![ShadowRenderable::new(0)];
    generate_shadow_volume(
        &topology,
        &mut index_buffer,
        light.light_type(),
        &mut renderables,
    );

    let lock = index_buffer.lock(LockMode::ReadOnly);
    assert_eq!(&lock.as_u16()[..6], &[0, 1, 5, 5, 4, 0]);
}
