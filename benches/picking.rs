use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3};
use scene_viewer::camera::PerspectiveCamera;
use scene_viewer::config::ViewerConfig;
use scene_viewer::picking::{hover_text, PickScene, Raycaster};
use scene_viewer::scene::{place_model, Mesh, Node, Placement, Primitive, Scene, Transform};

const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

/// Flat quad subdivided into `cells` x `cells` tiles, two triangles each
fn floor_plate(name: &str, cells: u32) -> Primitive {
    let mut positions = Vec::new();
    for y in 0..=cells {
        for x in 0..=cells {
            positions.push(Vec3::new(x as f32, y as f32, 0.0) / cells as f32);
        }
    }

    let stride = cells + 1;
    let mut indices = Vec::new();
    for y in 0..cells {
        for x in 0..cells {
            let i = y * stride + x;
            indices.extend_from_slice(&[i, i + 1, i + stride, i + 1, i + stride + 1, i + stride]);
        }
    }

    Primitive {
        name: name.to_string(),
        normals: vec![Vec3::Z; positions.len()],
        positions,
        indices,
        color: [0.7, 0.7, 0.7, 1.0],
        double_sided: false,
    }
}

/// Building made of `rooms` x `rooms` floor plates laid out side by side
fn building(rooms: u32, cells: u32) -> Node {
    let mut root = Node::new("building");
    for row in 0..rooms {
        for col in 0..rooms {
            let name = format!("room_{}_{}", row, col);
            let mut room = Node::new(name.clone()).with_mesh(Mesh {
                name: Some(name.clone()),
                primitives: vec![floor_plate(&name, cells)],
            });
            room.transform = Transform {
                translation: Vec3::new(col as f32, row as f32, 0.0),
                ..Transform::IDENTITY
            };
            root = root.with_child(room);
        }
    }
    root
}

fn viewer_scene(rooms: u32, cells: u32) -> (PerspectiveCamera, PickScene) {
    let config = ViewerConfig::default();
    let mut scene = Scene::from_config(&config);
    let mut model = building(rooms, cells);
    place_model(&mut model, &Placement::from_settings(&config.model));
    scene.add(model);

    let camera = PerspectiveCamera::new(&config.camera, VIEWPORT.x as u32, VIEWPORT.y as u32);
    (camera, PickScene::from_scene(&scene))
}

/// Benchmark: hover pick from the screen center across scene sizes
fn bench_hover_pick(c: &mut Criterion) {
    let mut group = c.benchmark_group("hover_pick");

    for rooms in [2u32, 8, 16] {
        let (camera, pick_scene) = viewer_scene(rooms, 8);
        let cursor = VIEWPORT * 0.5;

        let id = BenchmarkId::from_parameter(rooms * rooms);
        group.bench_with_input(id, &pick_scene, |b, pick_scene| {
            b.iter(|| {
                let raycaster = Raycaster::from_screen(&camera, black_box(cursor), VIEWPORT);
                black_box(raycaster.map(|r| hover_text(&r.intersect_scene(pick_scene))))
            })
        });
    }

    group.finish();
}

/// Benchmark: sweep the cursor over the viewport, mostly missing geometry
fn bench_cursor_sweep(c: &mut Criterion) {
    let (camera, pick_scene) = viewer_scene(8, 8);
    let cursors: Vec<Vec2> = (0..64)
        .map(|i| Vec2::new((i % 8) as f32 + 0.5, (i / 8) as f32 + 0.5) * (VIEWPORT / 8.0))
        .collect();

    c.bench_function("cursor_sweep_64", |b| {
        b.iter(|| {
            let mut hits = 0;
            for cursor in &cursors {
                if let Some(raycaster) = Raycaster::from_screen(&camera, *cursor, VIEWPORT) {
                    hits += raycaster.intersect_scene(&pick_scene).len();
                }
            }
            black_box(hits)
        })
    });
}

/// Benchmark: flattening the node tree into world-space meshes
fn bench_scene_flatten(c: &mut Criterion) {
    let config = ViewerConfig::default();
    let mut scene = Scene::from_config(&config);
    scene.add(building(16, 8));

    c.bench_function("scene_flatten_256_rooms", |b| b.iter(|| black_box(scene.flatten())));
}

criterion_group!(benches, bench_hover_pick, bench_cursor_sweep, bench_scene_flatten);
criterion_main!(benches);
