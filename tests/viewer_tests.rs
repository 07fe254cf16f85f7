use glam::{Vec2, Vec3};
use scene_viewer::camera::PerspectiveCamera;
use scene_viewer::config::ViewerConfig;
use scene_viewer::controls::OrbitControls;
use scene_viewer::loaders::load_gltf;
use scene_viewer::picking::{hover_text, PickScene, Raycaster, UNNAMED_OBJECT};
use scene_viewer::scene::{place_model, Placement, Scene, WorldMesh};

const CHAPEL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/chapel.gltf");
const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

/// Default viewer scene with the fixture placed the way the viewer places models
fn default_scene() -> (ViewerConfig, Scene) {
    let config = ViewerConfig::default();
    let mut scene = Scene::from_config(&config);

    let mut model = load_gltf(CHAPEL).expect("fixture loads");
    place_model(&mut model, &Placement::from_settings(&config.model));
    scene.add(model);
    (config, scene)
}

fn centroid(mesh: &WorldMesh) -> Vec3 {
    let [a, b, c] = mesh.triangle(0);
    (a + b + c) / 3.0
}

fn pick(camera: &PerspectiveCamera, pick_scene: &PickScene, world: Vec3) -> Option<String> {
    let cursor = camera.project(world, VIEWPORT).expect("point is on screen");
    let raycaster = Raycaster::from_screen(camera, cursor, VIEWPORT).unwrap();
    hover_text(&raycaster.intersect_scene(pick_scene))
}

#[cfg(test)]
mod viewer_tests {
    use super::*;

    #[test]
    fn test_default_placement_lays_model_on_ground() {
        let (_, scene) = default_scene();
        let bounds = scene.bounds();

        // Rotated flat onto y = 0, scaled by 7, moved to x = 100
        assert!(bounds.min.y.abs() < 1e-3 && bounds.max.y.abs() < 1e-3);
        assert!((bounds.min.x - 100.0).abs() < 1e-3);
        assert!((bounds.max.x - 114.0).abs() < 1e-3);
        assert!((bounds.max.z - 42.0).abs() < 1e-3);
    }

    #[test]
    fn test_hover_reports_primitive_name() {
        let (config, scene) = default_scene();
        let camera = PerspectiveCamera::new(&config.camera, VIEWPORT.x as u32, VIEWPORT.y as u32);
        let meshes = scene.flatten();
        let spire = meshes.iter().find(|m| m.name == "Spire_0").unwrap().clone();
        let pick_scene = PickScene::new(meshes, scene.line_segments());

        assert_eq!(pick(&camera, &pick_scene, centroid(&spire)).as_deref(), Some("Spire_0"));
    }

    #[test]
    fn test_hover_on_axis_uses_fallback_name() {
        let (config, scene) = default_scene();
        let camera = PerspectiveCamera::new(&config.camera, VIEWPORT.x as u32, VIEWPORT.y as u32);
        let pick_scene = PickScene::from_scene(&scene);

        let on_x_axis = Vec3::new(50.0, 0.0, 0.0);
        assert_eq!(pick(&camera, &pick_scene, on_x_axis).as_deref(), Some(UNNAMED_OBJECT));
    }

    #[test]
    fn test_empty_sky_has_no_tooltip() {
        let (config, scene) = default_scene();
        let camera = PerspectiveCamera::new(&config.camera, VIEWPORT.x as u32, VIEWPORT.y as u32);
        let raycaster = Raycaster::from_screen(&camera, Vec2::new(5.0, 5.0), VIEWPORT).unwrap();

        assert_eq!(hover_text(&raycaster.intersect_scene(&PickScene::from_scene(&scene))), None);
    }

    #[test]
    fn test_picking_follows_orbit() {
        let (config, scene) = default_scene();
        let mut camera =
            PerspectiveCamera::new(&config.camera, VIEWPORT.x as u32, VIEWPORT.y as u32);
        let mut controls = OrbitControls::new(config.controls.clone(), VIEWPORT.y as u32);

        controls.rotate(Vec2::new(200.0, 40.0));
        let mut frames = 0;
        while controls.update(&mut camera) {
            frames += 1;
            assert!(frames < 1000, "damping should settle");
        }
        assert!(frames > 1, "damping spreads the motion over frames");

        // Never below the configured polar limit
        let offset = camera.position - camera.target;
        let phi = (offset.y / offset.length()).acos();
        assert!(phi <= config.controls.max_polar_angle + 1e-4);

        let meshes = scene.flatten();
        let spire = meshes.iter().find(|m| m.name == "Spire_0").unwrap().clone();
        let pick_scene = PickScene::new(meshes, scene.line_segments());
        assert_eq!(pick(&camera, &pick_scene, centroid(&spire)).as_deref(), Some("Spire_0"));
    }
}
