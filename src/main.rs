use glamx::{Vec2, Vec3};
use kiss3d::camera::OrbitCamera3d;
use kiss3d::event::{Action, MouseButton, WindowEvent};
use kiss3d::scene::SceneNode3d;
use kiss3d::window::Window;
use log::info;

use pendulum_waves::config::SceneConfig;
use pendulum_waves::scene::{SceneState, AMBIENT_INTENSITY, BACKGROUND, CAMERA_EYE};

#[kiss3d::main]
async fn main() {
    env_logger::init();

    let config = SceneConfig::default();
    let mut window = Window::new("pendulum-waves").await;
    window.set_background_color(BACKGROUND);
    window.set_ambient(AMBIENT_INTENSITY);

    let mut camera = OrbitCamera3d::new(CAMERA_EYE, Vec3::ZERO);
    let mut scene = SceneNode3d::empty();
    let mut state = SceneState::new(&mut scene, config);

    let mut cursor = Vec2::ZERO;
    while window.render_3d(&mut scene, &mut camera).await {
        let window_size = Vec2::new(window.size()[0] as f32, window.size()[1] as f32);

        for event in window.events().iter() {
            match event.value {
                WindowEvent::CursorPos(x, y, _) => {
                    cursor = Vec2::new(x as f32, y as f32);
                }
                WindowEvent::MouseButton(MouseButton::Button1, Action::Press, _) => {
                    if let Some(index) = state.handle_click(&camera, cursor, window_size) {
                        info!("highlighted cube {index}");
                    }
                }
                _ => {}
            }
        }

        state.step();
    }
}
