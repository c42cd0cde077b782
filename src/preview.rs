//! On-screen preview of a rendered meter.

use pixels::{Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::Meter;

/// The meter is tiny; blow it up so it is readable on a desktop.
const PREVIEW_SCALE: f64 = 4.0;

impl Meter {
    /// Open a window showing the rendered meter until it is closed.
    pub fn show(&self, title: &str) -> Result<(), Box<dyn std::error::Error>> {
        let image = self.render_image()?;
        let (width, height) = image.dimensions();

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(LogicalSize::new(
                width as f64 * PREVIEW_SCALE,
                height as f64 * PREVIEW_SCALE,
            ))
            .with_resizable(false)
            .build(&event_loop)?;
        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();

        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(width, height, surface_texture)?;
        pixels.frame_mut().copy_from_slice(image.as_raw());

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Wait);
            if let Event::WindowEvent { event, .. } = event {
                match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            log::error!("preview resize failed: {err}");
                        }
                        window_clone.request_redraw();
                    }
                    WindowEvent::RedrawRequested => {
                        if let Err(err) = pixels.render() {
                            log::error!("preview render failed: {err}");
                            window_target.exit();
                        }
                    }
                    _ => {}
                }
            }
        })?;

        Ok(())
    }
}
