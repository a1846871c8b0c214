//! Window lifecycle and the per-frame loop.
//!
//! The loop each frame: drain input into the camera controller, update the
//! camera and the flashlight, upload the two mutable uniforms, then record
//! one render pass that draws the ten cubes in table order.

use std::{iter, sync::Arc};

use anyhow::Result;
use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};

use crate::{
    context::Context,
    lights::LightsUniform,
    pipelines,
    scene::{Scene, SceneSettings},
};

#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    scene: Scene,
    settings: SceneSettings,
    pipeline: wgpu::RenderPipeline,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>) -> Result<Self> {
        let ctx = Context::new(window).await?;
        let scene = Scene::new(&ctx.device, &ctx.queue).await?;
        let pipeline = pipelines::mk_scene_pipeline(
            &ctx.device,
            &ctx.config,
            &scene.material_layout,
            &ctx.camera.bind_group_layout,
            &ctx.lights.bind_group_layout,
            &scene.object_layout,
        );

        Ok(Self {
            ctx,
            scene,
            settings: SceneSettings::default(),
            pipeline,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.is_surface_configured = true;
            self.ctx.resize(width, height);
        }
    }

    /// Advance the simulation and upload the camera and light uniforms.
    fn update(&mut self, dt: Duration) {
        let camera = &mut self.ctx.camera;
        camera.controller.update(&mut camera.camera, dt);
        camera
            .uniform
            .update_view_proj(&camera.camera, &self.ctx.projection);
        self.ctx
            .queue
            .write_buffer(&camera.buffer, 0, bytemuck::cast_slice(&[camera.uniform]));

        let lights = &mut self.ctx.lights;
        lights.rig.follow_camera(&camera.camera);
        lights.uniform = LightsUniform::new(&lights.rig, self.settings.normal_mapping);
        self.ctx
            .queue
            .write_buffer(&lights.buffer, 0, bytemuck::cast_slice(&[lights.uniform]));
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.scene.material.bind_group, &[]);
            render_pass.set_bind_group(1, &self.ctx.camera.bind_group, &[]);
            render_pass.set_bind_group(2, &self.ctx.lights.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.scene.mesh.vertex_buffer.slice(..));
            render_pass
                .set_index_buffer(self.scene.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            // One draw per cube, strictly in table order.
            for object in &self.scene.objects {
                render_pass.set_bind_group(3, &object.bind_group, &[]);
                render_pass.draw_indexed(0..self.scene.mesh.num_elements, 0, 0..1);
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    state: Option<AppState>,
    init_error: Option<anyhow::Error>,
    last_time: Instant,
}

impl App {
    fn new() -> Result<Self> {
        Ok(Self {
            async_runtime: tokio::runtime::Runtime::new()?,
            state: None,
            init_error: None,
            last_time: Instant::now(),
        })
    }

    /// Surface a startup failure once the event loop has wound down, so
    /// the process exits non-zero instead of swallowing the error.
    fn finish(self) -> Result<()> {
        match self.init_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window_attributes = Window::default_attributes()
            .with_title("lumicube")
            .with_inner_size(LogicalSize::new(640, 480));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.init_error = Some(anyhow::Error::new(e).context("failed to create window"));
                event_loop.exit();
                return;
            }
        };

        // Lock the cursor for mouse-look; some platforms only support
        // confinement.
        if window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
            .is_err()
        {
            log::warn!("cursor grab is not supported on this platform");
        }
        window.set_cursor_visible(false);

        match self.async_runtime.block_on(AppState::new(window)) {
            Ok(mut state) => {
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                state.ctx.window.request_redraw();
                self.state = Some(state);
                self.last_time = Instant::now();
            }
            Err(e) => {
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        // Raw deltas keep flowing while the cursor is grabbed, which is
        // exactly when CursorMoved positions stop meaning anything.
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            state.ctx.camera.controller.handle_mouse(dx, dy);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.ctx.camera.controller.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape if key_state.is_pressed() => event_loop.exit(),
                KeyCode::Space if key_state.is_pressed() && !repeat => {
                    state.settings.toggle_normal_mapping();
                    log::info!(
                        "normal mapping {}",
                        if state.settings.normal_mapping {
                            "on"
                        } else {
                            "off"
                        }
                    );
                }
                _ => (),
            },
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                state.update(dt);
                match state.render() {
                    Ok(()) => (),
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("unable to render: {e}");
                    }
                }
            }
            _ => (),
        }
    }
}

pub fn run() -> Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new()?;
    event_loop.run_app(&mut app)?;

    app.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_failure_propagates_out_of_the_loop() {
        let mut app = App::new().unwrap();
        app.init_error = Some(anyhow::anyhow!("no suitable GPU adapter found"));
        assert!(app.finish().is_err());
    }

    #[test]
    fn clean_startup_finishes_ok() {
        let app = App::new().unwrap();
        assert!(app.finish().is_ok());
    }
}
