use std::time::Instant;

use novo_core::{
    render::{record::FrameRecorder, RenderContext, RenderOptions},
    scene::{camera::Camera, resource::Resources, Scene},
};

/// Renders the scene into a recorder and reports the frame rate now and then.
pub struct Renderer {
    pub recorder: FrameRecorder,
    pub options: RenderOptions,
    last_printed_instant: Instant,
    frame_count: u32,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            recorder: FrameRecorder::default(),
            options,
            last_printed_instant: Instant::now(),
            frame_count: 0,
        }
    }

    pub fn draw(&mut self, scene: &Scene, camera: &Camera, resources: &Resources) {
        self.recorder.begin_frame();
        scene.render(
            &mut RenderContext::new(&mut self.recorder, camera, resources)
                .with_options(self.options),
        );
        log::debug!(
            "Frame {}: {} commands, {} draws.",
            self.recorder.frames(),
            self.recorder.commands().len(),
            self.recorder.draw_count()
        );
        if self.recorder.unresolved_writes() > 0 {
            log::debug!(
                "{} uniform array writes didn't resolve so far.",
                self.recorder.unresolved_writes()
            );
        }
        self.update_frame_counter();
    }

    pub fn update_frame_counter(&mut self) {
        self.frame_count += 1;
        let new_instant = Instant::now();
        let elapsed_secs = (new_instant - self.last_printed_instant).as_secs_f32();
        if elapsed_secs > 1.0 {
            let elapsed_ms = elapsed_secs * 1000.0;
            let frame_time = elapsed_ms / self.frame_count as f32;
            let fps = self.frame_count as f32 / elapsed_secs;
            log::info!("Frame time {:.2}ms ({:.1} FPS)", frame_time, fps);

            self.last_printed_instant = new_instant;
            self.frame_count = 0;
        }
    }
}
