#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
mod golden {
    use std::time::Duration;

    use cgmath::{Matrix4, SquareMatrix, Vector3, Zero};
    use render_samples::{
        SampleKind,
        camera::LookCamera,
        context::Context,
        data_structures::{
            instance::{InstanceRaw, VoxelInstance},
            texture::Texture,
            vertex::{VOXEL_SIZE, scaled_cube},
        },
        flow::{Offscreen, RenderSample},
        pipelines::projective::{
            Projector, ProjectorUniform, mk_projective_pipeline, mk_projector_layout,
        },
        render::{Draw, Render},
        samples::cube::CLEAR_COLOUR,
        surround::{CameraPose, Intrinsics},
    };
    use wgpu::util::DeviceExt;

    use crate::common::test_utils::{assert_pixel, expected_pixel, offscreen};

    const SIZE: u32 = 256;
    const CENTRE: u32 = SIZE / 2;
    const FRAME: Duration = Duration::from_millis(16);
    const ORANGE: wgpu::Color = wgpu::Color {
        r: 1.0,
        g: 0.5,
        b: 0.2,
        a: 1.0,
    };
    const GREEN: [u8; 4] = [0, 255, 0, 255];

    fn render_kind(kind: SampleKind) -> image::RgbaImage {
        let mut offscreen = offscreen(SIZE, SIZE);
        let mut sample = pollster::block_on(kind.constructor()(&offscreen.ctx)).unwrap();
        offscreen.attach(sample.as_mut());
        pollster::block_on(offscreen.render_frame(sample.as_mut(), FRAME)).unwrap()
    }

    #[test]
    fn triangle_is_orange_on_olive() {
        let image = render_kind(SampleKind::Triangle);
        let clear = expected_pixel(wgpu::Color {
            r: 0.5,
            g: 0.5,
            b: 0.1,
            a: 1.0,
        });
        assert_pixel(&image, 0, 0, clear);
        assert_pixel(&image, SIZE - 1, SIZE - 1, clear);
        assert_pixel(&image, CENTRE, CENTRE, expected_pixel(ORANGE));
    }

    #[test]
    fn cube_is_orange_on_grey() {
        let image = render_kind(SampleKind::Cube);
        assert_pixel(&image, 0, 0, expected_pixel(CLEAR_COLOUR));
        assert_pixel(&image, CENTRE, CENTRE, expected_pixel(ORANGE));
    }

    /// One voxel at the origin, seen from the default look camera and
    /// coloured by a single projector with a solid green image.
    struct ProjectedVoxel {
        camera: LookCamera,
        pipeline: wgpu::RenderPipeline,
        projector: Projector,
        vertices: wgpu::Buffer,
        vertex_count: u32,
        instances: wgpu::Buffer,
    }

    impl ProjectedVoxel {
        fn new(ctx: &Context, extrinsic: Matrix4<f32>, intrinsics: Intrinsics) -> Self {
            let layout = mk_projector_layout(&ctx.device);
            let image = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
                16,
                16,
                image::Rgba(GREEN),
            ));
            let texture = Texture::from_image(&ctx.device, &ctx.queue, &image, Some("green"));
            let pose = CameraPose {
                extrinsic,
                centre: Vector3::zero(),
            };
            let uniform = ProjectorUniform::new(&pose, &intrinsics);
            let projector =
                Projector::new(&ctx.device, &layout, uniform, &texture, "test projector").unwrap();

            let geometry = scaled_cube(VOXEL_SIZE);
            let instance: InstanceRaw = VoxelInstance::from(Vector3::zero()).to_raw();
            Self {
                camera: LookCamera::default(),
                pipeline: mk_projective_pipeline(ctx, &layout).unwrap(),
                projector,
                vertices: ctx
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("cube"),
                        contents: bytemuck::cast_slice(&geometry),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
                vertex_count: geometry.len() as u32,
                instances: ctx
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("voxel"),
                        contents: bytemuck::cast_slice(&[instance]),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
            }
        }
    }

    impl RenderSample for ProjectedVoxel {
        fn on_init(&mut self, ctx: &mut Context) {
            ctx.clear_colour = CLEAR_COLOUR;
        }

        fn on_update(&mut self, ctx: &mut Context, _dt: Duration) {
            let projection = ctx.projection.calc_matrix();
            ctx.camera
                .write(&ctx.queue, self.camera.view_matrix(), projection);
        }

        fn on_render<'a>(&'a self, ctx: &'a Context) -> Render<'a> {
            Render::Draw(Draw {
                pipeline: &self.pipeline,
                bind_groups: vec![&ctx.camera.bind_group, &self.projector.bind_group],
                vertex_buffers: vec![&self.vertices, &self.instances],
                vertices: 0..self.vertex_count,
                instances: 0..1,
            })
        }
    }

    /// Normalized focal length `f` in both axes, principal point `(c, c)`.
    fn intrinsics(f: f32, c: f32) -> Intrinsics {
        use render_samples::surround::{IMAGE_HEIGHT, IMAGE_WIDTH};
        Intrinsics {
            fx: f * IMAGE_WIDTH,
            fy: f * IMAGE_HEIGHT,
            cx: c * IMAGE_WIDTH,
            cy: c * IMAGE_HEIGHT,
        }
    }

    fn render_projected(extrinsic: Matrix4<f32>, intrinsics: Intrinsics) -> image::RgbaImage {
        let mut offscreen: Offscreen = offscreen(SIZE, SIZE);
        let mut scene = ProjectedVoxel::new(&offscreen.ctx, extrinsic, intrinsics);
        offscreen.attach(&mut scene);
        pollster::block_on(offscreen.render_frame(&mut scene, FRAME)).unwrap()
    }

    #[test]
    fn visible_voxel_takes_the_camera_colour() {
        let image = render_projected(Matrix4::identity(), intrinsics(0.1, 0.5));
        assert_pixel(&image, CENTRE, CENTRE, image::Rgba(GREEN));
        assert_pixel(&image, 0, 0, expected_pixel(CLEAR_COLOUR));
    }

    #[test]
    fn voxel_behind_the_camera_is_discarded() {
        let behind = Matrix4::from_nonuniform_scale(1.0, 1.0, -1.0);
        let image = render_projected(behind, intrinsics(0.1, 0.5));
        assert_pixel(&image, CENTRE, CENTRE, expected_pixel(CLEAR_COLOUR));
    }

    #[test]
    fn voxel_outside_the_image_is_discarded() {
        // Every projected point lands right of and below the image.
        let image = render_projected(Matrix4::identity(), intrinsics(0.1, 2.0));
        assert_pixel(&image, CENTRE, CENTRE, expected_pixel(CLEAR_COLOUR));
    }

    #[test]
    fn zero_depth_is_replaced_instead_of_dividing_by_zero() {
        // Flattening z puts the whole voxel on the camera plane. Off the centre
        // p.xy / 0 would leave the image; with depth 0.1 it stays inside.
        let flat = Matrix4::from_nonuniform_scale(1.0, 1.0, 0.0);
        let image = render_projected(flat, intrinsics(0.05, 0.5));
        assert_pixel(&image, CENTRE + 20, CENTRE + 20, image::Rgba(GREEN));
        assert_pixel(&image, CENTRE - 20, CENTRE + 20, image::Rgba(GREEN));
    }
}
