use crate::maths::{Mat4, Vec3};
use crate::types::CameraTrait;

const NEAR_CLIP_METERS: f32 = 0.1;
const FAR_CLIP_METERS: f32 = 500.0;
const WORLD_UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

#[derive(Debug, Copy, Clone)]
pub struct CameraProperties {
    pub aspect_ratio: f32,
    pub fovy: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraProperties {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0f32 / 9.0f32,
            fovy: 0.471f32,
            position: Vec3::new(0.0f32, 0.0f32, 0.0f32),
            target: Vec3::new(0.0f32, 1.0f32, 0.0f32),
        }
    }
}

/// The projection matrix depends on both fovy and aspect ratio, so both are
/// stored so that a caller can change one without having to know the other.
/// The view matrix depends on both position and target, so both are stored
/// so that a caller can change one without having to know the other.
#[derive(Debug, Copy, Clone)]
pub struct Camera {
    aspect_ratio: f32,
    fovy: f32,
    position: Vec3,
    target: Vec3,
    view: Mat4,
    proj: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraProperties::default())
    }
}

/// Rendering requires access to the matrices, implemented as this trait.
impl CameraTrait for Camera {
    fn view_matrix(&self) -> Mat4 {
        self.view
    }

    fn proj_matrix(&self) -> Mat4 {
        self.proj
    }
}

impl Camera {
    #[must_use]
    pub fn new(properties: CameraProperties) -> Self {
        Self {
            aspect_ratio: properties.aspect_ratio,
            fovy: properties.fovy,
            position: properties.position,
            target: properties.target,
            view: Self::build_view(properties.position, properties.target),
            proj: Self::build_proj(properties.aspect_ratio, properties.fovy),
        }
    }

    pub fn aspect_ratio(&mut self, aspect_ratio: f32) {
        self.proj = Self::build_proj(aspect_ratio, self.fovy);
        self.aspect_ratio = aspect_ratio;
    }

    pub fn zoom(&mut self, fovy: f32) {
        self.proj = Self::build_proj(self.aspect_ratio, fovy);
        self.fovy = fovy;
    }

    pub fn position(&mut self, position: Vec3) {
        self.view = Self::build_view(position, self.target);
        self.position = position;
    }

    pub fn target(&mut self, target: Vec3) {
        self.view = Self::build_view(self.position, target);
        self.target = target;
    }

    pub fn update_view(&mut self, position: Vec3, target: Vec3) {
        self.view = Self::build_view(position, target);
        self.position = position;
        self.target = target;
    }

    /// Calculate Model View matrix for a given Model matrix
    #[must_use]
    pub fn mv(&self, m: &Mat4) -> Mat4 {
        self.view * *m
    }

    fn build_proj(aspect_ratio: f32, fovy: f32) -> Mat4 {
        let mut proj = Mat4::perspective(
            fovy,
            aspect_ratio,
            NEAR_CLIP_METERS,
            FAR_CLIP_METERS,
        );
        // Vulkan clip space is Y down
        proj[1].y = -proj[1].y;
        proj
    }

    fn build_view(position: Vec3, target: Vec3) -> Mat4 {
        Mat4::look_at(position, target, WORLD_UP)
    }
}
