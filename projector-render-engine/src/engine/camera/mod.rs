pub mod pan_zoom;

pub use pan_zoom::{
    CameraSettings, PanZoomCamera, camera_controller, update_view_viewports,
};
