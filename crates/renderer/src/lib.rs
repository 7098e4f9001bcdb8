//! Render-side data for Starlight: camera state and the streamed star point cloud.
//!
//! Nothing here touches a GPU device. A render surface consumes these types and
//! owns its own pipeline and buffer lifecycle.

pub mod camera;
pub mod point_cloud;
pub mod streamer;

pub use camera::*;
pub use point_cloud::*;
pub use streamer::*;
