//! Single-channel product pipeline for satellite imagery.
//!
//! Applies a configurable, fixed-order chain of pixel-domain transforms
//! (masking, solar-zenith correction, gamma, scaling, unit conversion,
//! range application) to a masked radiometric array, and reports coverage
//! over a scene, a central disk, or an RGBA alpha channel. Reader/writer
//! boundary adapters and the plugin registry consumed by drivers live
//! here as well.

pub mod adapters;
pub mod algorithm;
pub mod coverage;
pub mod error;
pub mod registry;
pub mod resample;
pub mod spec;

pub use adapters::{
    carry_standard_metadata, AttrValue, DataSet, JsonSceneReader, JsonSceneWriter, Metadata,
    ReaderAdapter, SceneContainer, WriterAdapter, METADATA_KEY, STANDARD_METADATA_KEYS,
};
pub use algorithm::{apply_single_channel, SceneInput};
pub use coverage::{center_disk_coverage, full_scene_coverage, rgba_coverage, windbarb_coverage};
pub use error::{PipelineError, Result};
pub use registry::{Plugin, PluginKind, Registry};
pub use resample::{NearestNeighbor, PointObs, Resampler};
pub use spec::{OutboundsPolicy, ProductSpec, Unit};
