//! Label transforms for labelled columns and tables.
//!
//! - **labels**: label overlay ([`apply_labels`]) and removal ([`zap_labels`])
//! - **factor**: categorical materialisation ([`as_factor`])
//! - **transforms**: the [`LabelTransform`] trait, broadcasting over tables
//! - **frame**: Polars `DataFrame` export

pub mod factor;
pub mod frame;
pub mod labels;
pub mod transforms;

pub use frame::{to_dataframe, to_series};
pub use transforms::{LabelTransform, apply_labels, as_factor, zap_labels};
