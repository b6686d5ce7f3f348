//! Types and traits for recording training metrics.
//!
//! Environments return a [`Record`] from every step, agents return one from
//! every episode and the [`Trainer`](crate::Trainer) hands them to an
//! [`AggregateRecorder`].
//!
//! ```rust
//! use anonrl_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("episode", RecordValue::Scalar(1.0));
//! record.insert("total_distortion", RecordValue::Scalar(0.25));
//! record.insert("column_distortion", RecordValue::Array1(vec![0.0, 0.25]));
//! assert_eq!(record.get_scalar("total_distortion").unwrap(), 0.25);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
