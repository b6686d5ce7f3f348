use super::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};
use log::info;

/// Buffered recorder.
///
/// Records given by [`Recorder::write`] are kept as they are, which is handy
/// for inspecting per-episode values after training. Records given by
/// [`AggregateRecorder::store`] are aggregated on flush; the aggregate is
/// logged and appended to the buffer with the flush step under `"step"`.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
    storage: RecordStorage,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self {
            buf: Vec::default(),
            storage: RecordStorage::new(),
        }
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// Number of records in the buffer.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Recorder for BufferedRecorder {
    /// Write a [`Record`] to the buffer.
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }
}

impl AggregateRecorder for BufferedRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        if self.storage.is_empty() {
            return;
        }

        let mut record = self.storage.aggregate();
        let mut keys = record.keys().cloned().collect::<Vec<_>>();
        keys.sort();
        for k in keys.iter() {
            if let Some(RecordValue::Scalar(v)) = record.get(k) {
                info!("step {}: {} = {:.4}", step, k, v);
            }
        }
        record.insert("step", RecordValue::Scalar(step as f32));
        self.buf.push(record);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_flush_appends_aggregate() {
        let mut recorder = BufferedRecorder::new();
        recorder.write(Record::from_scalar("episode_return", 1.0));
        recorder.store(Record::from_scalar("episode_return", 1.0));
        recorder.store(Record::from_scalar("episode_return", 3.0));
        recorder.flush(2);

        assert_eq!(recorder.len(), 2);
        let aggregated = recorder.iter().last().unwrap();
        assert_eq!(aggregated.get_scalar("episode_return_mean").unwrap(), 2.0);
        assert_eq!(aggregated.get_scalar("step").unwrap(), 2.0);

        // Nothing stored since the last flush
        recorder.flush(3);
        assert_eq!(recorder.len(), 2);
    }
}
