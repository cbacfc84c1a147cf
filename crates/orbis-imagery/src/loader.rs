//! Background tile loading on a worker thread pool.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;

use image::RgbaImage;
use orbis_tiles::TileCoord;
use tracing::trace;

use crate::{LoadError, TileImageSource};

/// Outcome of one tile load.
#[derive(Debug)]
pub struct LoadResult {
    pub coord: TileCoord,
    /// Decoded image, `None` if the service has no data for the tile.
    pub outcome: Result<Option<RgbaImage>, LoadError>,
}

/// Runs tile loads without blocking the frame thread.
///
/// Requests are fire-and-forget: every submitted coordinate eventually
/// yields exactly one [`LoadResult`] from [`TextureLoader::drain_results`].
pub trait TextureLoader {
    /// Queue a load. Returns `false` if the loader can no longer accept work.
    fn submit(&self, coord: TileCoord) -> bool;

    /// Collect all loads completed since the last call.
    fn drain_results(&self) -> Vec<LoadResult>;

    /// Loads queued or running.
    fn in_flight_count(&self) -> usize;
}

/// Fetch and decode one tile.
fn load_tile(source: &dyn TileImageSource, coord: TileCoord) -> Result<Option<RgbaImage>, LoadError> {
    let Some(bytes) = source.fetch(coord)? else {
        return Ok(None);
    };
    let image = image::load_from_memory(&bytes)?;
    Ok(Some(image.to_rgba8()))
}

/// A [`TextureLoader`] backed by named worker threads.
///
/// The frame thread submits coordinates; workers fetch and decode the
/// image and send the result back over a channel drained once per frame.
pub struct WorkerLoader {
    task_sender: Option<crossbeam_channel::Sender<TileCoord>>,
    result_receiver: crossbeam_channel::Receiver<LoadResult>,
    worker_handles: Vec<JoinHandle<()>>,
    in_flight: Arc<AtomicUsize>,
}

impl WorkerLoader {
    /// Spawn `worker_count` workers (all cores if 0) pulling from `source`.
    pub fn new(worker_count: usize, source: Arc<dyn TileImageSource>) -> std::io::Result<Self> {
        let worker_count = if worker_count == 0 {
            num_cpus::get()
        } else {
            worker_count
        };
        let (task_tx, task_rx) = crossbeam_channel::unbounded::<TileCoord>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();
        let in_flight = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::with_capacity(worker_count);
        for index in 0..worker_count {
            let rx = task_rx.clone();
            let tx = result_tx.clone();
            let source = Arc::clone(&source);
            let flight = Arc::clone(&in_flight);

            let handle = std::thread::Builder::new()
                .name(format!("tile-loader-{index}"))
                .spawn(move || {
                    while let Ok(coord) = rx.recv() {
                        trace!(%coord, "Loading tile");
                        let outcome = load_tile(source.as_ref(), coord);
                        flight.fetch_sub(1, Ordering::Relaxed);
                        if tx.send(LoadResult { coord, outcome }).is_err() {
                            break;
                        }
                    }
                })?;
            handles.push(handle);
        }

        Ok(Self {
            task_sender: Some(task_tx),
            result_receiver: result_rx,
            worker_handles: handles,
            in_flight,
        })
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.worker_handles.len()
    }

    /// Stop accepting work and join the workers once the queue drains.
    pub fn shutdown(&mut self) {
        self.task_sender.take();
        for handle in self.worker_handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl TextureLoader for WorkerLoader {
    fn submit(&self, coord: TileCoord) -> bool {
        let Some(sender) = &self.task_sender else {
            return false;
        };
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        if sender.send(coord).is_err() {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            return false;
        }
        true
    }

    fn drain_results(&self) -> Vec<LoadResult> {
        self.result_receiver.try_iter().collect()
    }

    fn in_flight_count(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }
}

impl Drop for WorkerLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}
