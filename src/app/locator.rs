use std::{
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc,
    },
    thread,
};

use anyhow::Result;

use super::writer::catch_panic;
use crate::{geotag::GeoMetadata, picker::Coordinate};

pub struct Located {
    pub path: String,
    pub result: Result<Option<Coordinate>>,
}

/// Fire-and-forget coordinate reads for "show on map", independent of the
/// write path.
pub struct Locator {
    path_tx: Sender<String>,
    located_rx: Receiver<Located>,
}

impl Locator {
    pub fn new(metadata: Arc<dyn GeoMetadata>) -> Self {
        let (path_tx, path_rx) = mpsc::channel::<String>();
        let (located_tx, located_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(path) = path_rx.recv() {
                let result = catch_panic("read", || metadata.read_coordinate(&path));
                if located_tx.send(Located { path, result }).is_err() {
                    break;
                }
            }
        });

        Self {
            path_tx,
            located_rx,
        }
    }

    pub fn locate(&self, path: &str) {
        if self.path_tx.send(path.to_string()).is_err() {
            tracing::error!("coordinate reader is gone, cannot locate {path}");
        }
    }

    /// Drains finished reads.
    pub fn update(&mut self) -> Vec<Located> {
        let mut done = Vec::new();
        while let Ok(entry) = self.located_rx.try_recv() {
            done.push(entry);
        }
        done
    }
}
