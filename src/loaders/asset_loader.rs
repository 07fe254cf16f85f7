use anyhow::{Context, Result};
use futures::channel::oneshot;
use std::path::Path;
use std::thread;

use super::gltf::load_gltf;
use crate::scene::Node;

/// Progress of a background model load
#[derive(Debug)]
pub enum LoadState {
    Pending,
    Loaded(Node),
    /// Human-readable cause, already formatted with its context chain
    Failed(String),
}

/// Loads a glTF file on a worker thread; the frame loop polls for the result
#[derive(Debug)]
pub struct AssetLoader {
    receiver: Option<oneshot::Receiver<Result<Node, String>>>,
}

impl AssetLoader {
    pub fn spawn(path: impl AsRef<Path>) -> Result<Self> {
        let worker_path = path.as_ref().to_path_buf();
        let (sender, receiver) = oneshot::channel();

        thread::Builder::new()
            .name("asset-loader".to_string())
            .spawn(move || {
                let result = load_gltf(&worker_path).map_err(|e| format!("{:#}", e));
                // Receiver gone means the viewer already closed
                let _ = sender.send(result);
            })
            .context("Failed to spawn asset loader thread")?;

        Ok(Self {
            receiver: Some(receiver),
        })
    }

    /// Non-blocking check. The result is handed out once; later polls
    /// report a failure.
    pub fn poll(&mut self) -> LoadState {
        let Some(receiver) = self.receiver.as_mut() else {
            return LoadState::Failed("load result already taken".to_string());
        };

        match receiver.try_recv() {
            Ok(None) => LoadState::Pending,
            Ok(Some(result)) => {
                self.receiver = None;
                into_state(result)
            }
            Err(oneshot::Canceled) => {
                self.receiver = None;
                LoadState::Failed("loader thread exited without a result".to_string())
            }
        }
    }
}

fn into_state(result: Result<Node, String>) -> LoadState {
    match result {
        Ok(node) => LoadState::Loaded(node),
        Err(message) => LoadState::Failed(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finish(loader: &mut AssetLoader) -> LoadState {
        loop {
            match loader.poll() {
                LoadState::Pending => thread::yield_now(),
                done => return done,
            }
        }
    }

    #[test]
    fn test_missing_file_fails() {
        let mut loader = AssetLoader::spawn("missing/model.gltf").unwrap();

        match finish(&mut loader) {
            LoadState::Failed(message) => assert!(message.contains("missing/model.gltf")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_poll_until_done() {
        let mut loader = AssetLoader::spawn("missing/model.gltf").unwrap();
        let state = finish(&mut loader);
        assert!(matches!(state, LoadState::Failed(_)));

        // Delivered once
        match loader.poll() {
            LoadState::Failed(message) => assert!(message.contains("already taken")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
