use async_trait::async_trait;
use intercom_session::{LocalStream, MediaConstraints, MediaDevices, MediaError, SampleDevices};
use std::sync::{Arc, Mutex};

/// Devices whose every capture request is refused.
pub struct DeniedDevices;

#[async_trait]
impl MediaDevices for DeniedDevices {
    async fn get_user_media(
        &self,
        _constraints: MediaConstraints,
    ) -> Result<LocalStream, MediaError> {
        Err(MediaError::PermissionDenied)
    }

    async fn get_display_media(&self) -> Result<LocalStream, MediaError> {
        Err(MediaError::PermissionDenied)
    }
}

/// [`SampleDevices`] that keeps a handle on every stream it hands out, so a
/// test can end a capture the way the user would.
#[derive(Default)]
pub struct RecordingDevices {
    inner: SampleDevices,
    user: Mutex<Vec<LocalStream>>,
    display: Mutex<Vec<LocalStream>>,
}

impl RecordingDevices {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn user_streams(&self) -> Vec<LocalStream> {
        self.user.lock().unwrap().clone()
    }

    pub fn last_display(&self) -> Option<LocalStream> {
        self.display.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MediaDevices for RecordingDevices {
    async fn get_user_media(
        &self,
        constraints: MediaConstraints,
    ) -> Result<LocalStream, MediaError> {
        let stream = self.inner.get_user_media(constraints).await?;
        self.user.lock().unwrap().push(stream.clone());
        Ok(stream)
    }

    async fn get_display_media(&self) -> Result<LocalStream, MediaError> {
        let stream = self.inner.get_display_media().await?;
        self.display.lock().unwrap().push(stream.clone());
        Ok(stream)
    }
}
