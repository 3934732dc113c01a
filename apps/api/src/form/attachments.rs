//! Reference files attached to the form, with their preview handles.
//!
//! Each attachment owns exactly one preview handle. A handle is released when its
//! attachment is removed, when the set is cleared, or when the set is dropped, and
//! never twice.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::llm_client::InlineData;

/// MIME type assumed when an upload does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Opaque reference to a locally viewable copy of an attached file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PreviewHandle(Uuid);

impl PreviewHandle {
    fn issue() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub bytes: Bytes,
}

/// One attached reference file, ready to send inline.
#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: usize,
    pub preview: PreviewHandle,
    #[serde(skip)]
    pub base64_data: String,
}

#[derive(Debug, Clone)]
pub struct Preview {
    pub mime_type: String,
    pub bytes: Bytes,
}

/// Ordered attachments (upload order) plus the previews they own.
#[derive(Debug, Default)]
pub struct AttachmentSet {
    items: Vec<Attachment>,
    previews: HashMap<PreviewHandle, Preview>,
}

impl AttachmentSet {
    /// Appends a file and issues a fresh preview handle for it.
    pub fn add(&mut self, file: UploadedFile) -> PreviewHandle {
        let mime_type = file
            .mime_type
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
        let handle = PreviewHandle::issue();

        self.items.push(Attachment {
            name: file.name,
            mime_type: mime_type.clone(),
            size_bytes: file.bytes.len(),
            preview: handle,
            base64_data: STANDARD.encode(&file.bytes),
        });
        self.previews.insert(
            handle,
            Preview {
                mime_type,
                bytes: file.bytes,
            },
        );
        handle
    }

    /// Removes the attachment owning `handle` and releases its preview.
    /// Returns `false` if the handle is unknown or already released.
    pub fn remove(&mut self, handle: PreviewHandle) -> bool {
        let Some(index) = self.items.iter().position(|a| a.preview == handle) else {
            return false;
        };
        self.items.remove(index);
        self.release(handle)
    }

    /// Removes every attachment; returns how many previews were released.
    pub fn clear(&mut self) -> usize {
        let handles: Vec<PreviewHandle> = self.items.drain(..).map(|a| a.preview).collect();
        let released = handles.into_iter().filter(|h| self.release(*h)).count();
        if released > 0 {
            debug!(released, "Released attachment previews");
        }
        released
    }

    /// Clears the set, then adds `files` in order.
    pub fn replace_all(&mut self, files: Vec<UploadedFile>) -> Vec<PreviewHandle> {
        self.clear();
        files.into_iter().map(|f| self.add(f)).collect()
    }

    pub fn preview(&self, handle: PreviewHandle) -> Option<&Preview> {
        self.previews.get(&handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attachment> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of previews still held.
    #[cfg(test)]
    pub fn live_previews(&self) -> usize {
        self.previews.len()
    }

    /// Inline payloads for the generation request, in upload order.
    pub fn to_inline_data(&self) -> Vec<InlineData> {
        self.items
            .iter()
            .map(|a| InlineData {
                mime_type: a.mime_type.clone(),
                data: a.base64_data.clone(),
            })
            .collect()
    }

    fn release(&mut self, handle: PreviewHandle) -> bool {
        self.previews.remove(&handle).is_some()
    }
}

impl Drop for AttachmentSet {
    fn drop(&mut self) {
        self.clear();
    }
}
