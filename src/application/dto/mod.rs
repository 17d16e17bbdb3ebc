//! Data transfer objects for the application layer.

mod sticker_dto;

pub use sticker_dto::{COPY_DESCRIPTION, StickerSource, UPLOAD_DESCRIPTION, UploadedAttachment};
