//! Use case implementations.

mod normalize_sticker_use_case;

pub use normalize_sticker_use_case::NormalizeStickerUseCase;
